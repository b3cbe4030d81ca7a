use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::shared::config::Config;
use crate::shared::llm::LlmProvider;
use contracts::domain::a002_feedback_chat::FEEDBACK_ENDPOINT;

/// Общее состояние обработчиков
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None`, если ключ API не настроен: эндпоинт обратной связи отвечает 503
    pub llm: Option<Arc<dyn LlmProvider>>,
}

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    let upload_limit = state.config.uploads.body_limit();

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // FEEDBACK CHAT
        // ========================================
        .route(
            FEEDBACK_ENDPOINT,
            post(handlers::a002_feedback::query).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // ========================================
        // A001 REPORTS
        // ========================================
        .route(
            "/api/reports/",
            get(handlers::a001_report::list_all).post(handlers::a001_report::create),
        )
        .route("/api/reports/:id", get(handlers::a001_report::get_by_id))
        .with_state(state)
}
