use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contracts::domain::a001_report::aggregate::{ReportDto, ReportView};
use contracts::domain::a002_feedback_chat::ErrorResponse;

use crate::domain::a001_report::service::{self, ReportError};
use crate::shared::data::db::get_connection;

/// GET /api/reports/
pub async fn list_all() -> Result<Json<Vec<ReportView>>, StatusCode> {
    match service::list_all(get_connection()).await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list reports: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/reports/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<ReportView>, StatusCode> {
    match service::get_by_id(get_connection(), &id).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to load report {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/reports/
///
/// 201 с сохранённым отчётом, 400 с ошибками по полям
pub async fn create(Json(dto): Json<ReportDto>) -> Response {
    match service::create(get_connection(), dto).await {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(ReportError::Validation(errors)) => {
            tracing::warn!("Report rejected: {}", errors);
            (StatusCode::BAD_REQUEST, Json(errors)).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create report: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to create report")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::routes::{configure_routes, AppState};
    use crate::shared::config::Config;
    use crate::shared::data::db::{install_connection, memory_connection};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use contracts::domain::a001_report::aggregate::ReportView;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        configure_routes(AppState {
            config: Arc::new(Config::default()),
            llm: None,
        })
    }

    fn post_report(body: &str) -> Request<Body> {
        Request::post("/api/reports/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: String) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // Connection is process-global: every report route scenario runs here
    #[tokio::test]
    async fn test_report_routes() {
        install_connection(memory_connection().await);

        // 201 with the stored report
        let resp = app()
            .oneshot(post_report(r#"{"title": " Site audit ", "content": "Findings"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: ReportView = body_json(resp).await;
        assert_eq!(created.title, "Site audit");
        assert_eq!(created.content, "Findings");

        let resp = app()
            .oneshot(get(format!("/api/reports/{}", created.id)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let fetched: ReportView = body_json(resp).await;
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.title, "Site audit");

        // 400 with errors per field
        let resp = app()
            .oneshot(post_report(r#"{"title": "   "}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let errors: serde_json::Value = body_json(resp).await;
        assert_eq!(errors["title"][0], "This field may not be blank.");
        assert_eq!(errors["content"][0], "This field may not be blank.");

        // 404 for unknown and malformed ids
        let resp = app()
            .oneshot(get(format!("/api/reports/{}", uuid::Uuid::new_v4())))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = app()
            .oneshot(get("/api/reports/not-a-uuid".to_string()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = app()
            .oneshot(get("/api/reports/".to_string()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let listed: Vec<ReportView> = body_json(resp).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
    }
}
