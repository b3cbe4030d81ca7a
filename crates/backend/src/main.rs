pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;

use std::sync::Arc;

use shared::llm::{openai_provider::OpenAiProvider, LlmProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use axum::middleware::{self, Next};
    use axum::response::Response;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::services::ServeDir;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Создаем директорию для логов
    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file_path = log_dir.join("backend.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                // Отключаем логи SQL запросов, но оставляем логи приложения
                "info,sqlx=warn,sea_orm=warn".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    // Простой middleware для логирования запросов
    async fn request_logger(req: Request<Body>, next: Next) -> Response {
        use axum::body::to_bytes;
        use chrono::Local;

        let start = std::time::Instant::now();
        let method = req.method().clone();
        let uri = req.uri().clone();

        let response = next.run(req).await;

        let (parts, body) = response.into_parts();

        // Читаем тело ответа, чтобы узнать реальный размер
        let bytes = match to_bytes(body, usize::MAX).await {
            Ok(b) => b,
            Err(_) => {
                println!(
                    "\x1b[33m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
                    Local::now().format("%H:%M:%S"),
                    start.elapsed().as_millis(),
                    "error",
                    parts.status.as_u16(),
                    method,
                    uri.path()
                );
                return Response::from_parts(parts, Body::default());
            }
        };

        // Голубой для 2xx, коричневый для остальных
        let color_code = if parts.status.is_success() { "36" } else { "33" };

        println!(
            "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
            color_code,
            Local::now().format("%H:%M:%S"),
            start.elapsed().as_millis(),
            shared::format::format_number(bytes.len()),
            parts.status.as_u16(),
            method,
            uri.path()
        );

        Response::from_parts(parts, Body::from(bytes))
    }

    let config = shared::config::load_config()?;

    let db_path = shared::config::get_database_path(&config)?;
    shared::data::db::initialize_database(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    let llm: Option<Arc<dyn LlmProvider>> = match OpenAiProvider::from_config(&config.llm) {
        Some(provider) => {
            tracing::info!(
                "LLM provider ready: {} ({})",
                config.llm.api_endpoint,
                provider.model()
            );
            Some(Arc::new(provider) as Arc<dyn LlmProvider>)
        }
        None => {
            tracing::warn!(
                "No LLM API key configured (set [llm].api_key or {}); feedback endpoint will answer 503",
                shared::config::LlmConfig::API_KEY_ENV
            );
            None
        }
    };

    let port = config.server.port;
    let static_dir = config.server.static_dir.clone();
    let state = routes::AppState {
        config: Arc::new(config),
        llm,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::configure_routes(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::from_fn(request_logger))
        .layer(cors);

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
