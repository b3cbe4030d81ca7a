use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    Json,
};
use contracts::domain::a002_feedback_chat::{ErrorResponse, FeedbackRequest, FeedbackResponse};

use crate::domain::a002_feedback::attachments::{read_multipart, FeedbackInput};
use crate::domain::a002_feedback::{service, FeedbackError};
use crate::routes::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn status_for(error: &FeedbackError) -> StatusCode {
    match error {
        FeedbackError::EmptyMessage | FeedbackError::BadRequest(_) => StatusCode::BAD_REQUEST,
        FeedbackError::FileTooLarge { .. }
        | FeedbackError::TooManyFiles(_)
        | FeedbackError::BodyTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        FeedbackError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        FeedbackError::Llm(_) => StatusCode::BAD_GATEWAY,
    }
}

fn to_api_error(error: FeedbackError) -> ApiError {
    let status = status_for(&error);
    if status.is_server_error() {
        tracing::error!("Feedback request failed: {}", error);
    } else {
        tracing::warn!("Feedback request rejected: {}", error);
    }
    (status, Json(ErrorResponse::new(error.to_string())))
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.trim_start().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

fn rejection_error(status: StatusCode, body_text: String, state: &AppState) -> FeedbackError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        FeedbackError::BodyTooLarge(state.config.uploads.body_limit())
    } else {
        FeedbackError::BadRequest(body_text)
    }
}

async fn read_input(state: &AppState, req: Request) -> Result<FeedbackInput, FeedbackError> {
    if is_multipart(&req) {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| rejection_error(e.status(), e.body_text(), state))?;
        read_multipart(multipart, &state.config.uploads).await
    } else {
        let Json(dto) = Json::<FeedbackRequest>::from_request(req, state)
            .await
            .map_err(|e| rejection_error(e.status(), e.body_text(), state))?;
        Ok(FeedbackInput::text(dto.message))
    }
}

/// POST /api/query_chatgpt/
///
/// JSON `{message}` или multipart (`message` + `files*`)
pub async fn query(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let input = read_input(&state, req).await.map_err(to_api_error)?;
    if input.is_empty() {
        return Err(to_api_error(FeedbackError::EmptyMessage));
    }

    let provider = state
        .llm
        .clone()
        .ok_or(FeedbackError::NotConfigured)
        .map_err(to_api_error)?;

    let response = service::ask_feedback(
        provider.as_ref(),
        &state.config.llm.system_prompt,
        input,
    )
    .await
    .map_err(to_api_error)?;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use crate::domain::a002_feedback::service::tests::StubProvider;
    use crate::routes::{configure_routes, AppState};
    use crate::shared::config::{Config, UploadsConfig};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use contracts::domain::a002_feedback_chat::{ErrorResponse, FeedbackResponse};
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "kosh-test-boundary";

    fn state_with(provider: Option<Arc<StubProvider>>, uploads: UploadsConfig) -> AppState {
        let config = Config {
            uploads,
            ..Config::default()
        };
        AppState {
            config: Arc::new(config),
            llm: provider.map(|p| p as Arc<dyn crate::shared::llm::LlmProvider>),
        }
    }

    fn json_request(body: &str) -> Request<Body> {
        Request::post("/api/query_chatgpt/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(message: &str, files: &[(&str, &str)]) -> Request<Body> {
        let mut body = String::new();
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"message\"\r\n\r\n{message}\r\n"
        ));
        for (name, content) in files {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\nContent-Type: text/plain\r\n\r\n{content}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::post("/api/query_chatgpt/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_json_request() {
        let provider = Arc::new(StubProvider::replying("Nice structure."));
        let app = configure_routes(state_with(Some(provider.clone()), UploadsConfig::default()));

        let resp = app
            .oneshot(json_request(r#"{"message": "Please review"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: FeedbackResponse = body_json(resp).await;
        assert_eq!(body.response, "Nice structure.");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[0].last().unwrap().content, "Please review");
    }

    #[tokio::test]
    async fn test_multipart_request_lists_files() {
        let provider = Arc::new(StubProvider::replying("Read both."));
        let app = configure_routes(state_with(Some(provider.clone()), UploadsConfig::default()));

        let resp = app
            .oneshot(multipart_request(
                "Thoughts?",
                &[("a.txt", "alpha"), ("b.txt", "beta")],
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let seen = provider.seen.lock().unwrap();
        let prompt = &seen[0].last().unwrap().content;
        assert!(prompt.starts_with("Thoughts?"));
        assert!(prompt.contains("- a.txt (5 B)"));
        assert!(prompt.contains("- b.txt (4 B)"));
    }

    #[tokio::test]
    async fn test_empty_message_is_bad_request() {
        let provider = Arc::new(StubProvider::replying("unused"));
        let app = configure_routes(state_with(Some(provider), UploadsConfig::default()));

        let resp = app.oneshot(json_request(r#"{"message": ""}"#)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = body_json(resp).await;
        assert!(!body.error.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_file_rejected() {
        let provider = Arc::new(StubProvider::replying("unused"));
        let uploads = UploadsConfig {
            max_file_bytes: 3,
            max_files: 2,
        };
        let app = configure_routes(state_with(Some(provider.clone()), uploads));

        let resp = app
            .oneshot(multipart_request("hi", &[("big.txt", "too large")]))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_too_many_files_rejected() {
        let provider = Arc::new(StubProvider::replying("unused"));
        let uploads = UploadsConfig {
            max_file_bytes: 1024,
            max_files: 1,
        };
        let app = configure_routes(state_with(Some(provider), uploads));

        let resp = app
            .oneshot(multipart_request("hi", &[("a.txt", "a"), ("b.txt", "b")]))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_too_many_large_files_hit_body_limit() {
        let provider = Arc::new(StubProvider::replying("unused"));
        let two_mb = 2 * 1024 * 1024;
        let uploads = UploadsConfig {
            max_file_bytes: two_mb as u64,
            max_files: 1,
        };
        let app = configure_routes(state_with(Some(provider.clone()), uploads));

        let content = "x".repeat(two_mb);
        let resp = app
            .oneshot(multipart_request(
                "hi",
                &[("a.txt", content.as_str()), ("b.txt", content.as_str())],
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body: ErrorResponse = body_json(resp).await;
        assert!(body.error.contains("limit"));
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_message_without_llm_is_bad_request() {
        let app = configure_routes(state_with(None, UploadsConfig::default()));
        let resp = app.oneshot(json_request(r#"{"message": ""}"#)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let app = configure_routes(state_with(None, UploadsConfig::default()));
        let resp = app.oneshot(multipart_request("  ", &[])).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unconfigured_llm_is_unavailable() {
        let app = configure_routes(state_with(None, UploadsConfig::default()));
        let resp = app.oneshot(json_request(r#"{"message": "hi"}"#)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_llm_failure_is_bad_gateway() {
        let provider = Arc::new(StubProvider::failing("boom"));
        let app = configure_routes(state_with(Some(provider), UploadsConfig::default()));
        let resp = app.oneshot(json_request(r#"{"message": "hi"}"#)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let provider = Arc::new(StubProvider::replying("unused"));
        let app = configure_routes(state_with(Some(provider), UploadsConfig::default()));
        let resp = app.oneshot(json_request("{not json")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
