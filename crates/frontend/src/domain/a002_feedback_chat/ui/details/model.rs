//! Feedback Chat - Model (API functions)

use crate::shared::api_utils::{api_base, api_url, resolve_against};
use contracts::domain::a002_feedback_chat::{
    ErrorResponse, FeedbackRequest, FeedbackResponse, FEEDBACK_ENDPOINT, FILES_FIELD,
    MESSAGE_FIELD,
};
use gloo_net::http::{Request, Response};
use web_sys::FormData;

/// Longest raw error body echoed back into the chat
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Отправить сообщение агенту.
///
/// Без файлов уходит `application/json`, с файлами `multipart/form-data`
/// (поле `message` и по одной части `files` на файл).
pub async fn send_feedback(
    message: &str,
    files: &[web_sys::File],
) -> Result<FeedbackResponse, String> {
    let url = api_url(FEEDBACK_ENDPOINT);

    let request = if files.is_empty() {
        Request::post(&url)
            .json(&FeedbackRequest::new(message))
            .map_err(|e| format!("Failed to serialize request: {}", e))?
    } else {
        log::debug!("Sending {} file(s) to {}", files.len(), url);
        Request::post(&url)
            .body(build_form(message, files)?)
            .map_err(|e| format!("Failed to build request: {}", e))?
    };

    let response = request
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    read_response(response).await
}

fn build_form(message: &str, files: &[web_sys::File]) -> Result<FormData, String> {
    let form = FormData::new().map_err(|e| format!("{e:?}"))?;
    form.append_with_str(MESSAGE_FIELD, message)
        .map_err(|e| format!("{e:?}"))?;
    for file in files {
        form.append_with_blob_and_filename(FILES_FIELD, file, &file.name())
            .map_err(|e| format!("{e:?}"))?;
    }
    Ok(form)
}

async fn read_response(response: Response) -> Result<FeedbackResponse, String> {
    if !response.ok() {
        let body = response.text().await.unwrap_or_default();
        return Err(describe_http_error(response.status(), &body));
    }

    response
        .json::<FeedbackResponse>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Error text for a non-2xx reply: the backend's `{"error": ...}` when present,
/// otherwise the start of the raw body
pub fn describe_http_error(status: u16, body: &str) -> String {
    if let Ok(err) = serde_json::from_str::<ErrorResponse>(body) {
        if !err.error.trim().is_empty() {
            return format!("HTTP {}: {}", status, err.error.trim());
        }
    }

    let body = body.trim();
    if body.is_empty() {
        return format!("HTTP {}", status);
    }
    let snippet: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    if snippet.len() < body.len() {
        format!("HTTP {}: {}…", status, snippet)
    } else {
        format!("HTTP {}: {}", status, snippet)
    }
}

/// Absolute link for a generated PDF
pub fn resolve_download_url(url: &str) -> String {
    resolve_against(&api_base(), url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_http_error_uses_error_body() {
        assert_eq!(
            describe_http_error(413, r#"{"error":"File 'a.pdf' exceeds 10 MB"}"#),
            "HTTP 413: File 'a.pdf' exceeds 10 MB"
        );
    }

    #[test]
    fn test_describe_http_error_falls_back_to_raw_body() {
        assert_eq!(
            describe_http_error(500, "Internal Server Error\n"),
            "HTTP 500: Internal Server Error"
        );
        assert_eq!(describe_http_error(502, ""), "HTTP 502");
        assert_eq!(describe_http_error(400, r#"{"error":""}"#), r#"HTTP 400: {"error":""}"#);
    }

    #[test]
    fn test_describe_http_error_truncates_long_body() {
        let body = "x".repeat(500);
        let text = describe_http_error(500, &body);
        assert!(text.ends_with('…'));
        assert_eq!(text.chars().count(), "HTTP 500: ".len() + MAX_ERROR_BODY_CHARS + 1);
    }
}
