//! API utilities for frontend-backend communication

/// Port the backend listens on
pub const BACKEND_PORT: u16 = 3000;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
///
/// # Returns
/// - API base URL like "http://localhost:3000" or "https://example.com:3000"
/// - Empty string if window is not available
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    base_url(&protocol, &hostname)
}

/// Build a full API URL from a path
///
/// # Example
/// ```ignore
/// let url = api_url("/api/query_chatgpt/");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

fn base_url(protocol: &str, hostname: &str) -> String {
    format!("{}//{}:{}", protocol, hostname, BACKEND_PORT)
}

/// Turn a URL returned by the backend into something the browser can open.
///
/// Absolute URLs are kept as-is, relative ones are resolved against `base`.
pub fn resolve_against(base: &str, url: &str) -> String {
    let url = url.trim();
    let is_absolute = ["http://", "https://", "//", "blob:", "data:"]
        .iter()
        .any(|prefix| url.starts_with(prefix));
    if is_absolute || base.is_empty() {
        return url.to_string();
    }

    let base = base.trim_end_matches('/');
    if url.starts_with('/') {
        format!("{}{}", base, url)
    } else {
        format!("{}/{}", base, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url() {
        assert_eq!(base_url("http:", "localhost"), "http://localhost:3000");
        assert_eq!(base_url("https:", "example.com"), "https://example.com:3000");
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(
            resolve_against("http://localhost:3000", "/media/summary.pdf"),
            "http://localhost:3000/media/summary.pdf"
        );
        assert_eq!(
            resolve_against("http://localhost:3000/", "media/summary.pdf"),
            "http://localhost:3000/media/summary.pdf"
        );
    }

    #[test]
    fn test_resolve_absolute() {
        assert_eq!(
            resolve_against("http://localhost:3000", "https://cdn.example.com/a.pdf"),
            "https://cdn.example.com/a.pdf"
        );
        assert_eq!(
            resolve_against("http://localhost:3000", "blob:http://x/1"),
            "blob:http://x/1"
        );
    }

    #[test]
    fn test_resolve_without_base() {
        assert_eq!(resolve_against("", "/media/a.pdf"), "/media/a.pdf");
    }
}
