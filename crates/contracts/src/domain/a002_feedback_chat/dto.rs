use serde::{Deserialize, Serialize};

use super::transcript::DownloadableFile;

/// JSON body of the feedback endpoint when no files are attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub message: String,
}

impl FeedbackRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Reply of the feedback endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_info: Option<PdfInfo>,
}

impl FeedbackResponse {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            pdf_info: None,
        }
    }
}

pub const PDF_STATUS_SUCCESS: &str = "success";

const DEFAULT_PDF_FILENAME: &str = "summary.pdf";

/// Status of the generated PDF summary. Every field may be missing on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfInfo {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub message: String,
}

impl PdfInfo {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case(PDF_STATUS_SUCCESS)
    }

    /// Download reference, only when the PDF was generated and has a URL
    pub fn downloadable(&self) -> Option<DownloadableFile> {
        let url = self.url.trim();
        if !self.is_success() || url.is_empty() {
            return None;
        }
        let filename = if self.filename.trim().is_empty() {
            url.rsplit('/')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_PDF_FILENAME)
                .to_string()
        } else {
            self.filename.trim().to_string()
        };
        Some(DownloadableFile {
            url: url.to_string(),
            filename,
        })
    }

    /// Human-readable note from the PDF service, if any
    pub fn note(&self) -> Option<&str> {
        let message = self.message.trim();
        (!message.is_empty()).then_some(message)
    }
}

/// Error body returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
