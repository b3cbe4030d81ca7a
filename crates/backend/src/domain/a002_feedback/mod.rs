//! Feedback chat: the endpoint the chat UI submits to.
//!
//! - attachments.rs: reading the multipart form (`message` + `files*`)
//! - service.rs: prompt building and the LLM round-trip

pub mod attachments;
pub mod service;

use crate::shared::llm::LlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Message is empty and no files were attached")]
    EmptyMessage,

    #[error("File '{filename}' exceeds the {limit} byte limit")]
    FileTooLarge { filename: String, limit: u64 },

    #[error("Too many files: at most {0} per message")]
    TooManyFiles(usize),

    #[error("Request body exceeds the {0} byte limit")]
    BodyTooLarge(usize),

    #[error("Malformed request: {0}")]
    BadRequest(String),

    #[error("Feedback service is not configured: no API key")]
    NotConfigured,

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}
