//! Feedback chat: wire contract of the feedback endpoint and the
//! in-memory transcript model shared by the UI.

pub mod dto;
pub mod staged_files;
pub mod transcript;

pub use dto::{ErrorResponse, FeedbackRequest, FeedbackResponse, PdfInfo};
pub use staged_files::{StagedFile, StagedFiles};
pub use transcript::{ChatSender, DownloadableFile, Transcript, TranscriptMessage};

/// Путь эндпоинта обратной связи
pub const FEEDBACK_ENDPOINT: &str = "/api/query_chatgpt/";

/// Имя текстового поля multipart-запроса
pub const MESSAGE_FIELD: &str = "message";

/// Имя поля multipart-запроса для файлов (повторяется для каждого файла)
pub const FILES_FIELD: &str = "files";
