use super::FeedbackError;
use crate::shared::config::UploadsConfig;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use contracts::domain::a002_feedback_chat::{FILES_FIELD, MESSAGE_FIELD};

/// Файл из запроса. Содержимое не сохраняется, учитывается только размер.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: Option<String>,
    pub size: u64,
}

/// Разобранный запрос к эндпоинту обратной связи
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackInput {
    pub message: String,
    pub attachments: Vec<Attachment>,
}

impl FeedbackInput {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            attachments: Vec::new(),
        }
    }

    /// Нет ни текста, ни файлов
    pub fn is_empty(&self) -> bool {
        self.message.trim().is_empty() && self.attachments.is_empty()
    }
}

/// Ошибка чтения формы: превышение `DefaultBodyLimit` отдаётся как 413, остальное как 400
fn multipart_error(e: MultipartError, limits: &UploadsConfig) -> FeedbackError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        FeedbackError::BodyTooLarge(limits.body_limit())
    } else {
        FeedbackError::BadRequest(e.body_text())
    }
}

/// Прочитать multipart-форму: поле `message` и ноль или более частей `files`
pub async fn read_multipart(
    mut multipart: Multipart,
    limits: &UploadsConfig,
) -> Result<FeedbackInput, FeedbackError> {
    let mut input = FeedbackInput::default();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limits))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == MESSAGE_FIELD {
            input.message = field
                .text()
                .await
                .map_err(|e| multipart_error(e, limits))?;
            continue;
        }

        if name != FILES_FIELD {
            tracing::debug!("Skipping unknown multipart field '{}'", name);
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(|s| s.to_string());

        let mut size: u64 = 0;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, limits))?
        {
            size += chunk.len() as u64;
            if size > limits.max_file_bytes {
                return Err(FeedbackError::FileTooLarge {
                    filename,
                    limit: limits.max_file_bytes,
                });
            }
        }

        // Пустая часть без имени: браузер отправляет её, когда файл не выбран
        if filename.is_empty() && size == 0 {
            continue;
        }

        if input.attachments.len() >= limits.max_files {
            return Err(FeedbackError::TooManyFiles(limits.max_files));
        }

        tracing::debug!(
            "Attachment '{}' ({}, {} bytes)",
            filename,
            content_type.as_deref().unwrap_or("unknown type"),
            size
        );
        input.attachments.push(Attachment {
            filename: if filename.is_empty() {
                "unnamed".to_string()
            } else {
                filename
            },
            content_type,
            size,
        });
    }

    Ok(input)
}
