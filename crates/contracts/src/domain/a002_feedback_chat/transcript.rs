use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dto::FeedbackResponse;

/// Отправитель сообщения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSender {
    User,
    Assistant,
}

impl ChatSender {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatSender::User => "user",
            ChatSender::Assistant => "assistant",
        }
    }
}

/// Файл, который пользователь может скачать из чата
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadableFile {
    pub url: String,
    pub filename: String,
}

/// Сообщение транскрипта
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub id: Uuid,
    pub sender: ChatSender,
    pub text: String,
    /// Имена файлов, отправленных вместе с сообщением пользователя
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub download: Option<DownloadableFile>,
    #[serde(default)]
    pub is_error: bool,
    pub created_at: DateTime<Utc>,
}

impl TranscriptMessage {
    fn new(sender: ChatSender, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            text,
            attachments: Vec::new(),
            download: None,
            is_error: false,
            created_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>, attachments: Vec<String>) -> Self {
        Self {
            attachments,
            ..Self::new(ChatSender::User, text.into())
        }
    }

    pub fn assistant(text: impl Into<String>, download: Option<DownloadableFile>) -> Self {
        Self {
            download,
            ..Self::new(ChatSender::Assistant, text.into())
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::new(ChatSender::Assistant, text.into())
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == ChatSender::User
    }
}

/// Упорядоченный список сообщений чата. Порядок = порядок отправки.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<TranscriptMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: impl Into<String>, attachments: Vec<String>) -> Uuid {
        let msg = TranscriptMessage::user(text, attachments);
        let id = msg.id;
        self.messages.push(msg);
        id
    }

    pub fn push_assistant(
        &mut self,
        text: impl Into<String>,
        download: Option<DownloadableFile>,
    ) -> Uuid {
        let msg = TranscriptMessage::assistant(text, download);
        let id = msg.id;
        self.messages.push(msg);
        id
    }

    pub fn push_error(&mut self, text: impl Into<String>) -> Uuid {
        let msg = TranscriptMessage::error(text);
        let id = msg.id;
        self.messages.push(msg);
        id
    }

    /// Добавить ответ сервера. Если PDF готов, к ответу прикрепляется ссылка;
    /// заметка сервиса PDF (если есть) дописывается к тексту.
    pub fn apply_response(&mut self, response: FeedbackResponse) -> Uuid {
        let FeedbackResponse { response, pdf_info } = response;
        let mut text = response;
        let mut download = None;

        if let Some(pdf) = pdf_info {
            download = pdf.downloadable();
            if let Some(note) = pdf.note() {
                if !text.is_empty() {
                    text.push_str("\n\n");
                }
                text.push_str(note);
            }
        }

        self.push_assistant(text, download)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranscriptMessage> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&TranscriptMessage> {
        self.messages.last()
    }

    pub fn messages(&self) -> &[TranscriptMessage] {
        &self.messages
    }
}
