use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Максимальная длина заголовка отчёта
pub const TITLE_MAX_LEN: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(pub Uuid);

impl ReportId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl AggregateId for ReportId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }
    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ReportId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

/// Ошибки валидации по полям: `{"title": ["..."], ...}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(|v| v.as_slice())
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, msgs)| format!("{}: {}", field, msgs.join("; ")))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Агрегат Report: заголовок хранится в `base.description`,
/// время создания в `base.metadata.created_at`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    #[serde(flatten)]
    pub base: BaseAggregate<ReportId>,
    pub content: String,
}

impl Report {
    pub fn new_for_insert(title: String, content: String) -> Self {
        let base = BaseAggregate::new(ReportId::new_v4(), title);
        Self { base, content }
    }

    pub fn title(&self) -> &str {
        &self.base.description
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.base.metadata.created_at
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let title = self.base.description.trim();
        if title.is_empty() {
            errors.add("title", "This field may not be blank.");
        } else if title.chars().count() > TITLE_MAX_LEN {
            errors.add(
                "title",
                format!(
                    "Ensure this field has no more than {} characters.",
                    TITLE_MAX_LEN
                ),
            );
        }
        if self.content.trim().is_empty() {
            errors.add("content", "This field may not be blank.");
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Перед записью: обновить `updated_at` и поднять версию
    pub fn before_write(&mut self) {
        self.base.touch();
        self.base.metadata.increment_version();
    }
}

impl AggregateRoot for Report {
    type Id = ReportId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "report"
    }
}

/// DTO для создания отчёта
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDto {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Представление отчёта для API: `{id, title, content, timestamp}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportView {
    pub id: String,
    pub title: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<Report> for ReportView {
    fn from(report: Report) -> Self {
        Self {
            id: report.to_string_id(),
            timestamp: report.timestamp(),
            title: report.base.description,
            content: report.content,
        }
    }
}
