use super::repository;
use contracts::domain::a001_report::aggregate::{
    Report, ReportDto, ReportId, ReportView, ValidationErrors,
};
use contracts::domain::common::AggregateId;
use sea_orm::{DatabaseConnection, DbErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

/// Создание нового отчёта
pub async fn create(db: &DatabaseConnection, dto: ReportDto) -> Result<ReportView, ReportError> {
    let mut aggregate = Report::new_for_insert(dto.title.trim().to_string(), dto.content);

    aggregate.validate().map_err(ReportError::Validation)?;
    aggregate.before_write();

    repository::insert(db, &aggregate).await?;
    tracing::info!("Report created: {}", aggregate.to_string_id());

    Ok(aggregate.into())
}

/// Получить отчёт по ID; некорректный ID трактуется как отсутствующий
pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<ReportView>, DbErr> {
    let Ok(report_id) = ReportId::from_string(id) else {
        return Ok(None);
    };
    let report = repository::find_by_id(db, &report_id).await?;
    Ok(report.map(ReportView::from))
}

/// Получить список всех отчётов
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<ReportView>, DbErr> {
    let reports = repository::list_all(db).await?;
    Ok(reports.into_iter().map(ReportView::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::memory_connection;

    #[tokio::test]
    async fn test_create_then_get() {
        let db = memory_connection().await;
        let created = create(
            &db,
            ReportDto {
                title: "  Site audit ".into(),
                content: "Findings...".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(created.title, "Site audit");

        let fetched = get_by_id(&db, &created.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.content, "Findings...");
        assert_eq!(list_all(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_report_is_not_stored() {
        let db = memory_connection().await;
        let err = create(
            &db,
            ReportDto {
                title: String::new(),
                content: "x".into(),
            },
        )
        .await
        .unwrap_err();
        match err {
            ReportError::Validation(errors) => assert!(errors.field("title").is_some()),
            other => panic!("unexpected error: {other}"),
        }
        assert!(list_all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_id_is_none() {
        let db = memory_connection().await;
        assert!(get_by_id(&db, "not-a-uuid").await.unwrap().is_none());
    }
}
