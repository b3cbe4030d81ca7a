use chrono::Utc;
use contracts::domain::a001_report::aggregate::{Report, ReportId};
use contracts::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

mod report {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a001_report")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub title: String,
        pub content: String,
        pub comment: Option<String>,
        pub is_deleted: bool,
        pub created_at: Option<chrono::DateTime<chrono::Utc>>,
        pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
        pub version: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<report::Model> for Report {
    fn from(m: report::Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Report {
            base: BaseAggregate::with_metadata(ReportId::new(uuid), m.title, m.comment, metadata),
            content: m.content,
        }
    }
}

/// Получить все отчёты (не удалённые), новые первыми
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Report>, DbErr> {
    let models = report::Entity::find()
        .filter(report::Column::IsDeleted.eq(false))
        .order_by_desc(report::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(models.into_iter().map(|m| m.into()).collect())
}

/// Найти отчёт по ID
pub async fn find_by_id(db: &DatabaseConnection, id: &ReportId) -> Result<Option<Report>, DbErr> {
    let model = report::Entity::find_by_id(id.as_string())
        .filter(report::Column::IsDeleted.eq(false))
        .one(db)
        .await?;
    Ok(model.map(|m| m.into()))
}

/// Вставить новый отчёт (метаданные берутся из агрегата, см. `Report::before_write`)
pub async fn insert(db: &DatabaseConnection, report: &Report) -> Result<(), DbErr> {
    let metadata = report.metadata();
    let active_model = report::ActiveModel {
        id: Set(report.id().as_string()),
        title: Set(report.base.description.clone()),
        content: Set(report.content.clone()),
        comment: Set(report.base.comment.clone()),
        is_deleted: Set(metadata.is_deleted),
        created_at: Set(Some(metadata.created_at)),
        updated_at: Set(Some(metadata.updated_at)),
        version: Set(metadata.version),
    };

    active_model.insert(db).await?;
    Ok(())
}
