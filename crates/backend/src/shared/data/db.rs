use contracts::domain::a001_report::aggregate::Report;
use contracts::domain::common::AggregateRoot;
use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

fn build_sqlite_url(path: &Path) -> String {
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

pub async fn initialize_database(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_path.is_absolute() {
        db_path.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_path)
    };
    let db_url = build_sqlite_url(&absolute_path);
    tracing::info!("Connecting to database: {}", db_url);
    let conn = Database::connect(&db_url).await?;

    bootstrap_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

async fn table_exists(conn: &DatabaseConnection, table_name: &str) -> anyhow::Result<bool> {
    let rows = conn
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT name FROM sqlite_master WHERE type='table' AND name = ?;",
            [sea_orm::Value::from(table_name)],
        ))
        .await?;
    Ok(!rows.is_empty())
}

/// Minimal schema bootstrap: create missing tables
pub async fn bootstrap_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    let report_table = Report::table_name();
    if !table_exists(conn, &report_table).await? {
        tracing::info!("Creating {} table", report_table);
        let create_report_table_sql = format!(
            r#"
            CREATE TABLE {} (
                id TEXT PRIMARY KEY NOT NULL,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                comment TEXT,
                is_deleted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
        "#,
            report_table
        );
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            create_report_table_sql,
        ))
        .await?;
    }

    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

#[cfg(test)]
pub async fn memory_connection() -> DatabaseConnection {
    let mut opts = sea_orm::ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let conn = Database::connect(opts).await.unwrap();
    bootstrap_schema(&conn).await.unwrap();
    conn
}

/// Подставить соединение в глобальную ячейку (тесты обработчиков)
#[cfg(test)]
pub fn install_connection(conn: DatabaseConnection) {
    if DB_CONN.set(conn).is_err() {
        tracing::warn!("DB_CONN already initialized");
    }
}
