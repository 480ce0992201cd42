use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

use crate::shared::config;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Инициализация базы данных (путь берётся из config.toml)
pub async fn initialize_database() -> anyhow::Result<()> {
    let cfg = config::load_config()?;
    let db_path = config::get_database_path(&cfg)?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Normalize path separators and ensure proper URL form on Windows
    let normalized = db_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    tracing::info!("Database file: {}", db_path.display());
    let conn = Database::connect(&db_url).await?;

    create_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

async fn table_exists(conn: &DatabaseConnection, name: &str) -> anyhow::Result<bool> {
    let rows = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            format!(
                "SELECT name FROM sqlite_master WHERE type='table' AND name='{}';",
                name
            ),
        ))
        .await?;
    Ok(!rows.is_empty())
}

async fn column_exists(
    conn: &DatabaseConnection,
    table: &str,
    column: &str,
) -> anyhow::Result<bool> {
    let rows = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            format!("PRAGMA table_info('{}');", table),
        ))
        .await?;
    for row in rows {
        let name: String = row.try_get("", "name").unwrap_or_default();
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

async fn execute(conn: &DatabaseConnection, sql: &str) -> anyhow::Result<()> {
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        sql.to_string(),
    ))
    .await?;
    Ok(())
}

/// Создание недостающих таблиц (минимальный bootstrap схемы)
///
/// Вызывается при старте сервера. Тесты готовят sqlite::memory: этой же
/// функцией, поэтому она не трогает глобальное подключение.
pub async fn create_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    // a001_employee
    if !table_exists(conn, "a001_employee").await? {
        tracing::info!("Creating a001_employee table");
        execute(
            conn,
            r#"
            CREATE TABLE a001_employee (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                code TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL,
                comment TEXT,
                crew TEXT,
                position TEXT,
                active INTEGER NOT NULL DEFAULT 1,
                is_deleted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
        "#,
        )
        .await?;
    }

    // a002_training_main_category
    if !table_exists(conn, "a002_training_main_category").await? {
        tracing::info!("Creating a002_training_main_category table");
        execute(
            conn,
            r#"
            CREATE TABLE a002_training_main_category (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                code TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL,
                comment TEXT,
                requires_trainers INTEGER NOT NULL DEFAULT 0,
                active INTEGER NOT NULL DEFAULT 1,
                is_deleted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
        "#,
        )
        .await?;
    } else if !column_exists(conn, "a002_training_main_category", "requires_trainers").await? {
        // Старые базы: признак "нужны тренеры" был зашит в код по id категории
        tracing::info!("Adding requires_trainers column to a002_training_main_category");
        execute(
            conn,
            "ALTER TABLE a002_training_main_category ADD COLUMN requires_trainers INTEGER NOT NULL DEFAULT 0;",
        )
        .await?;
    }

    // a002_training_sub_category
    if !table_exists(conn, "a002_training_sub_category").await? {
        tracing::info!("Creating a002_training_sub_category table");
        execute(
            conn,
            r#"
            CREATE TABLE a002_training_sub_category (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                code TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL,
                comment TEXT,
                main_category_id INTEGER NOT NULL,
                active INTEGER NOT NULL DEFAULT 1,
                is_deleted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
        "#,
        )
        .await?;
    }

    // a003_training
    if !table_exists(conn, "a003_training").await? {
        tracing::info!("Creating a003_training table");
        execute(
            conn,
            r#"
            CREATE TABLE a003_training (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                code TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL,
                comment TEXT,
                main_category_id INTEGER NOT NULL,
                sub_category_id INTEGER,
                start_date TEXT NOT NULL,
                end_date TEXT NOT NULL,
                training_units REAL NOT NULL DEFAULT 0,
                created_by INTEGER NOT NULL,
                is_deleted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
        "#,
        )
        .await?;
    }

    // Учётный номер уникален в пределах всей таблицы
    execute(
        conn,
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_a003_training_code ON a003_training(code);",
    )
    .await?;

    // a003_training_participant
    if !table_exists(conn, "a003_training_participant").await? {
        tracing::info!("Creating a003_training_participant table");
        execute(
            conn,
            r#"
            CREATE TABLE a003_training_participant (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                training_id INTEGER NOT NULL,
                employee_id INTEGER NOT NULL,
                created_at TEXT,
                UNIQUE (training_id, employee_id)
            );
        "#,
        )
        .await?;
    }

    // a003_training_trainer
    if !table_exists(conn, "a003_training_trainer").await? {
        tracing::info!("Creating a003_training_trainer table");
        execute(
            conn,
            r#"
            CREATE TABLE a003_training_trainer (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                training_id INTEGER NOT NULL,
                employee_id INTEGER NOT NULL,
                created_at TEXT,
                UNIQUE (training_id, employee_id)
            );
        "#,
        )
        .await?;
    }

    // system_log
    if !table_exists(conn, "system_log").await? {
        tracing::info!("Creating system_log table");
        execute(
            conn,
            r#"
            CREATE TABLE system_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                source TEXT NOT NULL,
                category TEXT NOT NULL,
                message TEXT NOT NULL,
                employee_id INTEGER
            );
        "#,
        )
        .await?;
    }

    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

/// Подключение, если база уже инициализирована
///
/// Журнал пишет в фоне и не должен падать до инициализации
/// (и в тестах, где глобального подключения нет вовсе)
pub fn try_connection() -> Option<&'static DatabaseConnection> {
    DB_CONN.get()
}

#[cfg(test)]
pub async fn connect_test_db() -> DatabaseConnection {
    use sea_orm::ConnectOptions;

    // Пул из одного соединения: каждое соединение sqlite::memory:
    // открывает свою собственную пустую базу
    let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
    opt.max_connections(1).sqlx_logging(false);
    let conn = Database::connect(opt).await.expect("in-memory sqlite");
    create_schema(&conn).await.expect("schema bootstrap");
    conn
}
