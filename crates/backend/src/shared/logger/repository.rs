use chrono::Utc;
use contracts::shared::logger::LogEntry;
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, QueryOrder, Set};

use crate::shared::data::db::try_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "system_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub timestamp: String,
    pub source: String,
    pub category: String,
    pub message: String,
    pub employee_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LogEntry {
    fn from(m: Model) -> Self {
        LogEntry {
            id: m.id,
            timestamp: m.timestamp,
            source: m.source,
            category: m.category,
            message: m.message,
            employee_id: m.employee_id,
        }
    }
}

/// Добавить запись в журнал в фоне (внутренняя функция)
///
/// До инициализации базы запись молча пропускается
pub fn log_event_internal(source: &str, category: &str, message: &str, employee_id: Option<i64>) {
    let source = source.to_string();
    let category = category.to_string();
    let message = message.to_string();

    tokio::spawn(async move {
        match try_connection() {
            Some(db) => {
                if let Err(e) = log_event(db, &source, &category, &message, employee_id).await {
                    eprintln!("Failed to log event: {}", e);
                }
            }
            None => {
                tracing::debug!("system_log skipped, database is not initialized");
            }
        }
    });
}

/// Добавить запись в журнал
pub async fn log_event(
    db: &DatabaseConnection,
    source: &str,
    category: &str,
    message: &str,
    employee_id: Option<i64>,
) -> anyhow::Result<()> {
    let now = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();

    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        timestamp: Set(now),
        source: Set(source.to_string()),
        category: Set(category.to_string()),
        message: Set(message.to_string()),
        employee_id: Set(employee_id),
    };

    active.insert(db).await?;
    Ok(())
}

/// Получить все записи журнала (сортировка по времени, новые сверху)
pub async fn get_all_logs(db: &DatabaseConnection) -> anyhow::Result<Vec<LogEntry>> {
    let logs: Vec<LogEntry> = Entity::find()
        .order_by_desc(Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(logs)
}

/// Очистить все записи журнала
pub async fn clear_all_logs(db: &DatabaseConnection) -> anyhow::Result<()> {
    Entity::delete_many().exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_test_db;

    #[tokio::test]
    async fn log_event_writes_and_lists_newest_first() {
        let db = connect_test_db().await;

        log_event(&db, "server", "startup", "Сервер запущен", None)
            .await
            .unwrap();
        log_event(&db, "server", "a003_training", "Обучение создано", Some(7))
            .await
            .unwrap();

        let logs = get_all_logs(&db).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].category, "a003_training");
        assert_eq!(logs[0].employee_id, Some(7));
        assert_eq!(logs[1].category, "startup");

        clear_all_logs(&db).await.unwrap();
        assert!(get_all_logs(&db).await.unwrap().is_empty());
    }
}
