use serde::{Deserialize, Serialize};

/// Запись журнала системы
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: String,
    pub source: String, // "client" или "server"
    pub category: String,
    pub message: String,
    /// Сотрудник, от имени которого выполнялась операция (если известен)
    pub employee_id: Option<i64>,
}

/// DTO для создания новой записи журнала
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLogRequest {
    pub source: String,
    pub category: String,
    pub message: String,
    pub employee_id: Option<i64>,
}
