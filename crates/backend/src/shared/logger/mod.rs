pub mod repository;

use repository::log_event_internal;

/// Логирование события на сервере
///
/// # Примеры
/// ```
/// logger::log("a003_training", "Обучение 25-01-02-0001 создано");
/// ```
pub fn log(category: &str, message: &str) {
    log_event_internal("server", category, message, None);
}

/// Логирование события от имени конкретного сотрудника
pub fn log_for(category: &str, message: &str, employee_id: i64) {
    log_event_internal("server", category, message, Some(employee_id));
}
