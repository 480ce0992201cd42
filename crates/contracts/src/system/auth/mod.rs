use serde::{Deserialize, Serialize};

/// Контекст аутентифицированного сотрудника
///
/// Аутентификацию выполняет обратный прокси перед сервисом, сюда
/// личность приходит в доверенных заголовках запроса. Контекст
/// прокидывается в каждую изменяющую операцию: автор записи и журнал.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthContext {
    pub employee_id: i64,
    pub display_name: Option<String>,
    pub roles: Vec<String>,
}

impl AuthContext {
    pub fn new(employee_id: i64) -> Self {
        Self {
            employee_id,
            display_name: None,
            roles: Vec::new(),
        }
    }
}
