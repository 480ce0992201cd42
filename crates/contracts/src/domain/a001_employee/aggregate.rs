use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор сотрудника
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub i64);

impl EmployeeId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl AggregateId for EmployeeId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        s.parse::<i64>()
            .map(EmployeeId::new)
            .map_err(|e| format!("Invalid i64: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Сотрудник (справочник персонала)
///
/// `base.code` — табельный номер, `base.description` — ФИО
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(flatten)]
    pub base: BaseAggregate<EmployeeId>,

    // Специфичные поля агрегата
    pub crew: Option<String>,
    pub position: Option<String>,
    pub active: bool,
}

impl Employee {
    /// Создать нового сотрудника для вставки в БД
    /// (id присваивается базой при вставке)
    pub fn new_for_insert(
        code: String,
        description: String,
        crew: Option<String>,
        position: Option<String>,
        comment: Option<String>,
    ) -> Self {
        let mut base = BaseAggregate::new(EmployeeId::new(0), code, description);
        base.comment = comment;

        Self {
            base,
            crew,
            position,
            active: true,
        }
    }

    /// Обновить данные из DTO
    pub fn update(&mut self, dto: &EmployeeDto) {
        self.base.code = dto.code.clone().unwrap_or_default();
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.crew = dto.crew.clone();
        self.position = dto.position.clone();
        self.active = dto.active;
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("ФИО сотрудника не может быть пустым".into());
        }
        if self.base.code.trim().is_empty() {
            return Err("Табельный номер не может быть пустым".into());
        }

        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for Employee {
    type Id = EmployeeId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "employee"
    }

    fn element_name() -> &'static str {
        "Сотрудник"
    }

    fn list_name() -> &'static str {
        "Сотрудники"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления сотрудника
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EmployeeDto {
    pub id: Option<i64>,
    pub code: Option<String>,
    pub description: String,
    pub crew: Option<String>,
    pub position: Option<String>,
    pub active: bool,
    pub comment: Option<String>,
}
