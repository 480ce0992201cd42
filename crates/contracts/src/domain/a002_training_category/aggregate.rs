use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Types
// ============================================================================

/// Уникальный идентификатор основной категории обучения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainingMainCategoryId(pub i64);

impl TrainingMainCategoryId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl AggregateId for TrainingMainCategoryId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        s.parse::<i64>()
            .map(TrainingMainCategoryId::new)
            .map_err(|e| format!("Invalid i64: {}", e))
    }
}

/// Уникальный идентификатор подкатегории обучения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainingSubCategoryId(pub i64);

impl TrainingSubCategoryId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl AggregateId for TrainingSubCategoryId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        s.parse::<i64>()
            .map(TrainingSubCategoryId::new)
            .map_err(|e| format!("Invalid i64: {}", e))
    }
}

// ============================================================================
// Aggregate Roots
// ============================================================================

/// Основная категория обучения
///
/// `base.code` — двузначный код для учётного номера (например, "01"),
/// `base.description` — название категории.
/// `requires_trainers` — для таких категорий обучение нельзя сохранить
/// без хотя бы одного тренера.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMainCategory {
    #[serde(flatten)]
    pub base: BaseAggregate<TrainingMainCategoryId>,

    // Специфичные поля агрегата
    pub requires_trainers: bool,
    pub active: bool,
}

impl TrainingMainCategory {
    /// Создать новую категорию для вставки в БД
    /// (id присваивается базой при вставке)
    pub fn new_for_insert(
        code: String,
        description: String,
        requires_trainers: bool,
        comment: Option<String>,
    ) -> Self {
        let mut base = BaseAggregate::new(TrainingMainCategoryId::new(0), code, description);
        base.comment = comment;

        Self {
            base,
            requires_trainers,
            active: true,
        }
    }

    /// Обновить данные из DTO
    pub fn update(&mut self, dto: &TrainingMainCategoryDto) {
        self.base.code = dto.code.clone();
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.requires_trainers = dto.requires_trainers;
        self.active = dto.active;
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Название категории не может быть пустым".into());
        }
        validate_category_code(&self.base.code)
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for TrainingMainCategory {
    type Id = TrainingMainCategoryId;

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
        "a002"
    }

    fn collection_name() -> &'static str {
        "training_main_category"
    }

    fn element_name() -> &'static str {
        "Категория обучения"
    }

    fn list_name() -> &'static str {
        "Категории обучения"
    }
}

/// Подкатегория обучения (уточнение внутри основной категории)
///
/// `base.code` — двузначный код для учётного номера,
/// `main_category_id` — ссылка на родительскую категорию.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSubCategory {
    #[serde(flatten)]
    pub base: BaseAggregate<TrainingSubCategoryId>,

    // Специфичные поля агрегата
    pub main_category_id: i64,
    pub active: bool,
}

impl TrainingSubCategory {
    /// Создать новую подкатегорию для вставки в БД
    /// (id присваивается базой при вставке)
    pub fn new_for_insert(
        main_category_id: i64,
        code: String,
        description: String,
        comment: Option<String>,
    ) -> Self {
        let mut base = BaseAggregate::new(TrainingSubCategoryId::new(0), code, description);
        base.comment = comment;

        Self {
            base,
            main_category_id,
            active: true,
        }
    }

    /// Обновить данные из DTO
    pub fn update(&mut self, dto: &TrainingSubCategoryDto) {
        self.base.code = dto.code.clone();
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.main_category_id = dto.main_category_id;
        self.active = dto.active;
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Название подкатегории не может быть пустым".into());
        }
        if self.main_category_id <= 0 {
            return Err("Не указана основная категория".into());
        }
        validate_category_code(&self.base.code)
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for TrainingSubCategory {
    type Id = TrainingSubCategoryId;

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
        "a002"
    }

    fn collection_name() -> &'static str {
        "training_sub_category"
    }

    fn element_name() -> &'static str {
        "Подкатегория обучения"
    }

    fn list_name() -> &'static str {
        "Подкатегории обучения"
    }
}

/// Код категории входит в учётный номер, поэтому формат жёсткий:
/// ровно два символа, буквы или цифры
fn validate_category_code(code: &str) -> Result<(), String> {
    let trimmed = code.trim();
    if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("Код категории должен состоять ровно из двух букв или цифр".into());
    }
    Ok(())
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления основной категории
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrainingMainCategoryDto {
    pub id: Option<i64>,
    pub code: String,
    pub description: String,
    #[serde(default)]
    pub requires_trainers: bool,
    pub active: bool,
    pub comment: Option<String>,
}

/// DTO для создания/обновления подкатегории
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrainingSubCategoryDto {
    pub id: Option<i64>,
    pub main_category_id: i64,
    pub code: String,
    pub description: String,
    pub active: bool,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_code_must_be_two_alphanumeric_chars() {
        let mut cat = TrainingMainCategory::new_for_insert(
            "01".to_string(),
            "Пожарная безопасность".to_string(),
            false,
            None,
        );
        assert!(cat.validate().is_ok());

        cat.base.code = "1".to_string();
        assert!(cat.validate().is_err());

        cat.base.code = "001".to_string();
        assert!(cat.validate().is_err());

        cat.base.code = "0!".to_string();
        assert!(cat.validate().is_err());

        cat.base.code = "AB".to_string();
        assert!(cat.validate().is_ok());
    }

    #[test]
    fn sub_category_requires_parent() {
        let sub = TrainingSubCategory::new_for_insert(0, "02".to_string(), "Кран".to_string(), None);
        assert!(sub.validate().is_err());

        let sub = TrainingSubCategory::new_for_insert(1, "02".to_string(), "Кран".to_string(), None);
        assert!(sub.validate().is_ok());
    }
}
