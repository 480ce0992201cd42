use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};

/// Формат дат начала/окончания обучения
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор обучения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainingId(pub i64);

impl TrainingId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl AggregateId for TrainingId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        s.parse::<i64>()
            .map(TrainingId::new)
            .map_err(|e| format!("Invalid i64: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Обучение (мероприятие повышения квалификации)
///
/// `base.code` — учётный номер вида `ГГ-КК-ПП-НННН` (год окончания,
/// код категории, код подкатегории, порядковый номер). Номер присваивается
/// сервером при создании и пересоздаётся при смене категории.
/// `base.description` — название обучения.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Training {
    #[serde(flatten)]
    pub base: BaseAggregate<TrainingId>,

    // Специфичные поля агрегата
    pub main_category_id: i64,
    pub sub_category_id: Option<i64>,
    pub start_date: String,
    pub end_date: String,
    pub training_units: f64,
    pub created_by: i64,
}

impl Training {
    /// Создать новое обучение для вставки в БД
    /// (id присваивается базой, учётный номер — генератором при создании)
    pub fn new_for_insert(
        description: String,
        main_category_id: i64,
        sub_category_id: Option<i64>,
        start_date: String,
        end_date: String,
        training_units: f64,
        comment: Option<String>,
        created_by: i64,
    ) -> Self {
        let mut base = BaseAggregate::new(TrainingId::new(0), String::new(), description);
        base.comment = comment;

        Self {
            base,
            main_category_id,
            sub_category_id,
            start_date,
            end_date,
            training_units,
            created_by,
        }
    }

    /// Обновить данные из DTO
    ///
    /// Учётный номер и автор записи не трогаются: номером управляет
    /// сервер, автор фиксируется один раз при создании.
    pub fn update(&mut self, dto: &TrainingDto) {
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.main_category_id = dto.main_category_id;
        self.sub_category_id = dto.sub_category_id;
        self.start_date = dto.start_date.clone();
        self.end_date = dto.end_date.clone();
        self.training_units = dto.training_units;
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Название обучения не может быть пустым".into());
        }
        if self.main_category_id <= 0 {
            return Err("Не указана категория обучения".into());
        }
        if chrono::NaiveDate::parse_from_str(&self.start_date, DATE_FORMAT).is_err() {
            return Err("Дата начала должна быть в формате ГГГГ-ММ-ДД".into());
        }
        if chrono::NaiveDate::parse_from_str(&self.end_date, DATE_FORMAT).is_err() {
            return Err("Дата окончания должна быть в формате ГГГГ-ММ-ДД".into());
        }
        if !self.training_units.is_finite() || self.training_units < 0.0 {
            return Err("Объём обучения не может быть отрицательным".into());
        }

        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for Training {
    type Id = TrainingId;

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
        "a003"
    }

    fn collection_name() -> &'static str {
        "training"
    }

    fn element_name() -> &'static str {
        "Обучение"
    }

    fn list_name() -> &'static str {
        "Обучения"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления обучения
///
/// `participant_ids` учитывается только при создании (дальше состав
/// участников меняется поштучно). `trainer_ids = None` при обновлении
/// означает "не трогать текущий список тренеров".
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrainingDto {
    pub id: Option<i64>,
    pub description: String,
    pub main_category_id: i64,
    pub sub_category_id: Option<i64>,
    pub start_date: String,
    pub end_date: String,
    pub training_units: f64,
    #[serde(default)]
    pub participant_ids: Vec<i64>,
    pub trainer_ids: Option<Vec<i64>>,
    pub comment: Option<String>,
}

/// Обучение вместе с составом участников и тренеров (карточка)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingDetail {
    pub training: Training,
    pub participant_ids: Vec<i64>,
    pub trainer_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dto() -> TrainingDto {
        TrainingDto {
            id: None,
            description: "Обучение стропальщиков".to_string(),
            main_category_id: 1,
            sub_category_id: Some(2),
            start_date: "2025-06-01".to_string(),
            end_date: "2025-06-15".to_string(),
            training_units: 16.0,
            participant_ids: vec![],
            trainer_ids: None,
            comment: None,
        }
    }

    #[test]
    fn validate_rejects_empty_name_and_bad_dates() {
        let dto = sample_dto();
        let training = Training::new_for_insert(
            dto.description.clone(),
            dto.main_category_id,
            dto.sub_category_id,
            dto.start_date.clone(),
            dto.end_date.clone(),
            dto.training_units,
            None,
            7,
        );
        assert!(training.validate().is_ok());

        let mut bad = training.clone();
        bad.base.description = "   ".to_string();
        assert!(bad.validate().is_err());

        let mut bad = training.clone();
        bad.end_date = "15.06.2025".to_string();
        assert!(bad.validate().is_err());

        let mut bad = training.clone();
        bad.training_units = -1.0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn update_keeps_code_and_author() {
        let mut training = Training::new_for_insert(
            "Обучение стропальщиков".to_string(),
            1,
            Some(2),
            "2025-06-01".to_string(),
            "2025-06-15".to_string(),
            16.0,
            None,
            7,
        );
        training.base.code = "25-01-02-0001".to_string();

        let mut dto = sample_dto();
        dto.description = "Обучение стропальщиков (группа Б)".to_string();
        dto.training_units = 24.0;
        training.update(&dto);

        assert_eq!(training.base.code, "25-01-02-0001");
        assert_eq!(training.created_by, 7);
        assert_eq!(training.base.description, "Обучение стропальщиков (группа Б)");
        assert_eq!(training.training_units, 24.0);
    }
}
