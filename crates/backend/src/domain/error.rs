use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;

/// Ошибки доменных операций
///
/// Операция либо проходит целиком, либо возвращает ровно одну ошибку,
/// частичных результатов не бывает. HTTP-слой превращает ошибку в статус
/// и тело того же вида, что и OperationOutcome (severity = "error").
#[derive(Debug, Error)]
pub enum DomainError {
    /// Запись по указанному id не существует (текст формирует сервис)
    #[error("{0}")]
    NotFound(String),

    /// У категории пустой код, учётный номер собрать нельзя
    #[error("{0}")]
    InvalidCategoryCode(String),

    #[error("Для этой категории обучения требуется хотя бы один тренер")]
    MissingTrainers,

    #[error("Сотрудник уже числится участником этого обучения")]
    DuplicateParticipant,

    #[error("Сотрудник уже назначен тренером этого обучения")]
    DuplicateTrainer,

    #[error("{0}")]
    Validation(String),

    #[error("Ошибка базы данных: {0}")]
    Persistence(#[from] DbErr),
}

impl DomainError {
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NotFound(_) => "NOT_FOUND",
            DomainError::InvalidCategoryCode(_) => "INVALID_CATEGORY_CODE",
            DomainError::MissingTrainers => "MISSING_TRAINERS",
            DomainError::DuplicateParticipant => "DUPLICATE_PARTICIPANT",
            DomainError::DuplicateTrainer => "DUPLICATE_TRAINER",
            DomainError::Validation(_) => "VALIDATION",
            DomainError::Persistence(_) => "PERSISTENCE",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::InvalidCategoryCode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::MissingTrainers => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::DuplicateParticipant => StatusCode::CONFLICT,
            DomainError::DuplicateTrainer => StatusCode::CONFLICT,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        if let DomainError::Persistence(ref e) = self {
            tracing::error!("Database error: {}", e);
        }

        let body = Json(json!({
            "severity": "error",
            "code": self.code(),
            "message": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

/// Проверка нарушения UNIQUE (sqlite сообщает о нём только текстом ошибки)
pub fn is_unique_violation(err: &DbErr) -> bool {
    err.to_string().contains("UNIQUE constraint failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_statuses_match_taxonomy() {
        let err = DomainError::NotFound("Обучение 42 не найдено".into());
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        assert_eq!(
            DomainError::MissingTrainers.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            DomainError::DuplicateParticipant.status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            DomainError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn unique_violation_detected_by_message() {
        let err = DbErr::Custom(
            "UNIQUE constraint failed: a003_training_participant.training_id".to_string(),
        );
        assert!(is_unique_violation(&err));

        let err = DbErr::Custom("NOT NULL constraint failed".to_string());
        assert!(!is_unique_violation(&err));
    }
}
