use axum::{extract::Path, Json};
use serde::Deserialize;
use serde_json::json;

use crate::domain::a003_training;
use crate::domain::error::DomainError;
use crate::shared::data::db::get_connection;
use crate::system::auth::extractor::AuthSession;
use contracts::domain::a003_training::aggregate::{Training, TrainingDetail, TrainingDto};
use contracts::shared::outcome::OperationOutcome;

#[derive(Deserialize)]
pub struct RosterChangeRequest {
    pub employee_id: i64,
}

/// GET /api/training
pub async fn list_all() -> Result<Json<Vec<Training>>, DomainError> {
    let items = a003_training::service::list_all(get_connection()).await?;
    Ok(Json(items))
}

/// GET /api/training/:id
pub async fn get_by_id(Path(id): Path<i64>) -> Result<Json<TrainingDetail>, DomainError> {
    let detail = a003_training::service::get_detail(get_connection(), id).await?;
    Ok(Json(detail))
}

/// POST /api/training
pub async fn upsert(
    AuthSession(ctx): AuthSession,
    Json(dto): Json<TrainingDto>,
) -> Result<Json<serde_json::Value>, DomainError> {
    let (training, outcome) = if dto.id.is_some() {
        a003_training::service::update(get_connection(), &ctx, dto).await?
    } else {
        a003_training::service::create(get_connection(), &ctx, dto).await?
    };

    Ok(Json(json!({
        "id": training.base.id.value(),
        "code": training.base.code,
        "severity": outcome.severity,
        "message": outcome.message,
    })))
}

/// DELETE /api/training/:id
pub async fn delete(
    AuthSession(ctx): AuthSession,
    Path(id): Path<i64>,
) -> Result<Json<OperationOutcome>, DomainError> {
    let outcome = a003_training::service::delete(get_connection(), &ctx, id).await?;
    Ok(Json(outcome))
}

/// POST /api/training/:id/participants
pub async fn add_participant(
    AuthSession(ctx): AuthSession,
    Path(id): Path<i64>,
    Json(req): Json<RosterChangeRequest>,
) -> Result<Json<OperationOutcome>, DomainError> {
    let outcome =
        a003_training::service::add_participant(get_connection(), &ctx, id, req.employee_id)
            .await?;
    Ok(Json(outcome))
}

/// DELETE /api/training/:id/participants/:employee_id
pub async fn remove_participant(
    AuthSession(ctx): AuthSession,
    Path((id, employee_id)): Path<(i64, i64)>,
) -> Result<Json<OperationOutcome>, DomainError> {
    let outcome =
        a003_training::service::remove_participant(get_connection(), &ctx, id, employee_id).await?;
    Ok(Json(outcome))
}

/// POST /api/training/:id/trainers
pub async fn add_trainer(
    AuthSession(ctx): AuthSession,
    Path(id): Path<i64>,
    Json(req): Json<RosterChangeRequest>,
) -> Result<Json<OperationOutcome>, DomainError> {
    let outcome =
        a003_training::service::add_trainer(get_connection(), &ctx, id, req.employee_id).await?;
    Ok(Json(outcome))
}

/// DELETE /api/training/:id/trainers/:trainer_id
pub async fn remove_trainer(
    AuthSession(ctx): AuthSession,
    Path((id, trainer_id)): Path<(i64, i64)>,
) -> Result<Json<OperationOutcome>, DomainError> {
    let outcome =
        a003_training::service::remove_trainer(get_connection(), &ctx, id, trainer_id).await?;
    Ok(Json(outcome))
}
