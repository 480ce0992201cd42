use axum::{
    extract::{Path, Query},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::domain::a002_training_category;
use crate::domain::error::DomainError;
use crate::shared::data::db::get_connection;
use contracts::domain::a002_training_category::aggregate::{
    TrainingMainCategory, TrainingMainCategoryDto, TrainingSubCategory, TrainingSubCategoryDto,
};

#[derive(Deserialize)]
pub struct CategoryListParams {
    pub all: Option<bool>,
}

/// GET /api/training-category
pub async fn list_main(
    Query(params): Query<CategoryListParams>,
) -> Result<Json<Vec<TrainingMainCategory>>, DomainError> {
    let include_inactive = params.all.unwrap_or(false);
    let items =
        a002_training_category::service::list_main(get_connection(), include_inactive).await?;
    Ok(Json(items))
}

/// GET /api/training-category/:id/subcategories
pub async fn list_subs(
    Path(id): Path<i64>,
    Query(params): Query<CategoryListParams>,
) -> Result<Json<Vec<TrainingSubCategory>>, DomainError> {
    let include_inactive = params.all.unwrap_or(false);
    let items =
        a002_training_category::service::list_subs_for_main(get_connection(), id, include_inactive)
            .await?;
    Ok(Json(items))
}

/// POST /api/training-category
pub async fn upsert_main(
    Json(dto): Json<TrainingMainCategoryDto>,
) -> Result<Json<serde_json::Value>, DomainError> {
    let saved = a002_training_category::service::upsert_main(get_connection(), dto).await?;
    Ok(Json(
        json!({"id": saved.base.id.value(), "code": saved.base.code}),
    ))
}

/// POST /api/training-category/subcategory
pub async fn upsert_sub(
    Json(dto): Json<TrainingSubCategoryDto>,
) -> Result<Json<serde_json::Value>, DomainError> {
    let saved = a002_training_category::service::upsert_sub(get_connection(), dto).await?;
    Ok(Json(
        json!({"id": saved.base.id.value(), "code": saved.base.code}),
    ))
}

/// POST /api/training-category/testdata
pub async fn insert_test_data() -> axum::http::StatusCode {
    match a002_training_category::service::insert_test_data(get_connection()).await {
        Ok(_) => axum::http::StatusCode::OK,
        Err(e) => {
            tracing::error!("Failed to insert training category test data: {}", e);
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
