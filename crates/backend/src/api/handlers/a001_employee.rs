use axum::{extract::Path, Json};

use crate::domain::a001_employee;
use crate::shared::data::db::get_connection;
use contracts::domain::a001_employee::aggregate::Employee;

/// GET /api/employee
pub async fn list_active() -> Result<Json<Vec<Employee>>, axum::http::StatusCode> {
    match a001_employee::service::list_active(get_connection()).await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /api/employee/:id
pub async fn get_by_id(Path(id): Path<i64>) -> Result<Json<Employee>, axum::http::StatusCode> {
    match a001_employee::service::get_by_id(get_connection(), id).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/employee/testdata
pub async fn insert_test_data() -> axum::http::StatusCode {
    match a001_employee::service::insert_test_data(get_connection()).await {
        Ok(_) => axum::http::StatusCode::OK,
        Err(e) => {
            tracing::error!("Failed to insert employee test data: {}", e);
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
