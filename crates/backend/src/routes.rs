use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::{api::handlers, system};

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        // ========================================
        // СПРАВОЧНИКИ
        // ========================================
        // A001 Employee handlers
        .route("/api/employee", get(handlers::a001_employee::list_active))
        .route(
            "/api/employee/testdata",
            post(handlers::a001_employee::insert_test_data),
        )
        .route(
            "/api/employee/:id",
            get(handlers::a001_employee::get_by_id),
        )
        // A002 Training category handlers
        .route(
            "/api/training-category",
            get(handlers::a002_training_category::list_main)
                .post(handlers::a002_training_category::upsert_main),
        )
        .route(
            "/api/training-category/subcategory",
            post(handlers::a002_training_category::upsert_sub),
        )
        .route(
            "/api/training-category/testdata",
            post(handlers::a002_training_category::insert_test_data),
        )
        .route(
            "/api/training-category/:id/subcategories",
            get(handlers::a002_training_category::list_subs),
        )
        // ========================================
        // ДОКУМЕНТЫ
        // ========================================
        // A003 Training handlers
        .route(
            "/api/training",
            get(handlers::a003_training::list_all).post(handlers::a003_training::upsert),
        )
        .route(
            "/api/training/:id",
            get(handlers::a003_training::get_by_id).delete(handlers::a003_training::delete),
        )
        .route(
            "/api/training/:id/participants",
            post(handlers::a003_training::add_participant),
        )
        .route(
            "/api/training/:id/participants/:employee_id",
            delete(handlers::a003_training::remove_participant),
        )
        .route(
            "/api/training/:id/trainers",
            post(handlers::a003_training::add_trainer),
        )
        .route(
            "/api/training/:id/trainers/:trainer_id",
            delete(handlers::a003_training::remove_trainer),
        )
        // ========================================
        // UTILITIES
        // ========================================
        // Logs handlers
        .route(
            "/api/logs",
            get(handlers::logs::list_all)
                .post(handlers::logs::create)
                .delete(handlers::logs::clear_all),
        )
        // Личность сотрудника обязательна для всех бизнес-роутов
        .layer(middleware::from_fn(system::auth::middleware::require_auth))
        // Health check остаётся открытым
        .route("/health", get(|| async { "ok" }))
}
