use contracts::domain::a003_training::aggregate::{Training, TrainingId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

/// Таблица обучений
mod training {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a003_training")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub code: String,
        pub description: String,
        pub comment: Option<String>,
        pub main_category_id: i64,
        pub sub_category_id: Option<i64>,
        pub start_date: String,
        pub end_date: String,
        pub training_units: f64,
        pub created_by: i64,
        pub is_deleted: bool,
        pub created_at: Option<chrono::DateTime<chrono::Utc>>,
        pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
        pub version: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Таблица участников обучения
mod participant {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a003_training_participant")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub training_id: i64,
        pub employee_id: i64,
        pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Таблица тренеров обучения
mod trainer {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a003_training_trainer")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub training_id: i64,
        pub employee_id: i64,
        pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<training::Model> for Training {
    fn from(model: training::Model) -> Self {
        let metadata = EntityMetadata {
            created_at: model.created_at.unwrap_or_else(chrono::Utc::now),
            updated_at: model.updated_at.unwrap_or_else(chrono::Utc::now),
            is_deleted: model.is_deleted,
            version: model.version,
        };

        Training {
            base: BaseAggregate::with_metadata(
                TrainingId(model.id),
                model.code,
                model.description,
                model.comment,
                metadata,
            ),
            main_category_id: model.main_category_id,
            sub_category_id: model.sub_category_id,
            start_date: model.start_date,
            end_date: model.end_date,
            training_units: model.training_units,
            created_by: model.created_by,
        }
    }
}

fn active_model_from(aggregate: &Training) -> training::ActiveModel {
    training::ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        main_category_id: Set(aggregate.main_category_id),
        sub_category_id: Set(aggregate.sub_category_id),
        start_date: Set(aggregate.start_date.clone()),
        end_date: Set(aggregate.end_date.clone()),
        training_units: Set(aggregate.training_units),
        created_by: Set(aggregate.created_by),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

/// Список всех обучений, свежие по дате окончания сверху
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Training>, DbErr> {
    let models = training::Entity::find()
        .filter(training::Column::IsDeleted.eq(false))
        .order_by_desc(training::Column::EndDate)
        .order_by_desc(training::Column::Id)
        .all(db)
        .await?;
    Ok(models.into_iter().map(Training::from).collect())
}

pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Training>, DbErr> {
    let model = training::Entity::find_by_id(id).one(db).await?;
    Ok(model.map(Training::from))
}

pub async fn find_by_id_txn(
    txn: &DatabaseTransaction,
    id: i64,
) -> Result<Option<Training>, DbErr> {
    let model = training::Entity::find_by_id(id).one(txn).await?;
    Ok(model.map(Training::from))
}

/// Поиск по учётному номеру
pub async fn find_by_display_id(
    db: &DatabaseConnection,
    code: &str,
) -> Result<Option<Training>, DbErr> {
    let model = training::Entity::find()
        .filter(training::Column::Code.eq(code))
        .one(db)
        .await?;
    Ok(model.map(Training::from))
}

/// Все выданные учётные номера с заданным префиксом "ГГ-КК-ПП-"
pub async fn display_ids_with_prefix_txn(
    txn: &DatabaseTransaction,
    prefix: &str,
) -> Result<Vec<String>, DbErr> {
    training::Entity::find()
        .select_only()
        .column(training::Column::Code)
        .filter(training::Column::Code.starts_with(prefix))
        .into_tuple::<String>()
        .all(txn)
        .await
}

pub async fn insert_txn(txn: &DatabaseTransaction, aggregate: &Training) -> Result<Training, DbErr> {
    let active = active_model_from(aggregate);
    let model = active.insert(txn).await?;
    Ok(Training::from(model))
}

pub async fn update_txn(txn: &DatabaseTransaction, aggregate: &Training) -> Result<(), DbErr> {
    let mut active = active_model_from(aggregate);
    active.id = Set(aggregate.base.id.value());
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.version = Set(aggregate.base.metadata.version + 1);
    active.update(txn).await?;
    Ok(())
}

pub async fn delete_txn(txn: &DatabaseTransaction, id: i64) -> Result<bool, DbErr> {
    let result = training::Entity::delete_by_id(id).exec(txn).await?;
    Ok(result.rows_affected > 0)
}

// ==================== Участники ====================

pub async fn participant_ids_of(
    db: &DatabaseConnection,
    training_id: i64,
) -> Result<Vec<i64>, DbErr> {
    participant::Entity::find()
        .select_only()
        .column(participant::Column::EmployeeId)
        .filter(participant::Column::TrainingId.eq(training_id))
        .order_by_asc(participant::Column::EmployeeId)
        .into_tuple::<i64>()
        .all(db)
        .await
}

pub async fn insert_participant(
    db: &DatabaseConnection,
    training_id: i64,
    employee_id: i64,
) -> Result<(), DbErr> {
    let active = participant::ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        training_id: Set(training_id),
        employee_id: Set(employee_id),
        created_at: Set(Some(chrono::Utc::now())),
    };
    participant::Entity::insert(active).exec(db).await?;
    Ok(())
}

pub async fn insert_participant_txn(
    txn: &DatabaseTransaction,
    training_id: i64,
    employee_id: i64,
) -> Result<(), DbErr> {
    let active = participant::ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        training_id: Set(training_id),
        employee_id: Set(employee_id),
        created_at: Set(Some(chrono::Utc::now())),
    };
    participant::Entity::insert(active).exec(txn).await?;
    Ok(())
}

pub async fn remove_participant(
    db: &DatabaseConnection,
    training_id: i64,
    employee_id: i64,
) -> Result<bool, DbErr> {
    let result = participant::Entity::delete_many()
        .filter(participant::Column::TrainingId.eq(training_id))
        .filter(participant::Column::EmployeeId.eq(employee_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn delete_participants_txn(
    txn: &DatabaseTransaction,
    training_id: i64,
) -> Result<u64, DbErr> {
    let result = participant::Entity::delete_many()
        .filter(participant::Column::TrainingId.eq(training_id))
        .exec(txn)
        .await?;
    Ok(result.rows_affected)
}

// ==================== Тренеры ====================

pub async fn trainer_ids_of(db: &DatabaseConnection, training_id: i64) -> Result<Vec<i64>, DbErr> {
    trainer::Entity::find()
        .select_only()
        .column(trainer::Column::EmployeeId)
        .filter(trainer::Column::TrainingId.eq(training_id))
        .order_by_asc(trainer::Column::EmployeeId)
        .into_tuple::<i64>()
        .all(db)
        .await
}

pub async fn trainer_ids_of_txn(
    txn: &DatabaseTransaction,
    training_id: i64,
) -> Result<Vec<i64>, DbErr> {
    trainer::Entity::find()
        .select_only()
        .column(trainer::Column::EmployeeId)
        .filter(trainer::Column::TrainingId.eq(training_id))
        .order_by_asc(trainer::Column::EmployeeId)
        .into_tuple::<i64>()
        .all(txn)
        .await
}

pub async fn insert_trainer(
    db: &DatabaseConnection,
    training_id: i64,
    employee_id: i64,
) -> Result<(), DbErr> {
    let active = trainer::ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        training_id: Set(training_id),
        employee_id: Set(employee_id),
        created_at: Set(Some(chrono::Utc::now())),
    };
    trainer::Entity::insert(active).exec(db).await?;
    Ok(())
}

pub async fn insert_trainer_txn(
    txn: &DatabaseTransaction,
    training_id: i64,
    employee_id: i64,
) -> Result<(), DbErr> {
    let active = trainer::ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        training_id: Set(training_id),
        employee_id: Set(employee_id),
        created_at: Set(Some(chrono::Utc::now())),
    };
    trainer::Entity::insert(active).exec(txn).await?;
    Ok(())
}

pub async fn remove_trainer(
    db: &DatabaseConnection,
    training_id: i64,
    employee_id: i64,
) -> Result<bool, DbErr> {
    let result = trainer::Entity::delete_many()
        .filter(trainer::Column::TrainingId.eq(training_id))
        .filter(trainer::Column::EmployeeId.eq(employee_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn delete_trainers_txn(
    txn: &DatabaseTransaction,
    training_id: i64,
) -> Result<u64, DbErr> {
    let result = trainer::Entity::delete_many()
        .filter(trainer::Column::TrainingId.eq(training_id))
        .exec(txn)
        .await?;
    Ok(result.rows_affected)
}
