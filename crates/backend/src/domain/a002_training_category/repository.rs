use chrono::Utc;
use contracts::domain::a002_training_category::aggregate::{
    TrainingMainCategory, TrainingMainCategoryId, TrainingSubCategory, TrainingSubCategoryId,
};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set};

mod main_category {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a002_training_main_category")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub code: String,
        pub description: String,
        pub comment: Option<String>,
        pub requires_trainers: bool,
        pub active: bool,
        pub is_deleted: bool,
        pub created_at: Option<chrono::DateTime<chrono::Utc>>,
        pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
        pub version: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

mod sub_category {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a002_training_sub_category")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub code: String,
        pub description: String,
        pub comment: Option<String>,
        pub main_category_id: i64,
        pub active: bool,
        pub is_deleted: bool,
        pub created_at: Option<chrono::DateTime<chrono::Utc>>,
        pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
        pub version: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<main_category::Model> for TrainingMainCategory {
    fn from(m: main_category::Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };

        TrainingMainCategory {
            base: BaseAggregate::with_metadata(
                TrainingMainCategoryId(m.id),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            requires_trainers: m.requires_trainers,
            active: m.active,
        }
    }
}

impl From<sub_category::Model> for TrainingSubCategory {
    fn from(m: sub_category::Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };

        TrainingSubCategory {
            base: BaseAggregate::with_metadata(
                TrainingSubCategoryId(m.id),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            main_category_id: m.main_category_id,
            active: m.active,
        }
    }
}

// ============================================================================
// Main Category Repository Functions
// ============================================================================

/// Список основных категорий (сортировка по коду)
pub async fn list_main(
    db: &DatabaseConnection,
    include_inactive: bool,
) -> Result<Vec<TrainingMainCategory>, DbErr> {
    let mut query = main_category::Entity::find()
        .filter(main_category::Column::IsDeleted.eq(false))
        .order_by_asc(main_category::Column::Code);
    if !include_inactive {
        query = query.filter(main_category::Column::Active.eq(true));
    }
    let models = query.all(db).await?;
    Ok(models.into_iter().map(Into::into).collect())
}

pub async fn find_main_by_id(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<TrainingMainCategory>, DbErr> {
    let result = main_category::Entity::find_by_id(id).one(db).await?;
    Ok(result.map(Into::into))
}

pub async fn find_main_by_id_txn(
    txn: &DatabaseTransaction,
    id: i64,
) -> Result<Option<TrainingMainCategory>, DbErr> {
    let result = main_category::Entity::find_by_id(id).one(txn).await?;
    Ok(result.map(Into::into))
}

pub async fn insert_main(
    db: &DatabaseConnection,
    aggregate: &TrainingMainCategory,
) -> Result<TrainingMainCategory, DbErr> {
    let active = main_category::ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        requires_trainers: Set(aggregate.requires_trainers),
        active: Set(aggregate.active),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    };
    let inserted = active.insert(db).await?;
    Ok(inserted.into())
}

pub async fn update_main(
    db: &DatabaseConnection,
    aggregate: &TrainingMainCategory,
) -> Result<(), DbErr> {
    let active = main_category::ActiveModel {
        id: Set(aggregate.base.id.value()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        requires_trainers: Set(aggregate.requires_trainers),
        active: Set(aggregate.active),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version + 1),
        created_at: sea_orm::ActiveValue::NotSet,
    };
    active.update(db).await?;
    Ok(())
}

// ============================================================================
// Sub Category Repository Functions
// ============================================================================

/// Подкатегории выбранной основной категории (сортировка по коду)
pub async fn list_subs_for_main(
    db: &DatabaseConnection,
    main_category_id: i64,
    include_inactive: bool,
) -> Result<Vec<TrainingSubCategory>, DbErr> {
    let mut query = sub_category::Entity::find()
        .filter(sub_category::Column::IsDeleted.eq(false))
        .filter(sub_category::Column::MainCategoryId.eq(main_category_id))
        .order_by_asc(sub_category::Column::Code);
    if !include_inactive {
        query = query.filter(sub_category::Column::Active.eq(true));
    }
    let models = query.all(db).await?;
    Ok(models.into_iter().map(Into::into).collect())
}

pub async fn find_sub_by_id(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<TrainingSubCategory>, DbErr> {
    let result = sub_category::Entity::find_by_id(id).one(db).await?;
    Ok(result.map(Into::into))
}

pub async fn find_sub_by_id_txn(
    txn: &DatabaseTransaction,
    id: i64,
) -> Result<Option<TrainingSubCategory>, DbErr> {
    let result = sub_category::Entity::find_by_id(id).one(txn).await?;
    Ok(result.map(Into::into))
}

pub async fn insert_sub(
    db: &DatabaseConnection,
    aggregate: &TrainingSubCategory,
) -> Result<TrainingSubCategory, DbErr> {
    let active = sub_category::ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        main_category_id: Set(aggregate.main_category_id),
        active: Set(aggregate.active),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    };
    let inserted = active.insert(db).await?;
    Ok(inserted.into())
}

pub async fn update_sub(
    db: &DatabaseConnection,
    aggregate: &TrainingSubCategory,
) -> Result<(), DbErr> {
    let active = sub_category::ActiveModel {
        id: Set(aggregate.base.id.value()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        main_category_id: Set(aggregate.main_category_id),
        active: Set(aggregate.active),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version + 1),
        created_at: sea_orm::ActiveValue::NotSet,
    };
    active.update(db).await?;
    Ok(())
}
