use chrono::Utc;
use contracts::domain::a001_employee::aggregate::{Employee, EmployeeId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_employee")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub crew: Option<String>,
    pub position: Option<String>,
    pub active: bool,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Employee {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };

        Employee {
            base: BaseAggregate::with_metadata(
                EmployeeId(m.id),
                m.code,
                m.description,
                m.comment.clone(),
                metadata,
            ),
            crew: m.crew,
            position: m.position,
            active: m.active,
        }
    }
}

/// Список сотрудников для подбора (только действующие)
pub async fn list_active(db: &DatabaseConnection) -> Result<Vec<Employee>, DbErr> {
    let mut items: Vec<Employee> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::Active.eq(true))
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    items.sort_by(|a, b| {
        a.base
            .description
            .to_lowercase()
            .cmp(&b.base.description.to_lowercase())
    });
    Ok(items)
}

pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Employee>, DbErr> {
    let result = Entity::find_by_id(id).one(db).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(db: &DatabaseConnection, aggregate: &Employee) -> Result<Employee, DbErr> {
    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        crew: Set(aggregate.crew.clone()),
        position: Set(aggregate.position.clone()),
        active: Set(aggregate.active),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    };
    let inserted = active.insert(db).await?;
    Ok(inserted.into())
}
