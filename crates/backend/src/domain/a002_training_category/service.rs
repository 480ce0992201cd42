use super::repository;
use crate::domain::error::DomainError;
use contracts::domain::a002_training_category::aggregate::{
    TrainingMainCategory, TrainingMainCategoryDto, TrainingSubCategory, TrainingSubCategoryDto,
};
use sea_orm::{DatabaseConnection, DatabaseTransaction};

// ============================================================================
// Резолвер кодов для учётного номера
// ============================================================================

/// Код основной категории из справочника
///
/// Код обязателен для сборки учётного номера: пустой код у категории
/// означает, что запись завели до ввода номеров и не дозаполнили
pub fn main_code_of(category: &TrainingMainCategory) -> Result<String, DomainError> {
    let code = category.base.code.trim();
    if code.is_empty() {
        return Err(DomainError::InvalidCategoryCode(format!(
            "У категории \"{}\" не заполнен код, учётный номер собрать нельзя",
            category.base.description
        )));
    }
    Ok(code.to_string())
}

/// Код подкатегории из справочника
pub fn sub_code_of(sub_category: &TrainingSubCategory) -> Result<String, DomainError> {
    let code = sub_category.base.code.trim();
    if code.is_empty() {
        return Err(DomainError::InvalidCategoryCode(format!(
            "У подкатегории \"{}\" не заполнен код, учётный номер собрать нельзя",
            sub_category.base.description
        )));
    }
    Ok(code.to_string())
}

pub async fn resolve_main_code(db: &DatabaseConnection, id: i64) -> Result<String, DomainError> {
    let category = repository::find_main_by_id(db, id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Категория обучения {} не найдена", id)))?;
    main_code_of(&category)
}

pub async fn resolve_main_code_txn(
    txn: &DatabaseTransaction,
    id: i64,
) -> Result<String, DomainError> {
    let category = repository::find_main_by_id_txn(txn, id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Категория обучения {} не найдена", id)))?;
    main_code_of(&category)
}

pub async fn resolve_sub_code(db: &DatabaseConnection, id: i64) -> Result<String, DomainError> {
    let sub_category = repository::find_sub_by_id(db, id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Подкатегория обучения {} не найдена", id)))?;
    sub_code_of(&sub_category)
}

pub async fn resolve_sub_code_txn(
    txn: &DatabaseTransaction,
    id: i64,
) -> Result<String, DomainError> {
    let sub_category = repository::find_sub_by_id_txn(txn, id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Подкатегория обучения {} не найдена", id)))?;
    sub_code_of(&sub_category)
}

// ============================================================================
// Справочник категорий
// ============================================================================

/// Список основных категорий (для формы обучения)
pub async fn list_main(
    db: &DatabaseConnection,
    include_inactive: bool,
) -> Result<Vec<TrainingMainCategory>, DomainError> {
    Ok(repository::list_main(db, include_inactive).await?)
}

/// Подкатегории выбранной основной категории
pub async fn list_subs_for_main(
    db: &DatabaseConnection,
    main_category_id: i64,
    include_inactive: bool,
) -> Result<Vec<TrainingSubCategory>, DomainError> {
    Ok(repository::list_subs_for_main(db, main_category_id, include_inactive).await?)
}

pub async fn get_main_by_id(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<TrainingMainCategory>, DomainError> {
    Ok(repository::find_main_by_id(db, id).await?)
}

/// Создание/обновление основной категории
pub async fn upsert_main(
    db: &DatabaseConnection,
    dto: TrainingMainCategoryDto,
) -> Result<TrainingMainCategory, DomainError> {
    match dto.id {
        Some(id) => {
            let mut aggregate = repository::find_main_by_id(db, id).await?.ok_or_else(|| {
                DomainError::NotFound(format!("Категория обучения {} не найдена", id))
            })?;
            aggregate.update(&dto);
            aggregate.validate().map_err(DomainError::Validation)?;
            aggregate.before_write();
            repository::update_main(db, &aggregate).await?;
            Ok(aggregate)
        }
        None => {
            let mut aggregate = TrainingMainCategory::new_for_insert(
                dto.code.clone(),
                dto.description.clone(),
                dto.requires_trainers,
                dto.comment.clone(),
            );
            aggregate.active = dto.active;
            aggregate.validate().map_err(DomainError::Validation)?;
            aggregate.before_write();
            Ok(repository::insert_main(db, &aggregate).await?)
        }
    }
}

/// Создание/обновление подкатегории
pub async fn upsert_sub(
    db: &DatabaseConnection,
    dto: TrainingSubCategoryDto,
) -> Result<TrainingSubCategory, DomainError> {
    // Родительская категория должна существовать
    repository::find_main_by_id(db, dto.main_category_id)
        .await?
        .ok_or_else(|| {
            DomainError::NotFound(format!(
                "Категория обучения {} не найдена",
                dto.main_category_id
            ))
        })?;

    match dto.id {
        Some(id) => {
            let mut aggregate = repository::find_sub_by_id(db, id).await?.ok_or_else(|| {
                DomainError::NotFound(format!("Подкатегория обучения {} не найдена", id))
            })?;
            aggregate.update(&dto);
            aggregate.validate().map_err(DomainError::Validation)?;
            aggregate.before_write();
            repository::update_sub(db, &aggregate).await?;
            Ok(aggregate)
        }
        None => {
            let mut aggregate = TrainingSubCategory::new_for_insert(
                dto.main_category_id,
                dto.code.clone(),
                dto.description.clone(),
                dto.comment.clone(),
            );
            aggregate.active = dto.active;
            aggregate.validate().map_err(DomainError::Validation)?;
            aggregate.before_write();
            Ok(repository::insert_sub(db, &aggregate).await?)
        }
    }
}

/// Вставка тестовых данных
pub async fn insert_test_data(db: &DatabaseConnection) -> anyhow::Result<()> {
    let mains = vec![
        TrainingMainCategoryDto {
            id: None,
            code: "01".into(),
            description: "Охрана труда".into(),
            requires_trainers: false,
            active: true,
            comment: None,
        },
        TrainingMainCategoryDto {
            id: None,
            code: "02".into(),
            description: "Повышение квалификации".into(),
            requires_trainers: false,
            active: true,
            comment: None,
        },
        TrainingMainCategoryDto {
            id: None,
            code: "03".into(),
            description: "Техническое обучение".into(),
            requires_trainers: true,
            active: true,
            comment: Some("Проводится только внутренними тренерами".into()),
        },
    ];

    let mut main_ids = Vec::new();
    for dto in mains {
        let saved = upsert_main(db, dto)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        main_ids.push(saved.base.id.value());
    }

    let subs = vec![
        (main_ids[0], "01", "Вводный инструктаж"),
        (main_ids[0], "02", "Пожарная безопасность"),
        (main_ids[0], "05", "Первая помощь"),
        (main_ids[2], "01", "Грузоподъёмные механизмы"),
        (main_ids[2], "02", "Электробезопасность"),
    ];
    for (main_id, code, description) in subs {
        upsert_sub(
            db,
            TrainingSubCategoryDto {
                id: None,
                main_category_id: main_id,
                code: code.into(),
                description: description.into(),
                active: true,
                comment: None,
            },
        )
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_test_db;

    #[tokio::test]
    async fn resolver_returns_codes_from_catalog() {
        let db = connect_test_db().await;
        insert_test_data(&db).await.unwrap();

        let mains = list_main(&db, false).await.unwrap();
        assert_eq!(mains.len(), 3);
        let safety = &mains[0];
        assert_eq!(resolve_main_code(&db, safety.base.id.value()).await.unwrap(), "01");

        let subs = list_subs_for_main(&db, safety.base.id.value(), false)
            .await
            .unwrap();
        assert_eq!(subs.len(), 3);
        assert_eq!(
            resolve_sub_code(&db, subs[1].base.id.value()).await.unwrap(),
            "02"
        );
    }

    #[tokio::test]
    async fn resolver_fails_for_unknown_ids() {
        let db = connect_test_db().await;

        let err = resolve_main_code(&db, 777).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        let err = resolve_sub_code(&db, 777).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn resolver_fails_for_blank_code() {
        let db = connect_test_db().await;

        // Легаси-запись, заведённая до появления кодов: вставляем напрямую,
        // минуя валидацию DTO
        let legacy = TrainingMainCategory::new_for_insert(
            "".into(),
            "Старая категория".into(),
            false,
            None,
        );
        let saved = repository::insert_main(&db, &legacy).await.unwrap();

        let err = resolve_main_code(&db, saved.base.id.value()).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCategoryCode(_)));
    }

    #[tokio::test]
    async fn upsert_rejects_malformed_code() {
        let db = connect_test_db().await;

        let err = upsert_main(
            &db,
            TrainingMainCategoryDto {
                id: None,
                code: "001".into(),
                description: "Категория с длинным кодом".into(),
                requires_trainers: false,
                active: true,
                comment: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn sub_listing_filters_by_parent_and_active() {
        let db = connect_test_db().await;
        insert_test_data(&db).await.unwrap();

        let mains = list_main(&db, false).await.unwrap();
        let safety_id = mains[0].base.id.value();
        let technical_id = mains[2].base.id.value();

        let retired = upsert_sub(
            &db,
            TrainingSubCategoryDto {
                id: None,
                main_category_id: safety_id,
                code: "09".into(),
                description: "Устаревший инструктаж".into(),
                active: true,
                comment: None,
            },
        )
        .await
        .unwrap();

        upsert_sub(
            &db,
            TrainingSubCategoryDto {
                id: Some(retired.base.id.value()),
                main_category_id: safety_id,
                code: "09".into(),
                description: "Устаревший инструктаж".into(),
                active: false,
                comment: None,
            },
        )
        .await
        .unwrap();

        let active_only = list_subs_for_main(&db, safety_id, false).await.unwrap();
        assert_eq!(active_only.len(), 3);

        let with_inactive = list_subs_for_main(&db, safety_id, true).await.unwrap();
        assert_eq!(with_inactive.len(), 4);

        let technical = list_subs_for_main(&db, technical_id, false).await.unwrap();
        assert_eq!(technical.len(), 2);
    }
}
