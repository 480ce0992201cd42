use super::{display_id, repository};
use crate::domain::a001_employee::repository as employee_repository;
use crate::domain::a002_training_category::repository as category_repository;
use crate::domain::a002_training_category::service as category_service;
use crate::domain::error::{is_unique_violation, DomainError};
use crate::shared::logger;
use contracts::domain::a002_training_category::aggregate::TrainingSubCategory;
use contracts::domain::a003_training::aggregate::{Training, TrainingDetail, TrainingDto};
use contracts::domain::common::AggregateRoot;
use contracts::shared::outcome::OperationOutcome;
use contracts::system::auth::AuthContext;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

/// Сколько раз повторять выдачу учётного номера при гонке за номер
const DISPLAY_ID_ATTEMPTS: u32 = 3;

// ============================================================================
// Чтение
// ============================================================================

pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Training>, DomainError> {
    Ok(repository::list_all(db).await?)
}

/// Карточка обучения: запись плюс составы участников и тренеров
pub async fn get_detail(db: &DatabaseConnection, id: i64) -> Result<TrainingDetail, DomainError> {
    let training = repository::find_by_id(db, id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Обучение {} не найдено", id)))?;
    let participant_ids = repository::participant_ids_of(db, id).await?;
    let trainer_ids = repository::trainer_ids_of(db, id).await?;

    Ok(TrainingDetail {
        training,
        participant_ids,
        trainer_ids,
    })
}

// ============================================================================
// Создание и обновление
// ============================================================================

/// Подкатегория, пригодная для сборки учётного номера
///
/// Должна существовать и относиться к указанной основной категории
async fn load_sub_txn(
    txn: &DatabaseTransaction,
    main_category_id: i64,
    sub_category_id: Option<i64>,
) -> Result<TrainingSubCategory, DomainError> {
    let sub_id = sub_category_id
        .ok_or_else(|| DomainError::Validation("Не указана подкатегория обучения".into()))?;
    let sub = category_repository::find_sub_by_id_txn(txn, sub_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Подкатегория обучения {} не найдена", sub_id)))?;
    if sub.main_category_id != main_category_id {
        return Err(DomainError::NotFound(format!(
            "Подкатегория \"{}\" не относится к выбранной категории",
            sub.base.description
        )));
    }
    Ok(sub)
}

/// Создание обучения
///
/// Проверки, выдача учётного номера, запись и составы идут в одной
/// транзакции. Если параллельная транзакция успела забрать тот же номер,
/// уникальный индекс по code отклонит вставку и выдача повторится.
pub async fn create(
    db: &DatabaseConnection,
    ctx: &AuthContext,
    dto: TrainingDto,
) -> Result<(Training, OperationOutcome), DomainError> {
    let mut aggregate = Training::new_for_insert(
        dto.description.clone(),
        dto.main_category_id,
        dto.sub_category_id,
        dto.start_date.clone(),
        dto.end_date.clone(),
        dto.training_units,
        dto.comment.clone(),
        ctx.employee_id,
    );
    aggregate.validate().map_err(DomainError::Validation)?;

    let trainer_ids = dto.trainer_ids.clone().unwrap_or_default();

    let mut last_err: Option<DomainError> = None;
    for _attempt in 0..DISPLAY_ID_ATTEMPTS {
        let txn = db.begin().await?;

        let main = category_repository::find_main_by_id_txn(&txn, dto.main_category_id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!(
                    "Категория обучения {} не найдена",
                    dto.main_category_id
                ))
            })?;
        if main.requires_trainers && trainer_ids.is_empty() {
            return Err(DomainError::MissingTrainers);
        }
        let sub = load_sub_txn(&txn, main.base.id.value(), dto.sub_category_id).await?;

        let main_code = category_service::main_code_of(&main)?;
        let sub_code = category_service::sub_code_of(&sub)?;
        let code =
            display_id::next_display_id(&txn, &main_code, &sub_code, &aggregate.end_date).await?;

        aggregate.base.code = code;
        aggregate.before_write();

        let saved = match repository::insert_txn(&txn, &aggregate).await {
            Ok(saved) => saved,
            Err(e) if is_unique_violation(&e) => {
                // Номер успела забрать параллельная транзакция
                txn.rollback().await?;
                last_err = Some(DomainError::Persistence(e));
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let training_id = saved.base.id.value();

        for employee_id in &dto.participant_ids {
            repository::insert_participant_txn(&txn, training_id, *employee_id)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        DomainError::DuplicateParticipant
                    } else {
                        e.into()
                    }
                })?;
        }
        if main.requires_trainers {
            for employee_id in &trainer_ids {
                repository::insert_trainer_txn(&txn, training_id, *employee_id)
                    .await
                    .map_err(|e| {
                        if is_unique_violation(&e) {
                            DomainError::DuplicateTrainer
                        } else {
                            e.into()
                        }
                    })?;
            }
        }

        txn.commit().await?;

        tracing::info!("Created training {} (id {})", saved.base.code, training_id);
        logger::log_for(
            "a003_training",
            &format!("{} {} создано", Training::element_name(), saved.base.code),
            ctx.employee_id,
        );

        let outcome = OperationOutcome::success(format!(
            "{} {} создано",
            Training::element_name(),
            saved.base.code
        ));
        return Ok((saved, outcome));
    }

    Err(last_err
        .unwrap_or_else(|| DomainError::Validation("Не удалось выдать учётный номер".into())))
}

/// Обновление обучения
///
/// Смена категории или подкатегории пересоздаёт учётный номер: старый
/// номер умирает вместе с записью о нём, клиент получает warning.
/// `trainer_ids = None` оставляет текущий список тренеров как есть,
/// `Some(список)` заменяет его целиком.
pub async fn update(
    db: &DatabaseConnection,
    ctx: &AuthContext,
    dto: TrainingDto,
) -> Result<(Training, OperationOutcome), DomainError> {
    let id = dto
        .id
        .ok_or_else(|| DomainError::Validation("Не передан id обучения".into()))?;

    let mut last_err: Option<DomainError> = None;
    for _attempt in 0..DISPLAY_ID_ATTEMPTS {
        let txn = db.begin().await?;

        let mut aggregate = repository::find_by_id_txn(&txn, id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Обучение {} не найдено", id)))?;
        let main = category_repository::find_main_by_id_txn(&txn, dto.main_category_id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!(
                    "Категория обучения {} не найдена",
                    dto.main_category_id
                ))
            })?;

        // Состав тренеров, каким он станет после сохранения
        let effective_trainers = match &dto.trainer_ids {
            Some(ids) => ids.clone(),
            None => repository::trainer_ids_of_txn(&txn, id).await?,
        };
        if main.requires_trainers && effective_trainers.is_empty() {
            return Err(DomainError::MissingTrainers);
        }

        let category_changed = aggregate.main_category_id != dto.main_category_id
            || aggregate.sub_category_id != dto.sub_category_id;
        let old_code = aggregate.base.code.clone();

        aggregate.update(&dto);
        aggregate.validate().map_err(DomainError::Validation)?;

        if category_changed {
            let sub = load_sub_txn(&txn, main.base.id.value(), dto.sub_category_id).await?;
            let main_code = category_service::main_code_of(&main)?;
            let sub_code = category_service::sub_code_of(&sub)?;
            aggregate.base.code =
                display_id::next_display_id(&txn, &main_code, &sub_code, &aggregate.end_date)
                    .await?;
        }

        aggregate.before_write();
        match repository::update_txn(&txn, &aggregate).await {
            Ok(()) => {}
            Err(e) if category_changed && is_unique_violation(&e) => {
                txn.rollback().await?;
                last_err = Some(DomainError::Persistence(e));
                continue;
            }
            Err(e) => return Err(e.into()),
        }

        if let Some(trainer_ids) = &dto.trainer_ids {
            // Полная замена списка тренеров
            repository::delete_trainers_txn(&txn, id).await?;
            for employee_id in trainer_ids {
                repository::insert_trainer_txn(&txn, id, *employee_id)
                    .await
                    .map_err(|e| {
                        if is_unique_violation(&e) {
                            DomainError::DuplicateTrainer
                        } else {
                            e.into()
                        }
                    })?;
            }
        }

        txn.commit().await?;

        let outcome = if category_changed {
            tracing::info!(
                "Training {} renumbered: {} -> {}",
                id,
                old_code,
                aggregate.base.code
            );
            logger::log_for(
                "a003_training",
                &format!(
                    "У обучения \"{}\" изменён учётный номер с {} на {}",
                    aggregate.base.description, old_code, aggregate.base.code
                ),
                ctx.employee_id,
            );
            OperationOutcome::warning(format!(
                "Учётный номер изменён с {} на {}, документы со старым номером недействительны",
                old_code, aggregate.base.code
            ))
        } else {
            logger::log_for(
                "a003_training",
                &format!(
                    "{} {} сохранено",
                    Training::element_name(),
                    aggregate.base.code
                ),
                ctx.employee_id,
            );
            OperationOutcome::success(format!(
                "{} {} сохранено",
                Training::element_name(),
                aggregate.base.code
            ))
        };
        return Ok((aggregate, outcome));
    }

    Err(last_err
        .unwrap_or_else(|| DomainError::Validation("Не удалось выдать учётный номер".into())))
}

/// Удаление обучения вместе с составами участников и тренеров
pub async fn delete(
    db: &DatabaseConnection,
    ctx: &AuthContext,
    id: i64,
) -> Result<OperationOutcome, DomainError> {
    let txn = db.begin().await?;

    let training = repository::find_by_id_txn(&txn, id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Обучение {} не найдено", id)))?;
    repository::delete_participants_txn(&txn, id).await?;
    repository::delete_trainers_txn(&txn, id).await?;
    repository::delete_txn(&txn, id).await?;

    txn.commit().await?;

    tracing::info!("Deleted training {} (id {})", training.base.code, id);
    logger::log_for(
        "a003_training",
        &format!("{} {} удалено", Training::element_name(), training.base.code),
        ctx.employee_id,
    );

    Ok(OperationOutcome::success(format!(
        "{} {} удалено",
        Training::element_name(),
        training.base.code
    )))
}

// ============================================================================
// Участники
// ============================================================================

pub async fn add_participant(
    db: &DatabaseConnection,
    ctx: &AuthContext,
    training_id: i64,
    employee_id: i64,
) -> Result<OperationOutcome, DomainError> {
    let training = repository::find_by_id(db, training_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Обучение {} не найдено", training_id)))?;
    employee_repository::find_by_id(db, employee_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Сотрудник {} не найден", employee_id)))?;

    repository::insert_participant(db, training_id, employee_id)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::DuplicateParticipant
            } else {
                e.into()
            }
        })?;

    logger::log_for(
        "a003_training",
        &format!(
            "В обучение {} добавлен участник {}",
            training.base.code, employee_id
        ),
        ctx.employee_id,
    );
    Ok(OperationOutcome::success(format!(
        "Участник добавлен в обучение {}",
        training.base.code
    )))
}

/// Исключение участника. Если сотрудник и так не числился, операция
/// молча завершается успехом
pub async fn remove_participant(
    db: &DatabaseConnection,
    ctx: &AuthContext,
    training_id: i64,
    employee_id: i64,
) -> Result<OperationOutcome, DomainError> {
    let training = repository::find_by_id(db, training_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Обучение {} не найдено", training_id)))?;

    let removed = repository::remove_participant(db, training_id, employee_id).await?;
    if removed {
        logger::log_for(
            "a003_training",
            &format!(
                "Из обучения {} исключён участник {}",
                training.base.code, employee_id
            ),
            ctx.employee_id,
        );
    }
    Ok(OperationOutcome::success(format!(
        "Участник исключён из обучения {}",
        training.base.code
    )))
}

// ============================================================================
// Тренеры
// ============================================================================

pub async fn add_trainer(
    db: &DatabaseConnection,
    ctx: &AuthContext,
    training_id: i64,
    employee_id: i64,
) -> Result<OperationOutcome, DomainError> {
    let training = repository::find_by_id(db, training_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Обучение {} не найдено", training_id)))?;
    employee_repository::find_by_id(db, employee_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Сотрудник {} не найден", employee_id)))?;

    repository::insert_trainer(db, training_id, employee_id)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::DuplicateTrainer
            } else {
                e.into()
            }
        })?;

    logger::log_for(
        "a003_training",
        &format!(
            "В обучение {} добавлен тренер {}",
            training.base.code, employee_id
        ),
        ctx.employee_id,
    );
    Ok(OperationOutcome::success(format!(
        "Тренер добавлен в обучение {}",
        training.base.code
    )))
}

/// Исключение тренера
///
/// Запись не блокируется, даже если тренеров не осталось, но для
/// категории с обязательными тренерами клиент получает warning
pub async fn remove_trainer(
    db: &DatabaseConnection,
    ctx: &AuthContext,
    training_id: i64,
    employee_id: i64,
) -> Result<OperationOutcome, DomainError> {
    let training = repository::find_by_id(db, training_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Обучение {} не найдено", training_id)))?;

    let removed = repository::remove_trainer(db, training_id, employee_id).await?;
    if removed {
        logger::log_for(
            "a003_training",
            &format!(
                "Из обучения {} исключён тренер {}",
                training.base.code, employee_id
            ),
            ctx.employee_id,
        );
    }

    let main = category_repository::find_main_by_id(db, training.main_category_id).await?;
    let requires_trainers = main.map(|m| m.requires_trainers).unwrap_or(false);
    if requires_trainers {
        let remaining = repository::trainer_ids_of(db, training_id).await?;
        if remaining.is_empty() {
            return Ok(OperationOutcome::warning(format!(
                "У обучения {} не осталось ни одного тренера",
                training.base.code
            )));
        }
    }

    Ok(OperationOutcome::success(format!(
        "Тренер исключён из обучения {}",
        training.base.code
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_employee::service as employee_service;
    use crate::shared::data::db::connect_test_db;
    use contracts::shared::outcome::Severity;

    struct Catalog {
        safety_id: i64,
        fire_sub_id: i64,
        aid_sub_id: i64,
        technical_id: i64,
        crane_sub_id: i64,
    }

    async fn seed(db: &DatabaseConnection) -> Catalog {
        employee_service::insert_test_data(db).await.unwrap();
        category_service::insert_test_data(db).await.unwrap();

        let mains = category_service::list_main(db, true).await.unwrap();
        let safety = mains.iter().find(|m| m.base.code == "01").unwrap();
        let technical = mains.iter().find(|m| m.base.code == "03").unwrap();

        let safety_subs = category_service::list_subs_for_main(db, safety.base.id.value(), true)
            .await
            .unwrap();
        let technical_subs =
            category_service::list_subs_for_main(db, technical.base.id.value(), true)
                .await
                .unwrap();

        Catalog {
            safety_id: safety.base.id.value(),
            fire_sub_id: safety_subs
                .iter()
                .find(|s| s.base.code == "02")
                .unwrap()
                .base
                .id
                .value(),
            aid_sub_id: safety_subs
                .iter()
                .find(|s| s.base.code == "05")
                .unwrap()
                .base
                .id
                .value(),
            technical_id: technical.base.id.value(),
            crane_sub_id: technical_subs
                .iter()
                .find(|s| s.base.code == "01")
                .unwrap()
                .base
                .id
                .value(),
        }
    }

    fn operator() -> AuthContext {
        AuthContext::new(7)
    }

    fn fire_dto(catalog: &Catalog) -> TrainingDto {
        TrainingDto {
            id: None,
            description: "Пожарно-технический минимум".to_string(),
            main_category_id: catalog.safety_id,
            sub_category_id: Some(catalog.fire_sub_id),
            start_date: "2025-06-01".to_string(),
            end_date: "2025-06-15".to_string(),
            training_units: 8.0,
            participant_ids: vec![],
            trainer_ids: None,
            comment: None,
        }
    }

    fn crane_dto(catalog: &Catalog) -> TrainingDto {
        TrainingDto {
            id: None,
            description: "Стропальщик 4 разряда".to_string(),
            main_category_id: catalog.technical_id,
            sub_category_id: Some(catalog.crane_sub_id),
            start_date: "2025-09-01".to_string(),
            end_date: "2025-09-12".to_string(),
            training_units: 40.0,
            participant_ids: vec![],
            trainer_ids: None,
            comment: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_display_ids() {
        let db = connect_test_db().await;
        let catalog = seed(&db).await;

        let (first, outcome) = create(&db, &operator(), fire_dto(&catalog)).await.unwrap();
        assert_eq!(first.base.code, "25-01-02-0001");
        assert_eq!(first.created_by, 7);
        assert_eq!(outcome.severity, Severity::Success);

        let (second, _) = create(&db, &operator(), fire_dto(&catalog)).await.unwrap();
        assert_eq!(second.base.code, "25-01-02-0002");
    }

    #[tokio::test]
    async fn display_id_year_comes_from_end_date() {
        let db = connect_test_db().await;
        let catalog = seed(&db).await;

        let mut dto = fire_dto(&catalog);
        dto.start_date = "2024-12-20".to_string();
        dto.end_date = "2025-01-10".to_string();

        let (training, _) = create(&db, &operator(), dto).await.unwrap();
        assert_eq!(training.base.code, "25-01-02-0001");
    }

    #[tokio::test]
    async fn create_requires_trainers_for_marked_category() {
        let db = connect_test_db().await;
        let catalog = seed(&db).await;

        let err = create(&db, &operator(), crane_dto(&catalog))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::MissingTrainers));
        assert!(list_all(&db).await.unwrap().is_empty());

        let mut dto = crane_dto(&catalog);
        dto.trainer_ids = Some(vec![3]);
        let (training, _) = create(&db, &operator(), dto).await.unwrap();

        let detail = get_detail(&db, training.base.id.value()).await.unwrap();
        assert_eq!(detail.trainer_ids, vec![3]);
    }

    #[tokio::test]
    async fn create_ignores_trainers_for_ordinary_category() {
        let db = connect_test_db().await;
        let catalog = seed(&db).await;

        let mut dto = fire_dto(&catalog);
        dto.trainer_ids = Some(vec![3]);

        let (training, _) = create(&db, &operator(), dto).await.unwrap();
        let detail = get_detail(&db, training.base.id.value()).await.unwrap();
        assert!(detail.trainer_ids.is_empty());
    }

    #[tokio::test]
    async fn create_stores_participants() {
        let db = connect_test_db().await;
        let catalog = seed(&db).await;

        let mut dto = fire_dto(&catalog);
        dto.participant_ids = vec![2, 1];

        let (training, _) = create(&db, &operator(), dto).await.unwrap();
        let detail = get_detail(&db, training.base.id.value()).await.unwrap();
        assert_eq!(detail.participant_ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn create_rolls_back_on_duplicate_participant() {
        let db = connect_test_db().await;
        let catalog = seed(&db).await;

        let mut dto = fire_dto(&catalog);
        dto.participant_ids = vec![1, 1];

        let err = create(&db, &operator(), dto).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateParticipant));
        assert!(list_all(&db).await.unwrap().is_empty());

        // Номер не сгорел вместе с откатом
        let (training, _) = create(&db, &operator(), fire_dto(&catalog)).await.unwrap();
        assert_eq!(training.base.code, "25-01-02-0001");
    }

    #[tokio::test]
    async fn create_rejects_unknown_category_and_sub_mismatch() {
        let db = connect_test_db().await;
        let catalog = seed(&db).await;

        let mut dto = fire_dto(&catalog);
        dto.main_category_id = 999;
        let err = create(&db, &operator(), dto).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        // Подкатегория чужой категории
        let mut dto = fire_dto(&catalog);
        dto.sub_category_id = Some(catalog.crane_sub_id);
        let err = create(&db, &operator(), dto).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_keeps_display_id_when_category_unchanged() {
        let db = connect_test_db().await;
        let catalog = seed(&db).await;

        let (training, _) = create(&db, &operator(), fire_dto(&catalog)).await.unwrap();

        let mut dto = fire_dto(&catalog);
        dto.id = Some(training.base.id.value());
        dto.description = "Пожарно-технический минимум (группа Б)".to_string();
        dto.training_units = 16.0;

        let (updated, outcome) = update(&db, &operator(), dto).await.unwrap();
        assert_eq!(outcome.severity, Severity::Success);
        assert_eq!(updated.base.code, training.base.code);

        let detail = get_detail(&db, training.base.id.value()).await.unwrap();
        assert_eq!(
            detail.training.base.description,
            "Пожарно-технический минимум (группа Б)"
        );
        assert_eq!(detail.training.training_units, 16.0);
    }

    #[tokio::test]
    async fn update_regenerates_display_id_on_category_change() {
        let db = connect_test_db().await;
        let catalog = seed(&db).await;

        let (training, _) = create(&db, &operator(), fire_dto(&catalog)).await.unwrap();
        assert_eq!(training.base.code, "25-01-02-0001");

        let mut dto = fire_dto(&catalog);
        dto.id = Some(training.base.id.value());
        dto.sub_category_id = Some(catalog.aid_sub_id);

        let (updated, outcome) = update(&db, &operator(), dto).await.unwrap();
        assert_eq!(outcome.severity, Severity::Warning);
        assert_eq!(updated.base.code, "25-01-05-0001");

        // Старый номер умер вместе со сменой категории
        assert!(repository::find_by_display_id(&db, "25-01-02-0001")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn update_to_trainer_category_requires_trainers() {
        let db = connect_test_db().await;
        let catalog = seed(&db).await;

        let (training, _) = create(&db, &operator(), fire_dto(&catalog)).await.unwrap();

        let mut dto = crane_dto(&catalog);
        dto.id = Some(training.base.id.value());
        let err = update(&db, &operator(), dto).await.unwrap_err();
        assert!(matches!(err, DomainError::MissingTrainers));

        // Запись не изменилась
        let detail = get_detail(&db, training.base.id.value()).await.unwrap();
        assert_eq!(detail.training.base.code, "25-01-02-0001");
        assert_eq!(detail.training.main_category_id, catalog.safety_id);
    }

    #[tokio::test]
    async fn update_replaces_trainer_list() {
        let db = connect_test_db().await;
        let catalog = seed(&db).await;

        let mut dto = crane_dto(&catalog);
        dto.trainer_ids = Some(vec![3]);
        let (training, _) = create(&db, &operator(), dto).await.unwrap();

        let mut dto = crane_dto(&catalog);
        dto.id = Some(training.base.id.value());
        dto.trainer_ids = Some(vec![1, 2]);
        update(&db, &operator(), dto).await.unwrap();

        let detail = get_detail(&db, training.base.id.value()).await.unwrap();
        assert_eq!(detail.trainer_ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn add_and_remove_participant() {
        let db = connect_test_db().await;
        let catalog = seed(&db).await;

        let (training, _) = create(&db, &operator(), fire_dto(&catalog)).await.unwrap();
        let id = training.base.id.value();

        let outcome = add_participant(&db, &operator(), id, 1).await.unwrap();
        assert_eq!(outcome.severity, Severity::Success);

        let err = add_participant(&db, &operator(), id, 1).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateParticipant));

        let outcome = remove_participant(&db, &operator(), id, 1).await.unwrap();
        assert_eq!(outcome.severity, Severity::Success);
        // Повторное исключение — молчаливый успех
        let outcome = remove_participant(&db, &operator(), id, 1).await.unwrap();
        assert_eq!(outcome.severity, Severity::Success);

        let detail = get_detail(&db, id).await.unwrap();
        assert!(detail.participant_ids.is_empty());
    }

    #[tokio::test]
    async fn add_participant_checks_references() {
        let db = connect_test_db().await;
        let catalog = seed(&db).await;

        let (training, _) = create(&db, &operator(), fire_dto(&catalog)).await.unwrap();

        let err = add_participant(&db, &operator(), 999, 1).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        let err = add_participant(&db, &operator(), training.base.id.value(), 999)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn add_and_remove_trainer() {
        let db = connect_test_db().await;
        let catalog = seed(&db).await;

        let mut dto = crane_dto(&catalog);
        dto.trainer_ids = Some(vec![3]);
        let (training, _) = create(&db, &operator(), dto).await.unwrap();
        let id = training.base.id.value();

        add_trainer(&db, &operator(), id, 1).await.unwrap();
        let err = add_trainer(&db, &operator(), id, 1).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateTrainer));

        let outcome = remove_trainer(&db, &operator(), id, 1).await.unwrap();
        assert_eq!(outcome.severity, Severity::Success);

        // Исключение последнего тренера: запись сохраняется, но с warning
        let outcome = remove_trainer(&db, &operator(), id, 3).await.unwrap();
        assert_eq!(outcome.severity, Severity::Warning);

        let detail = get_detail(&db, id).await.unwrap();
        assert!(detail.trainer_ids.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_training_with_rosters() {
        let db = connect_test_db().await;
        let catalog = seed(&db).await;

        let mut dto = crane_dto(&catalog);
        dto.participant_ids = vec![1, 2];
        dto.trainer_ids = Some(vec![3]);
        let (training, _) = create(&db, &operator(), dto).await.unwrap();
        let id = training.base.id.value();

        let outcome = delete(&db, &operator(), id).await.unwrap();
        assert_eq!(outcome.severity, Severity::Success);

        assert!(repository::find_by_id(&db, id).await.unwrap().is_none());
        assert!(repository::participant_ids_of(&db, id)
            .await
            .unwrap()
            .is_empty());
        assert!(repository::trainer_ids_of(&db, id).await.unwrap().is_empty());

        let err = delete(&db, &operator(), id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_rejects_invalid_payload() {
        let db = connect_test_db().await;
        let catalog = seed(&db).await;

        let mut dto = fire_dto(&catalog);
        dto.description = "   ".to_string();
        let err = create(&db, &operator(), dto).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let mut dto = fire_dto(&catalog);
        dto.end_date = "15.06.2025".to_string();
        let err = create(&db, &operator(), dto).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let mut dto = fire_dto(&catalog);
        dto.sub_category_id = None;
        let err = create(&db, &operator(), dto).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
