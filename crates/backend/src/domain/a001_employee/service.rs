use super::repository;
use contracts::domain::a001_employee::aggregate::{Employee, EmployeeDto};
use sea_orm::DatabaseConnection;

/// Список действующих сотрудников (для подбора участников и тренеров)
pub async fn list_active(db: &DatabaseConnection) -> anyhow::Result<Vec<Employee>> {
    Ok(repository::list_active(db).await?)
}

/// Получение сотрудника по ID
pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> anyhow::Result<Option<Employee>> {
    Ok(repository::find_by_id(db, id).await?)
}

/// Создание сотрудника из DTO
///
/// Справочник ведётся во внешней кадровой системе, записи здесь
/// появляются только через синхронизацию и тестовые данные
pub async fn create(db: &DatabaseConnection, dto: EmployeeDto) -> anyhow::Result<Employee> {
    let code = dto.code.clone().unwrap_or_default();
    let mut aggregate =
        Employee::new_for_insert(code, dto.description, dto.crew, dto.position, dto.comment);
    aggregate.active = dto.active;

    // Валидация
    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    // Before write
    aggregate.before_write();

    Ok(repository::insert(db, &aggregate).await?)
}

/// Вставка тестовых данных
pub async fn insert_test_data(db: &DatabaseConnection) -> anyhow::Result<()> {
    let data = vec![
        EmployeeDto {
            id: None,
            code: Some("0001".into()),
            description: "Иванов Иван Иванович".into(),
            crew: Some("Смена А".into()),
            position: Some("Стропальщик".into()),
            active: true,
            comment: None,
        },
        EmployeeDto {
            id: None,
            code: Some("0002".into()),
            description: "Петров Пётр Петрович".into(),
            crew: Some("Смена А".into()),
            position: Some("Крановщик".into()),
            active: true,
            comment: None,
        },
        EmployeeDto {
            id: None,
            code: Some("0003".into()),
            description: "Сидорова Анна Сергеевна".into(),
            crew: Some("Смена Б".into()),
            position: Some("Инженер по охране труда".into()),
            active: true,
            comment: Some("Внутренний тренер".into()),
        },
        EmployeeDto {
            id: None,
            code: Some("0004".into()),
            description: "Кузнецов Олег Викторович".into(),
            crew: Some("Смена Б".into()),
            position: Some("Электромонтёр".into()),
            active: false,
            comment: Some("Уволен".into()),
        },
    ];

    for dto in data {
        create(db, dto).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_test_db;

    #[tokio::test]
    async fn test_data_lists_only_active_sorted_by_name() {
        let db = connect_test_db().await;
        insert_test_data(&db).await.unwrap();

        let items = list_active(&db).await.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].base.description, "Иванов Иван Иванович");
        assert_eq!(items[1].base.description, "Петров Пётр Петрович");
        assert_eq!(items[2].base.description, "Сидорова Анна Сергеевна");

        let first = get_by_id(&db, items[0].base.id.value()).await.unwrap();
        assert!(first.is_some());
        assert_eq!(first.unwrap().crew.as_deref(), Some("Смена А"));
    }
}
