use chrono::NaiveDate;
use sea_orm::DatabaseTransaction;

use super::repository;
use crate::domain::error::DomainError;
use contracts::domain::a003_training::aggregate::DATE_FORMAT;

/// Ширина порядковой части учётного номера
const SEQUENCE_WIDTH: usize = 4;

/// Префикс учётного номера: "ГГ-КК-ПП-"
///
/// Год берётся из даты ОКОНЧАНИЯ обучения: номер относит обучение
/// к году, в котором оно завершилось.
fn build_prefix(main_code: &str, sub_code: &str, end_date: &str) -> Result<String, DomainError> {
    let date = NaiveDate::parse_from_str(end_date, DATE_FORMAT).map_err(|_| {
        DomainError::Validation("Дата окончания должна быть в формате ГГГГ-ММ-ДД".into())
    })?;
    Ok(format!("{}-{}-{}-", date.format("%y"), main_code, sub_code))
}

/// Следующий свободный учётный номер для тройки (год окончания, категория, подкатегория)
///
/// Порядковая часть — максимум по уже выданным номерам с тем же префиксом
/// плюс один. Дыры после удалений не переиспользуются. Просмотр идёт в той
/// же транзакции, что и последующий INSERT; гонку двух создателей ловит
/// уникальный индекс по code, после чего выдача повторяется.
pub async fn next_display_id(
    txn: &DatabaseTransaction,
    main_code: &str,
    sub_code: &str,
    end_date: &str,
) -> Result<String, DomainError> {
    let prefix = build_prefix(main_code, sub_code, end_date)?;
    let existing = repository::display_ids_with_prefix_txn(txn, &prefix).await?;

    let max_seq = existing
        .iter()
        .filter_map(|code| code.get(prefix.len()..))
        .filter_map(|tail| tail.parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    Ok(format!(
        "{}{:0width$}",
        prefix,
        max_seq + 1,
        width = SEQUENCE_WIDTH
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_test_db;
    use contracts::domain::a003_training::aggregate::Training;
    use sea_orm::TransactionTrait;

    async fn seed_training(txn: &DatabaseTransaction, code: &str) {
        let mut training = Training::new_for_insert(
            format!("Обучение {}", code),
            1,
            Some(1),
            "2025-06-01".to_string(),
            "2025-06-15".to_string(),
            8.0,
            None,
            1,
        );
        training.base.code = code.to_string();
        repository::insert_txn(txn, &training).await.unwrap();
    }

    #[tokio::test]
    async fn first_number_in_series_is_one() {
        let db = connect_test_db().await;
        let txn = db.begin().await.unwrap();

        let id = next_display_id(&txn, "01", "02", "2025-06-15").await.unwrap();
        assert_eq!(id, "25-01-02-0001");
    }

    #[tokio::test]
    async fn year_comes_from_end_date() {
        let db = connect_test_db().await;
        let txn = db.begin().await.unwrap();

        // Начало в декабре 2024, окончание в январе 2025: серия 2025 года
        let id = next_display_id(&txn, "03", "01", "2025-01-10").await.unwrap();
        assert_eq!(id, "25-03-01-0001");

        let id = next_display_id(&txn, "03", "01", "2024-12-20").await.unwrap();
        assert_eq!(id, "24-03-01-0001");
    }

    #[tokio::test]
    async fn sequence_continues_after_max_and_skips_gaps() {
        let db = connect_test_db().await;
        let txn = db.begin().await.unwrap();

        seed_training(&txn, "25-01-02-0001").await;
        seed_training(&txn, "25-01-02-0007").await;
        // Чужая серия не влияет
        seed_training(&txn, "25-01-05-0003").await;

        let id = next_display_id(&txn, "01", "02", "2025-06-15").await.unwrap();
        assert_eq!(id, "25-01-02-0008");
    }

    #[tokio::test]
    async fn sequence_is_zero_padded() {
        let db = connect_test_db().await;
        let txn = db.begin().await.unwrap();

        seed_training(&txn, "25-01-02-0009").await;

        let id = next_display_id(&txn, "01", "02", "2025-06-15").await.unwrap();
        assert_eq!(id, "25-01-02-0010");
    }
}
