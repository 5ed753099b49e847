use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::model::holiday::{Holiday, HolidayCreate};

pub async fn all(pool: &MySqlPool) -> Result<Vec<Holiday>, sqlx::Error> {
    sqlx::query_as::<_, Holiday>(
        "SELECT id, holiday_date, name FROM holidays ORDER BY holiday_date",
    )
    .fetch_all(pool)
    .await
}

pub async fn in_range(
    pool: &MySqlPool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Holiday>, sqlx::Error> {
    sqlx::query_as::<_, Holiday>(
        r#"
        SELECT id, holiday_date, name
        FROM holidays
        WHERE holiday_date BETWEEN ? AND ?
        ORDER BY holiday_date
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

pub async fn create(pool: &MySqlPool, holiday: &HolidayCreate) -> Result<Holiday, sqlx::Error> {
    let result = sqlx::query("INSERT INTO holidays (holiday_date, name) VALUES (?, ?)")
        .bind(holiday.holiday_date)
        .bind(&holiday.name)
        .execute(pool)
        .await?;

    Ok(Holiday {
        id: result.last_insert_id() as i64,
        holiday_date: holiday.holiday_date,
        name: holiday.name.clone(),
    })
}

pub async fn delete(pool: &MySqlPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM holidays WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
