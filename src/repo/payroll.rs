use sqlx::MySqlPool;

use crate::model::payroll::PayrollClosure;

pub async fn get_by_month(
    pool: &MySqlPool,
    month: u32,
    year: i32,
) -> Result<Option<PayrollClosure>, sqlx::Error> {
    sqlx::query_as::<_, PayrollClosure>(
        r#"
        SELECT id, month, year, is_closed, closed_by_user_id, closed_at
        FROM payroll_closures
        WHERE month = ? AND year = ?
        "#,
    )
    .bind(month)
    .bind(year)
    .fetch_optional(pool)
    .await
}

pub async fn create(
    pool: &MySqlPool,
    month: u32,
    year: i32,
    closed_by_user_id: i64,
) -> Result<PayrollClosure, sqlx::Error> {
    sqlx::query(
        "INSERT INTO payroll_closures (month, year, closed_by_user_id) VALUES (?, ?, ?)",
    )
    .bind(month)
    .bind(year)
    .bind(closed_by_user_id)
    .execute(pool)
    .await?;

    get_by_month(pool, month, year)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn delete(pool: &MySqlPool, month: u32, year: i32) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM payroll_closures WHERE month = ? AND year = ?")
        .bind(month)
        .bind(year)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
