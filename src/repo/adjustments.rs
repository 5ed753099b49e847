use chrono::{NaiveDate, NaiveDateTime};
use sqlx::MySqlPool;

use crate::model::adjustment::{AdjustmentRequest, AdjustmentRequestCreate};
use crate::model::enums::AdjustmentStatus;

const COLUMNS: &str = "id, user_id, adjustment_type, target_date, entry_time, exit_time, \
                       amount_hours, reason_text, status, manager_id, manager_comment, reviewed_at";

pub async fn get(pool: &MySqlPool, id: i64) -> Result<Option<AdjustmentRequest>, sqlx::Error> {
    sqlx::query_as::<_, AdjustmentRequest>(&format!(
        "SELECT {COLUMNS} FROM adjustment_requests WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create(
    pool: &MySqlPool,
    user_id: i64,
    req: &AdjustmentRequestCreate,
) -> Result<AdjustmentRequest, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO adjustment_requests
            (user_id, adjustment_type, target_date, entry_time, exit_time, amount_hours, reason_text)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(req.adjustment_type)
    .bind(req.target_date)
    .bind(req.entry_time)
    .bind(req.exit_time)
    .bind(req.amount_hours)
    .bind(&req.reason_text)
    .execute(pool)
    .await?;

    let id = result.last_insert_id() as i64;
    get(pool, id).await?.ok_or(sqlx::Error::RowNotFound)
}

pub async fn all_by_user(
    pool: &MySqlPool,
    user_id: i64,
    offset: i64,
    limit: i64,
) -> Result<Vec<AdjustmentRequest>, sqlx::Error> {
    sqlx::query_as::<_, AdjustmentRequest>(&format!(
        "SELECT {COLUMNS} FROM adjustment_requests
         WHERE user_id = ?
         ORDER BY target_date DESC
         LIMIT ? OFFSET ?"
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn all(
    pool: &MySqlPool,
    status: Option<AdjustmentStatus>,
    offset: i64,
    limit: i64,
) -> Result<Vec<AdjustmentRequest>, sqlx::Error> {
    match status {
        Some(status) => {
            sqlx::query_as::<_, AdjustmentRequest>(&format!(
                "SELECT {COLUMNS} FROM adjustment_requests
                 WHERE status = ?
                 ORDER BY target_date DESC
                 LIMIT ? OFFSET ?"
            ))
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, AdjustmentRequest>(&format!(
                "SELECT {COLUMNS} FROM adjustment_requests
                 ORDER BY target_date DESC
                 LIMIT ? OFFSET ?"
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn update_review(
    pool: &MySqlPool,
    id: i64,
    status: AdjustmentStatus,
    manager_id: i64,
    comment: Option<&str>,
    reviewed_at: NaiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE adjustment_requests
        SET status = ?, manager_id = ?, manager_comment = ?, reviewed_at = ?
        WHERE id = ?
        "#,
    )
    .bind(status)
    .bind(manager_id)
    .bind(comment)
    .bind(reviewed_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Approved CERTIFICATE/WAIVER rows in a date range. The balance calculator
/// treats these as ground truth for excused days.
pub async fn approved_excusals_in_range(
    pool: &MySqlPool,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<AdjustmentRequest>, sqlx::Error> {
    sqlx::query_as::<_, AdjustmentRequest>(&format!(
        "SELECT {COLUMNS} FROM adjustment_requests
         WHERE user_id = ?
           AND status = 'APPROVED'
           AND adjustment_type IN ('CERTIFICATE', 'WAIVER')
           AND target_date BETWEEN ? AND ?
         ORDER BY target_date"
    ))
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}
