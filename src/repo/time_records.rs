use chrono::{NaiveDateTime, NaiveTime};
use sqlx::MySqlPool;

use crate::model::enums::RecordType;
use crate::model::time_record::TimeRecord;

const COLUMNS: &str = "id, user_id, record_type, record_datetime, is_manual, is_time_verified, \
                       biometric_id, edited_by, edit_justification, edit_reason, original_timestamp";

pub struct NewTimeRecord {
    pub user_id: i64,
    pub record_type: RecordType,
    pub record_datetime: NaiveDateTime,
    pub is_manual: bool,
    pub is_time_verified: bool,
    pub biometric_id: Option<i64>,
    pub edited_by: Option<i64>,
    pub edit_justification: Option<String>,
    pub edit_reason: Option<String>,
}

pub async fn get(pool: &MySqlPool, id: i64) -> Result<Option<TimeRecord>, sqlx::Error> {
    sqlx::query_as::<_, TimeRecord>(&format!(
        "SELECT {COLUMNS} FROM time_records WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// The user's most recent punch; authority for the ENTRY/EXIT toggle rule.
pub async fn last_for_user(
    pool: &MySqlPool,
    user_id: i64,
) -> Result<Option<TimeRecord>, sqlx::Error> {
    sqlx::query_as::<_, TimeRecord>(&format!(
        "SELECT {COLUMNS} FROM time_records
         WHERE user_id = ?
         ORDER BY record_datetime DESC, id DESC
         LIMIT 1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn create(pool: &MySqlPool, new: NewTimeRecord) -> Result<TimeRecord, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO time_records
            (user_id, record_type, record_datetime, is_manual, is_time_verified,
             biometric_id, edited_by, edit_justification, edit_reason)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(new.user_id)
    .bind(new.record_type)
    .bind(new.record_datetime)
    .bind(new.is_manual)
    .bind(new.is_time_verified)
    .bind(new.biometric_id)
    .bind(new.edited_by)
    .bind(&new.edit_justification)
    .bind(&new.edit_reason)
    .execute(pool)
    .await?;

    let id = result.last_insert_id() as i64;
    get(pool, id).await?.ok_or(sqlx::Error::RowNotFound)
}

pub async fn by_range(
    pool: &MySqlPool,
    user_id: i64,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<TimeRecord>, sqlx::Error> {
    sqlx::query_as::<_, TimeRecord>(&format!(
        "SELECT {COLUMNS} FROM time_records
         WHERE user_id = ? AND record_datetime BETWEEN ? AND ?
         ORDER BY record_datetime"
    ))
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

/// One flat, ordered fetch for a set of users; callers bucket per user/day.
pub async fn by_users_and_range(
    pool: &MySqlPool,
    user_ids: &[i64],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<TimeRecord>, sqlx::Error> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; user_ids.len()].join(", ");
    let sql = format!(
        "SELECT {COLUMNS} FROM time_records
         WHERE user_id IN ({placeholders}) AND record_datetime BETWEEN ? AND ?
         ORDER BY user_id, record_datetime"
    );

    let mut query = sqlx::query_as::<_, TimeRecord>(&sql);
    for id in user_ids {
        query = query.bind(id);
    }
    query.bind(start).bind(end).fetch_all(pool).await
}

pub async fn all_by_user(
    pool: &MySqlPool,
    user_id: i64,
    offset: i64,
    limit: i64,
) -> Result<Vec<TimeRecord>, sqlx::Error> {
    sqlx::query_as::<_, TimeRecord>(&format!(
        "SELECT {COLUMNS} FROM time_records
         WHERE user_id = ?
         ORDER BY record_datetime DESC
         LIMIT ? OFFSET ?"
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn set_type(
    pool: &MySqlPool,
    id: i64,
    record_type: RecordType,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE time_records SET record_type = ? WHERE id = ?")
        .bind(record_type)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Administrative update; keeps the first pre-edit timestamp in
/// `original_timestamp` so the original punch stays reconstructible.
pub async fn update_admin(
    pool: &MySqlPool,
    record: &TimeRecord,
    record_type: RecordType,
    record_datetime: NaiveDateTime,
    edited_by: i64,
    justification: &str,
    reason: &str,
) -> Result<(), sqlx::Error> {
    let original = record.original_timestamp.unwrap_or(record.record_datetime);
    sqlx::query(
        r#"
        UPDATE time_records
        SET record_type = ?, record_datetime = ?, edited_by = ?,
            edit_justification = ?, edit_reason = ?, original_timestamp = ?
        WHERE id = ?
        "#,
    )
    .bind(record_type)
    .bind(record_datetime)
    .bind(edited_by)
    .bind(justification)
    .bind(reason)
    .bind(original)
    .bind(record.id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &MySqlPool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM time_records WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Day bounds helper shared by range queries.
pub fn day_bounds(date: chrono::NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    (
        date.and_time(NaiveTime::MIN),
        date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap()),
    )
}
