use sqlx::MySqlPool;

use crate::model::audit::{AuditLog, ManualAdjustment};
use crate::model::enums::RecordType;

pub struct NewAuditLog<'a> {
    pub user_id: i64,
    pub action: &'a str,
    pub entity: &'a str,
    pub entity_id: Option<i64>,
    pub details: Option<String>,
    pub target_user_id: Option<i64>,
    pub justification: Option<&'a str>,
    pub reason: Option<&'a str>,
}

pub async fn create(pool: &MySqlPool, entry: NewAuditLog<'_>) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs
            (user_id, action, entity, entity_id, details, target_user_id, justification, reason)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(entry.user_id)
    .bind(entry.action)
    .bind(entry.entity)
    .bind(entry.entity_id)
    .bind(entry.details)
    .bind(entry.target_user_id)
    .bind(entry.justification)
    .bind(entry.reason)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list(
    pool: &MySqlPool,
    user_id: Option<i64>,
    offset: i64,
    limit: i64,
) -> Result<Vec<AuditLog>, sqlx::Error> {
    const COLUMNS: &str = "id, user_id, action, entity, entity_id, details, target_user_id, \
                           justification, reason, created_at";
    match user_id {
        Some(user_id) => {
            sqlx::query_as::<_, AuditLog>(&format!(
                "SELECT {COLUMNS} FROM audit_logs
                 WHERE user_id = ? OR target_user_id = ?
                 ORDER BY created_at DESC
                 LIMIT ? OFFSET ?"
            ))
            .bind(user_id)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, AuditLog>(&format!(
                "SELECT {COLUMNS} FROM audit_logs ORDER BY created_at DESC LIMIT ? OFFSET ?"
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
    }
}

/// Append-only type-toggle trail.
pub async fn create_manual_adjustment(
    pool: &MySqlPool,
    time_record_id: i64,
    previous_type: RecordType,
    new_type: RecordType,
    adjusted_by_user_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO manual_adjustments
            (time_record_id, previous_type, new_type, adjusted_by_user_id)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(time_record_id)
    .bind(previous_type)
    .bind(new_type)
    .bind(adjusted_by_user_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn toggles_for_record(
    pool: &MySqlPool,
    time_record_id: i64,
) -> Result<Vec<ManualAdjustment>, sqlx::Error> {
    sqlx::query_as::<_, ManualAdjustment>(
        r#"
        SELECT id, time_record_id, previous_type, new_type, adjusted_by_user_id, adjusted_at
        FROM manual_adjustments
        WHERE time_record_id = ?
        ORDER BY adjusted_at
        "#,
    )
    .bind(time_record_id)
    .fetch_all(pool)
    .await
}
