use chrono::NaiveDateTime;
use sqlx::MySqlPool;

use crate::model::manual_auth::ManualPunchAuthorization;

pub async fn create(
    pool: &MySqlPool,
    user_id: i64,
    authorized_by: i64,
    valid_from: NaiveDateTime,
    valid_until: NaiveDateTime,
    reason: &str,
) -> Result<ManualPunchAuthorization, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO manual_punch_authorizations
            (user_id, authorized_by, valid_from, valid_until, reason)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(authorized_by)
    .bind(valid_from)
    .bind(valid_until)
    .bind(reason)
    .execute(pool)
    .await?;

    Ok(ManualPunchAuthorization {
        id: result.last_insert_id() as i64,
        user_id,
        authorized_by,
        valid_from,
        valid_until,
        reason: reason.to_string(),
    })
}

/// Whether the user holds a window covering `now`.
pub async fn has_active(
    pool: &MySqlPool,
    user_id: i64,
    now: NaiveDateTime,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM manual_punch_authorizations
            WHERE user_id = ? AND valid_from <= ? AND valid_until >= ?
            LIMIT 1
        )
        "#,
    )
    .bind(user_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn revoke_for_user(pool: &MySqlPool, user_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM manual_punch_authorizations WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
