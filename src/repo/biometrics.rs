use futures_util::StreamExt;
use sqlx::{FromRow, MySqlPool};

use crate::model::biometric::UserBiometric;

/// Joined projection resolving a sensor slot to its owner.
#[derive(Debug, FromRow)]
pub struct PunchIdentity {
    pub biometric_id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub is_active: bool,
}

pub async fn identity_by_sensor(
    pool: &MySqlPool,
    sensor_index: i64,
) -> Result<Option<PunchIdentity>, sqlx::Error> {
    sqlx::query_as::<_, PunchIdentity>(
        r#"
        SELECT b.id AS biometric_id, u.id AS user_id, u.name AS user_name, u.is_active
        FROM user_biometrics b
        JOIN users u ON u.id = b.user_id
        WHERE b.sensor_index = ?
        "#,
    )
    .bind(sensor_index)
    .fetch_optional(pool)
    .await
}

pub async fn create(
    pool: &MySqlPool,
    user_id: i64,
    sensor_index: Option<i64>,
    template_data: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO user_biometrics (user_id, sensor_index, template_data) VALUES (?, ?, ?)",
    )
    .bind(user_id)
    .bind(sensor_index)
    .bind(template_data)
    .execute(pool)
    .await?;
    Ok(result.last_insert_id() as i64)
}

/// Every template eligible for a device restore: active owner, template
/// present. Streamed, the full template set can be large.
pub async fn templates_for_sync(pool: &MySqlPool) -> Result<Vec<UserBiometric>, sqlx::Error> {
    let mut stream = sqlx::query_as::<_, UserBiometric>(
        r#"
        SELECT b.id, b.user_id, b.sensor_index, b.template_data
        FROM user_biometrics b
        JOIN users u ON u.id = b.user_id
        WHERE u.is_active = TRUE AND b.template_data IS NOT NULL
        ORDER BY b.id
        "#,
    )
    .fetch(pool);

    let mut templates = Vec::new();
    while let Some(row) = stream.next().await {
        templates.push(row?);
    }
    Ok(templates)
}

pub async fn get(pool: &MySqlPool, id: i64) -> Result<Option<UserBiometric>, sqlx::Error> {
    sqlx::query_as::<_, UserBiometric>(
        "SELECT id, user_id, sensor_index, template_data FROM user_biometrics WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_sensor_index(
    pool: &MySqlPool,
    sensor_index: i64,
) -> Result<Option<UserBiometric>, sqlx::Error> {
    sqlx::query_as::<_, UserBiometric>(
        "SELECT id, user_id, sensor_index, template_data FROM user_biometrics WHERE sensor_index = ?",
    )
    .bind(sensor_index)
    .fetch_optional(pool)
    .await
}

pub async fn set_sensor_index(
    pool: &MySqlPool,
    id: i64,
    sensor_index: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE user_biometrics SET sensor_index = ? WHERE id = ?")
        .bind(sensor_index)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
