use sqlx::MySqlPool;

use crate::model::user::{User, UserCredentials};

pub async fn get(pool: &MySqlPool, user_id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, role_id, is_active
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_credentials_by_email(
    pool: &MySqlPool,
    email: &str,
) -> Result<Option<UserCredentials>, sqlx::Error> {
    sqlx::query_as::<_, UserCredentials>(
        r#"
        SELECT id, name, email, password, role_id, is_active
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Active users, employees first. Reports and the anomaly sweep iterate this.
pub async fn list_active(pool: &MySqlPool, limit: i64) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, role_id, is_active
        FROM users
        WHERE is_active = TRUE
        ORDER BY role_id DESC, name
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn list_active_employees(pool: &MySqlPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, role_id, is_active
        FROM users
        WHERE is_active = TRUE AND role_id = 3
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await
}
