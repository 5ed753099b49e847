//! Time-bounded windows that let a user punch from the web UI.

use chrono::NaiveDateTime;
use sqlx::MySqlPool;
use tracing::info;

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::manual_auth::ManualPunchAuthorization;
use crate::repo;
use crate::service::audit;

pub async fn grant(
    pool: &MySqlPool,
    manager: &AuthUser,
    user_id: i64,
    valid_from: NaiveDateTime,
    valid_until: NaiveDateTime,
    reason: &str,
) -> Result<ManualPunchAuthorization, AppError> {
    manager.require_manager()?;

    if valid_until <= valid_from {
        return Err(AppError::Validation(
            "A data de término deve ser posterior ao início".to_string(),
        ));
    }

    let granted =
        repo::manual_auth::create(pool, user_id, manager.user_id, valid_from, valid_until, reason)
            .await?;

    info!(user = user_id, manager = manager.user_id, "manual punch window granted");
    audit::log(
        pool,
        manager.user_id,
        "GRANT_MANUAL_PUNCH",
        "MANUAL_AUTHORIZATION",
        Some(granted.id),
        Some(format!("{valid_from} .. {valid_until}")),
    )
    .await;

    Ok(granted)
}

pub async fn revoke(pool: &MySqlPool, manager: &AuthUser, user_id: i64) -> Result<(), AppError> {
    manager.require_manager()?;

    repo::manual_auth::revoke_for_user(pool, user_id).await?;
    audit::log(
        pool,
        manager.user_id,
        "REVOKE_MANUAL_PUNCH",
        "MANUAL_AUTHORIZATION",
        None,
        Some(format!("user {user_id}")),
    )
    .await;
    Ok(())
}
