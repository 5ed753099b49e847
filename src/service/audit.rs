use sqlx::MySqlPool;
use tracing::error;

use crate::repo;
use crate::repo::audit::NewAuditLog;

/// Best-effort audit append. A failed audit write is logged but never fails
/// the operation it describes.
pub async fn log(
    pool: &MySqlPool,
    user_id: i64,
    action: &str,
    entity: &str,
    entity_id: Option<i64>,
    details: Option<String>,
) {
    log_full(pool, NewAuditLog {
        user_id,
        action,
        entity,
        entity_id,
        details,
        target_user_id: None,
        justification: None,
        reason: None,
    })
    .await;
}

pub async fn log_full(pool: &MySqlPool, entry: NewAuditLog<'_>) {
    if let Err(e) = repo::audit::create(pool, entry).await {
        error!(error = %e, "failed to append audit log");
    }
}
