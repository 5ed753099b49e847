use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::IntoParams;

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::repo;

#[derive(Deserialize, IntoParams)]
pub struct AuditQuery {
    /// Restrict to entries by or about this user.
    pub user_id: Option<i64>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/audit",
    params(AuditQuery),
    responses((status = 200), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Audit"
)]
pub async fn list_audit_logs(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AuditQuery>,
) -> Result<impl Responder, AppError> {
    auth.require_manager()?;

    let skip = query.skip.unwrap_or(0).max(0);
    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let logs = repo::audit::list(pool.get_ref(), query.user_id, skip, limit).await?;
    Ok(HttpResponse::Ok().json(logs))
}
