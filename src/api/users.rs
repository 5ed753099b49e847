use actix_web::{HttpResponse, Responder, web};
use sqlx::MySqlPool;

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::repo;

#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses((status = 200, body = [crate::model::user::User]), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn list_users(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, AppError> {
    auth.require_manager()?;
    let users = repo::users::list_active(pool.get_ref(), 1000).await?;
    Ok(HttpResponse::Ok().json(users))
}
