use actix_web::{HttpResponse, Responder, web};
use sqlx::MySqlPool;

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::holiday::HolidayCreate;
use crate::repo;

#[utoipa::path(
    post,
    path = "/api/v1/holidays",
    request_body = HolidayCreate,
    responses((status = 201), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Holidays"
)]
pub async fn create_holiday(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<HolidayCreate>,
) -> Result<impl Responder, AppError> {
    auth.require_manager()?;
    let holiday = repo::holidays::create(pool.get_ref(), &payload).await?;
    Ok(HttpResponse::Created().json(holiday))
}

#[utoipa::path(
    get,
    path = "/api/v1/holidays",
    responses((status = 200)),
    security(("bearer_auth" = [])),
    tag = "Holidays"
)]
pub async fn list_holidays(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, AppError> {
    let holidays = repo::holidays::all(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(holidays))
}

#[utoipa::path(
    delete,
    path = "/api/v1/holidays/{id}",
    params(("id", description = "Holiday ID")),
    responses((status = 200), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Holidays"
)]
pub async fn delete_holiday(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    auth.require_manager()?;
    let deleted = repo::holidays::delete(pool.get_ref(), path.into_inner()).await?;
    if deleted == 0 {
        return Err(AppError::RecordNotFound);
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({"status": "success"})))
}
