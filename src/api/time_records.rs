use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDateTime, NaiveTime};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::AppError;
use crate::model::enums::RecordType;
use crate::repo;
use crate::service::{manual_auth, time_record};

#[derive(Deserialize, IntoParams)]
pub struct Pagination {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize, IntoParams)]
pub struct AdminListQuery {
    pub user_id: i64,
    #[param(value_type = String, example = "2026-03-01")]
    pub start_date: chrono::NaiveDate,
    #[param(value_type = String, example = "2026-03-31")]
    pub end_date: chrono::NaiveDate,
}

#[derive(Deserialize, ToSchema)]
pub struct TimeRecordCreateAdmin {
    pub user_id: i64,
    pub record_type: RecordType,
    #[schema(value_type = String, format = "date-time", example = "2026-03-02T08:00:00")]
    pub record_datetime: NaiveDateTime,
    #[schema(example = "FORGOT_BADGE")]
    pub justification: String,
    pub reason: String,
}

#[derive(Deserialize, ToSchema)]
pub struct TimeRecordUpdateAdmin {
    pub record_type: Option<RecordType>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub record_datetime: Option<NaiveDateTime>,
    pub justification: String,
    pub reason: String,
}

#[derive(Deserialize, ToSchema)]
pub struct TimeRecordDeleteAdmin {
    pub justification: String,
    pub reason: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ManualAuthGrant {
    #[schema(value_type = String, format = "date-time")]
    pub valid_from: NaiveDateTime,
    #[schema(value_type = String, format = "date-time")]
    pub valid_until: NaiveDateTime,
    pub reason: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/records/entry",
    responses((status = 200, description = "Entry registered"), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Records"
)]
pub async fn register_entry(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<impl Responder, AppError> {
    let record = time_record::register_entry(pool.get_ref(), config.get_ref(), &auth).await?;
    Ok(HttpResponse::Ok().json(record))
}

#[utoipa::path(
    post,
    path = "/api/v1/records/exit",
    responses((status = 200, description = "Exit registered"), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Records"
)]
pub async fn register_exit(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<impl Responder, AppError> {
    let record = time_record::register_exit(pool.get_ref(), config.get_ref(), &auth).await?;
    Ok(HttpResponse::Ok().json(record))
}

#[utoipa::path(
    put,
    path = "/api/v1/records/{id}/toggle",
    params(("id", description = "Record ID")),
    responses((status = 200, description = "Type flipped"), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Records"
)]
pub async fn toggle_record_type(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let record = time_record::toggle_type(pool.get_ref(), path.into_inner(), &auth).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// The type-toggle trail of one record.
#[utoipa::path(
    get,
    path = "/api/v1/records/{id}/toggles",
    params(("id", description = "Record ID")),
    responses((status = 200), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Records"
)]
pub async fn record_toggle_history(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let record = repo::time_records::get(pool.get_ref(), *path)
        .await?
        .ok_or(AppError::RecordNotFound)?;
    auth.require_self_or_manager(record.user_id)?;

    let toggles = repo::audit::toggles_for_record(pool.get_ref(), record.id).await?;
    Ok(HttpResponse::Ok().json(toggles))
}

#[utoipa::path(
    get,
    path = "/api/v1/records/my",
    params(Pagination),
    responses((status = 200, description = "Own punches, newest first")),
    security(("bearer_auth" = [])),
    tag = "Records"
)]
pub async fn my_records(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<Pagination>,
) -> Result<impl Responder, AppError> {
    let skip = query.skip.unwrap_or(0).max(0);
    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let records = repo::time_records::all_by_user(pool.get_ref(), auth.user_id, skip, limit).await?;
    Ok(HttpResponse::Ok().json(records))
}

#[utoipa::path(
    get,
    path = "/api/v1/records/admin/list",
    params(AdminListQuery),
    responses((status = 200, description = "Punches of one user in a range")),
    security(("bearer_auth" = [])),
    tag = "Records"
)]
pub async fn admin_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AdminListQuery>,
) -> Result<impl Responder, AppError> {
    auth.require_manager()?;
    if query.start_date > query.end_date {
        return Err(AppError::InvalidDateRange);
    }

    let start = query.start_date.and_time(NaiveTime::MIN);
    let end = query
        .end_date
        .and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap());
    let records = repo::time_records::by_range(pool.get_ref(), query.user_id, start, end).await?;
    Ok(HttpResponse::Ok().json(records))
}

#[utoipa::path(
    post,
    path = "/api/v1/records/admin",
    request_body = TimeRecordCreateAdmin,
    responses((status = 201), (status = 400, description = "Period closed")),
    security(("bearer_auth" = [])),
    tag = "Records"
)]
pub async fn admin_create(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<TimeRecordCreateAdmin>,
) -> Result<impl Responder, AppError> {
    let record = time_record::create_admin_record(
        pool.get_ref(),
        &auth,
        payload.user_id,
        payload.record_type,
        payload.record_datetime,
        &payload.justification,
        &payload.reason,
    )
    .await?;
    Ok(HttpResponse::Created().json(record))
}

#[utoipa::path(
    put,
    path = "/api/v1/records/admin/{id}",
    request_body = TimeRecordUpdateAdmin,
    params(("id", description = "Record ID")),
    responses((status = 200), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Records"
)]
pub async fn admin_update(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    payload: web::Json<TimeRecordUpdateAdmin>,
) -> Result<impl Responder, AppError> {
    let record = time_record::update_admin_record(
        pool.get_ref(),
        &auth,
        path.into_inner(),
        payload.record_type,
        payload.record_datetime,
        &payload.justification,
        &payload.reason,
    )
    .await?;
    Ok(HttpResponse::Ok().json(record))
}

#[utoipa::path(
    delete,
    path = "/api/v1/records/admin/{id}",
    request_body = TimeRecordDeleteAdmin,
    params(("id", description = "Record ID")),
    responses((status = 200), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Records"
)]
pub async fn admin_delete(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    payload: web::Json<TimeRecordDeleteAdmin>,
) -> Result<impl Responder, AppError> {
    time_record::delete_admin_record(
        pool.get_ref(),
        &auth,
        path.into_inner(),
        &payload.justification,
        &payload.reason,
    )
    .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "message": "Record deleted"
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/records/admin/authorize/{user_id}",
    request_body = ManualAuthGrant,
    params(("user_id", description = "User to authorize")),
    responses((status = 200)),
    security(("bearer_auth" = [])),
    tag = "Records"
)]
pub async fn authorize_manual_punch(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    payload: web::Json<ManualAuthGrant>,
) -> Result<impl Responder, AppError> {
    let granted = manual_auth::grant(
        pool.get_ref(),
        &auth,
        path.into_inner(),
        payload.valid_from,
        payload.valid_until,
        &payload.reason,
    )
    .await?;
    Ok(HttpResponse::Ok().json(granted))
}

#[utoipa::path(
    post,
    path = "/api/v1/records/admin/deauthorize/{user_id}",
    params(("user_id", description = "User to deauthorize")),
    responses((status = 200)),
    security(("bearer_auth" = [])),
    tag = "Records"
)]
pub async fn deauthorize_manual_punch(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    manual_auth::revoke(pool.get_ref(), &auth, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "message": "User authorization revoked"
    })))
}
