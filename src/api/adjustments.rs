use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::AppError;
use crate::model::adjustment::AdjustmentRequestCreate;
use crate::model::enums::AdjustmentStatus;
use crate::repo;
use crate::service::adjustment;

#[derive(Deserialize, ToSchema)]
pub struct AdjustmentCreatePayload {
    /// Managers may file on behalf of another user.
    pub user_id: Option<i64>,
    #[serde(flatten)]
    pub request: AdjustmentRequestCreate,
}

#[derive(Deserialize, ToSchema)]
pub struct ReviewPayload {
    pub comment: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct AdjustmentListQuery {
    pub status: Option<AdjustmentStatus>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[utoipa::path(
    post,
    path = "/api/v1/adjustments",
    request_body = AdjustmentCreatePayload,
    responses((status = 201), (status = 400, description = "Invalid or period closed")),
    security(("bearer_auth" = [])),
    tag = "Adjustments"
)]
pub async fn create_adjustment(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<AdjustmentCreatePayload>,
) -> Result<impl Responder, AppError> {
    let payload = payload.into_inner();
    let target_user = payload.user_id.unwrap_or(auth.user_id);
    let created =
        adjustment::create_request(pool.get_ref(), &auth, target_user, payload.request).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/api/v1/adjustments/my",
    params(AdjustmentListQuery),
    responses((status = 200)),
    security(("bearer_auth" = [])),
    tag = "Adjustments"
)]
pub async fn my_adjustments(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AdjustmentListQuery>,
) -> Result<impl Responder, AppError> {
    let skip = query.skip.unwrap_or(0).max(0);
    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let rows = repo::adjustments::all_by_user(pool.get_ref(), auth.user_id, skip, limit).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[utoipa::path(
    get,
    path = "/api/v1/adjustments",
    params(AdjustmentListQuery),
    responses((status = 200)),
    security(("bearer_auth" = [])),
    tag = "Adjustments"
)]
pub async fn list_adjustments(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AdjustmentListQuery>,
) -> Result<impl Responder, AppError> {
    auth.require_manager()?;

    let skip = query.skip.unwrap_or(0).max(0);
    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let rows = repo::adjustments::all(pool.get_ref(), query.status, skip, limit).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[utoipa::path(
    put,
    path = "/api/v1/adjustments/{id}/approve",
    request_body = ReviewPayload,
    params(("id", description = "Request ID")),
    responses((status = 200), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Adjustments"
)]
pub async fn approve_adjustment(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<i64>,
    payload: web::Json<ReviewPayload>,
) -> Result<impl Responder, AppError> {
    let reviewed = adjustment::review_request(
        pool.get_ref(),
        path.into_inner(),
        &auth,
        AdjustmentStatus::Approved,
        payload.into_inner().comment,
        config.now_local().naive_local(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(reviewed))
}

#[utoipa::path(
    put,
    path = "/api/v1/adjustments/{id}/reject",
    request_body = ReviewPayload,
    params(("id", description = "Request ID")),
    responses((status = 200), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Adjustments"
)]
pub async fn reject_adjustment(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<i64>,
    payload: web::Json<ReviewPayload>,
) -> Result<impl Responder, AppError> {
    let reviewed = adjustment::review_request(
        pool.get_ref(),
        path.into_inner(),
        &auth,
        AdjustmentStatus::Rejected,
        payload.into_inner().comment,
        config.now_local().naive_local(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(reviewed))
}
