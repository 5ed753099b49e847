use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::AppError;
use crate::service::payroll;

#[derive(Deserialize, ToSchema, IntoParams)]
pub struct PayrollPeriod {
    #[schema(example = 2)]
    pub month: u32,
    #[schema(example = 2026)]
    pub year: i32,
}

#[utoipa::path(
    post,
    path = "/api/v1/payroll/close",
    request_body = PayrollPeriod,
    responses(
        (status = 200, description = "Period closed"),
        (status = 400, description = "Already closed or not a past month"),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn close_period(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<PayrollPeriod>,
) -> Result<impl Responder, AppError> {
    let closure = payroll::close_period(
        pool.get_ref(),
        payload.month,
        payload.year,
        config.today_local(),
        &auth,
    )
    .await?;
    Ok(HttpResponse::Ok().json(closure))
}

#[utoipa::path(
    post,
    path = "/api/v1/payroll/reopen",
    request_body = PayrollPeriod,
    responses(
        (status = 200, description = "Period reopened"),
        (status = 400, description = "Period is not closed"),
        (status = 403, description = "Maintainer only")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn reopen_period(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<PayrollPeriod>,
) -> Result<impl Responder, AppError> {
    payroll::reopen_period(pool.get_ref(), payload.month, payload.year, &auth).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Period reopened successfully"
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll/status",
    params(PayrollPeriod),
    responses((status = 200, description = "OPEN/CLOSED state of the period")),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn period_status(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<PayrollPeriod>,
) -> Result<impl Responder, AppError> {
    let closure = payroll::period_status(pool.get_ref(), query.month, query.year).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "month": query.month,
        "year": query.year,
        "is_closed": closure.is_some(),
        "closure": closure,
    })))
}
