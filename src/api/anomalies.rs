use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::IntoParams;

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::AppError;
use crate::service::anomaly;

#[derive(Deserialize, IntoParams)]
pub struct MonthQuery {
    #[param(example = 3)]
    pub month: u32,
    #[param(example = 2026)]
    pub year: i32,
}

#[utoipa::path(
    get,
    path = "/api/v1/anomalies/my",
    params(MonthQuery),
    responses((status = 200, description = "Own punch-shape anomalies for the month")),
    security(("bearer_auth" = [])),
    tag = "Anomalies"
)]
pub async fn my_anomalies(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<MonthQuery>,
) -> Result<impl Responder, AppError> {
    let (start, end) = anomaly::month_query_range(query.month, query.year, config.today_local())?;
    let mut found =
        anomaly::get_anomalies(pool.get_ref(), start, end, Some(auth.user_id)).await?;

    // duration-based findings stay manager-only
    found.retain(|a| a.kind.employee_visible());
    Ok(HttpResponse::Ok().json(found))
}

#[utoipa::path(
    get,
    path = "/api/v1/anomalies/all",
    params(MonthQuery),
    responses((status = 200, description = "All employees' anomalies for the month")),
    security(("bearer_auth" = [])),
    tag = "Anomalies"
)]
pub async fn all_anomalies(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<MonthQuery>,
) -> Result<impl Responder, AppError> {
    auth.require_manager()?;

    let (start, end) = anomaly::month_query_range(query.month, query.year, config.today_local())?;
    let found = anomaly::get_anomalies(pool.get_ref(), start, end, None).await?;
    Ok(HttpResponse::Ok().json(found))
}

#[utoipa::path(
    get,
    path = "/api/v1/anomalies/user/{user_id}",
    params(("user_id", description = "User ID"), MonthQuery),
    responses((status = 200)),
    security(("bearer_auth" = [])),
    tag = "Anomalies"
)]
pub async fn user_anomalies(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<i64>,
    query: web::Query<MonthQuery>,
) -> Result<impl Responder, AppError> {
    auth.require_manager()?;

    let (start, end) = anomaly::month_query_range(query.month, query.year, config.today_local())?;
    let found =
        anomaly::get_anomalies(pool.get_ref(), start, end, Some(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(found))
}
