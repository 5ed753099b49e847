use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::AppError;
use crate::repo;
use crate::service::balance::{self, DayBalance, PeriodTotals};

#[derive(Deserialize, IntoParams)]
pub struct PeriodQuery {
    #[param(example = 3)]
    pub month: Option<u32>,
    #[param(example = 2026)]
    pub year: Option<i32>,
}

#[derive(Deserialize, IntoParams)]
pub struct RangeQuery {
    #[param(value_type = Option<String>, example = "2026-03-01")]
    pub start_date: Option<NaiveDate>,
    #[param(value_type = Option<String>, example = "2026-03-31")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct MonthlySummaryItem {
    pub user_id: i64,
    pub user_name: String,
    #[serde(flatten)]
    pub totals: PeriodTotals,
}

#[derive(Serialize, ToSchema)]
pub struct MonthlyReportResponse {
    pub month: u32,
    pub year: i32,
    pub employees: Vec<MonthlySummaryItem>,
}

#[derive(Serialize, ToSchema)]
pub struct UserReportResponse {
    pub user_id: i64,
    pub user_name: String,
    pub month: u32,
    pub year: i32,
    pub totals: PeriodTotals,
    pub daily_details: Vec<DayBalance>,
}

#[derive(Serialize, ToSchema)]
pub struct WorkHourBalanceResponse {
    pub user_id: i64,
    #[schema(value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = "date")]
    pub end_date: NaiveDate,
    pub totals: PeriodTotals,
}

fn resolve_period(query: &PeriodQuery, config: &Config) -> (u32, i32) {
    let today = config.today_local();
    (
        query.month.unwrap_or_else(|| chrono::Datelike::month(&today)),
        query.year.unwrap_or_else(|| chrono::Datelike::year(&today)),
    )
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/monthly",
    params(PeriodQuery),
    responses((status = 200, body = MonthlyReportResponse)),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn monthly_summary(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<PeriodQuery>,
) -> Result<impl Responder, AppError> {
    auth.require_manager()?;

    let (month, year) = resolve_period(&query, config.get_ref());
    let (start, end) = balance::month_range(month, year)?;
    let today = config.today_local();

    let users = repo::users::list_active(pool.get_ref(), 1000).await?;
    let mut employees = Vec::with_capacity(users.len());
    for user in users {
        let (_, totals) =
            balance::user_period_balance(pool.get_ref(), user.id, start, end, today).await?;
        employees.push(MonthlySummaryItem {
            user_id: user.id,
            user_name: user.name,
            totals,
        });
    }

    Ok(HttpResponse::Ok().json(MonthlyReportResponse {
        month,
        year,
        employees,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/user/{user_id}",
    params(("user_id", description = "User ID"), PeriodQuery),
    responses((status = 200, body = UserReportResponse), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn user_report(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<i64>,
    query: web::Query<PeriodQuery>,
) -> Result<impl Responder, AppError> {
    auth.require_manager()?;

    let user_id = path.into_inner();
    let user = repo::users::get(pool.get_ref(), user_id)
        .await?
        .ok_or(AppError::RecordNotFound)?;

    let (month, year) = resolve_period(&query, config.get_ref());
    let (start, end) = balance::month_range(month, year)?;
    let (daily_details, totals) =
        balance::user_period_balance(pool.get_ref(), user.id, start, end, config.today_local())
            .await?;

    Ok(HttpResponse::Ok().json(UserReportResponse {
        user_id: user.id,
        user_name: user.name,
        month,
        year,
        totals,
        daily_details,
    }))
}

/// Own balance, defaulting to the current month when no range is given.
#[utoipa::path(
    get,
    path = "/api/v1/work-hours/my",
    params(RangeQuery),
    responses((status = 200, body = WorkHourBalanceResponse)),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn my_work_hours(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<RangeQuery>,
) -> Result<impl Responder, AppError> {
    let today = config.today_local();
    let (month_start, month_end) =
        balance::month_range(chrono::Datelike::month(&today), chrono::Datelike::year(&today))?;

    let start = query.start_date.unwrap_or(month_start);
    let end = query.end_date.unwrap_or(month_end);

    let (_, totals) =
        balance::user_period_balance(pool.get_ref(), auth.user_id, start, end, today).await?;

    Ok(HttpResponse::Ok().json(WorkHourBalanceResponse {
        user_id: auth.user_id,
        start_date: start,
        end_date: end,
        totals,
    }))
}
