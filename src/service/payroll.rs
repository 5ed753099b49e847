//! OPEN/CLOSED state machine per (month, year). Every mutation on records or
//! adjustments consults `validate_period_open` before touching the store.

use chrono::{Datelike, NaiveDate};
use sqlx::MySqlPool;
use tracing::info;

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::payroll::PayrollClosure;
use crate::repo;
use crate::service::audit;

/// Only strictly past months can be closed; the current and future months
/// are still accumulating punches.
pub fn validate_close_target(month: u32, year: i32, today: NaiveDate) -> Result<(), AppError> {
    if !(1..=12).contains(&month) {
        return Err(AppError::InvalidDateRange);
    }
    if year > today.year() || (year == today.year() && month >= today.month()) {
        return Err(AppError::Validation(
            "Only months before the current one can be closed".to_string(),
        ));
    }
    Ok(())
}

pub async fn close_period(
    pool: &MySqlPool,
    month: u32,
    year: i32,
    today: NaiveDate,
    actor: &AuthUser,
) -> Result<PayrollClosure, AppError> {
    actor.require_manager()?;
    validate_close_target(month, year, today)?;

    if repo::payroll::get_by_month(pool, month, year).await?.is_some() {
        return Err(AppError::Validation("Period already closed".to_string()));
    }

    let closure = repo::payroll::create(pool, month, year, actor.user_id).await?;
    info!(month, year, actor = actor.user_id, "payroll period closed");

    audit::log(
        pool,
        actor.user_id,
        "CLOSE_PAYROLL",
        "PAYROLL_CLOSURE",
        Some(closure.id),
        Some(format!("Closed period {month}/{year}")),
    )
    .await;

    Ok(closure)
}

/// Fully reversible: the closure row is deleted, so the period can be closed
/// again later.
pub async fn reopen_period(
    pool: &MySqlPool,
    month: u32,
    year: i32,
    actor: &AuthUser,
) -> Result<(), AppError> {
    actor.require_maintainer()?;

    if repo::payroll::get_by_month(pool, month, year).await?.is_none() {
        return Err(AppError::Validation("Period is not closed".to_string()));
    }

    repo::payroll::delete(pool, month, year).await?;
    info!(month, year, actor = actor.user_id, "payroll period reopened");

    audit::log(
        pool,
        actor.user_id,
        "REOPEN_PAYROLL",
        "PAYROLL_CLOSURE",
        None,
        Some(format!("Reopened period {month}/{year}")),
    )
    .await;

    Ok(())
}

/// Fails with `PeriodClosed` when the target date falls in a closed period.
/// Called before any write, never after a partial one.
pub async fn validate_period_open(pool: &MySqlPool, date: NaiveDate) -> Result<(), AppError> {
    let (month, year) = (date.month(), date.year());
    if repo::payroll::get_by_month(pool, month, year).await?.is_some() {
        return Err(AppError::PeriodClosed { month, year });
    }
    Ok(())
}

pub async fn period_status(
    pool: &MySqlPool,
    month: u32,
    year: i32,
) -> Result<Option<PayrollClosure>, AppError> {
    if !(1..=12).contains(&month) {
        return Err(AppError::InvalidDateRange);
    }
    Ok(repo::payroll::get_by_month(pool, month, year).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    #[test]
    fn past_month_can_be_closed() {
        assert!(validate_close_target(2, 2026, today()).is_ok());
        assert!(validate_close_target(12, 2025, today()).is_ok());
    }

    #[test]
    fn current_month_cannot_be_closed() {
        assert!(matches!(
            validate_close_target(3, 2026, today()),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn future_months_cannot_be_closed() {
        assert!(matches!(
            validate_close_target(4, 2026, today()),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_close_target(1, 2027, today()),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn month_must_be_a_calendar_month() {
        assert!(matches!(
            validate_close_target(0, 2026, today()),
            Err(AppError::InvalidDateRange)
        ));
        assert!(matches!(
            validate_close_target(13, 2026, today()),
            Err(AppError::InvalidDateRange)
        ));
    }
}
