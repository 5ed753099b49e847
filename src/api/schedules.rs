use actix_web::{HttpResponse, Responder, web};
use sqlx::MySqlPool;

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::work_schedule::WorkScheduleEntry;
use crate::repo;

fn validate_entries(entries: &[WorkScheduleEntry]) -> Result<(), AppError> {
    let mut seen_days = [false; 7];
    for entry in entries {
        if entry.day_of_week > 6 {
            return Err(AppError::Validation(
                "day_of_week must be between 0 and 6".to_string(),
            ));
        }
        if !(0.0..=24.0).contains(&entry.daily_hours) {
            return Err(AppError::InvalidSchedule);
        }
        if seen_days[entry.day_of_week as usize] {
            return Err(AppError::Validation(
                "duplicated day_of_week in schedule".to_string(),
            ));
        }
        seen_days[entry.day_of_week as usize] = true;
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/v1/schedules/user/{user_id}",
    params(("user_id", description = "User ID")),
    responses((status = 200), (status = 403), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Schedules"
)]
pub async fn read_user_schedules(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let user_id = path.into_inner();
    auth.require_self_or_manager(user_id)?;

    if repo::users::get(pool.get_ref(), user_id).await?.is_none() {
        return Err(AppError::Validation("Usuário não encontrado".to_string()));
    }

    let schedules = repo::schedules::for_user(pool.get_ref(), user_id).await?;
    Ok(HttpResponse::Ok().json(schedules))
}

/// Wholesale replacement: the previous set is discarded entirely.
#[utoipa::path(
    put,
    path = "/api/v1/schedules/user/{user_id}",
    request_body = Vec<WorkScheduleEntry>,
    params(("user_id", description = "User ID")),
    responses((status = 200), (status = 400, description = "Invalid schedule")),
    security(("bearer_auth" = [])),
    tag = "Schedules"
)]
pub async fn replace_user_schedules(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    payload: web::Json<Vec<WorkScheduleEntry>>,
) -> Result<impl Responder, AppError> {
    auth.require_manager()?;

    let user_id = path.into_inner();
    if repo::users::get(pool.get_ref(), user_id).await?.is_none() {
        return Err(AppError::Validation("Usuário não encontrado".to_string()));
    }

    validate_entries(&payload)?;
    repo::schedules::replace_for_user(pool.get_ref(), user_id, &payload).await?;

    let schedules = repo::schedules::for_user(pool.get_ref(), user_id).await?;
    Ok(HttpResponse::Ok().json(schedules))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day_of_week: u8, daily_hours: f64) -> WorkScheduleEntry {
        WorkScheduleEntry {
            day_of_week,
            daily_hours,
        }
    }

    #[test]
    fn weekday_schedule_is_accepted() {
        let entries: Vec<_> = (0..5).map(|d| entry(d, 8.0)).collect();
        assert!(validate_entries(&entries).is_ok());
    }

    #[test]
    fn hours_outside_a_day_are_rejected() {
        assert!(matches!(
            validate_entries(&[entry(0, 25.0)]),
            Err(AppError::InvalidSchedule)
        ));
        assert!(matches!(
            validate_entries(&[entry(0, -1.0)]),
            Err(AppError::InvalidSchedule)
        ));
    }

    #[test]
    fn out_of_range_weekday_is_rejected() {
        assert!(validate_entries(&[entry(7, 8.0)]).is_err());
    }

    #[test]
    fn duplicated_weekday_is_rejected() {
        assert!(validate_entries(&[entry(1, 8.0), entry(1, 6.0)]).is_err());
    }
}
