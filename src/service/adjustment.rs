//! Adjustment request lifecycle: PENDING → APPROVED | REJECTED (terminal).
//! Approving a missing-punch request synthesizes the punches it describes.

use chrono::NaiveDateTime;
use sqlx::MySqlPool;
use tracing::info;

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::adjustment::{AdjustmentRequest, AdjustmentRequestCreate};
use crate::model::enums::{AdjustmentStatus, AdjustmentType};
use crate::repo;
use crate::repo::time_records::NewTimeRecord;
use crate::service::{audit, payroll};

/// Rejected before any persistence.
pub fn validate_new_request(req: &AdjustmentRequestCreate) -> Result<(), AppError> {
    let needs_entry = matches!(
        req.adjustment_type,
        AdjustmentType::MissingEntry | AdjustmentType::Both
    );
    let needs_exit = matches!(
        req.adjustment_type,
        AdjustmentType::MissingExit | AdjustmentType::Both
    );

    if needs_entry && req.entry_time.is_none() {
        return Err(AppError::Validation("entry_time is required".to_string()));
    }
    if needs_exit && req.exit_time.is_none() {
        return Err(AppError::Validation("exit_time is required".to_string()));
    }

    if let Some(hours) = req.amount_hours {
        if !(0.0..=24.0).contains(&hours) {
            return Err(AppError::Validation(
                "amount_hours must be between 0 and 24".to_string(),
            ));
        }
    }

    Ok(())
}

pub async fn create_request(
    pool: &MySqlPool,
    actor: &AuthUser,
    target_user_id: i64,
    req: AdjustmentRequestCreate,
) -> Result<AdjustmentRequest, AppError> {
    if target_user_id != actor.user_id {
        actor.require_manager()?;
    }
    validate_new_request(&req)?;
    payroll::validate_period_open(pool, req.target_date).await?;

    Ok(repo::adjustments::create(pool, target_user_id, &req).await?)
}

pub async fn review_request(
    pool: &MySqlPool,
    request_id: i64,
    manager: &AuthUser,
    new_status: AdjustmentStatus,
    comment: Option<String>,
    reviewed_at: NaiveDateTime,
) -> Result<AdjustmentRequest, AppError> {
    manager.require_manager()?;

    let request = repo::adjustments::get(pool, request_id)
        .await?
        .ok_or(AppError::AdjustmentNotFound)?;

    if request.status != AdjustmentStatus::Pending {
        return Err(AppError::Validation(
            "Request is already reviewed".to_string(),
        ));
    }

    payroll::validate_period_open(pool, request.target_date).await?;

    repo::adjustments::update_review(
        pool,
        request.id,
        new_status,
        manager.user_id,
        comment.as_deref(),
        reviewed_at,
    )
    .await?;

    if new_status == AdjustmentStatus::Approved && request.adjustment_type.creates_records() {
        synthesize_records(pool, &request, manager.user_id).await?;
    }

    audit::log(
        pool,
        manager.user_id,
        "REVIEW_ADJUSTMENT",
        "ADJUSTMENT_REQUEST",
        Some(request.id),
        Some(format!(
            "Status set to {}. Comment: {}",
            new_status,
            comment.as_deref().unwrap_or("-")
        )),
    )
    .await;

    info!(
        request = request.id,
        status = %new_status,
        manager = manager.user_id,
        "adjustment reviewed"
    );

    repo::adjustments::get(pool, request.id)
        .await?
        .ok_or(AppError::AdjustmentNotFound)
}

/// Approved MISSING_ENTRY/MISSING_EXIT/BOTH become manual punches on the
/// target date, attributed to the approving manager.
async fn synthesize_records(
    pool: &MySqlPool,
    request: &AdjustmentRequest,
    manager_id: i64,
) -> Result<(), AppError> {
    let mut punches = Vec::new();

    if matches!(
        request.adjustment_type,
        AdjustmentType::MissingEntry | AdjustmentType::Both
    ) {
        let entry_time = request.entry_time.ok_or_else(|| {
            AppError::Validation("entry_time is required".to_string())
        })?;
        punches.push((
            crate::model::enums::RecordType::Entry,
            request.target_date.and_time(entry_time),
        ));
    }

    if matches!(
        request.adjustment_type,
        AdjustmentType::MissingExit | AdjustmentType::Both
    ) {
        let exit_time = request.exit_time.ok_or_else(|| {
            AppError::Validation("exit_time is required".to_string())
        })?;
        punches.push((
            crate::model::enums::RecordType::Exit,
            request.target_date.and_time(exit_time),
        ));
    }

    for (record_type, record_datetime) in punches {
        repo::time_records::create(pool, NewTimeRecord {
            user_id: request.user_id,
            record_type,
            record_datetime,
            is_manual: true,
            is_time_verified: true,
            biometric_id: None,
            edited_by: Some(manager_id),
            edit_justification: Some("ADJUSTMENT_APPROVAL".to_string()),
            edit_reason: request.reason_text.clone(),
        })
        .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn request(adjustment_type: AdjustmentType) -> AdjustmentRequestCreate {
        AdjustmentRequestCreate {
            adjustment_type,
            target_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            entry_time: None,
            exit_time: None,
            amount_hours: None,
            reason_text: None,
        }
    }

    #[test]
    fn missing_entry_requires_an_entry_time() {
        let mut req = request(AdjustmentType::MissingEntry);
        assert!(validate_new_request(&req).is_err());

        req.entry_time = NaiveTime::from_hms_opt(8, 0, 0);
        assert!(validate_new_request(&req).is_ok());
    }

    #[test]
    fn both_requires_both_times() {
        let mut req = request(AdjustmentType::Both);
        req.entry_time = NaiveTime::from_hms_opt(8, 0, 0);
        assert!(validate_new_request(&req).is_err());

        req.exit_time = NaiveTime::from_hms_opt(17, 0, 0);
        assert!(validate_new_request(&req).is_ok());
    }

    #[test]
    fn waiver_needs_no_times() {
        let req = request(AdjustmentType::Waiver);
        assert!(validate_new_request(&req).is_ok());
    }

    #[test]
    fn amount_hours_outside_a_day_is_rejected() {
        let mut req = request(AdjustmentType::Certificate);
        req.amount_hours = Some(25.0);
        assert!(validate_new_request(&req).is_err());

        req.amount_hours = Some(8.0);
        assert!(validate_new_request(&req).is_ok());
    }
}
