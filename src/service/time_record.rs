//! Web punches and administrative record edits. Every mutation follows the
//! same discipline: period gate first, then the write, then the audit row.

use chrono::NaiveDateTime;
use sqlx::MySqlPool;
use tracing::info;

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::AppError;
use crate::model::enums::RecordType;
use crate::model::time_record::TimeRecord;
use crate::repo;
use crate::repo::audit::NewAuditLog;
use crate::repo::time_records::NewTimeRecord;
use crate::service::{audit, payroll};

async fn manual_punch(
    pool: &MySqlPool,
    config: &Config,
    actor: &AuthUser,
    record_type: RecordType,
) -> Result<TimeRecord, AppError> {
    let now = config.now_local().naive_local();

    if !repo::manual_auth::has_active(pool, actor.user_id, now).await? {
        return Err(AppError::forbidden(
            "No active authorization for manual punches",
        ));
    }

    payroll::validate_period_open(pool, now.date()).await?;

    let last = repo::time_records::last_for_user(pool, actor.user_id)
        .await?
        .map(|r| r.record_type);

    match record_type {
        RecordType::Entry if last == Some(RecordType::Entry) => {
            return Err(AppError::Validation(
                "Last record was an entry. You must exit first.".to_string(),
            ));
        }
        RecordType::Exit if last != Some(RecordType::Entry) => {
            return Err(AppError::Validation(
                "Last record was an exit (or no record). You must enter first.".to_string(),
            ));
        }
        _ => {}
    }

    let record = repo::time_records::create(pool, NewTimeRecord {
        user_id: actor.user_id,
        record_type,
        record_datetime: now,
        is_manual: true,
        is_time_verified: true,
        biometric_id: None,
        edited_by: None,
        edit_justification: None,
        edit_reason: None,
    })
    .await?;

    info!(user = actor.user_id, record_type = %record_type, "manual punch registered");
    Ok(record)
}

pub async fn register_entry(
    pool: &MySqlPool,
    config: &Config,
    actor: &AuthUser,
) -> Result<TimeRecord, AppError> {
    manual_punch(pool, config, actor, RecordType::Entry).await
}

pub async fn register_exit(
    pool: &MySqlPool,
    config: &Config,
    actor: &AuthUser,
) -> Result<TimeRecord, AppError> {
    manual_punch(pool, config, actor, RecordType::Exit).await
}

/// Flip ENTRY↔EXIT. Owner or manager, gated by the record's period, always
/// leaving a manual_adjustments row behind.
pub async fn toggle_type(
    pool: &MySqlPool,
    record_id: i64,
    actor: &AuthUser,
) -> Result<TimeRecord, AppError> {
    let record = repo::time_records::get(pool, record_id)
        .await?
        .ok_or(AppError::RecordNotFound)?;

    actor.require_self_or_manager(record.user_id)?;
    payroll::validate_period_open(pool, record.record_datetime.date()).await?;

    let new_type = record.record_type.toggled();
    repo::time_records::set_type(pool, record.id, new_type).await?;
    repo::audit::create_manual_adjustment(
        pool,
        record.id,
        record.record_type,
        new_type,
        actor.user_id,
    )
    .await?;

    info!(
        record = record.id,
        from = %record.record_type,
        to = %new_type,
        actor = actor.user_id,
        "record type toggled"
    );

    repo::time_records::get(pool, record.id)
        .await?
        .ok_or(AppError::RecordNotFound)
}

pub async fn create_admin_record(
    pool: &MySqlPool,
    actor: &AuthUser,
    user_id: i64,
    record_type: RecordType,
    record_datetime: NaiveDateTime,
    justification: &str,
    reason: &str,
) -> Result<TimeRecord, AppError> {
    actor.require_manager()?;
    payroll::validate_period_open(pool, record_datetime.date()).await?;

    let record = repo::time_records::create(pool, NewTimeRecord {
        user_id,
        record_type,
        record_datetime,
        is_manual: true,
        is_time_verified: true,
        biometric_id: None,
        edited_by: Some(actor.user_id),
        edit_justification: Some(justification.to_string()),
        edit_reason: Some(reason.to_string()),
    })
    .await?;

    audit::log_full(pool, NewAuditLog {
        user_id: actor.user_id,
        action: "CREATE",
        entity: "TIME_RECORD",
        entity_id: Some(record.id),
        details: Some(format!("{} at {}", record_type, record_datetime)),
        target_user_id: Some(user_id),
        justification: Some(justification),
        reason: Some(reason),
    })
    .await;

    Ok(record)
}

/// Both endpoints of the move are gated: the record cannot leave a closed
/// period nor land inside one.
pub async fn update_admin_record(
    pool: &MySqlPool,
    actor: &AuthUser,
    record_id: i64,
    record_type: Option<RecordType>,
    record_datetime: Option<NaiveDateTime>,
    justification: &str,
    reason: &str,
) -> Result<TimeRecord, AppError> {
    actor.require_manager()?;

    let record = repo::time_records::get(pool, record_id)
        .await?
        .ok_or(AppError::RecordNotFound)?;

    let new_type = record_type.unwrap_or(record.record_type);
    let new_datetime = record_datetime.unwrap_or(record.record_datetime);

    payroll::validate_period_open(pool, record.record_datetime.date()).await?;
    payroll::validate_period_open(pool, new_datetime.date()).await?;

    repo::time_records::update_admin(
        pool,
        &record,
        new_type,
        new_datetime,
        actor.user_id,
        justification,
        reason,
    )
    .await?;

    audit::log_full(pool, NewAuditLog {
        user_id: actor.user_id,
        action: "UPDATE",
        entity: "TIME_RECORD",
        entity_id: Some(record.id),
        details: Some(format!(
            "{} at {} -> {} at {}",
            record.record_type, record.record_datetime, new_type, new_datetime
        )),
        target_user_id: Some(record.user_id),
        justification: Some(justification),
        reason: Some(reason),
    })
    .await;

    repo::time_records::get(pool, record.id)
        .await?
        .ok_or(AppError::RecordNotFound)
}

pub async fn delete_admin_record(
    pool: &MySqlPool,
    actor: &AuthUser,
    record_id: i64,
    justification: &str,
    reason: &str,
) -> Result<(), AppError> {
    actor.require_manager()?;

    let record = repo::time_records::get(pool, record_id)
        .await?
        .ok_or(AppError::RecordNotFound)?;

    payroll::validate_period_open(pool, record.record_datetime.date()).await?;
    repo::time_records::delete(pool, record.id).await?;

    audit::log_full(pool, NewAuditLog {
        user_id: actor.user_id,
        action: "DELETE",
        entity: "TIME_RECORD",
        entity_id: Some(record.id),
        details: Some(format!(
            "{} at {}",
            record.record_type, record.record_datetime
        )),
        target_user_id: Some(record.user_id),
        justification: Some(justification),
        reason: Some(reason),
    })
    .await;

    Ok(())
}
