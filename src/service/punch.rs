//! Device punch ingestion: dedup window, sensor resolution, ENTRY/EXIT
//! toggle, timezone normalization, period gate, single insert.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::model::enums::RecordType;
use crate::model::time_record::TimeRecord;
use crate::repo;
use crate::repo::time_records::NewTimeRecord;
use crate::service::dedup::DedupStore;
use crate::service::payroll;

#[derive(Debug, Clone)]
pub struct PunchRequest {
    pub request_id: Option<String>,
    pub sensor_index: i64,
    /// Unix seconds from the device RTC; absent when the terminal could not
    /// verify its clock.
    pub timestamp_device: Option<i64>,
}

#[derive(Debug)]
pub struct PunchOutcome {
    pub record: TimeRecord,
    pub user_name: String,
}

/// The toggle rule is the sole authority for type assignment on device
/// punches: first-ever punch and punch-after-EXIT are ENTRY, punch-after-ENTRY
/// is EXIT.
pub fn next_record_type(last: Option<RecordType>) -> RecordType {
    match last {
        Some(RecordType::Entry) => RecordType::Exit,
        _ => RecordType::Entry,
    }
}

/// Device epoch instant normalized into the company timezone; falls back to
/// the server clock with the not-verified flag when the device sent none.
pub fn punch_instant(
    tz: FixedOffset,
    now_local: NaiveDateTime,
    timestamp_device: Option<i64>,
) -> Result<(NaiveDateTime, bool), AppError> {
    match timestamp_device {
        Some(ts) => {
            let utc = DateTime::from_timestamp(ts, 0)
                .ok_or_else(|| AppError::Validation("invalid device timestamp".to_string()))?;
            Ok((utc.with_timezone(&tz).naive_local(), true))
        }
        None => Ok((now_local, false)),
    }
}

// Read-toggle-insert must not interleave for the same user; two punches in
// the same instant window would otherwise both classify as ENTRY.
static USER_LOCKS: Lazy<Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn user_lock(user_id: i64) -> Arc<tokio::sync::Mutex<()>> {
    USER_LOCKS
        .lock()
        .unwrap()
        .entry(user_id)
        .or_default()
        .clone()
}

#[instrument(name = "punch_ingest", skip(pool, dedup, config), fields(sensor = punch.sensor_index))]
pub async fn ingest<D: DedupStore>(
    pool: &MySqlPool,
    dedup: &D,
    config: &Config,
    punch: PunchRequest,
) -> Result<PunchOutcome, AppError> {
    if let Some(request_id) = &punch.request_id {
        if dedup.seen(request_id).await {
            info!(request_id, "duplicated punch request dropped");
            return Err(AppError::DuplicateRequest);
        }
        // Consumed before the insert is attempted: a dangling write failure
        // must not re-open the idempotency window.
        dedup.mark_seen(request_id).await;
    }

    let identity = repo::biometrics::identity_by_sensor(pool, punch.sensor_index)
        .await?
        .ok_or_else(|| {
            warn!(sensor = punch.sensor_index, "punch from unknown sensor index");
            AppError::UnknownBiometric
        })?;

    if !identity.is_active {
        return Err(AppError::InactiveUser);
    }

    let (record_datetime, is_time_verified) = punch_instant(
        config.tz(),
        config.now_local().naive_local(),
        punch.timestamp_device,
    )?;

    payroll::validate_period_open(pool, record_datetime.date()).await?;

    let lock = user_lock(identity.user_id);
    let _guard = lock.lock().await;

    let last = repo::time_records::last_for_user(pool, identity.user_id).await?;
    let record_type = next_record_type(last.map(|r| r.record_type));

    let record = repo::time_records::create(pool, NewTimeRecord {
        user_id: identity.user_id,
        record_type,
        record_datetime,
        is_manual: false,
        is_time_verified,
        biometric_id: Some(identity.biometric_id),
        edited_by: None,
        edit_justification: None,
        edit_reason: None,
    })
    .await?;

    info!(
        user = identity.user_id,
        record_type = %record.record_type,
        verified = is_time_verified,
        "punch registered"
    );

    Ok(PunchOutcome {
        record,
        user_name: identity.user_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::dedup::test_support::FakeDedupStore;

    #[test]
    fn first_punch_is_entry() {
        assert_eq!(next_record_type(None), RecordType::Entry);
    }

    #[test]
    fn punch_type_alternates() {
        assert_eq!(next_record_type(Some(RecordType::Entry)), RecordType::Exit);
        assert_eq!(next_record_type(Some(RecordType::Exit)), RecordType::Entry);
    }

    #[test]
    fn device_timestamp_is_normalized_into_company_timezone() {
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let now = chrono::NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        // 2026-03-02 12:00:00 UTC → 09:00 local at UTC-3
        let (instant, verified) = punch_instant(tz, now, Some(1_772_452_800)).unwrap();
        assert!(verified);
        assert_eq!(instant.format("%H:%M").to_string(), "09:00");
    }

    #[test]
    fn missing_device_timestamp_falls_back_unverified() {
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let now = chrono::NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        let (instant, verified) = punch_instant(tz, now, None).unwrap();
        assert!(!verified);
        assert_eq!(instant, now);
    }

    #[actix_web::test]
    async fn dedup_fake_flags_replays() {
        let store = FakeDedupStore::default();
        assert!(!store.seen("abc").await);
        store.mark_seen("abc").await;
        assert!(store.seen("abc").await);
    }
}
