//! Worked-vs-expected balance per day and per period, combining punches,
//! the weekday schedule, holidays and approved excusals.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::model::adjustment::AdjustmentRequest;
use crate::model::enums::{AdjustmentType, RecordType};
use crate::model::time_record::TimeRecord;
use crate::repo;
use crate::service::ledger;

/// A single ENTRY→EXIT interval longer than this is treated as corrupt and
/// excluded from the worked total.
pub const UNBOUNDED_INTERVAL_SECS: i64 = 24 * 3600;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DayBalance {
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    /// Punch times as "HH:MM", in chronological order.
    pub entries: Vec<String>,
    pub exits: Vec<String>,
    /// Paired worked time, excusal credit included.
    pub worked_seconds: i64,
    /// Portion of `worked_seconds` granted by a WAIVER/CERTIFICATE.
    pub credited_seconds: i64,
    pub expected_seconds: i64,
    pub balance_seconds: i64,
    pub extra_seconds: i64,
    pub missing_seconds: i64,
    pub status: String,
    pub is_absence: bool,
}

#[derive(Debug, Default, Clone, Serialize, ToSchema)]
pub struct PeriodTotals {
    pub worked_seconds: i64,
    pub expected_seconds: i64,
    pub extra_seconds: i64,
    pub missing_seconds: i64,
    pub days_worked: u32,
    pub absences: u32,
}

/// Everything the per-day computation needs besides the punches.
pub struct DayContext<'a> {
    /// Weekday (0 = Monday) → expected hours. `None` when the user has no
    /// schedule at all, which zeroes expectations and balances.
    pub schedule: Option<&'a HashMap<u8, f64>>,
    pub is_holiday: bool,
    /// Approved CERTIFICATE/WAIVER covering this date, if any.
    pub excusal: Option<&'a AdjustmentRequest>,
    pub today: NaiveDate,
}

pub fn daily_balance(date: NaiveDate, records: &[TimeRecord], ctx: &DayContext) -> DayBalance {
    let is_future = date > ctx.today;
    let weekday = date.weekday().num_days_from_monday() as u8;
    let is_weekend = weekday >= 5;

    let mut entries = Vec::new();
    let mut exits = Vec::new();
    for record in ledger::sorted_by_time(records) {
        let hm = record.record_datetime.format("%H:%M").to_string();
        match record.record_type {
            RecordType::Entry => entries.push(hm),
            RecordType::Exit => exits.push(hm),
        }
    }

    // Schedule lookups never apply to holidays or future dates.
    let expected_seconds = match ctx.schedule {
        Some(schedule) if !ctx.is_holiday && !is_future => {
            let hours = schedule.get(&weekday).copied().unwrap_or(0.0);
            (hours * 3600.0).round() as i64
        }
        _ => 0,
    };

    let paired_seconds = ledger::reconcile(records).capped_seconds(UNBOUNDED_INTERVAL_SECS);

    // The credit never reduces hours already worked; it tops up a shortfall
    // or adds an explicit grant.
    let credited_seconds = match ctx.excusal {
        Some(excusal) => match excusal.amount_hours {
            Some(hours) if hours > 0.0 => (hours * 3600.0).round() as i64,
            _ => (expected_seconds - paired_seconds).max(0),
        },
        None => 0,
    };
    let worked_seconds = paired_seconds + credited_seconds;

    let balance_seconds = if ctx.schedule.is_some() {
        worked_seconds - expected_seconds
    } else {
        0
    };
    let extra_seconds = balance_seconds.max(0);
    let missing_seconds = (-balance_seconds).max(0);

    let is_absence = balance_seconds < 0
        && !ctx.is_holiday
        && !is_weekend
        && ctx.excusal.is_none()
        && expected_seconds > 0
        && !is_future;

    let status = day_status(
        is_future,
        ctx.excusal,
        credited_seconds,
        ctx.is_holiday,
        is_weekend,
        paired_seconds,
        expected_seconds,
    );

    DayBalance {
        date,
        entries,
        exits,
        worked_seconds,
        credited_seconds,
        expected_seconds,
        balance_seconds,
        extra_seconds,
        missing_seconds,
        status,
        is_absence,
    }
}

fn day_status(
    is_future: bool,
    excusal: Option<&AdjustmentRequest>,
    credited_seconds: i64,
    is_holiday: bool,
    is_weekend: bool,
    paired_seconds: i64,
    expected_seconds: i64,
) -> String {
    if is_future {
        return String::new();
    }
    if let Some(excusal) = excusal {
        let label = match excusal.adjustment_type {
            AdjustmentType::Certificate => "Atestado",
            _ => "Abonado",
        };
        if credited_seconds > 0 {
            return format!("{} (+{})", label, ledger::format_duration(credited_seconds));
        }
        return label.to_string();
    }
    if is_holiday {
        return "Feriado".to_string();
    }
    if is_weekend {
        return "Fim de Semana".to_string();
    }
    if paired_seconds == 0 && expected_seconds > 0 {
        return "Falta".to_string();
    }
    "Normal".to_string()
}

pub fn summarize(days: &[DayBalance]) -> PeriodTotals {
    let mut totals = PeriodTotals::default();
    for day in days {
        totals.worked_seconds += day.worked_seconds;
        totals.expected_seconds += day.expected_seconds;
        totals.extra_seconds += day.extra_seconds;
        totals.missing_seconds += day.missing_seconds;
        if day.worked_seconds - day.credited_seconds > 0 {
            totals.days_worked += 1;
        }
        if day.is_absence {
            totals.absences += 1;
        }
    }
    totals
}

/// CERTIFICATE wins over WAIVER when both cover the same date, for both the
/// label and the credit source.
pub fn excusals_by_date(rows: Vec<AdjustmentRequest>) -> HashMap<NaiveDate, AdjustmentRequest> {
    let mut map: HashMap<NaiveDate, AdjustmentRequest> = HashMap::new();
    for row in rows {
        match map.get(&row.target_date) {
            Some(existing) if existing.adjustment_type == AdjustmentType::Certificate => {}
            _ => {
                map.insert(row.target_date, row);
            }
        }
    }
    map
}

/// Full per-day breakdown for one user over a date range.
pub async fn user_period_balance(
    pool: &MySqlPool,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<(Vec<DayBalance>, PeriodTotals), AppError> {
    if start > end {
        return Err(AppError::InvalidDateRange);
    }

    let schedule_rows = repo::schedules::for_user(pool, user_id).await?;
    let schedule: HashMap<u8, f64> = schedule_rows
        .iter()
        .map(|s| (s.day_of_week, s.daily_hours))
        .collect();
    let schedule = (!schedule.is_empty()).then_some(&schedule);

    let holidays: HashSet<NaiveDate> = repo::holidays::in_range(pool, start, end)
        .await?
        .into_iter()
        .map(|h| h.holiday_date)
        .collect();

    let excusals = excusals_by_date(
        repo::adjustments::approved_excusals_in_range(pool, user_id, start, end).await?,
    );

    let (start_dt, _) = repo::time_records::day_bounds(start);
    let (_, end_dt) = repo::time_records::day_bounds(end);
    let records = repo::time_records::by_range(pool, user_id, start_dt, end_dt).await?;

    let mut by_day: BTreeMap<NaiveDate, Vec<TimeRecord>> = BTreeMap::new();
    let mut cursor = start;
    while cursor <= end {
        by_day.insert(cursor, Vec::new());
        cursor = cursor
            .checked_add_days(Days::new(1))
            .ok_or(AppError::InvalidDateRange)?;
    }
    for record in records {
        if let Some(bucket) = by_day.get_mut(&record.record_datetime.date()) {
            bucket.push(record);
        }
    }

    let mut days = Vec::with_capacity(by_day.len());
    for (date, day_records) in &by_day {
        let ctx = DayContext {
            schedule,
            is_holiday: holidays.contains(date),
            excusal: excusals.get(date),
            today,
        };
        days.push(daily_balance(*date, day_records, &ctx));
    }

    let totals = summarize(&days);
    Ok((days, totals))
}

/// First/last day of a month, the default report window.
pub fn month_range(month: u32, year: i32) -> Result<(NaiveDate, NaiveDate), AppError> {
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or(AppError::InvalidDateRange)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or(AppError::InvalidDateRange)?;
    Ok((start, next.pred_opt().ok_or(AppError::InvalidDateRange)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::enums::AdjustmentStatus;
    use crate::model::enums::RecordType::{Entry, Exit};
    use crate::service::ledger::test_support::{day, punch};

    fn eight_hour_week() -> HashMap<u8, f64> {
        (0..5).map(|d| (d, 8.0)).collect()
    }

    fn excusal(kind: AdjustmentType, date: NaiveDate, amount_hours: Option<f64>) -> AdjustmentRequest {
        AdjustmentRequest {
            id: 1,
            user_id: 1,
            adjustment_type: kind,
            target_date: date,
            entry_time: None,
            exit_time: None,
            amount_hours,
            reason_text: None,
            status: AdjustmentStatus::Approved,
            manager_id: Some(2),
            manager_comment: None,
            reviewed_at: None,
        }
    }

    fn ctx<'a>(schedule: Option<&'a HashMap<u8, f64>>) -> DayContext<'a> {
        DayContext {
            schedule,
            is_holiday: false,
            excusal: None,
            // well after the test dates
            today: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        }
    }

    #[test]
    fn full_scheduled_day_balances_to_zero() {
        let d = day(); // Monday
        let schedule = eight_hour_week();
        let records = vec![punch(d, (8, 0), Entry), punch(d, (16, 0), Exit)];

        let result = daily_balance(d, &records, &ctx(Some(&schedule)));
        assert_eq!(result.worked_seconds, 28_800);
        assert_eq!(result.expected_seconds, 28_800);
        assert_eq!(result.balance_seconds, 0);
        assert_eq!(result.status, "Normal");
        assert!(!result.is_absence);
    }

    #[test]
    fn pairing_conserves_interval_sums() {
        let d = day();
        let schedule = eight_hour_week();
        let records = vec![
            punch(d, (8, 0), Entry),
            punch(d, (12, 0), Exit),
            punch(d, (13, 0), Entry),
            punch(d, (18, 0), Exit),
        ];

        let result = daily_balance(d, &records, &ctx(Some(&schedule)));
        assert_eq!(result.worked_seconds, 9 * 3600);
        assert_eq!(result.extra_seconds, 3600);
        assert_eq!(result.missing_seconds, 0);
        assert_eq!(result.entries, vec!["08:00", "13:00"]);
        assert_eq!(result.exits, vec!["12:00", "18:00"]);
    }

    #[test]
    fn waiver_tops_up_the_shortfall() {
        let d = day();
        let schedule = eight_hour_week();
        let records = vec![punch(d, (8, 0), Entry), punch(d, (14, 0), Exit)];
        let waiver = excusal(AdjustmentType::Waiver, d, None);

        let mut context = ctx(Some(&schedule));
        context.excusal = Some(&waiver);

        let result = daily_balance(d, &records, &context);
        assert_eq!(result.credited_seconds, 2 * 3600);
        assert_eq!(result.worked_seconds, 28_800);
        assert_eq!(result.missing_seconds, 0);
        assert_eq!(result.status, "Abonado (+2h00)");
        assert!(!result.is_absence);
    }

    #[test]
    fn explicit_certificate_grant_beats_shortfall() {
        let d = day();
        let schedule = eight_hour_week();
        let records = vec![punch(d, (8, 0), Entry), punch(d, (14, 0), Exit)];
        let cert = excusal(AdjustmentType::Certificate, d, Some(4.0));

        let mut context = ctx(Some(&schedule));
        context.excusal = Some(&cert);

        let result = daily_balance(d, &records, &context);
        assert_eq!(result.credited_seconds, 4 * 3600);
        assert_eq!(result.worked_seconds, 10 * 3600);
        assert_eq!(result.extra_seconds, 2 * 3600);
        assert_eq!(result.status, "Atestado (+4h00)");
    }

    #[test]
    fn credit_never_reduces_hours_already_worked() {
        let d = day();
        let schedule = eight_hour_week();
        // worked a full day, waiver without explicit amount
        let records = vec![punch(d, (8, 0), Entry), punch(d, (17, 0), Exit)];
        let waiver = excusal(AdjustmentType::Waiver, d, None);

        let mut context = ctx(Some(&schedule));
        context.excusal = Some(&waiver);

        let result = daily_balance(d, &records, &context);
        assert_eq!(result.credited_seconds, 0);
        assert_eq!(result.worked_seconds, 9 * 3600);
    }

    #[test]
    fn holiday_zeroes_expectations() {
        let d = day();
        let schedule = eight_hour_week();
        let mut context = ctx(Some(&schedule));
        context.is_holiday = true;

        let result = daily_balance(d, &[], &context);
        assert_eq!(result.expected_seconds, 0);
        assert_eq!(result.status, "Feriado");
        assert!(!result.is_absence);
    }

    #[test]
    fn future_day_is_blank_and_expects_nothing() {
        let d = day();
        let schedule = eight_hour_week();
        let mut context = ctx(Some(&schedule));
        context.today = d.pred_opt().unwrap();

        let result = daily_balance(d, &[], &context);
        assert_eq!(result.expected_seconds, 0);
        assert_eq!(result.status, "");
        assert!(!result.is_absence);
    }

    #[test]
    fn unscheduled_user_has_zero_balance() {
        let d = day();
        let records = vec![punch(d, (8, 0), Entry), punch(d, (12, 0), Exit)];

        let result = daily_balance(d, &records, &ctx(None));
        assert_eq!(result.worked_seconds, 4 * 3600);
        assert_eq!(result.expected_seconds, 0);
        assert_eq!(result.balance_seconds, 0);
        assert_eq!(result.extra_seconds, 0);
    }

    #[test]
    fn empty_scheduled_day_is_an_absence() {
        let d = day();
        let schedule = eight_hour_week();

        let result = daily_balance(d, &[], &ctx(Some(&schedule)));
        assert_eq!(result.status, "Falta");
        assert!(result.is_absence);
        assert_eq!(result.missing_seconds, 28_800);
    }

    #[test]
    fn weekend_is_not_an_absence() {
        let saturday = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        let schedule = eight_hour_week();

        let result = daily_balance(saturday, &[], &ctx(Some(&schedule)));
        assert_eq!(result.status, "Fim de Semana");
        assert!(!result.is_absence);
        assert_eq!(result.expected_seconds, 0);
    }

    #[test]
    fn corrupt_interval_is_excluded_from_worked_time() {
        let d = day();
        let schedule = eight_hour_week();
        let two_days_on = d.checked_add_days(Days::new(2)).unwrap();
        let records = vec![
            punch(d, (8, 0), Entry),
            punch(two_days_on, (9, 0), Exit),
        ];

        let result = daily_balance(d, &records, &ctx(Some(&schedule)));
        assert_eq!(result.worked_seconds, 0);
        assert_eq!(result.status, "Falta");
    }

    #[test]
    fn certificate_takes_precedence_over_waiver_same_day() {
        let d = day();
        let rows = vec![
            excusal(AdjustmentType::Waiver, d, Some(2.0)),
            excusal(AdjustmentType::Certificate, d, Some(8.0)),
            excusal(AdjustmentType::Waiver, d, Some(3.0)),
        ];

        let map = excusals_by_date(rows);
        assert_eq!(map.len(), 1);
        assert_eq!(map[&d].adjustment_type, AdjustmentType::Certificate);
        assert_eq!(map[&d].amount_hours, Some(8.0));
    }

    #[test]
    fn period_summary_counts_worked_days_and_absences() {
        let d = day();
        let schedule = eight_hour_week();
        let tuesday = d.succ_opt().unwrap();

        let worked = daily_balance(
            d,
            &[punch(d, (8, 0), Entry), punch(d, (16, 0), Exit)],
            &ctx(Some(&schedule)),
        );
        let absent = daily_balance(tuesday, &[], &ctx(Some(&schedule)));

        let totals = summarize(&[worked, absent]);
        assert_eq!(totals.days_worked, 1);
        assert_eq!(totals.absences, 1);
        assert_eq!(totals.worked_seconds, 28_800);
        assert_eq!(totals.expected_seconds, 2 * 28_800);
        assert_eq!(totals.missing_seconds, 28_800);
    }

    #[test]
    fn month_range_covers_whole_month() {
        let (start, end) = month_range(2, 2024).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }
}
