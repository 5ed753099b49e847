//! Punch-sequence anomaly sweep. Findings are descriptive only; nothing here
//! mutates records.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use sqlx::MySqlPool;
use strum_macros::Display;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::model::enums::RecordType;
use crate::model::time_record::TimeRecord;
use crate::repo;
use crate::service::ledger;

/// A paired interval longer than this flags LONG_INTERVAL.
const LONG_INTERVAL_SECS: i64 = 7 * 3600;
/// A day's total above this flags EXCESSIVE_HOURS.
const EXCESSIVE_DAY_SECS: i64 = 8 * 3600 + 1800;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Display, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyKind {
    MissingEntry,
    DoubleEntry,
    DoubleExit,
    MissingExit,
    LongInterval,
    ExcessiveHours,
}

impl AnomalyKind {
    /// Kinds shown in the employee self-view. Duration-based findings are
    /// manager-only.
    pub fn employee_visible(self) -> bool {
        matches!(
            self,
            AnomalyKind::MissingEntry
                | AnomalyKind::DoubleEntry
                | AnomalyKind::DoubleExit
                | AnomalyKind::MissingExit
        )
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Anomaly {
    pub user_id: i64,
    pub user_name: String,
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    pub description: String,
}

/// One sorted pass over a user's punches for a single day.
pub fn find_day_anomalies(
    user_id: i64,
    user_name: &str,
    date: NaiveDate,
    records: &[TimeRecord],
) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();
    let push = |anomalies: &mut Vec<Anomaly>, kind: AnomalyKind, description: String| {
        anomalies.push(Anomaly {
            user_id,
            user_name: user_name.to_string(),
            date,
            kind,
            description,
        });
    };

    let sorted = ledger::sorted_by_time(records);

    if let Some(first) = sorted.first() {
        if first.record_type == RecordType::Exit {
            push(
                &mut anomalies,
                AnomalyKind::MissingEntry,
                "Saída sem entrada".to_string(),
            );
        }
    }

    for pair in sorted.windows(2) {
        match (pair[0].record_type, pair[1].record_type) {
            (RecordType::Entry, RecordType::Entry) => push(
                &mut anomalies,
                AnomalyKind::DoubleEntry,
                "Duas entradas consecutivas sem saída entre elas".to_string(),
            ),
            (RecordType::Exit, RecordType::Exit) => push(
                &mut anomalies,
                AnomalyKind::DoubleExit,
                "Duas saídas consecutivas sem entrada entre elas".to_string(),
            ),
            _ => {}
        }
    }

    let day = ledger::reconcile(records);

    for interval in &day.intervals {
        let seconds = interval.seconds();
        if seconds > LONG_INTERVAL_SECS {
            push(
                &mut anomalies,
                AnomalyKind::LongInterval,
                format!("Intervalo de {}", ledger::format_duration(seconds)),
            );
        }
    }

    if let Some(last) = sorted.last() {
        if last.record_type == RecordType::Entry {
            push(
                &mut anomalies,
                AnomalyKind::MissingExit,
                "Entrada sem saída".to_string(),
            );
        }
    }

    let total = day.total_seconds();
    if total > EXCESSIVE_DAY_SECS {
        push(
            &mut anomalies,
            AnomalyKind::ExcessiveHours,
            format!("Trabalhou {}", ledger::format_duration(total)),
        );
    }

    anomalies
}

/// Default query window for a month: capped at yesterday so the current,
/// possibly half-punched day never shows up. The returned range may be
/// inverted (current month, first day); callers answer with an empty set.
pub fn month_query_range(
    month: u32,
    year: i32,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), AppError> {
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or(AppError::InvalidDateRange)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or(AppError::InvalidDateRange)?;

    let mut end = next_month.pred_opt().ok_or(AppError::InvalidDateRange)?;
    if end >= today {
        end = today.checked_sub_days(Days::new(1)).ok_or(AppError::InvalidDateRange)?;
    }

    Ok((start, end))
}

/// Sweep active employees (or one of them) over a date range.
pub async fn get_anomalies(
    pool: &MySqlPool,
    start: NaiveDate,
    end: NaiveDate,
    user_filter: Option<i64>,
) -> Result<Vec<Anomaly>, AppError> {
    if start > end {
        return Ok(Vec::new());
    }

    let mut users = repo::users::list_active_employees(pool).await?;
    if let Some(user_id) = user_filter {
        users.retain(|u| u.id == user_id);
    }
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let user_ids: Vec<i64> = users.iter().map(|u| u.id).collect();
    let (start_dt, _) = repo::time_records::day_bounds(start);
    let (_, end_dt) = repo::time_records::day_bounds(end);
    let records = repo::time_records::by_users_and_range(pool, &user_ids, start_dt, end_dt).await?;

    let mut buckets: BTreeMap<(i64, NaiveDate), Vec<TimeRecord>> = BTreeMap::new();
    for record in records {
        buckets
            .entry((record.user_id, record.record_datetime.date()))
            .or_default()
            .push(record);
    }

    let mut all = Vec::new();
    for ((user_id, date), day_records) in &buckets {
        let user_name = users
            .iter()
            .find(|u| u.id == *user_id)
            .map(|u| u.name.as_str())
            .unwrap_or("Unknown");
        all.extend(find_day_anomalies(*user_id, user_name, *date, day_records));
    }

    all.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::enums::RecordType::{Entry, Exit};
    use crate::service::ledger::test_support::{day, punch};

    fn kinds(anomalies: &[Anomaly]) -> Vec<AnomalyKind> {
        anomalies.iter().map(|a| a.kind).collect()
    }

    #[test]
    fn well_formed_day_has_no_anomalies() {
        let d = day();
        let records = vec![
            punch(d, (8, 0), Entry),
            punch(d, (12, 0), Exit),
            punch(d, (13, 0), Entry),
            punch(d, (17, 0), Exit),
        ];

        assert!(find_day_anomalies(1, "Ana", d, &records).is_empty());
    }

    #[test]
    fn double_exit_is_flagged_exactly_once() {
        let d = day();
        let records = vec![
            punch(d, (8, 0), Entry),
            punch(d, (12, 0), Exit),
            punch(d, (12, 0), Exit),
        ];

        let found = find_day_anomalies(1, "Ana", d, &records);
        assert_eq!(kinds(&found), vec![AnomalyKind::DoubleExit]);
    }

    #[test]
    fn lone_exit_means_missing_entry() {
        let d = day();
        let records = vec![punch(d, (9, 0), Exit)];

        let found = find_day_anomalies(1, "Ana", d, &records);
        assert_eq!(kinds(&found), vec![AnomalyKind::MissingEntry]);
    }

    #[test]
    fn lone_entry_means_missing_exit() {
        let d = day();
        let records = vec![punch(d, (9, 0), Entry)];

        let found = find_day_anomalies(1, "Ana", d, &records);
        assert_eq!(kinds(&found), vec![AnomalyKind::MissingExit]);
    }

    #[test]
    fn long_interval_carries_formatted_duration() {
        let d = day();
        let records = vec![punch(d, (8, 0), Entry), punch(d, (15, 30), Exit)];

        let found = find_day_anomalies(1, "Ana", d, &records);
        assert_eq!(kinds(&found), vec![AnomalyKind::LongInterval]);
        assert_eq!(found[0].description, "Intervalo de 7h30");
    }

    #[test]
    fn single_long_shift_flags_interval_and_total() {
        let d = day();
        let records = vec![punch(d, (8, 0), Entry), punch(d, (16, 45), Exit)];

        let found = find_day_anomalies(1, "Ana", d, &records);
        assert_eq!(
            kinds(&found),
            vec![AnomalyKind::LongInterval, AnomalyKind::ExcessiveHours]
        );
        assert_eq!(found[1].description, "Trabalhou 8h45");
    }

    #[test]
    fn excessive_hours_needs_more_than_eight_and_a_half() {
        let d = day();
        // 8h30 split in two intervals, right at the threshold
        let records = vec![
            punch(d, (8, 0), Entry),
            punch(d, (12, 0), Exit),
            punch(d, (13, 0), Entry),
            punch(d, (17, 30), Exit),
        ];

        assert!(find_day_anomalies(1, "Ana", d, &records).is_empty());
    }

    #[test]
    fn month_range_is_capped_at_yesterday() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let (start, end) = month_query_range(3, 2026, today).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 3, 9).unwrap());
    }

    #[test]
    fn past_month_keeps_its_own_end() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let (start, end) = month_query_range(1, 2026, today).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 1, 31).unwrap());
    }

    #[test]
    fn first_of_month_yields_inverted_range() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let (start, end) = month_query_range(3, 2026, today).unwrap();
        assert!(start > end);
    }

    #[test]
    fn invalid_month_is_rejected() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert!(matches!(
            month_query_range(13, 2026, today),
            Err(AppError::InvalidDateRange)
        ));
    }
}
