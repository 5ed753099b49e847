//! ENTRY→EXIT pairing over one day's punches. Both the anomaly sweep and the
//! balance calculator run on top of this walk.

use chrono::NaiveDateTime;

use crate::model::enums::RecordType;
use crate::model::time_record::TimeRecord;

#[derive(Debug, Clone, Copy)]
pub struct PunchInterval {
    pub entry: NaiveDateTime,
    pub exit: NaiveDateTime,
}

impl PunchInterval {
    pub fn seconds(&self) -> i64 {
        (self.exit - self.entry).num_seconds()
    }
}

#[derive(Debug, Default)]
pub struct DayLedger {
    pub intervals: Vec<PunchInterval>,
    /// Set when the day ends on an ENTRY with no closing EXIT.
    pub open_entry: Option<NaiveDateTime>,
}

impl DayLedger {
    pub fn total_seconds(&self) -> i64 {
        self.intervals.iter().map(PunchInterval::seconds).sum()
    }

    /// Total with any single interval longer than `cap_seconds` dropped.
    /// Unbounded intervals are treated as corrupt rather than poisoning the sum.
    pub fn capped_seconds(&self, cap_seconds: i64) -> i64 {
        self.intervals
            .iter()
            .map(PunchInterval::seconds)
            .filter(|s| *s <= cap_seconds)
            .sum()
    }
}

/// Chronological view of a day's punches.
pub fn sorted_by_time(records: &[TimeRecord]) -> Vec<&TimeRecord> {
    let mut sorted: Vec<&TimeRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.record_datetime);
    sorted
}

/// Single pass pairing each ENTRY with the next EXIT. Repeated ENTRYs move
/// the open entry forward; EXITs without an open entry are skipped.
pub fn reconcile(records: &[TimeRecord]) -> DayLedger {
    let mut ledger = DayLedger::default();
    let mut open_entry: Option<NaiveDateTime> = None;

    for record in sorted_by_time(records) {
        match record.record_type {
            RecordType::Entry => open_entry = Some(record.record_datetime),
            RecordType::Exit => {
                if let Some(entry) = open_entry.take() {
                    ledger.intervals.push(PunchInterval {
                        entry,
                        exit: record.record_datetime,
                    });
                }
            }
        }
    }

    ledger.open_entry = open_entry;
    ledger
}

/// `HhMM` rendering used in anomaly descriptions and excusal labels.
pub fn format_duration(total_seconds: i64) -> String {
    let total_minutes = (total_seconds as f64 / 60.0).round() as i64;
    format!("{}h{:02}", total_minutes / 60, total_minutes % 60)
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use chrono::NaiveDate;

    /// Bare punch for engine tests; only type and instant matter.
    pub fn punch(date: NaiveDate, hm: (u32, u32), record_type: RecordType) -> TimeRecord {
        TimeRecord {
            id: 0,
            user_id: 1,
            record_type,
            record_datetime: date.and_hms_opt(hm.0, hm.1, 0).unwrap(),
            is_manual: false,
            is_time_verified: true,
            biometric_id: None,
            edited_by: None,
            edit_justification: None,
            edit_reason: None,
            original_timestamp: None,
        }
    }

    pub fn day() -> NaiveDate {
        // a Monday
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{day, punch};
    use super::*;
    use crate::model::enums::RecordType::{Entry, Exit};

    #[test]
    fn pairs_alternating_punches_in_order() {
        let d = day();
        let records = vec![
            punch(d, (12, 0), Exit),
            punch(d, (8, 0), Entry),
            punch(d, (13, 0), Entry),
            punch(d, (17, 0), Exit),
        ];

        let ledger = reconcile(&records);
        assert_eq!(ledger.intervals.len(), 2);
        assert_eq!(ledger.total_seconds(), 8 * 3600);
        assert!(ledger.open_entry.is_none());
    }

    #[test]
    fn dangling_entry_is_reported_open() {
        let d = day();
        let records = vec![punch(d, (8, 0), Entry)];

        let ledger = reconcile(&records);
        assert!(ledger.intervals.is_empty());
        assert!(ledger.open_entry.is_some());
    }

    #[test]
    fn capped_sum_drops_unbounded_intervals() {
        let d = day();
        let next = d.succ_opt().unwrap().succ_opt().unwrap();
        let records = vec![
            punch(d, (8, 0), Entry),
            // closes two days later, a corrupt 49h interval
            punch(next, (9, 0), Exit),
        ];

        let ledger = reconcile(&records);
        assert_eq!(ledger.intervals.len(), 1);
        assert_eq!(ledger.capped_seconds(24 * 3600), 0);
        assert!(ledger.total_seconds() > 24 * 3600);
    }

    #[test]
    fn formats_durations_as_hours_and_minutes() {
        assert_eq!(format_duration(7 * 3600 + 30 * 60), "7h30");
        assert_eq!(format_duration(2 * 3600), "2h00");
        assert_eq!(format_duration(59), "0h01");
    }
}
