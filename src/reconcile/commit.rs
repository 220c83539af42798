//! Write-back of reviewed days.
//!
//! Each entry is applied on its own: a failing entry is reported and the
//! rest of the batch still runs. Updates replace the day's periods
//! wholesale, so replaying a batch gives the same end state.

use chrono::{DateTime, NaiveDate, Utc};
use futures_util::{StreamExt, stream};

use crate::error::{ReconcileError, Result};
use crate::model::attendance::{AttendanceRecord, MANUAL_CHECKOUT, Period};
use crate::model::batch::{CommitEntry, CommitResponse, DeleteResponse, EntryError};
use crate::reconcile::time::{day_key, local_to_instant, parse_wire_date};
use crate::store::AttendanceStore;

fn parse_date(raw: &str, what: &str) -> Result<NaiveDate> {
    parse_wire_date(raw).ok_or_else(|| ReconcileError::Validation(format!("Invalid {what}: {raw}")))
}

fn resolve_instant(
    date: Option<&str>,
    time: Option<&str>,
    row_date: NaiveDate,
    what: &str,
) -> Result<Option<DateTime<Utc>>> {
    let date = match date.filter(|d| !d.trim().is_empty()) {
        Some(raw) => parse_date(raw, &format!("{what} date"))?,
        None => row_date,
    };

    match time.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => local_to_instant(date, t)
            .map(Some)
            .ok_or_else(|| ReconcileError::Validation(format!("Invalid {what} time: {t}"))),
        None => Ok(None),
    }
}

/// A validated update, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct DayUpdate {
    pub row_date: NaiveDate,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
}

impl DayUpdate {
    pub fn parse(entry: &CommitEntry) -> Result<Self> {
        let row_date = parse_date(&entry.date, "date")?;
        let check_in = resolve_instant(
            entry.check_in_date.as_deref(),
            entry.check_in_time.as_deref(),
            row_date,
            "check-in",
        )?;
        let check_out = resolve_instant(
            entry.check_out_date.as_deref(),
            entry.check_out_time.as_deref(),
            row_date,
            "check-out",
        )?;

        Ok(Self {
            row_date,
            check_in,
            check_out,
        })
    }

    /// Zero unless both ends are known; never negative.
    pub fn total_seconds(&self) -> i64 {
        match (self.check_in, self.check_out) {
            (Some(i), Some(o)) => (o - i).num_seconds().max(0),
            _ => 0,
        }
    }
}

/// The record an update leaves behind: one period, keyed by the row date
/// regardless of which day the instants fall on. Location metadata and the
/// checkout tag survive from the record being replaced.
pub fn updated_record(
    employee_id: u64,
    update: &DayUpdate,
    existing: Option<&AttendanceRecord>,
) -> AttendanceRecord {
    let period = match existing {
        Some(prev) => Period {
            start: update.check_in,
            end: update.check_out,
            check_in_location: prev.periods.first().and_then(|p| p.check_in_location.clone()),
            check_out_location: prev.periods.last().and_then(|p| p.check_out_location.clone()),
            checkout_type: prev.periods.last().and_then(|p| p.checkout_type.clone()),
        },
        None => Period {
            start: update.check_in,
            end: update.check_out,
            check_in_location: None,
            check_out_location: None,
            checkout_type: Some(MANUAL_CHECKOUT.to_string()),
        },
    };

    AttendanceRecord {
        employee_id,
        day: day_key(update.row_date),
        periods: vec![period],
        total_seconds: update.total_seconds(),
        legacy_intervals: None,
    }
}

pub async fn apply_update(
    store: &dyn AttendanceStore,
    employee_id: u64,
    entry: &CommitEntry,
) -> Result<()> {
    let update = DayUpdate::parse(entry)?;
    let existing = store.find_one(employee_id, day_key(update.row_date)).await?;
    let record = updated_record(employee_id, &update, existing.as_ref());
    store.upsert(&record).await
}

pub async fn apply_delete(store: &dyn AttendanceStore, employee_id: u64, date: &str) -> Result<u64> {
    let row_date = parse_date(date, "date")?;
    store.delete(employee_id, day_key(row_date)).await
}

/// Runs `op` over every item with bounded concurrency, returning results in
/// input order.
async fn run_each<'a, T, R, F, Fut>(items: &'a [T], concurrency: usize, op: F) -> Vec<Result<R>>
where
    F: Fn(&'a T) -> Fut,
    Fut: std::future::Future<Output = Result<R>> + 'a,
{
    let mut results: Vec<(usize, Result<R>)> = stream::iter(items.iter().enumerate())
        .map(|(idx, item)| {
            let fut = op(item);
            async move { (idx, fut.await) }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    results.sort_by_key(|(idx, _)| *idx);
    results.into_iter().map(|(_, r)| r).collect()
}

fn entry_error(date: &str, err: &ReconcileError) -> EntryError {
    EntryError {
        date: date.to_string(),
        message: match err {
            ReconcileError::Database(_) => "Failed to write attendance record".to_string(),
            other => other.to_string(),
        },
    }
}

pub async fn commit_batch(
    store: &dyn AttendanceStore,
    employee_id: u64,
    entries: &[CommitEntry],
    concurrency: usize,
) -> CommitResponse {
    let results = run_each(entries, concurrency, |entry| {
        apply_update(store, employee_id, entry)
    })
    .await;

    let mut updated_count = 0;
    let mut errors = Vec::new();
    for (entry, result) in entries.iter().zip(results) {
        match result {
            Ok(()) => updated_count += 1,
            Err(e) => {
                tracing::warn!(employee_id, date = %entry.date, error = %e, "Commit entry failed");
                errors.push(entry_error(&entry.date, &e));
            }
        }
    }

    tracing::info!(employee_id, updated_count, failed = errors.len(), "Commit batch applied");

    CommitResponse {
        success: errors.is_empty(),
        updated_count,
        errors,
    }
}

pub async fn delete_batch(
    store: &dyn AttendanceStore,
    employee_id: u64,
    dates: &[String],
    concurrency: usize,
) -> DeleteResponse {
    let results = run_each(dates, concurrency, |date| {
        apply_delete(store, employee_id, date)
    })
    .await;

    let mut deleted_count = 0;
    let mut errors = Vec::new();
    for (date, result) in dates.iter().zip(results) {
        match result {
            Ok(n) => deleted_count += n,
            Err(e) => {
                tracing::warn!(employee_id, date = %date, error = %e, "Delete entry failed");
                errors.push(entry_error(date, &e));
            }
        }
    }

    tracing::info!(employee_id, deleted_count, failed = errors.len(), "Delete batch applied");

    DeleteResponse {
        success: errors.is_empty(),
        deleted_count,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryAttendance;
    use serde_json::json;

    const EMPLOYEE: u64 = 7;

    fn date(d: u32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn entry(day: &str, check_in: &str, check_out: &str) -> CommitEntry {
        CommitEntry {
            date: day.into(),
            check_in_time: Some(check_in.into()),
            check_out_time: Some(check_out.into()),
            ..Default::default()
        }
    }

    #[actix_web::test]
    async fn replaying_an_update_is_idempotent() {
        let store = MemoryAttendance::default();
        let batch = vec![entry("05/03/2026", "08:00", "17:00")];

        for _ in 0..2 {
            let res = commit_batch(&store, EMPLOYEE, &batch, 4).await;
            assert!(res.success);
            assert_eq!(res.updated_count, 1);
        }

        let record = store.get(EMPLOYEE, date(5, 3)).unwrap();
        assert_eq!(record.periods.len(), 1);
        assert_eq!(record.total_seconds, 32_400);
        assert_eq!(record.periods[0].checkout_type.as_deref(), Some(MANUAL_CHECKOUT));
        assert_eq!(store.len(), 1);
    }

    #[actix_web::test]
    async fn update_collapses_periods_and_keeps_locations() {
        let day = date(5, 3);
        let existing = AttendanceRecord {
            employee_id: EMPLOYEE,
            day: day_key(day),
            periods: vec![
                Period {
                    start: local_to_instant(day, "08:00"),
                    end: local_to_instant(day, "12:00"),
                    check_in_location: Some(json!({"site": "HQ"})),
                    check_out_location: Some(json!({"site": "HQ-lobby"})),
                    checkout_type: Some("auto".into()),
                },
                Period {
                    start: local_to_instant(day, "13:00"),
                    end: local_to_instant(day, "18:00"),
                    check_in_location: Some(json!({"site": "Annex"})),
                    check_out_location: Some(json!({"site": "Annex-gate"})),
                    checkout_type: Some("device".into()),
                },
            ],
            total_seconds: 32_400,
            legacy_intervals: Some(json!([["08:00", "12:00"], ["13:00", "18:00"]])),
        };
        let store = MemoryAttendance::with(vec![existing]);

        let res = commit_batch(&store, EMPLOYEE, &[entry("05/03/2026", "07:30", "16:00")], 1).await;
        assert!(res.success);

        let record = store.get(EMPLOYEE, day).unwrap();
        assert_eq!(record.periods.len(), 1);
        let p = &record.periods[0];
        assert_eq!(p.check_in_location, Some(json!({"site": "HQ"})));
        assert_eq!(p.check_out_location, Some(json!({"site": "Annex-gate"})));
        assert_eq!(p.checkout_type.as_deref(), Some("device"));
        assert_eq!(record.total_seconds, 8 * 3600 + 30 * 60);
        assert_eq!(record.legacy_intervals, None);
    }

    #[actix_web::test]
    async fn overnight_check_out_stays_on_row_record() {
        let store = MemoryAttendance::default();
        let overnight = CommitEntry {
            date: "01/01/2026".into(),
            check_in_time: Some("23:50".into()),
            check_out_date: Some("02/01/2026".into()),
            check_out_time: Some("00:10".into()),
            ..Default::default()
        };

        let res = commit_batch(&store, EMPLOYEE, &[overnight], 4).await;
        assert!(res.success);

        let record = store.get(EMPLOYEE, date(1, 1)).unwrap();
        assert_eq!(record.total_seconds, 20 * 60);
        assert!(store.get(EMPLOYEE, date(2, 1)).is_none());
    }

    #[actix_web::test]
    async fn backwards_span_is_stored_as_zero() {
        let store = MemoryAttendance::default();
        commit_batch(&store, EMPLOYEE, &[entry("05/03/2026", "17:00", "08:00")], 4).await;
        assert_eq!(store.get(EMPLOYEE, date(5, 3)).unwrap().total_seconds, 0);
    }

    #[actix_web::test]
    async fn missing_times_write_open_period() {
        let store = MemoryAttendance::default();
        let half = CommitEntry {
            date: "05/03/2026".into(),
            check_in_time: Some("08:00".into()),
            ..Default::default()
        };
        commit_batch(&store, EMPLOYEE, &[half], 4).await;

        let record = store.get(EMPLOYEE, date(5, 3)).unwrap();
        assert!(record.periods[0].start.is_some());
        assert!(record.periods[0].end.is_none());
        assert_eq!(record.total_seconds, 0);
    }

    #[actix_web::test]
    async fn one_bad_entry_does_not_sink_the_batch() {
        let store = MemoryAttendance::default();
        let batch = vec![
            entry("02/03/2026", "08:00", "17:00"),
            entry("31/02/2026", "08:00", "17:00"),
            entry("03/03/2026", "08:00", "17:00"),
        ];

        let res = commit_batch(&store, EMPLOYEE, &batch, 2).await;
        assert!(!res.success);
        assert_eq!(res.updated_count, 2);
        assert_eq!(res.errors.len(), 1);
        assert_eq!(res.errors[0].date, "31/02/2026");
        assert_eq!(store.len(), 2);
    }

    #[actix_web::test]
    async fn malformed_time_is_an_entry_error() {
        let store = MemoryAttendance::default();
        let res = commit_batch(&store, EMPLOYEE, &[entry("05/03/2026", "8h", "17:00")], 4).await;
        assert_eq!(res.updated_count, 0);
        assert_eq!(res.errors[0].message, "Invalid check-in time: 8h");
    }

    #[actix_web::test]
    async fn deleting_an_absent_day_is_a_no_op() {
        let store = MemoryAttendance::default();
        let res = delete_batch(&store, EMPLOYEE, &["05/03/2026".to_string()], 4).await;
        assert!(res.success);
        assert_eq!(res.deleted_count, 0);
    }

    #[actix_web::test]
    async fn delete_removes_record_and_reports_bad_dates() {
        let store = MemoryAttendance::default();
        commit_batch(&store, EMPLOYEE, &[entry("05/03/2026", "08:00", "17:00")], 4).await;

        let dates = vec!["05/03/2026".to_string(), "not-a-date".to_string()];
        let res = delete_batch(&store, EMPLOYEE, &dates, 4).await;
        assert!(!res.success);
        assert_eq!(res.deleted_count, 1);
        assert_eq!(res.errors[0].date, "not-a-date");
        assert_eq!(store.len(), 0);

        let again = delete_batch(&store, EMPLOYEE, &dates[..1], 4).await;
        assert!(again.success);
        assert_eq!(again.deleted_count, 0);
    }
}
