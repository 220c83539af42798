use chrono::{Datelike, Months, NaiveDate};

use crate::error::{ReconcileError, Result};
use crate::model::comparison::{ActiveFilter, DateBounds, FilterMode};
use crate::model::time_entry::DateRange;
use crate::reconcile::time::parse_wire_date;

/// Earliest navigable date, by priority: join date, spreadsheet start,
/// earliest database record, today. Latest is today, or the spreadsheet
/// end when the window is spreadsheet-bounded.
pub fn date_bounds(
    join_date: Option<NaiveDate>,
    sheet_range: Option<DateRange>,
    earliest_record: Option<NaiveDate>,
    today: NaiveDate,
) -> DateBounds {
    let (earliest, latest) = match (join_date, sheet_range, earliest_record) {
        (Some(joined), _, _) => (joined, today),
        (None, Some(range), _) => (range.start, range.end),
        (None, None, Some(first)) => (first, today),
        (None, None, None) => (today, today),
    };

    DateBounds {
        earliest: earliest.min(latest),
        latest,
    }
}

/// Widest interval a `range` filter may ask for, in days.
pub const MAX_RANGE_DAYS: i64 = 366;

fn month_span(month: &str) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", month.trim()), "%Y-%m-%d").ok()?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((first, last))
}

fn required_date(raw: Option<&str>, name: &str) -> Result<NaiveDate> {
    let raw = raw.ok_or_else(|| ReconcileError::BadRequest(format!("{name} is required")))?;
    parse_wire_date(raw).ok_or_else(|| ReconcileError::BadRequest(format!("Invalid {name}: {raw}")))
}

/// Turns the request filter into the closed interval to compare.
///
/// `month` defaults to the month of the latest bound.
pub fn resolve_filter(
    mode: FilterMode,
    month: Option<&str>,
    start_date: Option<&str>,
    end_date: Option<&str>,
    bounds: &DateBounds,
) -> Result<ActiveFilter> {
    let (month, start, end) = match mode {
        FilterMode::Month => {
            let month = month
                .map(str::to_string)
                .unwrap_or_else(|| format!("{:04}-{:02}", bounds.latest.year(), bounds.latest.month()));
            let (start, end) = month_span(&month)
                .ok_or_else(|| ReconcileError::BadRequest(format!("Invalid month: {month}")))?;
            (Some(month), start, end)
        }
        FilterMode::Range => {
            let start = required_date(start_date, "startDate")?;
            let end = required_date(end_date, "endDate")?;
            if start > end {
                return Err(ReconcileError::BadRequest(
                    "startDate cannot be after endDate".into(),
                ));
            }
            if (end - start).num_days() + 1 > MAX_RANGE_DAYS {
                return Err(ReconcileError::BadRequest(format!(
                    "Date range cannot exceed {MAX_RANGE_DAYS} days"
                )));
            }
            (None, start, end)
        }
        FilterMode::All => (None, bounds.earliest, bounds.latest),
    };

    Ok(ActiveFilter {
        mode,
        month,
        start_date: start,
        end_date: end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sheet() -> Option<DateRange> {
        Some(DateRange {
            start: date(2026, 3, 1),
            end: date(2026, 3, 31),
        })
    }

    #[test]
    fn earliest_follows_priority_order() {
        let today = date(2026, 10, 19);

        let b = date_bounds(Some(date(2024, 1, 1)), sheet(), Some(date(2023, 5, 1)), today);
        assert_eq!((b.earliest, b.latest), (date(2024, 1, 1), today));

        let b = date_bounds(None, sheet(), Some(date(2023, 5, 1)), today);
        assert_eq!((b.earliest, b.latest), (date(2026, 3, 1), date(2026, 3, 31)));

        let b = date_bounds(None, None, Some(date(2023, 5, 1)), today);
        assert_eq!((b.earliest, b.latest), (date(2023, 5, 1), today));

        let b = date_bounds(None, None, None, today);
        assert_eq!((b.earliest, b.latest), (today, today));
    }

    #[test]
    fn future_join_date_is_clamped() {
        let today = date(2026, 10, 19);
        let b = date_bounds(Some(date(2027, 1, 1)), None, None, today);
        assert_eq!(b.earliest, today);
    }

    #[test]
    fn month_filter_covers_whole_month() {
        let bounds = date_bounds(None, None, None, date(2026, 2, 10));

        let f = resolve_filter(FilterMode::Month, Some("2024-02"), None, None, &bounds).unwrap();
        assert_eq!((f.start_date, f.end_date), (date(2024, 2, 1), date(2024, 2, 29)));

        let f = resolve_filter(FilterMode::Month, None, None, None, &bounds).unwrap();
        assert_eq!(f.month.as_deref(), Some("2026-02"));
        assert_eq!(f.end_date, date(2026, 2, 28));

        assert!(resolve_filter(FilterMode::Month, Some("2026-13"), None, None, &bounds).is_err());
    }

    #[test]
    fn range_filter_validates_dates() {
        let bounds = date_bounds(None, None, None, date(2026, 2, 10));

        let f = resolve_filter(
            FilterMode::Range,
            None,
            Some("01/01/2026"),
            Some("2026-01-15"),
            &bounds,
        )
        .unwrap();
        assert_eq!((f.start_date, f.end_date), (date(2026, 1, 1), date(2026, 1, 15)));

        assert!(resolve_filter(FilterMode::Range, None, Some("01/01/2026"), None, &bounds).is_err());
        assert!(
            resolve_filter(FilterMode::Range, None, Some("02/01/2026"), Some("01/01/2026"), &bounds)
                .is_err()
        );
    }

    #[test]
    fn range_filter_rejects_oversized_windows() {
        let bounds = date_bounds(None, None, None, date(2026, 2, 10));

        let err = resolve_filter(
            FilterMode::Range,
            None,
            Some("01/01/0001"),
            Some("31/12/9999"),
            &bounds,
        )
        .unwrap_err();
        assert!(matches!(err, ReconcileError::BadRequest(_)));

        // a leap year is the widest window still accepted
        let f = resolve_filter(FilterMode::Range, None, Some("01/01/2024"), Some("31/12/2024"), &bounds)
            .unwrap();
        assert_eq!(f.end_date, date(2024, 12, 31));
        assert!(
            resolve_filter(FilterMode::Range, None, Some("01/01/2024"), Some("01/01/2025"), &bounds)
                .is_err()
        );
    }

    #[test]
    fn all_filter_uses_bounds() {
        let bounds = date_bounds(None, sheet(), None, date(2026, 10, 19));
        let f = resolve_filter(FilterMode::All, None, None, None, &bounds).unwrap();
        assert_eq!((f.start_date, f.end_date), (date(2026, 3, 1), date(2026, 3, 31)));
    }
}
