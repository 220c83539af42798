use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::model::attendance::AttendanceRecord;
use crate::model::comparison::{
    DatabaseDay, DayComparison, Discrepancies, Selection, Source, SpreadsheetDay,
};
use crate::model::time_entry::TimeEntry;
use crate::reconcile::discrepancy::{self, MissingDirection};
use crate::reconcile::selection::{Stamp, span_seconds};
use crate::reconcile::time::{instant_to_local, minutes_of_day, parse_hhmm, seconds_to_hhmm};

/// Date the spreadsheet check-out falls on. A check-out at or before the
/// check-in time of day is read as the next morning.
pub fn check_out_date(row_date: NaiveDate, check_in: Option<&str>, check_out: &str) -> NaiveDate {
    let in_minutes = check_in.and_then(parse_hhmm).map(|t| minutes_of_day(&t));
    let out_minutes = parse_hhmm(check_out).map(|t| minutes_of_day(&t));

    match (in_minutes, out_minutes) {
        (Some(i), Some(o)) if o <= i => row_date.succ_opt().unwrap_or(row_date),
        _ => row_date,
    }
}

pub fn spreadsheet_day(entry: &TimeEntry) -> SpreadsheetDay {
    let check_in = entry.first_in();
    let check_out = entry.final_out();
    let check_out_date = check_out
        .as_deref()
        .map(|out| check_out_date(entry.date, check_in.as_deref(), out));

    SpreadsheetDay {
        check_in_date: check_in.as_ref().map(|_| entry.date),
        check_in,
        check_out,
        check_out_date,
        net_work_hours: entry.net_hours(),
        site: entry.site.clone(),
        remarks: entry.remarks.clone(),
    }
}

pub fn database_day(record: &AttendanceRecord) -> DatabaseDay {
    let check_in = record.first_check_in().map(|i| instant_to_local(&i));
    let check_out = record.last_check_out().map(|i| instant_to_local(&i));

    DatabaseDay {
        check_in_date: check_in.as_ref().map(|(_, d)| *d),
        check_in: check_in.map(|(t, _)| t),
        check_out_date: check_out.as_ref().map(|(_, d)| *d),
        check_out: check_out.map(|(t, _)| t),
        total_seconds: Some(record.total_seconds),
        total: Some(seconds_to_hhmm(record.total_seconds)),
    }
}

/// Spreadsheet wins whenever it has any time for the day.
pub fn default_selection(sheet: &SpreadsheetDay) -> Selection {
    if sheet.has_time() {
        Selection::both(Source::Spreadsheet)
    } else {
        Selection::both(Source::Database)
    }
}

fn selected_stamps(
    sheet: &SpreadsheetDay,
    db: &DatabaseDay,
    selection: Selection,
    row_date: NaiveDate,
) -> (Stamp, Stamp) {
    let check_in = match selection.check_in {
        Source::Spreadsheet => (sheet.check_in_date, sheet.check_in.clone()),
        Source::Database => (db.check_in_date, db.check_in.clone()),
    };
    let check_out = match selection.check_out {
        Source::Spreadsheet => (sheet.check_out_date, sheet.check_out.clone()),
        Source::Database => (db.check_out_date, db.check_out.clone()),
    };

    (
        Stamp {
            date: check_in.0.or(Some(row_date)),
            time: check_in.1,
        },
        Stamp {
            date: check_out.0.or(Some(row_date)),
            time: check_out.1,
        },
    )
}

fn empty_day(date: NaiveDate) -> DayComparison {
    DayComparison {
        date,
        day_name: date.format("%A").to_string(),
        spreadsheet: SpreadsheetDay::default(),
        database: DatabaseDay::default(),
        discrepancies: Discrepancies::default(),
        issues: Vec::new(),
        selection: Selection::both(Source::Spreadsheet),
        calculated_duration: None,
    }
}

fn compare_day(
    date: NaiveDate,
    entry: Option<&TimeEntry>,
    record: Option<&AttendanceRecord>,
    direction: MissingDirection,
) -> DayComparison {
    if entry.is_none() && record.is_none() {
        return empty_day(date);
    }

    let sheet = entry.map(spreadsheet_day).unwrap_or_default();
    let db = record.map(database_day).unwrap_or_default();
    let discrepancies = discrepancy::detect(&sheet, &db, direction);
    let issues = discrepancy::issues(&discrepancies, direction);
    let selection = default_selection(&sheet);

    let (check_in, check_out) = selected_stamps(&sheet, &db, selection, date);
    let calculated_duration = span_seconds(&check_in, &check_out).map(seconds_to_hhmm);

    let day_name = entry
        .and_then(|e| e.day_name.clone())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| date.format("%A").to_string());

    DayComparison {
        date,
        day_name,
        spreadsheet: sheet,
        database: db,
        discrepancies,
        issues,
        selection,
        calculated_duration,
    }
}

/// One comparison row per calendar day in `[start, end]`, ascending,
/// whether or not either source has data for it.
pub fn align_days(
    start: NaiveDate,
    end: NaiveDate,
    entries: Option<&[TimeEntry]>,
    records: &[AttendanceRecord],
    direction: MissingDirection,
) -> Vec<DayComparison> {
    let by_date: BTreeMap<NaiveDate, &TimeEntry> = entries
        .unwrap_or_default()
        .iter()
        .map(|e| (e.date, e))
        .collect();
    let by_day: HashMap<NaiveDate, &AttendanceRecord> =
        records.iter().map(|r| (r.calendar_date(), r)).collect();

    start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|d| {
            compare_day(
                d,
                by_date.get(&d).copied(),
                by_day.get(&d).copied(),
                direction,
            )
        })
        .collect()
}
