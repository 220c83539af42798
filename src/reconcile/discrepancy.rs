use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::model::comparison::{DatabaseDay, DayComparison, Discrepancies, SpreadsheetDay};
use crate::reconcile::time::hhmm_to_hours;

/// Net hours in `[3, 4)` usually mean an incomplete row.
pub const LOW_HOURS_BAND: std::ops::Range<f64> = 3.0..4.0;

/// Which side is expected to be complete when looking for missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MissingDirection {
    /// Spreadsheet has a value the database lacks.
    SpreadsheetToDatabase,
    /// Database has a value the spreadsheet lacks.
    DatabaseToSpreadsheet,
}

impl MissingDirection {
    fn missing(&self, sheet: &Option<String>, db: &Option<String>) -> bool {
        match self {
            MissingDirection::SpreadsheetToDatabase => sheet.is_some() && db.is_none(),
            MissingDirection::DatabaseToSpreadsheet => db.is_some() && sheet.is_none(),
        }
    }

    fn check_in_issue(&self) -> &'static str {
        match self {
            MissingDirection::SpreadsheetToDatabase => {
                "Check-in recorded in spreadsheet but missing in database"
            }
            MissingDirection::DatabaseToSpreadsheet => {
                "Check-in recorded in database but missing in spreadsheet"
            }
        }
    }

    fn check_out_issue(&self) -> &'static str {
        match self {
            MissingDirection::SpreadsheetToDatabase => {
                "Check-out recorded in spreadsheet but missing in database"
            }
            MissingDirection::DatabaseToSpreadsheet => {
                "Check-out recorded in database but missing in spreadsheet"
            }
        }
    }
}

pub const LOW_HOURS_ISSUE: &str = "Net work hours between 3 and 4 hours";

pub fn is_low_hours(net_work_hours: Option<&str>) -> bool {
    net_work_hours
        .and_then(hhmm_to_hours)
        .is_some_and(|h| LOW_HOURS_BAND.contains(&h))
}

pub fn detect(
    sheet: &SpreadsheetDay,
    db: &DatabaseDay,
    direction: MissingDirection,
) -> Discrepancies {
    Discrepancies {
        check_in_missing_in_other: direction.missing(&sheet.check_in, &db.check_in),
        check_out_missing_in_other: direction.missing(&sheet.check_out, &db.check_out),
        low_hours: is_low_hours(sheet.net_work_hours.as_deref()),
    }
}

/// Issue strings in a fixed order: check-in, check-out, low hours.
pub fn issues(flags: &Discrepancies, direction: MissingDirection) -> Vec<String> {
    let mut issues = Vec::new();
    if flags.check_in_missing_in_other {
        issues.push(direction.check_in_issue().to_string());
    }
    if flags.check_out_missing_in_other {
        issues.push(direction.check_out_issue().to_string());
    }
    if flags.low_hours {
        issues.push(LOW_HOURS_ISSUE.to_string());
    }
    issues
}

pub fn total_issues(days: &[DayComparison]) -> usize {
    days.iter().map(|d| d.issues.len()).sum()
}
