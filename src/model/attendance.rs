use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::reconcile::time::calendar_date;

/// Checkout-type tag given to records created from a review.
pub const MANUAL_CHECKOUT: &str = "manual";

/// One check-in/check-out span within a day record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub check_in_location: Option<Value>,
    #[serde(default)]
    pub check_out_location: Option<Value>,
    #[serde(default)]
    pub checkout_type: Option<String>,
}

/// Database-side attendance for one employee on one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRecord {
    pub employee_id: u64,
    /// Midnight of the calendar day in the reference zone.
    pub day: DateTime<Utc>,
    pub periods: Vec<Period>,
    pub total_seconds: i64,
    /// Interval list written by older clock-in devices. Cleared on every edit.
    pub legacy_intervals: Option<Value>,
}

impl AttendanceRecord {
    pub fn calendar_date(&self) -> NaiveDate {
        calendar_date(&self.day)
    }

    pub fn first_check_in(&self) -> Option<DateTime<Utc>> {
        self.periods.iter().find_map(|p| p.start)
    }

    pub fn last_check_out(&self) -> Option<DateTime<Utc>> {
        self.periods.iter().rev().find_map(|p| p.end)
    }
}
