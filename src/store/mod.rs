//! Seams to the systems the reconciliation engine reads from and writes to.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Result;
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::DirectoryEmployee;
use crate::model::time_entry::{DateRange, TimeEntry};

pub mod attendance;
pub mod directory;
#[cfg(test)]
pub mod memory;
pub mod spreadsheet;
pub mod suspect;

/// The most recently loaded spreadsheet import.
#[async_trait]
pub trait SpreadsheetSource: Send + Sync {
    async fn is_loaded(&self) -> bool;
    async fn entries_for(&self, employee_code: &str) -> Option<Vec<TimeEntry>>;
    async fn display_name(&self, employee_code: &str) -> Option<String>;
    async fn detected_date_range(&self) -> Option<DateRange>;
}

#[async_trait]
pub trait Directory: Send + Sync {
    async fn find_employee(&self, employee_code: &str) -> Result<Option<DirectoryEmployee>>;
}

/// Day records keyed by `(employee_id, day)`, `day` being reference-zone midnight.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Records with `start <= calendar day <= end`, ascending by day.
    async fn records_for(
        &self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>>;

    async fn earliest_day(&self, employee_id: u64) -> Result<Option<NaiveDate>>;

    async fn find_one(&self, employee_id: u64, day: DateTime<Utc>)
    -> Result<Option<AttendanceRecord>>;

    /// Inserts or wholesale-replaces the record with the same key.
    async fn upsert(&self, record: &AttendanceRecord) -> Result<()>;

    async fn delete(&self, employee_id: u64, day: DateTime<Utc>) -> Result<u64>;
}

/// Reviewer-flagged days, with set semantics.
#[async_trait]
pub trait SuspectDayStore: Send + Sync {
    async fn add(&self, employee_code: &str, day: NaiveDate) -> Result<()>;
    async fn remove(&self, employee_code: &str, day: NaiveDate) -> Result<()>;
    async fn list_for(&self, employee_code: &str) -> Result<Vec<NaiveDate>>;
    async fn counts_by_employee(&self) -> Result<BTreeMap<String, u64>>;
}
