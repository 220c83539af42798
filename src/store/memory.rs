//! In-memory collaborators for tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{ReconcileError, Result};
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::DirectoryEmployee;
use crate::reconcile::time::day_key;
use crate::store::{AttendanceStore, Directory, SuspectDayStore};

#[derive(Default)]
pub struct MemoryDirectory {
    employees: HashMap<String, DirectoryEmployee>,
    fail_reads: AtomicBool,
}

impl MemoryDirectory {
    pub fn with(employees: Vec<DirectoryEmployee>) -> Self {
        Self {
            employees: employees
                .into_iter()
                .map(|e| (e.employee_code.clone(), e))
                .collect(),
            fail_reads: AtomicBool::new(false),
        }
    }

    /// Makes every lookup fail as if the database were unreachable.
    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn find_employee(&self, employee_code: &str) -> Result<Option<DirectoryEmployee>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ReconcileError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.employees.get(employee_code).cloned())
    }
}

#[derive(Default)]
pub struct MemoryAttendance {
    records: Mutex<BTreeMap<(u64, DateTime<Utc>), AttendanceRecord>>,
    fail_reads: AtomicBool,
}

impl MemoryAttendance {
    pub fn with(records: Vec<AttendanceRecord>) -> Self {
        let store = Self::default();
        {
            let mut map = store.records.lock().unwrap();
            for r in records {
                map.insert((r.employee_id, r.day), r);
            }
        }
        store
    }

    /// Makes every read fail as if the database were unreachable.
    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn get(&self, employee_id: u64, date: NaiveDate) -> Option<AttendanceRecord> {
        self.records
            .lock()
            .unwrap()
            .get(&(employee_id, day_key(date)))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ReconcileError::SourceUnavailable(
                "attendance store offline".into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AttendanceStore for MemoryAttendance {
    async fn records_for(
        &self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        self.check_reads()?;
        if start > end {
            return Ok(Vec::new());
        }
        let records = self.records.lock().unwrap();
        Ok(records
            .range((employee_id, day_key(start))..=(employee_id, day_key(end)))
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn earliest_day(&self, employee_id: u64) -> Result<Option<NaiveDate>> {
        self.check_reads()?;
        let records = self.records.lock().unwrap();
        Ok(records
            .values()
            .filter(|r| r.employee_id == employee_id)
            .map(|r| r.calendar_date())
            .min())
    }

    async fn find_one(
        &self,
        employee_id: u64,
        day: DateTime<Utc>,
    ) -> Result<Option<AttendanceRecord>> {
        self.check_reads()?;
        Ok(self.records.lock().unwrap().get(&(employee_id, day)).cloned())
    }

    async fn upsert(&self, record: &AttendanceRecord) -> Result<()> {
        self.records
            .lock()
            .unwrap()
            .insert((record.employee_id, record.day), record.clone());
        Ok(())
    }

    async fn delete(&self, employee_id: u64, day: DateTime<Utc>) -> Result<u64> {
        let removed = self.records.lock().unwrap().remove(&(employee_id, day));
        Ok(removed.map_or(0, |_| 1))
    }
}

#[derive(Default)]
pub struct MemorySuspectDays {
    days: Mutex<BTreeSet<(String, NaiveDate)>>,
}

#[async_trait]
impl SuspectDayStore for MemorySuspectDays {
    async fn add(&self, employee_code: &str, day: NaiveDate) -> Result<()> {
        self.days
            .lock()
            .unwrap()
            .insert((employee_code.to_string(), day));
        Ok(())
    }

    async fn remove(&self, employee_code: &str, day: NaiveDate) -> Result<()> {
        self.days
            .lock()
            .unwrap()
            .remove(&(employee_code.to_string(), day));
        Ok(())
    }

    async fn list_for(&self, employee_code: &str) -> Result<Vec<NaiveDate>> {
        Ok(self
            .days
            .lock()
            .unwrap()
            .iter()
            .filter(|(code, _)| code == employee_code)
            .map(|(_, day)| *day)
            .collect())
    }

    async fn counts_by_employee(&self) -> Result<BTreeMap<String, u64>> {
        let mut counts = BTreeMap::new();
        for (code, _) in self.days.lock().unwrap().iter() {
            *counts.entry(code.clone()).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
