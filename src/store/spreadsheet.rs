use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::time_entry::{DateRange, SpreadsheetImport, TimeEntry};
use crate::store::SpreadsheetSource;

struct LoadedImport {
    import: Arc<SpreadsheetImport>,
    loaded_at: DateTime<Utc>,
}

/// Holds the import the reviewer is currently working against.
///
/// Owned by application state; loading a new import replaces the old one.
#[derive(Default)]
pub struct ImportStore {
    current: RwLock<Option<LoadedImport>>,
}

impl ImportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, import: SpreadsheetImport) {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = Some(LoadedImport {
            import: Arc::new(import),
            loaded_at: Utc::now(),
        });
    }

    pub fn clear(&self) {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = None;
    }

    pub fn snapshot(&self) -> Option<Arc<SpreadsheetImport>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|l| l.import.clone())
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|l| l.loaded_at)
    }
}

#[async_trait]
impl SpreadsheetSource for ImportStore {
    async fn is_loaded(&self) -> bool {
        self.snapshot().is_some()
    }

    async fn entries_for(&self, employee_code: &str) -> Option<Vec<TimeEntry>> {
        self.snapshot()?
            .employees
            .get(employee_code)
            .map(|e| e.entries.clone())
    }

    async fn display_name(&self, employee_code: &str) -> Option<String> {
        self.snapshot()?
            .employees
            .get(employee_code)
            .and_then(|e| e.display_name.clone())
    }

    async fn detected_date_range(&self) -> Option<DateRange> {
        self.snapshot()?.date_range
    }
}
