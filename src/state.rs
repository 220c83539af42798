use std::sync::Arc;
use std::time::Duration;

use crate::reconcile::ReconcileSettings;
use crate::reconcile::compare::ComparisonSources;
use crate::store::spreadsheet::ImportStore;
use crate::store::{AttendanceStore, Directory, SuspectDayStore};
use crate::utils::comparison_cache::ComparisonCache;

/// Shared handles every handler works through.
#[derive(Clone)]
pub struct AppState {
    pub imports: Arc<ImportStore>,
    pub directory: Arc<dyn Directory>,
    pub attendance: Arc<dyn AttendanceStore>,
    pub suspects: Arc<dyn SuspectDayStore>,
    pub cache: ComparisonCache,
    pub settings: ReconcileSettings,
}

impl AppState {
    pub fn new(
        directory: Arc<dyn Directory>,
        attendance: Arc<dyn AttendanceStore>,
        suspects: Arc<dyn SuspectDayStore>,
        settings: ReconcileSettings,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            imports: Arc::new(ImportStore::new()),
            directory,
            attendance,
            suspects,
            cache: ComparisonCache::new(cache_ttl),
            settings,
        }
    }

    pub fn comparison_sources(&self) -> ComparisonSources<'_> {
        ComparisonSources {
            spreadsheet: self.imports.as_ref(),
            directory: self.directory.as_ref(),
            attendance: self.attendance.as_ref(),
        }
    }
}
