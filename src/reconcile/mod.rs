//! The reconciliation engine: day alignment, discrepancy rules, the
//! reviewer's working set, and the write-back of reviewed days.

pub mod align;
pub mod bounds;
pub mod commit;
pub mod compare;
pub mod discrepancy;
pub mod selection;
pub mod time;

use crate::reconcile::discrepancy::MissingDirection;

/// Knobs the engine reads from configuration.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileSettings {
    pub missing_direction: MissingDirection,
    /// How many batch entries may hit the store at once.
    pub commit_concurrency: usize,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            missing_direction: MissingDirection::SpreadsheetToDatabase,
            commit_concurrency: 4,
        }
    }
}
