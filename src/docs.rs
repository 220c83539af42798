use crate::api::import::ImportStatus;
use crate::api::suspect::{SuspectCountsResponse, SuspectDaysResponse};
use crate::model::batch::{
    CommitEntry, CommitRequest, CommitResponse, DeleteRequest, DeleteResponse, EntryError,
};
use crate::model::comparison::{
    ActiveFilter, ComparisonResponse, DatabaseDay, DateBounds, DayComparison, Discrepancies,
    FilterMode, Selection, Source, SpreadsheetDay,
};
use crate::model::employee::EmployeeInfo;
use crate::model::time_entry::{DateRange, PunchPair, SheetEmployee, SpreadsheetImport, TimeEntry};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Reconciliation API",
        version = "0.1.0",
        description = r#"
## Attendance Reconciliation

Compares a spreadsheet attendance import with the check-in/check-out records
held in the database, one calendar day at a time, and writes reviewed days
back.

### 🔹 Key Features
- **Comparison**
  - One row per day in the requested window, with discrepancies and issues
- **Commit**
  - Idempotent per-day upserts; one failing entry never aborts the batch
- **Delete**
  - Per-day removal; deleting an absent day is a no-op
- **Suspect days**
  - Reviewer flags for manual follow-up

### 🕓 Time
Times are `HH:mm` in UTC+4. Dates are `DD/MM/YYYY` (ISO `YYYY-MM-DD` is accepted on input).

### 🔐 Security
Every endpoint needs a **JWT Bearer** token. Writes need the **Admin** or **HR** role.
"#,
    ),
    paths(
        crate::api::comparison::get_comparison,
        crate::api::commit::commit,
        crate::api::commit::delete,

        crate::api::import::load_import,
        crate::api::import::import_status,

        crate::api::suspect::counts,
        crate::api::suspect::list,
        crate::api::suspect::add,
        crate::api::suspect::remove
    ),
    components(
        schemas(
            ComparisonResponse,
            DayComparison,
            SpreadsheetDay,
            DatabaseDay,
            Discrepancies,
            Selection,
            Source,
            DateBounds,
            ActiveFilter,
            FilterMode,
            EmployeeInfo,
            CommitEntry,
            CommitRequest,
            CommitResponse,
            DeleteRequest,
            DeleteResponse,
            EntryError,
            SpreadsheetImport,
            SheetEmployee,
            TimeEntry,
            PunchPair,
            DateRange,
            ImportStatus,
            SuspectDaysResponse,
            SuspectCountsResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Reconcile", description = "Comparison and write-back APIs"),
        (name = "Import", description = "Spreadsheet import APIs"),
        (name = "Suspect days", description = "Reviewer follow-up flags"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
