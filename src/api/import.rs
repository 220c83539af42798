use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::ReconcileError;
use crate::model::time_entry::{DateRange, MAX_PUNCH_PAIRS, SpreadsheetImport};
use crate::state::AppState;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportStatus {
    pub loaded: bool,
    pub date_range: Option<DateRange>,
    #[schema(example = 42)]
    pub employee_count: usize,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub loaded_at: Option<DateTime<Utc>>,
}

fn validate_import(import: &SpreadsheetImport) -> Result<(), ReconcileError> {
    if let Some(range) = import.date_range {
        if range.start > range.end {
            return Err(ReconcileError::BadRequest(
                "dateRange start cannot be after end".into(),
            ));
        }
    }

    for (code, employee) in &import.employees {
        if let Some(entry) = employee.entries.iter().find(|e| e.pairs.len() > MAX_PUNCH_PAIRS) {
            return Err(ReconcileError::BadRequest(format!(
                "{code}: row {} has more than {MAX_PUNCH_PAIRS} in/out pairs",
                entry.date.format("%d/%m/%Y")
            )));
        }
    }
    Ok(())
}

/// Load a parsed spreadsheet import, replacing the current one
#[utoipa::path(
    put,
    path = "/api/import",
    request_body = SpreadsheetImport,
    responses(
        (status = 200, description = "Import loaded", body = Object, example = json!({
            "message": "Import loaded",
            "employees": 42
        })),
        (status = 400, description = "Malformed import"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Import"
)]
pub async fn load_import(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<SpreadsheetImport>,
) -> actix_web::Result<impl Responder> {
    auth.require_commit_rights()?;

    let import = payload.into_inner();
    validate_import(&import)?;

    let employees = import.employees.len();
    state.imports.load(import);
    state.cache.invalidate_all();

    tracing::info!(employees, reviewer = %auth.username, "Spreadsheet import loaded");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Import loaded",
        "employees": employees
    })))
}

/// Status of the currently loaded import
#[utoipa::path(
    get,
    path = "/api/import",
    responses(
        (status = 200, description = "Import status", body = ImportStatus),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Import"
)]
pub async fn import_status(_auth: AuthUser, state: web::Data<AppState>) -> impl Responder {
    let snapshot = state.imports.snapshot();

    HttpResponse::Ok().json(ImportStatus {
        loaded: snapshot.is_some(),
        date_range: snapshot.as_ref().and_then(|i| i.date_range),
        employee_count: snapshot.as_ref().map_or(0, |i| i.employees.len()),
        loaded_at: state.imports.loaded_at(),
    })
}
