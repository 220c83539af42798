use std::collections::BTreeMap;

use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::ReconcileError;
use crate::reconcile::time::{format_wire_date, parse_wire_date};
use crate::state::AppState;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuspectDaysResponse {
    #[schema(example = "EMP-001")]
    pub employee_code: String,
    #[schema(example = json!(["05/03/2026"]))]
    pub dates: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SuspectCountsResponse {
    #[schema(example = json!({"EMP-001": 2, "EMP-007": 1}))]
    pub counts: BTreeMap<String, u64>,
}

fn parse_day(raw: &str) -> Result<chrono::NaiveDate, ReconcileError> {
    parse_wire_date(raw).ok_or_else(|| ReconcileError::BadRequest(format!("Invalid date: {raw}")))
}

/// Suspect-day counts per employee
#[utoipa::path(
    get,
    path = "/api/suspect",
    responses(
        (status = 200, description = "Counts keyed by employee code", body = SuspectCountsResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Suspect days"
)]
pub async fn counts(
    _auth: AuthUser,
    state: web::Data<AppState>,
) -> actix_web::Result<impl Responder> {
    let counts = state.suspects.counts_by_employee().await?;
    Ok(HttpResponse::Ok().json(SuspectCountsResponse { counts }))
}

/// Days flagged as suspect for one employee
#[utoipa::path(
    get,
    path = "/api/suspect/{employee}",
    params(("employee" = String, Path, description = "Employee code")),
    responses(
        (status = 200, description = "Flagged days, ascending", body = SuspectDaysResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Suspect days"
)]
pub async fn list(
    _auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee_code = path.into_inner();
    let days = state.suspects.list_for(&employee_code).await?;

    Ok(HttpResponse::Ok().json(SuspectDaysResponse {
        employee_code,
        dates: days.iter().map(format_wire_date).collect(),
    }))
}

/// Flag a day as suspect (idempotent)
#[utoipa::path(
    put,
    path = "/api/suspect/{employee}/{date}",
    params(
        ("employee" = String, Path, description = "Employee code"),
        ("date" = String, Path, description = "Day as DD/MM/YYYY or YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Day flagged", body = Object, example = json!({"message": "Suspect day added"})),
        (status = 400, description = "Invalid date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Suspect days"
)]
pub async fn add(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> actix_web::Result<impl Responder> {
    auth.require_commit_rights()?;

    let (employee_code, raw_date) = path.into_inner();
    let day = parse_day(&raw_date)?;
    state.suspects.add(&employee_code, day).await?;

    Ok(HttpResponse::Ok().json(json!({"message": "Suspect day added"})))
}

/// Clear a suspect flag (idempotent)
#[utoipa::path(
    delete,
    path = "/api/suspect/{employee}/{date}",
    params(
        ("employee" = String, Path, description = "Employee code"),
        ("date" = String, Path, description = "Day as DD/MM/YYYY or YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Flag cleared", body = Object, example = json!({"message": "Suspect day removed"})),
        (status = 400, description = "Invalid date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Suspect days"
)]
pub async fn remove(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> actix_web::Result<impl Responder> {
    auth.require_commit_rights()?;

    let (employee_code, raw_date) = path.into_inner();
    let day = parse_day(&raw_date)?;
    state.suspects.remove(&employee_code, day).await?;

    Ok(HttpResponse::Ok().json(json!({"message": "Suspect day removed"})))
}
