use actix_web::{HttpResponse, Responder, web};

use crate::auth::auth::AuthUser;
use crate::error::ReconcileError;
use crate::model::batch::{CommitRequest, CommitResponse, DeleteRequest, DeleteResponse};
use crate::model::employee::DirectoryEmployee;
use crate::reconcile::commit::{commit_batch, delete_batch};
use crate::state::AppState;

async fn directory_employee(
    state: &AppState,
    employee_code: &str,
) -> Result<DirectoryEmployee, ReconcileError> {
    state
        .directory
        .find_employee(employee_code)
        .await?
        .ok_or_else(|| ReconcileError::NotFound(format!("Employee {employee_code} not found")))
}

/// Write reviewed days back to the attendance store
#[utoipa::path(
    post,
    path = "/api/reconcile/{employee}/commit",
    params(
        ("employee" = String, Path, description = "Employee code")
    ),
    request_body = CommitRequest,
    responses(
        (status = 200, description = "Batch processed; per-entry failures are listed in errors", body = CommitResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not in directory")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reconcile"
)]
pub async fn commit(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<CommitRequest>,
) -> actix_web::Result<impl Responder> {
    auth.require_commit_rights()?;

    let employee_code = path.into_inner();
    let employee = directory_employee(&state, &employee_code).await?;

    let result = commit_batch(
        state.attendance.as_ref(),
        employee.internal_id,
        &payload.updates,
        state.settings.commit_concurrency,
    )
    .await;

    state.cache.invalidate_employee(&employee_code);
    tracing::info!(
        employee = %employee_code,
        reviewer = %auth.username,
        updated = result.updated_count,
        "Reviewed days committed"
    );

    Ok(HttpResponse::Ok().json(result))
}

/// Remove attendance records for the given days
#[utoipa::path(
    post,
    path = "/api/reconcile/{employee}/delete",
    params(
        ("employee" = String, Path, description = "Employee code")
    ),
    request_body = DeleteRequest,
    responses(
        (status = 200, description = "Batch processed; absent days count as zero deletions", body = DeleteResponse),
        (status = 400, description = "No dates given", body = Object, example = json!({
            "message": "dates must not be empty"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not in directory")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reconcile"
)]
pub async fn delete(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<DeleteRequest>,
) -> actix_web::Result<impl Responder> {
    auth.require_commit_rights()?;

    if payload.dates.is_empty() {
        return Err(ReconcileError::BadRequest("dates must not be empty".into()).into());
    }

    let employee_code = path.into_inner();
    let employee = directory_employee(&state, &employee_code).await?;

    let result = delete_batch(
        state.attendance.as_ref(),
        employee.internal_id,
        &payload.dates,
        state.settings.commit_concurrency,
    )
    .await;

    state.cache.invalidate_employee(&employee_code);
    tracing::info!(
        employee = %employee_code,
        reviewer = %auth.username,
        deleted = result.deleted_count,
        "Attendance days deleted"
    );

    Ok(HttpResponse::Ok().json(result))
}
