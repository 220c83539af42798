use chrono::NaiveDate;

use crate::error::{ReconcileError, Result};
use crate::model::comparison::{ComparisonQuery, ComparisonResponse};
use crate::model::employee::EmployeeInfo;
use crate::reconcile::align::align_days;
use crate::reconcile::bounds::{date_bounds, resolve_filter};
use crate::reconcile::discrepancy::{MissingDirection, total_issues};
use crate::store::{AttendanceStore, Directory, SpreadsheetSource};

/// Read side of a comparison request.
pub struct ComparisonSources<'a> {
    pub spreadsheet: &'a dyn SpreadsheetSource,
    pub directory: &'a dyn Directory,
    pub attendance: &'a dyn AttendanceStore,
}

/// Builds the day-by-day comparison for one employee.
///
/// Fails when the employee is unknown to every source, or when the directory
/// is unreachable and the spreadsheet has nothing for them. An unreadable
/// directory or attendance store otherwise degrades the answer to
/// spreadsheet data.
pub async fn build_comparison(
    sources: &ComparisonSources<'_>,
    employee_code: &str,
    query: &ComparisonQuery,
    direction: MissingDirection,
    today: NaiveDate,
) -> Result<ComparisonResponse> {
    let sheet_loaded = sources.spreadsheet.is_loaded().await;
    let entries = sources.spreadsheet.entries_for(employee_code).await;
    let (employee, directory_down) = match sources.directory.find_employee(employee_code).await {
        Ok(found) => (found, false),
        Err(e) => {
            tracing::warn!(employee = employee_code, error = %e, "Directory lookup failed");
            (None, true)
        }
    };

    if entries.is_none() && employee.is_none() {
        return Err(if directory_down {
            ReconcileError::SourceUnavailable("employee directory is unreachable".into())
        } else if sheet_loaded {
            ReconcileError::NotFound(format!("Employee {employee_code} not found"))
        } else {
            ReconcileError::BadRequest(
                "No spreadsheet has been loaded and the employee has no database records".into(),
            )
        });
    }

    let mut degraded = directory_down;

    let earliest_record = match &employee {
        Some(emp) if emp.join_date.is_none() => {
            match sources.attendance.earliest_day(emp.internal_id).await {
                Ok(day) => day,
                Err(e) => {
                    tracing::warn!(employee = employee_code, error = %e, "Attendance store unavailable");
                    degraded = true;
                    None
                }
            }
        }
        _ => None,
    };

    let sheet_range = match entries {
        Some(_) => sources.spreadsheet.detected_date_range().await,
        None => None,
    };
    let bounds = date_bounds(
        employee.as_ref().and_then(|e| e.join_date),
        sheet_range,
        earliest_record,
        today,
    );

    let filter = resolve_filter(
        query.mode.unwrap_or_default(),
        query.month.as_deref(),
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        &bounds,
    )?;

    let records = match &employee {
        Some(emp) if !degraded => {
            match sources
                .attendance
                .records_for(emp.internal_id, filter.start_date, filter.end_date)
                .await
            {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(employee = employee_code, error = %e, "Attendance store unavailable");
                    degraded = true;
                    Vec::new()
                }
            }
        }
        _ => Vec::new(),
    };

    let days = align_days(
        filter.start_date,
        filter.end_date,
        entries.as_deref(),
        &records,
        direction,
    );
    let total_issues = total_issues(&days);

    let display_name = match &employee {
        Some(emp) => Some(emp.display_name.clone()),
        None => sources.spreadsheet.display_name(employee_code).await,
    };

    tracing::debug!(
        employee = employee_code,
        days = days.len(),
        total_issues,
        degraded,
        "Comparison built"
    );

    Ok(ComparisonResponse {
        employee_info: EmployeeInfo {
            employee_code: employee_code.to_string(),
            display_name,
            join_date: employee.as_ref().and_then(|e| e.join_date),
            in_directory: employee.is_some(),
            in_spreadsheet: entries.is_some(),
        },
        date_bounds: bounds,
        active_filter: filter,
        days,
        total_issues,
        degraded,
    })
}
