use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};

use crate::auth::auth::AuthUser;
use crate::error::ReconcileError;
use crate::model::comparison::{ComparisonQuery, ComparisonResponse};
use crate::reconcile::compare::build_comparison;
use crate::reconcile::time::today;
use crate::state::AppState;
use crate::utils::comparison_cache::CacheKey;

/// Day-by-day comparison of spreadsheet and database attendance
#[utoipa::path(
    get,
    path = "/api/reconcile/{employee}",
    params(
        ("employee" = String, Path, description = "Employee code"),
        ComparisonQuery
    ),
    responses(
        (status = 200, description = "Comparison for the requested window", body = ComparisonResponse),
        (status = 400, description = "Invalid filter, or no spreadsheet loaded and no database fallback", body = Object, example = json!({
            "message": "startDate cannot be after endDate"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee unknown to every source", body = Object, example = json!({
            "message": "Employee EMP-404 not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reconcile"
)]
pub async fn get_comparison(
    _auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ComparisonQuery>,
) -> Result<impl Responder, ReconcileError> {
    let employee_code = path.into_inner();
    let key = CacheKey {
        employee_code: employee_code.clone(),
        query: query.into_inner(),
    };

    if let Some(cached) = state.cache.get(&key).await {
        return Ok(HttpResponse::Ok().json(cached.as_ref()));
    }
    let generation = state.cache.generation(&employee_code);

    let response = build_comparison(
        &state.comparison_sources(),
        &employee_code,
        &key.query,
        state.settings.missing_direction,
        today(),
    )
    .await?;

    let response = Arc::new(response);
    // a degraded view must not outlive the outage
    if !response.degraded {
        state.cache.insert(key, response.clone(), generation).await;
    }

    Ok(HttpResponse::Ok().json(response.as_ref()))
}
