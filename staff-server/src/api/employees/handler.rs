//! Employee API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{
    DependentAction, Employee, EmployeeRemovalRequest, ImpactSummary, RemovalOutcome,
    RemoveEmployeePayload,
};

use crate::core::ServerState;

async fn load_employee(state: &ServerState, id: i64) -> AppResult<Employee> {
    state.store.find_employee(id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::EmployeeNotFound, format!("Employee {id} not found"))
    })
}

/// Dependent record counts for the removal dialog
pub async fn impact(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ImpactSummary>> {
    load_employee(&state, id).await?;
    Ok(Json(state.impact.analyze(id).await))
}

/// Active employees that can receive the work items of `id`
pub async fn transfer_candidates(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Employee>>> {
    let candidates = state.store.list_active_employees_excluding(id).await?;
    Ok(Json(candidates))
}

/// Remove an employee and resolve its dependent records
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RemoveEmployeePayload>,
) -> AppResult<ApiResponse<RemovalOutcome>> {
    let employee = load_employee(&state, id).await?;

    let target_employee = match (payload.action, payload.target_employee_id) {
        (DependentAction::Transfer, Some(target_id)) => {
            let target = state.store.find_employee(target_id).await?.ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::TransferTargetInvalid,
                    format!("Transfer target {target_id} not found"),
                )
            })?;
            Some(target)
        }
        _ => None,
    };

    let request = EmployeeRemovalRequest {
        employee,
        action: payload.action,
        target_employee,
        actor: payload.operator,
    };

    let report = state.remover.execute(request).await;
    if report.succeeded() {
        return Ok(ApiResponse::success(report.outcome));
    }

    let code = report.error_code.unwrap_or(ErrorCode::Unknown);
    let message = report
        .outcome
        .error
        .clone()
        .unwrap_or_else(|| code.message().to_string());
    let err = AppError::with_message(code, message);
    Ok(ApiResponse::failure_with_data(&err, report.outcome))
}
