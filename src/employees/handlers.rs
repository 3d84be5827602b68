use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateEmployeeRequest, UpdateEmployeeRequest},
    repo,
    repo_types::Employee,
};
use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    state::AppState,
};

pub fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

#[instrument(skip(state, _caller))]
pub async fn list_employees(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> ApiResult<Json<Vec<Employee>>> {
    Ok(Json(repo::list(&state.db).await?))
}

#[instrument(skip(state, _caller))]
pub async fn get_employee(
    State(state): State<AppState>,
    _caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Employee>> {
    let employee = repo::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee"))?;
    Ok(Json(employee))
}

#[instrument(skip(state, payload))]
pub async fn create_employee(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(payload): ApiJson<CreateEmployeeRequest>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    caller.require_staff()?;
    payload.validate()?;
    let employee = repo::create(&state.db, &payload).await?;
    info!(employee_id = %employee.id, "employee created");
    Ok((StatusCode::CREATED, Json(employee)))
}

#[instrument(skip(state, payload))]
pub async fn update_employee(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateEmployeeRequest>,
) -> ApiResult<Json<Employee>> {
    caller.require_staff()?;
    payload.validate()?;
    let employee = repo::update(&state.db, id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee"))?;
    Ok(Json(employee))
}

#[instrument(skip(state))]
pub async fn delete_employee(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    caller.require_staff()?;
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Employee"));
    }
    info!(employee_id = %id, "employee deleted");
    Ok(StatusCode::NO_CONTENT)
}
