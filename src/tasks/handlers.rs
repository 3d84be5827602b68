use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateTaskRequest, ListTasksQuery, UpdateTaskRequest},
    repo,
    repo_types::Task,
    services::receivers,
};
use crate::{
    auth::AuthUser,
    employees,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath, ApiQuery},
    state::AppState,
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/manager/:employee_id", get(list_manager_tasks))
        .route("/tasks/:id", put(update_task).delete(delete_task))
}

#[instrument(skip(state))]
pub async fn list_tasks(
    State(state): State<AppState>,
    _caller: AuthUser,
    ApiQuery(q): ApiQuery<ListTasksQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(repo::list(&state.db, q.assigned_to).await?))
}

#[instrument(skip(state))]
pub async fn list_manager_tasks(
    State(state): State<AppState>,
    _caller: AuthUser,
    ApiPath(employee_id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(repo::list_assigned_by(&state.db, employee_id).await?))
}

/// Creates one task per receiver, all or nothing.
#[instrument(skip(state, payload))]
pub async fn create_task(
    State(state): State<AppState>,
    _caller: AuthUser,
    ApiJson(payload): ApiJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Vec<Task>>)> {
    let title = payload
        .title()
        .ok_or_else(|| ApiError::bad_request("Task title is required"))?
        .to_string();

    let staff = if payload.assigned_to.is_none() {
        employees::repo::list(&state.db).await?
    } else {
        Vec::new()
    };
    let to = receivers(payload.assigned_to, payload.site_name.as_deref(), &staff)?;

    let mut tx = state.db.begin().await.context("begin tx")?;
    let mut created = Vec::with_capacity(to.len());
    for employee_id in to {
        created.push(repo::insert_tx(&mut tx, employee_id, &title, &payload).await?);
    }
    tx.commit().await.context("commit tx")?;

    info!(count = created.len(), "tasks created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state, payload))]
pub async fn update_task(
    State(state): State<AppState>,
    _caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let task = repo::update(&state.db, id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Task"))?;
    Ok(Json(task))
}

#[instrument(skip(state))]
pub async fn delete_task(
    State(state): State<AppState>,
    _caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Task"));
    }
    Ok(StatusCode::NO_CONTENT)
}
