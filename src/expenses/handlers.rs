use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateExpenseRequest, ListExpensesQuery, TogglePaidRequest, UpdateExpenseRequest},
    repo,
    repo_types::Expense,
};
use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath, ApiQuery},
    state::AppState,
};

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route(
            "/expenses/:id",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
        .route("/expenses/:id/toggle-paid", put(toggle_paid))
}

#[instrument(skip(state, _caller))]
pub async fn list_expenses(
    State(state): State<AppState>,
    _caller: AuthUser,
    ApiQuery(q): ApiQuery<ListExpensesQuery>,
) -> ApiResult<Json<Vec<Expense>>> {
    Ok(Json(repo::list(&state.db, q.contract_id).await?))
}

#[instrument(skip(state, _caller))]
pub async fn get_expense(
    State(state): State<AppState>,
    _caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Expense>> {
    let expense = repo::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Expense"))?;
    Ok(Json(expense))
}

#[instrument(skip(state, payload))]
pub async fn create_expense(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(payload): ApiJson<CreateExpenseRequest>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    caller.require_staff()?;
    payload.validate()?;
    let expense = repo::create(&state.db, &payload).await?;
    info!(expense_id = %expense.id, gross = expense.gross, "expense created");
    Ok((StatusCode::CREATED, Json(expense)))
}

#[instrument(skip(state, payload))]
pub async fn update_expense(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateExpenseRequest>,
) -> ApiResult<Json<Expense>> {
    caller.require_staff()?;
    payload.validate()?;
    let expense = repo::update(&state.db, id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Expense"))?;
    Ok(Json(expense))
}

#[instrument(skip(state))]
pub async fn toggle_paid(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<TogglePaidRequest>,
) -> ApiResult<Json<Expense>> {
    caller.require_staff()?;
    let patch = UpdateExpenseRequest {
        paid: Some(payload.paid),
        ..Default::default()
    };
    let expense = repo::update(&state.db, id, &patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Expense"))?;
    Ok(Json(expense))
}

#[instrument(skip(state))]
pub async fn delete_expense(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    caller.require_staff()?;
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Expense"));
    }
    info!(expense_id = %id, "expense deleted");
    Ok(StatusCode::NO_CONTENT)
}
