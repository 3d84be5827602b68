use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreateContractRequest, UpdateContractRequest},
    repo,
    repo_types::Contract,
    services::{next_contract_number, toggle_closure},
};
use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    state::AppState,
};

pub fn contract_routes() -> Router<AppState> {
    Router::new()
        .route("/contracts", get(list_contracts).post(create_contract))
        .route(
            "/contracts/:id",
            get(get_contract).put(update_contract).delete(delete_contract),
        )
        .route("/contracts/:id/toggle-close", post(toggle_close))
}

#[instrument(skip(state, _caller))]
pub async fn list_contracts(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> ApiResult<Json<Vec<Contract>>> {
    Ok(Json(repo::list(&state.db).await?))
}

#[instrument(skip(state, _caller))]
pub async fn get_contract(
    State(state): State<AppState>,
    _caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Contract>> {
    let contract = repo::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Contract"))?;
    Ok(Json(contract))
}

#[instrument(skip(state, payload))]
pub async fn create_contract(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(payload): ApiJson<CreateContractRequest>,
) -> ApiResult<(StatusCode, Json<Contract>)> {
    caller.require_staff()?;
    payload.validate()?;

    let existing = repo::list_numbers(&state.db).await?;
    let number = match payload.contract_number.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => {
            if existing.iter().any(|e| e == n) {
                warn!(contract_number = %n, "duplicate contract number");
                return Err(ApiError::Conflict(format!("Contract number {n} already exists")));
            }
            n.to_string()
        }
        _ => next_contract_number(existing.iter().map(String::as_str)),
    };

    let contract = repo::create(&state.db, &payload, &number).await?;
    info!(contract_id = %contract.id, contract_number = %contract.contract_number, "contract created");
    Ok((StatusCode::CREATED, Json(contract)))
}

#[instrument(skip(state, payload))]
pub async fn update_contract(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateContractRequest>,
) -> ApiResult<Json<Contract>> {
    caller.require_staff()?;
    let stored = repo::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Contract"))?;
    payload.validate(stored.start_date, stored.finish_date)?;
    let contract = repo::update(&state.db, id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Contract"))?;
    Ok(Json(contract))
}

#[instrument(skip(state))]
pub async fn toggle_close(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Contract>> {
    caller.require_staff()?;
    let current = repo::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Contract"))?;

    let closure = toggle_closure(
        current.closed_manually,
        current.finish_date,
        OffsetDateTime::now_utc(),
    );
    let contract = repo::set_closure(&state.db, id, closure)
        .await?
        .ok_or_else(|| ApiError::not_found("Contract"))?;

    info!(contract_id = %id, status = %contract.status, "contract closure toggled");
    Ok(Json(contract))
}

#[instrument(skip(state))]
pub async fn delete_contract(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    caller.require_staff()?;
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Contract"));
    }
    info!(contract_id = %id, "contract deleted");
    Ok(StatusCode::NO_CONTENT)
}
