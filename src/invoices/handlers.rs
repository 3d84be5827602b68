use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateInvoiceRequest, TogglePaidRequest, UpdateInvoiceRequest},
    repo::{self, NewInvoice},
    repo_types::Invoice,
    services::{next_invoice_number, normalize_items},
};
use crate::{
    auth::AuthUser,
    contracts,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    state::AppState,
};

/// `:key` is a contract number for list and create, an invoice id otherwise.
pub fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices))
        .route(
            "/invoices/:key",
            get(list_for_contract)
                .post(create_invoice)
                .put(update_invoice)
                .delete(delete_invoice),
        )
        .route("/invoices/:key/toggle-paid", put(toggle_paid))
}

#[instrument(skip(state, _caller))]
pub async fn list_invoices(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> ApiResult<Json<Vec<Invoice>>> {
    Ok(Json(repo::list(&state.db).await?))
}

#[instrument(skip(state, _caller))]
pub async fn list_for_contract(
    State(state): State<AppState>,
    _caller: AuthUser,
    ApiPath(contract_number): ApiPath<String>,
) -> ApiResult<Json<Vec<Invoice>>> {
    Ok(Json(repo::list_for_contract(&state.db, &contract_number).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_invoice(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(contract_number): ApiPath<String>,
    ApiJson(payload): ApiJson<CreateInvoiceRequest>,
) -> ApiResult<(StatusCode, Json<Invoice>)> {
    caller.require_staff()?;
    payload.validate()?;

    let contract = contracts::repo::get_by_number(&state.db, &contract_number)
        .await?
        .ok_or_else(|| ApiError::not_found("Contract"))?;

    let number = match payload.invoice_number.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => {
            let existing = repo::list_for_contract(&state.db, &contract.contract_number).await?;
            next_invoice_number(&contract.site_name, existing.len())
        }
    };

    let other = payload.other_amount();
    let invoice = repo::create(
        &state.db,
        NewInvoice {
            contract_number: &contract.contract_number,
            invoice_number: &number,
            date: payload.date,
            description: payload.description.as_deref(),
            items: normalize_items(payload.items),
            other,
            paid: payload.paid,
        },
    )
    .await?;
    info!(invoice_id = %invoice.id, invoice_number = %number, total = invoice.totals.total, "invoice created");
    Ok((StatusCode::CREATED, Json(invoice)))
}

#[instrument(skip(state, payload))]
pub async fn update_invoice(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(mut payload): ApiJson<UpdateInvoiceRequest>,
) -> ApiResult<Json<Invoice>> {
    caller.require_staff()?;
    payload.validate()?;
    let items = payload.items.take().map(normalize_items);
    let invoice = repo::update(&state.db, id, &payload, items)
        .await?
        .ok_or_else(|| ApiError::not_found("Invoice"))?;
    Ok(Json(invoice))
}

#[instrument(skip(state))]
pub async fn toggle_paid(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<TogglePaidRequest>,
) -> ApiResult<Json<Invoice>> {
    caller.require_staff()?;
    let invoice = repo::set_paid(&state.db, id, payload.paid)
        .await?
        .ok_or_else(|| ApiError::not_found("Invoice"))?;
    info!(invoice_id = %id, paid = invoice.paid, "invoice paid flag set");
    Ok(Json(invoice))
}

#[instrument(skip(state))]
pub async fn delete_invoice(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    caller.require_staff()?;
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Invoice"));
    }
    info!(invoice_id = %id, "invoice deleted");
    Ok(StatusCode::NO_CONTENT)
}
