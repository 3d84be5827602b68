use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{check_amount, CreatePaymentRequest, RecalculateResponse, UpdatePaymentRequest},
    repo,
    repo_types::Payment,
    services::{net_for, recalculate_missing},
};
use crate::{
    auth::AuthUser,
    employees,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    state::AppState,
    week::WeekRange,
};

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments).post(create_payment))
        .route("/payments/recalculate", post(recalculate))
        .route(
            "/payments/:id",
            get(list_for_employee).put(update_payment).delete(delete_payment),
        )
}

#[instrument(skip(state))]
pub async fn list_payments(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> ApiResult<Json<Vec<Payment>>> {
    let payments = repo::list(&state.db).await?;
    tracing::debug!(rows = payments.len(), "payments listed");
    Ok(Json(payments))
}

/// `GET /payments/:employee_id`; the path segment is the employee.
#[instrument(skip(state))]
pub async fn list_for_employee(
    State(state): State<AppState>,
    _caller: AuthUser,
    ApiPath(employee_id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<Payment>>> {
    Ok(Json(repo::list_for_employee(&state.db, employee_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_payment(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(payload): ApiJson<CreatePaymentRequest>,
) -> ApiResult<(StatusCode, Json<Payment>)> {
    caller.require_staff()?;
    check_amount(payload.gross_amount, "gross_amount")?;
    check_amount(payload.net_amount, "net_amount")?;
    let week = WeekRange::parse(&payload.week_label)?;

    let employee = employees::repo::get(&state.db, payload.employee_id)
        .await?
        .ok_or_else(|| ApiError::bad_request("Unknown employee"))?;

    if repo::exists_for_week(&state.db, employee.id, week).await? {
        warn!(employee_id = %employee.id, week = %week, "duplicate payment");
        return Err(ApiError::Conflict(format!("Payment for {week} already exists")));
    }

    let net = payload
        .net_amount
        .or_else(|| payload.gross_amount.map(|g| net_for(g, employee.label_type)));

    let payment = repo::create(
        &state.db,
        employee.id,
        payload.contract_id,
        week,
        payload.is_paid,
        payload.gross_amount,
        net,
    )
    .await?;
    info!(payment_id = %payment.id, "payment created");
    Ok((StatusCode::CREATED, Json(payment)))
}

#[instrument(skip(state, payload))]
pub async fn update_payment(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdatePaymentRequest>,
) -> ApiResult<Json<Payment>> {
    caller.require_staff()?;
    check_amount(payload.gross_amount, "gross_amount")?;
    check_amount(payload.net_amount, "net_amount")?;
    let payment = repo::update(&state.db, id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Payment"))?;
    Ok(Json(payment))
}

#[instrument(skip(state))]
pub async fn delete_payment(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    caller.require_staff()?;
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Payment"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn recalculate(
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<RecalculateResponse>> {
    caller.require_admin()?;
    Ok(Json(recalculate_missing(&state.db).await?))
}
