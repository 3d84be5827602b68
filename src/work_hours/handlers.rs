use anyhow::Context;
use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{PaidStatus, StructuredHours, SubmitWeekRequest, SubmitWeekResponse, WeekQuery},
    repo,
    repo_types::WorkHours,
    services::{plan_week, structure},
};
use crate::{
    auth::AuthUser,
    error::ApiResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    payments,
    state::AppState,
    week::WeekRange,
};

pub fn work_hours_routes() -> Router<AppState> {
    Router::new()
        .route("/work-hours", get(list_work_hours).post(submit_week))
        .route("/work-hours/structured", get(structured))
        .route(
            "/work-hours/paid-status",
            get(get_paid_status).put(set_paid_status),
        )
        .route("/work-hours/:employee_id", get(list_for_employee))
}

fn parse_week(raw: Option<&str>) -> ApiResult<Option<WeekRange>> {
    Ok(raw
        .filter(|w| !w.trim().is_empty())
        .map(WeekRange::parse)
        .transpose()?)
}

#[instrument(skip(state))]
pub async fn list_work_hours(
    State(state): State<AppState>,
    _caller: AuthUser,
    ApiQuery(q): ApiQuery<WeekQuery>,
) -> ApiResult<Json<Vec<WorkHours>>> {
    let week = parse_week(q.week.as_deref())?;
    Ok(Json(repo::list(&state.db, week).await?))
}

#[instrument(skip(state))]
pub async fn list_for_employee(
    State(state): State<AppState>,
    _caller: AuthUser,
    ApiPath(employee_id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<WorkHours>>> {
    Ok(Json(repo::list_for_employee(&state.db, employee_id).await?))
}

#[instrument(skip(state))]
pub async fn structured(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> ApiResult<Json<StructuredHours>> {
    let rows = repo::list(&state.db, None).await?;
    Ok(Json(structure(&rows)))
}

/// Saves the whole week grid in one transaction.
#[instrument(skip(state, payload))]
pub async fn submit_week(
    State(state): State<AppState>,
    _caller: AuthUser,
    ApiJson(payload): ApiJson<SubmitWeekRequest>,
) -> ApiResult<Json<SubmitWeekResponse>> {
    let week = WeekRange::parse(&payload.week_label)?;
    let plan = plan_week(week, &payload.hour_data)?;

    let mut tx = state.db.begin().await.context("begin tx")?;
    for day in &plan.upserts {
        repo::upsert_day_tx(&mut tx, day).await?;
    }
    for (employee_id, date) in &plan.clears {
        repo::clear_day_tx(&mut tx, *employee_id, *date).await?;
    }
    tx.commit().await.context("commit tx")?;

    info!(week = %week, saved = plan.upserts.len(), cleared = plan.clears.len(), "week saved");
    Ok(Json(SubmitWeekResponse {
        week: week.label(),
        saved: plan.upserts.len(),
        cleared: plan.clears.len(),
    }))
}

#[instrument(skip(state))]
pub async fn get_paid_status(
    State(state): State<AppState>,
    _caller: AuthUser,
    ApiQuery(q): ApiQuery<WeekQuery>,
) -> ApiResult<Json<Vec<PaidStatus>>> {
    let week = parse_week(q.week.as_deref())?.unwrap_or_else(WeekRange::current);
    Ok(Json(payments::repo::paid_status(&state.db, week).await?))
}

#[instrument(skip(state))]
pub async fn set_paid_status(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(payload): ApiJson<PaidStatus>,
) -> ApiResult<Json<PaidStatus>> {
    caller.require_staff()?;
    let week = WeekRange::parse(&payload.week)?;
    let payment =
        payments::services::mark_week_paid(&state.db, payload.employee_id, week, payload.paid)
            .await?;
    Ok(Json(PaidStatus {
        week: payment.week_label,
        employee_id: payment.employee_id,
        paid: payment.is_paid,
    }))
}
