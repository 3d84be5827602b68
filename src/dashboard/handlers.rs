use std::collections::HashMap;

use axum::{extract::State, routing::get, Json, Router};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{
    dto::DashboardStats,
    services::{build_stats, choose_week, DashboardInput},
};
use crate::{
    auth::AuthUser,
    contracts, employees, expenses,
    error::ApiResult,
    invoices, payments,
    payroll::{EmployeeRate, HoursEntry},
    state::AppState,
    tasks,
    week::WeekRange,
    work_hours,
};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/work-hours/dashboard-stats", get(dashboard_stats))
        .route("/dashboard", get(dashboard_stats))
}

#[instrument(skip(state, _caller))]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> ApiResult<Json<DashboardStats>> {
    let db = &state.db;
    let current = WeekRange::current();
    let (paid_gross, latest) = tokio::try_join!(
        payments::repo::paid_gross_for_week(db, current),
        payments::repo::latest_paid_week(db),
    )?;
    let week = choose_week(current, paid_gross, latest.as_deref());
    let fallback = week != current;
    debug!(week = %week, fallback, "dashboard week chosen");

    let (hours, staff, paid, all_tasks, unpaid_invoices, all_contracts, unpaid_expenses) = tokio::try_join!(
        work_hours::repo::list(db, Some(week)),
        employees::repo::list(db),
        payments::repo::paid_for_week(db, week),
        tasks::repo::list(db, None),
        invoices::repo::list_unpaid(db),
        contracts::repo::list(db),
        expenses::repo::list_unpaid(db),
    )?;

    let entries: Vec<HoursEntry> = hours.iter().map(HoursEntry::from).collect();
    let rates: HashMap<Uuid, EmployeeRate> = staff.iter().map(|e| (e.id, e.rate())).collect();
    let sites: HashMap<String, String> = all_contracts
        .into_iter()
        .map(|c| (c.contract_number, c.site_name))
        .collect();

    Ok(Json(build_stats(DashboardInput {
        week,
        hours: &entries,
        rates: &rates,
        paid,
        task_stats: tasks::services::stats(&all_tasks),
        unpaid_invoices,
        sites: &sites,
        unpaid_expenses,
    })))
}
