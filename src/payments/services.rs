use anyhow::Context;
use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{dto::RecalculateResponse, repo, repo_types::Payment};
use crate::{
    employees,
    error::{ApiError, ApiResult},
    payroll::{LabelType, PayBreakdown},
    week::WeekRange,
    work_hours,
};

/// Fills in gross and net for every payment that has no gross amount, from
/// the hours logged in the payment's week.
pub async fn recalculate_missing(db: &PgPool) -> anyhow::Result<RecalculateResponse> {
    let mut tx = db.begin().await.context("begin tx")?;
    let missing = repo::missing_amounts_tx(&mut tx).await?;

    let mut updated = 0;
    let mut skipped = 0;
    for p in missing {
        let week = match WeekRange::parse(&p.week_label) {
            Ok(w) => w,
            Err(e) => {
                warn!(payment_id = %p.id, week_label = %p.week_label, error = %e, "skipping payment");
                skipped += 1;
                continue;
            }
        };
        let hours = work_hours::repo::total_hours_tx(&mut tx, p.employee_id, week).await?;
        let pay = PayBreakdown::compute(hours, p.hourly_rate, LabelType::from_db(&p.label_type));
        debug!(payment_id = %p.id, hours, gross = pay.gross, net = pay.net, "payment recalculated");
        repo::set_amounts_tx(&mut tx, p.id, pay.gross, pay.net).await?;
        updated += 1;
    }

    tx.commit().await.context("commit tx")?;
    info!(updated, skipped, "payment amounts recalculated");
    Ok(RecalculateResponse { updated, skipped })
}

/// Net for a gross amount under the employee's classification.
pub fn net_for(gross: f64, label_type: LabelType) -> f64 {
    PayBreakdown::from_gross(0.0, gross, label_type).net
}

/// Marks an employee's week as paid or unpaid. A missing payment is created
/// with amounts computed from that week's hours.
pub async fn mark_week_paid(
    db: &PgPool,
    employee_id: Uuid,
    week: WeekRange,
    paid: bool,
) -> ApiResult<Payment> {
    let employee = employees::repo::get(db, employee_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee"))?;

    let mut tx = db.begin().await.context("begin tx")?;
    let hours = work_hours::repo::total_hours_tx(&mut tx, employee_id, week).await?;
    let pay = PayBreakdown::compute(hours, employee.hourly_rate, employee.label_type);
    let payment = repo::upsert_paid_tx(&mut tx, employee_id, week, paid, pay.gross, pay.net).await?;
    tx.commit().await.context("commit tx")?;

    info!(%employee_id, employee = %employee.full_name(), week = %week, paid, "paid status set");
    Ok(payment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn net_follows_classification() {
        assert!((net_for(500.0, LabelType::Utr) - 400.0).abs() < 1e-9);
        assert!((net_for(500.0, LabelType::Ni) - 350.0).abs() < 1e-9);
    }
}
