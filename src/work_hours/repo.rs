use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use time::Date;
use uuid::Uuid;

use super::repo_types::{DayUpsert, WorkHours};
use crate::week::WeekRange;

pub async fn list(db: &PgPool, week: Option<WeekRange>) -> anyhow::Result<Vec<WorkHours>> {
    let rows = sqlx::query_as::<_, WorkHours>(
        r#"
        SELECT id, employee_id, contract_id, date, hours, site, created_at
        FROM work_hours
        WHERE ($1::date IS NULL OR date >= $1) AND ($2::date IS NULL OR date <= $2)
        ORDER BY employee_id, date
        "#,
    )
    .bind(week.map(|w| w.monday()))
    .bind(week.map(|w| w.sunday()))
    .fetch_all(db)
    .await
    .context("list work hours")?;
    Ok(rows)
}

pub async fn list_for_employee(db: &PgPool, employee_id: Uuid) -> anyhow::Result<Vec<WorkHours>> {
    let rows = sqlx::query_as::<_, WorkHours>(
        r#"
        SELECT id, employee_id, contract_id, date, hours, site, created_at
        FROM work_hours
        WHERE employee_id = $1
        ORDER BY date DESC
        "#,
    )
    .bind(employee_id)
    .fetch_all(db)
    .await
    .context("list work hours for employee")?;
    Ok(rows)
}

/// Hours an employee logged inside `week`.
pub async fn total_hours_tx(
    tx: &mut Transaction<'_, Postgres>,
    employee_id: Uuid,
    week: WeekRange,
) -> anyhow::Result<f64> {
    let (total,): (f64,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(hours), 0)::float8
        FROM work_hours
        WHERE employee_id = $1 AND date >= $2 AND date <= $3
        "#,
    )
    .bind(employee_id)
    .bind(week.monday())
    .bind(week.sunday())
    .fetch_one(&mut **tx)
    .await
    .context("sum work hours")?;
    Ok(total)
}

pub async fn upsert_day_tx(
    tx: &mut Transaction<'_, Postgres>,
    day: &DayUpsert,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO work_hours (employee_id, contract_id, date, hours, site)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (employee_id, date)
        DO UPDATE SET contract_id = EXCLUDED.contract_id,
                      hours       = EXCLUDED.hours,
                      site        = EXCLUDED.site
        "#,
    )
    .bind(day.employee_id)
    .bind(day.contract_id)
    .bind(day.date)
    .bind(day.hours)
    .bind(&day.site)
    .execute(&mut **tx)
    .await
    .context("upsert work hours")?;
    Ok(())
}

pub async fn clear_day_tx(
    tx: &mut Transaction<'_, Postgres>,
    employee_id: Uuid,
    date: Date,
) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM work_hours WHERE employee_id = $1 AND date = $2")
        .bind(employee_id)
        .bind(date)
        .execute(&mut **tx)
        .await
        .context("clear work hours")?;
    Ok(())
}
