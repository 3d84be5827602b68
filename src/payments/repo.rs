use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{
    dto::UpdatePaymentRequest,
    repo_types::{MissingAmountRow, PaidPaymentRow, Payment},
};
use crate::{week::WeekRange, work_hours::dto::PaidStatus};

pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Payment>> {
    let rows = sqlx::query_as::<_, Payment>(
        r#"
        SELECT id, employee_id, contract_id, week_label, gross_amount, net_amount, is_paid,
               created_at, updated_at
        FROM payments
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await
    .context("list payments")?;
    Ok(rows)
}

pub async fn list_for_employee(db: &PgPool, employee_id: Uuid) -> anyhow::Result<Vec<Payment>> {
    let rows = sqlx::query_as::<_, Payment>(
        r#"
        SELECT id, employee_id, contract_id, week_label, gross_amount, net_amount, is_paid,
               created_at, updated_at
        FROM payments
        WHERE employee_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(employee_id)
    .fetch_all(db)
    .await
    .context("list payments for employee")?;
    Ok(rows)
}

pub async fn create(
    db: &PgPool,
    employee_id: Uuid,
    contract_id: Option<Uuid>,
    week: WeekRange,
    is_paid: bool,
    gross_amount: Option<f64>,
    net_amount: Option<f64>,
) -> anyhow::Result<Payment> {
    let row = sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments (employee_id, contract_id, week_label, is_paid, gross_amount, net_amount)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, employee_id, contract_id, week_label, gross_amount, net_amount, is_paid,
                  created_at, updated_at
        "#,
    )
    .bind(employee_id)
    .bind(contract_id)
    .bind(week.label())
    .bind(is_paid)
    .bind(gross_amount)
    .bind(net_amount)
    .fetch_one(db)
    .await
    .context("insert payment")?;
    Ok(row)
}

pub async fn exists_for_week(db: &PgPool, employee_id: Uuid, week: WeekRange) -> anyhow::Result<bool> {
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM payments WHERE employee_id = $1 AND week_label = $2)",
    )
    .bind(employee_id)
    .bind(week.label())
    .fetch_one(db)
    .await
    .context("check payment exists")?;
    Ok(exists)
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    req: &UpdatePaymentRequest,
) -> anyhow::Result<Option<Payment>> {
    let row = sqlx::query_as::<_, Payment>(
        r#"
        UPDATE payments
        SET is_paid      = COALESCE($2, is_paid),
            gross_amount = COALESCE($3, gross_amount),
            net_amount   = COALESCE($4, net_amount),
            updated_at   = NOW()
        WHERE id = $1
        RETURNING id, employee_id, contract_id, week_label, gross_amount, net_amount, is_paid,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(req.is_paid)
    .bind(req.gross_amount)
    .bind(req.net_amount)
    .fetch_optional(db)
    .await
    .context("update payment")?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM payments WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("delete payment")?;
    Ok(res.rows_affected() > 0)
}

pub async fn missing_amounts_tx(
    tx: &mut Transaction<'_, Postgres>,
) -> anyhow::Result<Vec<MissingAmountRow>> {
    let rows = sqlx::query_as::<_, MissingAmountRow>(
        r#"
        SELECT p.id, p.employee_id, p.week_label, e.hourly_rate, e.label_type
        FROM payments p
        JOIN employees e ON p.employee_id = e.id
        WHERE p.gross_amount IS NULL
        ORDER BY p.week_label DESC
        FOR UPDATE OF p
        "#,
    )
    .fetch_all(&mut **tx)
    .await
    .context("list payments missing amounts")?;
    Ok(rows)
}

pub async fn set_amounts_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    gross: f64,
    net: f64,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE payments
        SET gross_amount = $2, net_amount = $3, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(gross)
    .bind(net)
    .execute(&mut **tx)
    .await
    .context("set payment amounts")?;
    Ok(())
}

/// Sets the paid flag for an employee's week, creating the payment when
/// missing. Stored amounts win over the computed ones.
pub async fn upsert_paid_tx(
    tx: &mut Transaction<'_, Postgres>,
    employee_id: Uuid,
    week: WeekRange,
    paid: bool,
    gross: f64,
    net: f64,
) -> anyhow::Result<Payment> {
    let row = sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments (employee_id, week_label, is_paid, gross_amount, net_amount)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (employee_id, week_label)
        DO UPDATE SET is_paid      = EXCLUDED.is_paid,
                      gross_amount = COALESCE(payments.gross_amount, EXCLUDED.gross_amount),
                      net_amount   = COALESCE(payments.net_amount, EXCLUDED.net_amount),
                      updated_at   = NOW()
        RETURNING id, employee_id, contract_id, week_label, gross_amount, net_amount, is_paid,
                  created_at, updated_at
        "#,
    )
    .bind(employee_id)
    .bind(week.label())
    .bind(paid)
    .bind(gross)
    .bind(net)
    .fetch_one(&mut **tx)
    .await
    .context("upsert paid status")?;
    Ok(row)
}

pub async fn paid_status(db: &PgPool, week: WeekRange) -> anyhow::Result<Vec<PaidStatus>> {
    let rows: Vec<(String, Uuid, bool)> = sqlx::query_as(
        r#"
        SELECT week_label, employee_id, is_paid
        FROM payments
        WHERE week_label = $1
        "#,
    )
    .bind(week.label())
    .fetch_all(db)
    .await
    .context("list paid status")?;
    Ok(rows
        .into_iter()
        .map(|(week, employee_id, paid)| PaidStatus { week, employee_id, paid })
        .collect())
}

pub async fn paid_gross_for_week(db: &PgPool, week: WeekRange) -> anyhow::Result<f64> {
    let (total,): (f64,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(gross_amount), 0)::float8
        FROM payments
        WHERE week_label = $1 AND is_paid = TRUE
        "#,
    )
    .bind(week.label())
    .fetch_one(db)
    .await
    .context("sum paid gross")?;
    Ok(total)
}

/// Latest week label that has paid payments. Labels sort chronologically.
pub async fn latest_paid_week(db: &PgPool) -> anyhow::Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as(
        r#"
        SELECT week_label
        FROM payments
        WHERE is_paid = TRUE
        ORDER BY week_label DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(db)
    .await
    .context("latest paid week")?;
    Ok(row.map(|(w,)| w))
}

pub async fn paid_for_week(db: &PgPool, week: WeekRange) -> anyhow::Result<Vec<PaidPaymentRow>> {
    let rows = sqlx::query_as::<_, PaidPaymentRow>(
        r#"
        SELECT p.employee_id, e.first_name, e.last_name, p.gross_amount, p.is_paid
        FROM payments p
        JOIN employees e ON p.employee_id = e.id
        WHERE p.week_label = $1 AND p.is_paid = TRUE
        ORDER BY p.created_at ASC
        "#,
    )
    .bind(week.label())
    .fetch_all(db)
    .await
    .context("list paid payments for week")?;
    Ok(rows)
}
