use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    dto::{CreateExpenseRequest, UpdateExpenseRequest},
    repo_types::Expense,
};

pub async fn list(db: &PgPool, contract_id: Option<Uuid>) -> anyhow::Result<Vec<Expense>> {
    let rows = sqlx::query_as::<_, Expense>(
        r#"
        SELECT id, contract_id, date, expense_type, description, gross, net, paid, created_at
        FROM expenses
        WHERE ($1::uuid IS NULL OR contract_id = $1)
        ORDER BY date DESC, created_at DESC
        "#,
    )
    .bind(contract_id)
    .fetch_all(db)
    .await
    .context("list expenses")?;
    Ok(rows)
}

pub async fn list_unpaid(db: &PgPool) -> anyhow::Result<Vec<Expense>> {
    let rows = sqlx::query_as::<_, Expense>(
        r#"
        SELECT id, contract_id, date, expense_type, description, gross, net, paid, created_at
        FROM expenses
        WHERE paid = FALSE
        ORDER BY date DESC
        "#,
    )
    .fetch_all(db)
    .await
    .context("list unpaid expenses")?;
    Ok(rows)
}

pub async fn get(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Expense>> {
    let row = sqlx::query_as::<_, Expense>(
        r#"
        SELECT id, contract_id, date, expense_type, description, gross, net, paid, created_at
        FROM expenses
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("get expense")?;
    Ok(row)
}

pub async fn create(db: &PgPool, req: &CreateExpenseRequest) -> anyhow::Result<Expense> {
    let row = sqlx::query_as::<_, Expense>(
        r#"
        INSERT INTO expenses (contract_id, date, expense_type, description, gross, net, paid)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, contract_id, date, expense_type, description, gross, net, paid, created_at
        "#,
    )
    .bind(req.contract_id)
    .bind(req.date)
    .bind(req.expense_type.trim())
    .bind(req.description.as_deref())
    .bind(req.gross)
    .bind(req.net)
    .bind(req.paid)
    .fetch_one(db)
    .await
    .context("insert expense")?;
    Ok(row)
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    req: &UpdateExpenseRequest,
) -> anyhow::Result<Option<Expense>> {
    let row = sqlx::query_as::<_, Expense>(
        r#"
        UPDATE expenses
        SET contract_id  = COALESCE($2, contract_id),
            date         = COALESCE($3, date),
            expense_type = COALESCE($4, expense_type),
            description  = COALESCE($5, description),
            gross        = COALESCE($6, gross),
            net          = COALESCE($7, net),
            paid         = COALESCE($8, paid)
        WHERE id = $1
        RETURNING id, contract_id, date, expense_type, description, gross, net, paid, created_at
        "#,
    )
    .bind(id)
    .bind(req.contract_id)
    .bind(req.date)
    .bind(req.expense_type.as_deref().map(str::trim))
    .bind(req.description.as_deref())
    .bind(req.gross)
    .bind(req.net)
    .bind(req.paid)
    .fetch_optional(db)
    .await
    .context("update expense")?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM expenses WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("delete expense")?;
    Ok(res.rows_affected() > 0)
}
