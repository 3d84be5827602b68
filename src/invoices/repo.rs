use anyhow::Context;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::{
    dto::UpdateInvoiceRequest,
    repo_types::{Invoice, InvoiceItem, InvoiceRow},
};

pub struct NewInvoice<'a> {
    pub contract_number: &'a str,
    pub invoice_number: &'a str,
    pub date: Option<time::Date>,
    pub description: Option<&'a str>,
    pub items: Vec<InvoiceItem>,
    pub other: f64,
    pub paid: bool,
}

pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Invoice>> {
    let rows = sqlx::query_as::<_, InvoiceRow>(
        r#"
        SELECT id, contract_number, invoice_number, date, description, items, other, paid, created_at
        FROM invoices
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await
    .context("list invoices")?;
    Ok(rows.into_iter().map(Invoice::from).collect())
}

pub async fn list_for_contract(db: &PgPool, contract_number: &str) -> anyhow::Result<Vec<Invoice>> {
    let rows = sqlx::query_as::<_, InvoiceRow>(
        r#"
        SELECT id, contract_number, invoice_number, date, description, items, other, paid, created_at
        FROM invoices
        WHERE contract_number = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(contract_number)
    .fetch_all(db)
    .await
    .context("list invoices for contract")?;
    Ok(rows.into_iter().map(Invoice::from).collect())
}

pub async fn list_unpaid(db: &PgPool) -> anyhow::Result<Vec<Invoice>> {
    let rows = sqlx::query_as::<_, InvoiceRow>(
        r#"
        SELECT id, contract_number, invoice_number, date, description, items, other, paid, created_at
        FROM invoices
        WHERE paid = FALSE
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await
    .context("list unpaid invoices")?;
    Ok(rows.into_iter().map(Invoice::from).collect())
}

pub async fn create(db: &PgPool, new: NewInvoice<'_>) -> anyhow::Result<Invoice> {
    let row = sqlx::query_as::<_, InvoiceRow>(
        r#"
        INSERT INTO invoices (contract_number, invoice_number, date, description, items, other, paid)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, contract_number, invoice_number, date, description, items, other, paid, created_at
        "#,
    )
    .bind(new.contract_number)
    .bind(new.invoice_number)
    .bind(new.date)
    .bind(new.description)
    .bind(Json(new.items))
    .bind(new.other)
    .bind(new.paid)
    .fetch_one(db)
    .await
    .context("insert invoice")?;
    Ok(row.into())
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    req: &UpdateInvoiceRequest,
    items: Option<Vec<InvoiceItem>>,
) -> anyhow::Result<Option<Invoice>> {
    let row = sqlx::query_as::<_, InvoiceRow>(
        r#"
        UPDATE invoices
        SET invoice_number = COALESCE($2, invoice_number),
            date           = COALESCE($3, date),
            description    = COALESCE($4, description),
            items          = COALESCE($5, items),
            other          = COALESCE($6, other),
            paid           = COALESCE($7, paid)
        WHERE id = $1
        RETURNING id, contract_number, invoice_number, date, description, items, other, paid, created_at
        "#,
    )
    .bind(id)
    .bind(req.invoice_number.as_deref())
    .bind(req.date)
    .bind(req.description.as_deref())
    .bind(items.map(Json))
    .bind(req.other)
    .bind(req.paid)
    .fetch_optional(db)
    .await
    .context("update invoice")?;
    Ok(row.map(Invoice::from))
}

pub async fn set_paid(db: &PgPool, id: Uuid, paid: bool) -> anyhow::Result<Option<Invoice>> {
    let row = sqlx::query_as::<_, InvoiceRow>(
        r#"
        UPDATE invoices SET paid = $2
        WHERE id = $1
        RETURNING id, contract_number, invoice_number, date, description, items, other, paid, created_at
        "#,
    )
    .bind(id)
    .bind(paid)
    .fetch_optional(db)
    .await
    .context("set invoice paid")?;
    Ok(row.map(Invoice::from))
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM invoices WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("delete invoice")?;
    Ok(res.rows_affected() > 0)
}
