use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    dto::{CreateContractRequest, UpdateContractRequest},
    repo_types::{Closure, Contract, ContractRow},
};

pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Contract>> {
    let rows = sqlx::query_as::<_, ContractRow>(
        r#"
        SELECT id, contract_number, company, company_email, site_name, contract_value,
               start_date, finish_date, status, closed_manually, closed_date,
               documents, comments, created_at
        FROM contracts
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await
    .context("list contracts")?;
    Ok(rows.into_iter().map(Contract::from).collect())
}

pub async fn get(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Contract>> {
    let row = sqlx::query_as::<_, ContractRow>(
        r#"
        SELECT id, contract_number, company, company_email, site_name, contract_value,
               start_date, finish_date, status, closed_manually, closed_date,
               documents, comments, created_at
        FROM contracts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("get contract")?;
    Ok(row.map(Contract::from))
}

pub async fn get_by_number(db: &PgPool, number: &str) -> anyhow::Result<Option<Contract>> {
    let row = sqlx::query_as::<_, ContractRow>(
        r#"
        SELECT id, contract_number, company, company_email, site_name, contract_value,
               start_date, finish_date, status, closed_manually, closed_date,
               documents, comments, created_at
        FROM contracts
        WHERE contract_number = $1
        "#,
    )
    .bind(number)
    .fetch_optional(db)
    .await
    .context("get contract by number")?;
    Ok(row.map(Contract::from))
}

pub async fn list_numbers(db: &PgPool) -> anyhow::Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as("SELECT contract_number FROM contracts")
        .fetch_all(db)
        .await
        .context("list contract numbers")?;
    Ok(rows.into_iter().map(|(n,)| n).collect())
}

pub async fn create(
    db: &PgPool,
    req: &CreateContractRequest,
    contract_number: &str,
) -> anyhow::Result<Contract> {
    let row = sqlx::query_as::<_, ContractRow>(
        r#"
        INSERT INTO contracts
            (contract_number, company, company_email, site_name, contract_value,
             start_date, finish_date, status, documents, comments)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, '[]'::jsonb), COALESCE($10, '[]'::jsonb))
        RETURNING id, contract_number, company, company_email, site_name, contract_value,
                  start_date, finish_date, status, closed_manually, closed_date,
                  documents, comments, created_at
        "#,
    )
    .bind(contract_number)
    .bind(req.company.trim())
    .bind(&req.company_email)
    .bind(req.site_name.trim())
    .bind(req.contract_value)
    .bind(req.start_date)
    .bind(req.finish_date)
    .bind(req.status.unwrap_or_default().as_ref())
    .bind(&req.documents)
    .bind(&req.comments)
    .fetch_one(db)
    .await
    .context("insert contract")?;
    Ok(row.into())
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    req: &UpdateContractRequest,
) -> anyhow::Result<Option<Contract>> {
    let row = sqlx::query_as::<_, ContractRow>(
        r#"
        UPDATE contracts
        SET company        = COALESCE($2, company),
            company_email  = COALESCE($3, company_email),
            site_name      = COALESCE($4, site_name),
            contract_value = COALESCE($5, contract_value),
            start_date     = COALESCE($6, start_date),
            finish_date    = COALESCE($7, finish_date),
            status         = COALESCE($8, status),
            documents      = COALESCE($9, documents),
            comments       = COALESCE($10, comments)
        WHERE id = $1
        RETURNING id, contract_number, company, company_email, site_name, contract_value,
                  start_date, finish_date, status, closed_manually, closed_date,
                  documents, comments, created_at
        "#,
    )
    .bind(id)
    .bind(&req.company)
    .bind(&req.company_email)
    .bind(&req.site_name)
    .bind(req.contract_value)
    .bind(req.start_date)
    .bind(req.finish_date)
    .bind(req.status.map(|s| s.as_ref().to_string()))
    .bind(&req.documents)
    .bind(&req.comments)
    .fetch_optional(db)
    .await
    .context("update contract")?;
    Ok(row.map(Contract::from))
}

pub async fn set_closure(db: &PgPool, id: Uuid, c: Closure) -> anyhow::Result<Option<Contract>> {
    let row = sqlx::query_as::<_, ContractRow>(
        r#"
        UPDATE contracts
        SET closed_manually = $2, status = $3, closed_date = $4
        WHERE id = $1
        RETURNING id, contract_number, company, company_email, site_name, contract_value,
                  start_date, finish_date, status, closed_manually, closed_date,
                  documents, comments, created_at
        "#,
    )
    .bind(id)
    .bind(c.closed_manually)
    .bind(c.status.as_ref())
    .bind(c.closed_date)
    .fetch_optional(db)
    .await
    .context("set contract closure")?;
    Ok(row.map(Contract::from))
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM contracts WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("delete contract")?;
    Ok(res.rows_affected() > 0)
}
