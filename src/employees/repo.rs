use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    dto::{CreateEmployeeRequest, UpdateEmployeeRequest},
    repo_types::{Employee, EmployeeRow},
};

pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Employee>> {
    let rows = sqlx::query_as::<_, EmployeeRow>(
        r#"
        SELECT id, first_name, last_name, email, phone, hourly_rate, label_type,
               workplace, status, created_at
        FROM employees
        ORDER BY first_name, last_name
        "#,
    )
    .fetch_all(db)
    .await
    .context("list employees")?;
    Ok(rows.into_iter().map(Employee::from).collect())
}

pub async fn get(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Employee>> {
    let row = sqlx::query_as::<_, EmployeeRow>(
        r#"
        SELECT id, first_name, last_name, email, phone, hourly_rate, label_type,
               workplace, status, created_at
        FROM employees
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("get employee")?;
    Ok(row.map(Employee::from))
}

pub async fn create(db: &PgPool, req: &CreateEmployeeRequest) -> anyhow::Result<Employee> {
    let row = sqlx::query_as::<_, EmployeeRow>(
        r#"
        INSERT INTO employees
            (first_name, last_name, email, phone, hourly_rate, label_type, workplace, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 'active'))
        RETURNING id, first_name, last_name, email, phone, hourly_rate, label_type,
                  workplace, status, created_at
        "#,
    )
    .bind(req.first_name.trim())
    .bind(req.last_name.trim())
    .bind(&req.email)
    .bind(&req.phone)
    .bind(req.hourly_rate)
    .bind(req.label_type.as_ref())
    .bind(&req.workplace)
    .bind(&req.status)
    .fetch_one(db)
    .await
    .context("insert employee")?;
    Ok(row.into())
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    req: &UpdateEmployeeRequest,
) -> anyhow::Result<Option<Employee>> {
    let row = sqlx::query_as::<_, EmployeeRow>(
        r#"
        UPDATE employees
        SET first_name  = COALESCE($2, first_name),
            last_name   = COALESCE($3, last_name),
            email       = COALESCE($4, email),
            phone       = COALESCE($5, phone),
            hourly_rate = COALESCE($6, hourly_rate),
            label_type  = COALESCE($7, label_type),
            workplace   = COALESCE($8, workplace),
            status      = COALESCE($9, status)
        WHERE id = $1
        RETURNING id, first_name, last_name, email, phone, hourly_rate, label_type,
                  workplace, status, created_at
        "#,
    )
    .bind(id)
    .bind(&req.first_name)
    .bind(&req.last_name)
    .bind(&req.email)
    .bind(&req.phone)
    .bind(req.hourly_rate)
    .bind(req.label_type.map(|l| l.as_ref().to_string()))
    .bind(&req.workplace)
    .bind(&req.status)
    .fetch_optional(db)
    .await
    .context("update employee")?;
    Ok(row.map(Employee::from))
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM employees WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("delete employee")?;
    Ok(res.rows_affected() > 0)
}
