use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{
    dto::{CreateTaskRequest, UpdateTaskRequest},
    repo_types::{Task, TaskRow},
};

pub async fn list(db: &PgPool, assigned_to: Option<Uuid>) -> anyhow::Result<Vec<Task>> {
    let rows = sqlx::query_as::<_, TaskRow>(
        r#"
        SELECT id, assigned_to, assigned_by, title, description, status, site_name,
               due_date, created_at
        FROM tasks
        WHERE $1::uuid IS NULL OR assigned_to = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(assigned_to)
    .fetch_all(db)
    .await
    .context("list tasks")?;
    Ok(rows.into_iter().map(Task::from).collect())
}

pub async fn list_assigned_by(db: &PgPool, employee_id: Uuid) -> anyhow::Result<Vec<Task>> {
    let rows = sqlx::query_as::<_, TaskRow>(
        r#"
        SELECT id, assigned_to, assigned_by, title, description, status, site_name,
               due_date, created_at
        FROM tasks
        WHERE assigned_by = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(employee_id)
    .fetch_all(db)
    .await
    .context("list tasks by manager")?;
    Ok(rows.into_iter().map(Task::from).collect())
}

pub async fn insert_tx(
    tx: &mut Transaction<'_, Postgres>,
    assigned_to: Uuid,
    title: &str,
    req: &CreateTaskRequest,
) -> anyhow::Result<Task> {
    let row = sqlx::query_as::<_, TaskRow>(
        r#"
        INSERT INTO tasks (assigned_to, assigned_by, title, description, status, site_name, due_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, assigned_to, assigned_by, title, description, status, site_name,
                  due_date, created_at
        "#,
    )
    .bind(assigned_to)
    .bind(req.assigned_by)
    .bind(title)
    .bind(&req.description)
    .bind(req.status.as_ref())
    .bind(&req.site_name)
    .bind(req.due_date)
    .fetch_one(&mut **tx)
    .await
    .context("insert task")?;
    Ok(row.into())
}

pub async fn update(db: &PgPool, id: Uuid, req: &UpdateTaskRequest) -> anyhow::Result<Option<Task>> {
    let row = sqlx::query_as::<_, TaskRow>(
        r#"
        UPDATE tasks
        SET assigned_to = COALESCE($2, assigned_to),
            title       = COALESCE($3, title),
            description = COALESCE($4, description),
            status      = COALESCE($5, status),
            site_name   = COALESCE($6, site_name),
            due_date    = COALESCE($7, due_date)
        WHERE id = $1
        RETURNING id, assigned_to, assigned_by, title, description, status, site_name,
                  due_date, created_at
        "#,
    )
    .bind(id)
    .bind(req.assigned_to)
    .bind(&req.title)
    .bind(&req.description)
    .bind(req.status.map(|s| s.as_ref().to_string()))
    .bind(&req.site_name)
    .bind(req.due_date)
    .fetch_optional(db)
    .await
    .context("update task")?;
    Ok(row.map(Task::from))
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("delete task")?;
    Ok(res.rows_affected() > 0)
}
