use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewUser, User, UserPatch, UserRow};

impl User {
    /// Find a user by (lowercased) email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, role, employee_id, first_name, last_name,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
        .context("find user by email")?;
        Ok(row.map(User::from))
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, role, employee_id, first_name, last_name,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find user by id")?;
        Ok(row.map(User::from))
    }
}

pub async fn list(db: &PgPool, employee_id: Option<Uuid>) -> anyhow::Result<Vec<User>> {
    let rows = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, email, password_hash, role, employee_id, first_name, last_name,
               created_at, updated_at
        FROM users
        WHERE $1::uuid IS NULL OR employee_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(employee_id)
    .fetch_all(db)
    .await
    .context("list users")?;
    Ok(rows.into_iter().map(User::from).collect())
}

pub async fn create(db: &PgPool, new: NewUser<'_>) -> anyhow::Result<User> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (email, password_hash, role, employee_id, first_name, last_name)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, email, password_hash, role, employee_id, first_name, last_name,
                  created_at, updated_at
        "#,
    )
    .bind(new.email)
    .bind(new.password_hash)
    .bind(new.role.as_ref())
    .bind(new.employee_id)
    .bind(new.first_name)
    .bind(new.last_name)
    .fetch_one(db)
    .await
    .context("insert user")?;
    Ok(row.into())
}

pub async fn update(db: &PgPool, id: Uuid, patch: UserPatch) -> anyhow::Result<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET password_hash = COALESCE($2, password_hash),
            role          = COALESCE($3, role),
            employee_id   = COALESCE($4, employee_id),
            first_name    = COALESCE($5, first_name),
            last_name     = COALESCE($6, last_name),
            updated_at    = NOW()
        WHERE id = $1
        RETURNING id, email, password_hash, role, employee_id, first_name, last_name,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(patch.password_hash)
    .bind(patch.role.map(|r| r.as_ref().to_string()))
    .bind(patch.employee_id)
    .bind(patch.first_name)
    .bind(patch.last_name)
    .fetch_optional(db)
    .await
    .context("update user")?;
    Ok(row.map(User::from))
}

/// Replace the password of the user with `email`. Returns the updated user.
pub async fn set_password_by_email(
    db: &PgPool,
    email: &str,
    password_hash: &str,
) -> anyhow::Result<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET password_hash = $2, updated_at = NOW()
        WHERE email = $1
        RETURNING id, email, password_hash, role, employee_id, first_name, last_name,
                  created_at, updated_at
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .fetch_optional(db)
    .await
    .context("reset password")?;
    Ok(row.map(User::from))
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("delete user")?;
    Ok(res.rows_affected() > 0)
}
