use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{
        ChangePasswordRequest, CreateUserRequest, ListUsersQuery, MessageResponse,
        ResetPasswordRequest, UpdateUserRequest, UserResponse,
    },
    repo,
    repo_types::{NewUser, User, UserPatch},
};
use crate::{
    auth::{
        services::{hash_password, is_valid_email, normalize_email, verify_password},
        AuthUser,
    },
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath, ApiQuery},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/reset-password", post(reset_password))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/:id/change-password", post(change_password))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiQuery(q): ApiQuery<ListUsersQuery>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    caller.require_staff()?;
    let users = repo::list(&state.db, q.employee_id).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    caller.require_self_or_admin(id)?;
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    caller.require_admin()?;

    let email = normalize_email(&payload.email);
    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(ApiError::bad_request("Invalid email"));
    }

    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(ApiError::bad_request("Email already registered"));
    }

    let password = payload
        .password
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| state.config.default_user_password.clone());
    let hash = hash_password(&password)?;

    let user = repo::create(
        &state.db,
        NewUser {
            email: &email,
            password_hash: &hash,
            role: payload.role,
            employee_id: payload.employee_id,
            first_name: payload.first_name.as_deref(),
            last_name: payload.last_name.as_deref(),
        },
    )
    .await?;

    info!(user_id = %user.id, %email, role = %user.role, "user created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    caller.require_admin()?;

    let password_hash = match payload.password.as_deref().filter(|p| !p.is_empty()) {
        Some(p) => Some(hash_password(p)?),
        None => None,
    };
    let patch = UserPatch {
        password_hash,
        role: payload.role,
        employee_id: payload.employee_id,
        first_name: payload.first_name,
        last_name: payload.last_name,
    };

    let user = repo::update(&state.db, id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    caller.require_admin()?;
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::not_found("User"));
    }
    info!(user_id = %id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(payload): ApiJson<ResetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    caller.require_admin()?;

    let email = payload
        .email
        .map(|e| normalize_email(&e))
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::bad_request("Email is required"))?;

    let hash = hash_password(&state.config.reset_password)?;
    let user = repo::set_password_by_email(&state.db, &email, &hash)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    info!(user_id = %user.id, "password reset");
    Ok(Json(MessageResponse {
        message: "Password reset".into(),
        user: Some(user.into()),
    }))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    caller.require_self_or_admin(id)?;

    let (Some(current), Some(new)) = (
        payload.current_password.filter(|p| !p.is_empty()),
        payload.new_password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::bad_request(
            "Current and new password are required",
        ));
    };

    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    if !verify_password(&current, &user.password_hash).unwrap_or(false) {
        warn!(user_id = %id, "change password with wrong current password");
        return Err(ApiError::bad_request("Current password is incorrect"));
    }

    let patch = UserPatch {
        password_hash: Some(hash_password(&new)?),
        ..UserPatch::default()
    };
    repo::update(&state.db, id, patch).await?;

    info!(user_id = %id, "password changed");
    Ok(Json(MessageResponse {
        message: "Password changed".into(),
        user: None,
    }))
}
