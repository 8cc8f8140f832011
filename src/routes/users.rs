use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};

use eventdesk_core::{User, UserPayload};

use crate::models::{ChangePasswordRequest, LoginRequest};
use crate::routes::error::{validation_report, ApiError};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(create_user).get(list_users))
        .route("/api/users/validate", post(validate_user))
        .route("/api/users/login", post(login))
        .route("/api/users/email/{email}", get(get_user_by_email))
        .route(
            "/api/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/users/{id}/password", put(change_password))
}

/// POST /api/users - Create a user and its wallet.
async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> Result<Response, ApiError> {
    let user = state.services.users.create(payload).await?;
    Ok((StatusCode::CREATED, Json(user)).into_response())
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.services.users.list().await?))
}

/// POST /api/users/validate - Run every check without persisting.
async fn validate_user(
    State(state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> Result<Response, ApiError> {
    let messages = state.services.users.validation_errors(&payload).await?;
    Ok(validation_report(messages))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .services
        .users
        .authenticate(&req.email, &req.password)
        .await?;
    tracing::info!(user_id = user.id, "login");
    Ok(Json(user))
}

async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.services.users.get_by_email(&email).await?))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.services.users.get(id).await?))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.services.users.update(id, payload).await?))
}

/// DELETE /api/users/{id} - Soft delete.
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.services.users.deactivate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .services
        .users
        .change_password(id, &req.old_password, &req.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
