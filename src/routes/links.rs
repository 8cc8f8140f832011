use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};

use eventdesk_core::{EventWallet, LinkPayload};

use crate::routes::error::{validation_report, ApiError};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/event-wallets", post(add_link))
        .route("/api/event-wallets/validate", post(validate_link))
        .route("/api/event-wallets/user/{user_id}", get(list_links))
        .route("/api/event-wallets/{user_id}/{event_id}", delete(remove_link))
}

/// POST /api/event-wallets - Enroll a wallet in an event.
async fn add_link(
    State(state): State<AppState>,
    Json(payload): Json<LinkPayload>,
) -> Result<Response, ApiError> {
    let link = state.services.links.add(payload).await?;
    Ok((StatusCode::CREATED, Json(link)).into_response())
}

async fn validate_link(
    State(state): State<AppState>,
    Json(payload): Json<LinkPayload>,
) -> Result<Response, ApiError> {
    let messages = state.services.links.validation_errors(&payload).await?;
    Ok(validation_report(messages))
}

async fn list_links(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<EventWallet>>, ApiError> {
    Ok(Json(state.services.links.list_by_user(user_id).await?))
}

async fn remove_link(
    State(state): State<AppState>,
    Path((user_id, event_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    state.services.links.remove(user_id, event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
