use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use eventdesk_core::{Event, EventPayload};

use crate::models::EventQuery;
use crate::routes::error::{validation_report, ApiError};
use crate::state::AppState;

pub fn routes(max_image_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/api/events", post(create_event).get(list_events))
        .route("/api/events/validate", post(validate_event))
        .route("/api/events/name/{name}", get(get_event_by_name))
        .route(
            "/api/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route(
            "/api/events/{id}/image",
            get(get_image)
                .put(put_image)
                .layer(DefaultBodyLimit::max(max_image_bytes)),
        )
}

/// POST /api/events - Create an event.
async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<EventPayload>,
) -> Result<Response, ApiError> {
    let event = state.services.events.create(payload).await?;
    Ok((StatusCode::CREATED, Json(event)).into_response())
}

/// GET /api/events?q=...&creator_id=... - `creator_id` takes precedence
/// over the name search.
async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let events = match query.creator_id {
        Some(creator_id) => state.services.events.list_by_creator(creator_id).await?,
        None => state.services.events.search(query.q.as_deref()).await?,
    };
    Ok(Json(events))
}

async fn validate_event(
    State(state): State<AppState>,
    Json(payload): Json<EventPayload>,
) -> Result<Response, ApiError> {
    let messages = state.services.events.validation_errors(&payload).await?;
    Ok(validation_report(messages))
}

async fn get_event_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Event>, ApiError> {
    Ok(Json(state.services.events.get_by_name(&name).await?))
}

async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Event>, ApiError> {
    Ok(Json(state.services.events.get(id).await?))
}

async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<EventPayload>,
) -> Result<Json<Event>, ApiError> {
    Ok(Json(state.services.events.update(id, payload).await?))
}

/// DELETE /api/events/{id} - Hard delete, enrollments included.
async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.services.events.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_image(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Response, ApiError> {
    let bytes = state.services.events.image(id).await?;
    Ok(([(header::CONTENT_TYPE, content_type(&bytes))], bytes).into_response())
}

/// PUT /api/events/{id}/image - Raw bytes. An empty body clears the image.
async fn put_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<Event>, ApiError> {
    Ok(Json(state.services.events.set_image(id, body.to_vec()).await?))
}

fn content_type(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "application/octet-stream",
    }
}
