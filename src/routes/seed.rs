use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use eventdesk_core::{SeedRequest, SeedStatus};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/seed", post(seed))
}

/// POST /api/seed - Bulk create users, then events, then links.
/// 207 when any item failed for a reason other than its own payload.
async fn seed(State(state): State<AppState>, Json(request): Json<SeedRequest>) -> Response {
    let report = state.seeder.seed(request).await;
    let status = match report.status {
        SeedStatus::Success => StatusCode::OK,
        SeedStatus::PartialSuccess => StatusCode::MULTI_STATUS,
    };
    (status, Json(report)).into_response()
}
