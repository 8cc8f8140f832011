use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};

use eventdesk_core::Wallet;

use crate::models::WalletReference;
use crate::routes::error::{validation_report, ApiError};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/wallets/validate", post(validate_wallet))
        .route("/api/wallets/{user_id}", get(get_wallet))
}

async fn get_wallet(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Wallet>, ApiError> {
    Ok(Json(state.services.wallets.get(user_id).await?))
}

async fn validate_wallet(
    State(state): State<AppState>,
    Json(req): Json<WalletReference>,
) -> Response {
    validation_report(state.services.wallets.validation_errors(req.user_id))
}
