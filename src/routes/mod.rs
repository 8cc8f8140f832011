pub mod error;
pub mod events;
pub mod health;
pub mod links;
pub mod seed;
pub mod users;
pub mod wallets;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub use error::ApiError;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(users::routes())
        .merge(events::routes(state.max_image_bytes))
        .merge(wallets::routes())
        .merge(links::routes())
        .merge(seed::routes())
        .merge(health::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
