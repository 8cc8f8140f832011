pub mod auth;
pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod state;

pub use auth::Argon2Hasher;
pub use config::Config;
pub use db::{init_pool, run_migrations, SqliteStore};
pub use routes::{create_router, ApiError};
pub use state::AppState;
