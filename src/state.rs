use std::sync::Arc;

use eventdesk_core::{Seeder, Services};

use crate::auth::Argon2Hasher;
use crate::db::SqliteStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub seeder: Seeder,
    pub max_image_bytes: usize,
}

impl AppState {
    pub fn new(services: Services, max_image_bytes: usize) -> Self {
        Self {
            seeder: services.seeder(),
            services,
            max_image_bytes,
        }
    }

    /// Production wiring: SQLite storage and Argon2 credentials.
    pub fn with_sqlite(pool: sqlx::SqlitePool, max_image_bytes: usize) -> Self {
        let services = Services::new(
            Arc::new(SqliteStore::new(pool)),
            Arc::new(Argon2Hasher::new()),
        );
        Self::new(services, max_image_bytes)
    }
}
