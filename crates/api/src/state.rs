use std::sync::Arc;

use yarnstash_core::storage::FileStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: yarnstash_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Storage for uploaded image files.
    pub files: Arc<dyn FileStore>,
}
