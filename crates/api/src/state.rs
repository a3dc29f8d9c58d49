use std::sync::Arc;

use flarenet_core::policy::ReconcilePolicy;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: flarenet_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn policy(&self) -> &ReconcilePolicy {
        &self.config.policy
    }
}
