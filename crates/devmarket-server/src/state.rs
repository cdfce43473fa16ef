use std::sync::Arc;

use devmarket_auth::SessionKeys;

use crate::config::ServerConfig;
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub db: Arc<Database>,
    pub session_keys: SessionKeys,
}

impl AppState {
    pub fn new(config: ServerConfig, db: Database) -> Self {
        let session_keys = SessionKeys::new(&config.auth_secret);
        Self {
            config: Arc::new(config),
            db: Arc::new(db),
            session_keys,
        }
    }
}
