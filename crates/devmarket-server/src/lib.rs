pub mod ads;
pub mod bootstrap;
pub mod config;
pub mod cors;
pub mod db;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use db::Database;
pub use error::ApiError;
pub use state::AppState;
