pub mod config;
pub mod env;
pub mod error;
pub mod fatal;
pub mod server;

// Re-export for main.rs
pub use crate::config::AppConfig;
pub use crate::server::{AppState, SharedMetrics};
