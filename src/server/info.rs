//! Identity and environment introspection
//!
//! `/config` dumps the whole environment. It must only be reachable from
//! inside a trusted network; nothing here enforces that.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::Serialize;

use super::AppState;
use crate::env::EnvSource;

pub const APPLICATION_NAME: &str = "devops-helper";

/// Keys containing this substring are left out of `/config`.
///
/// Case-sensitive: `db_secret` is NOT redacted.
pub const REDACTED_MARKER: &str = "SECRET";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppInfo {
    pub application: &'static str,
    pub version: String,
    pub environment: Option<String>,
    pub pod: Option<String>,
    pub node: Option<String>,
}

impl AppInfo {
    pub fn from_env(env: &dyn EnvSource) -> Self {
        Self {
            application: APPLICATION_NAME,
            version: env.var("APP_VERSION").unwrap_or_else(|| "local".to_string()),
            environment: env.var("APP_ENVIRONMENT"),
            pod: env.var("HOSTNAME"),
            node: env.var("NODE_NAME"),
        }
    }
}

/// Environment snapshot without secret-like keys
pub fn redacted_env(env: &dyn EnvSource) -> BTreeMap<String, String> {
    env.vars()
        .into_iter()
        .filter(|(key, _)| !key.contains(REDACTED_MARKER))
        .collect()
}

pub async fn info(State(state): State<AppState>) -> Json<AppInfo> {
    Json(AppInfo::from_env(state.env.as_ref()))
}

pub async fn config(State(state): State<AppState>) -> Json<BTreeMap<String, String>> {
    Json(redacted_env(state.env.as_ref()))
}
