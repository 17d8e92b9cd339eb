use std::sync::Arc;

use crate::config::Config;

/// Shared application state injected into route handlers via axum::extract::State.
/// Holds only the resolved configuration: every request re-scans the daemon's
/// directory from scratch, so there is no library or cache to share.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}
