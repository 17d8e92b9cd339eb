pub mod playlist;
pub mod state;
pub mod status;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::http::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status::status_page))
        .route("/playlist", get(playlist::serve_playlist))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
