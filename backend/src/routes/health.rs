use axum::{
    Router,
    routing::get,
};
use tracing::debug;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
}

async fn health() -> &'static str {
    debug!("GET /health - Liveness probe");
    "OK"
}
