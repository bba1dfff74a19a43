use axum::Router;
use tower_http::trace::TraceLayer;

use crate::routes::{admin, decoy, health, storefront};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let upload_limit = state.max_upload_bytes;
    Router::<AppState>::new()
        .merge(decoy::router())
        .merge(storefront::router())
        .merge(admin::router(upload_limit))
        .nest("/health", health::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
