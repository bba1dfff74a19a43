use axum::routing::any;
use axum::Router;
use tracing::warn;

use crate::errors::AppError;
use crate::routes::extract::ClientIp;
use crate::state::AppState;

/// Conventional admin paths. Always refused, whatever the request carries.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", any(blocked))
        .route("/admin", any(blocked))
}

pub async fn blocked(ClientIp(ip): ClientIp) -> AppError {
    warn!("Decoy admin path hit from {}", ip);
    AppError::Blocked { ip }
}
