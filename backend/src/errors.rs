use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect};
use thiserror::Error;

use crate::media::MediaError;
use crate::store::StoreError;
use crate::views;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Media error: {0}")]
    Media(#[from] MediaError),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found")]
    NotFound,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Blocked request from {ip}")]
    Blocked { ip: String },
    #[error("Login failed")]
    LoginFailed,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::NotFound => Redirect::to("/").into_response(),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Unauthorized => (StatusCode::FORBIDDEN, "Unauthorized").into_response(),
            AppError::Blocked { ip } => {
                (StatusCode::FORBIDDEN, Html(views::blocked_page(&ip))).into_response()
            }
            AppError::LoginFailed => (StatusCode::UNAUTHORIZED, "Invalid credentials").into_response(),
            AppError::Media(_) => (StatusCode::BAD_GATEWAY, "Image upload failed").into_response(),
            AppError::Store(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
