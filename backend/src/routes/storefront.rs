use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::routes::extract::parse_id;
use crate::services::{catalog_service, faq_service, settings_service};
use crate::state::AppState;
use crate::views::{AccountPage, StorefrontPage};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/account/:id", get(account_detail))
}

pub async fn home(State(state): State<AppState>) -> Result<Json<StorefrontPage>, AppError> {
    info!("GET / - Rendering storefront");
    let store = state.store.as_ref();
    let accounts = catalog_service::list_accounts(store).await.map_err(|e| {
        error!("Failed to list accounts: {}", e);
        e
    })?;
    let settings = settings_service::get_settings(store).await?;
    let faqs = faq_service::list_faqs(store).await?;
    Ok(Json(StorefrontPage {
        accounts,
        settings,
        faqs,
    }))
}

pub async fn account_detail(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<AccountPage>, AppError> {
    info!("GET /account/{} - Fetching account", raw_id);
    let id = parse_id(&raw_id)?;
    let store = state.store.as_ref();
    let account = catalog_service::view_account(store, id).await.map_err(|e| {
        if !matches!(e, AppError::NotFound) {
            error!("Failed to fetch account {}: {}", id, e);
        }
        e
    })?;
    let settings = settings_service::get_settings(store).await?;
    Ok(Json(AccountPage { account, settings }))
}
