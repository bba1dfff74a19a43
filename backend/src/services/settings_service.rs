use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{Settings, SettingsChanges};
use crate::services::sanitize;
use crate::store::CatalogStore;

/// Creates the default settings record if none exists. Run once at startup.
pub async fn ensure_settings_exists(store: &dyn CatalogStore) -> Result<Settings, AppError> {
    let settings = store.ensure_settings(&Settings::default()).await?;
    info!("Settings record ready (usd_rate = {})", settings.usd_rate);
    Ok(settings)
}

/// Returns the settings singleton.
///
/// Startup normally guarantees the record; if it is missing anyway the
/// defaults are written rather than failing the page.
pub async fn get_settings(store: &dyn CatalogStore) -> Result<Settings, AppError> {
    match store.fetch_settings().await? {
        Some(settings) => Ok(settings),
        None => {
            warn!("Settings record missing, recreating defaults");
            ensure_settings_exists(store).await
        }
    }
}

pub async fn update_settings(
    store: &dyn CatalogStore,
    mut changes: SettingsChanges,
) -> Result<Settings, AppError> {
    changes.validate().map_err(AppError::Validation)?;
    sanitize::clean_settings_links(&mut changes);

    let settings = store.upsert_settings(&Settings::default(), &changes).await?;
    info!("Settings updated");
    Ok(settings)
}
