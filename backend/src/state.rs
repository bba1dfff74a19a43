use std::sync::Arc;

use crate::media::MediaUploader;
use crate::services::auth_service::AccessGate;
use crate::store::CatalogStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub media: Arc<dyn MediaUploader>,
    pub gate: Arc<AccessGate>,
    pub media_folder: String,
    pub secure_cookie: bool,
    pub max_upload_bytes: usize,
}
