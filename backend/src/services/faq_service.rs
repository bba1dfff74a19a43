use tracing::info;

use crate::errors::AppError;
use crate::models::{Faq, FaqContent};
use crate::store::CatalogStore;

pub async fn list_faqs(store: &dyn CatalogStore) -> Result<Vec<Faq>, AppError> {
    Ok(store.list_faqs().await?)
}

pub async fn create_faq(store: &dyn CatalogStore, input: FaqContent) -> Result<Faq, AppError> {
    let faq = store.insert_faq(input).await?;
    info!("Created FAQ {}", faq.id);
    Ok(faq)
}

/// Replaces both question and answer.
pub async fn edit_faq(store: &dyn CatalogStore, id: i64, content: FaqContent) -> Result<Faq, AppError> {
    store.update_faq(id, &content).await?.ok_or(AppError::NotFound)
}

pub async fn delete_faq(store: &dyn CatalogStore, id: i64) -> Result<i64, AppError> {
    match store.delete_faq(id).await? {
        true => {
            info!("Deleted FAQ {}", id);
            Ok(id)
        }
        false => Err(AppError::NotFound),
    }
}
