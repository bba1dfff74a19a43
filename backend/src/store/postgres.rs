use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::{account_queries, faq_queries, settings_queries};
use crate::models::{Account, AccountChanges, Faq, FaqContent, Settings, SettingsChanges};
use crate::store::{CatalogStore, StoreError};

#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(account_queries::fetch_all(&self.pool).await?)
    }

    async fn find_account(&self, id: i64) -> Result<Option<Account>, StoreError> {
        Ok(account_queries::fetch_one(&self.pool, id).await?)
    }

    async fn increment_views(&self, id: i64) -> Result<Option<Account>, StoreError> {
        Ok(account_queries::increment_views(&self.pool, id).await?)
    }

    async fn max_account_id(&self) -> Result<Option<i64>, StoreError> {
        Ok(account_queries::max_id(&self.pool).await?)
    }

    async fn insert_account(&self, account: Account) -> Result<Account, StoreError> {
        Ok(account_queries::insert(&self.pool, &account).await?)
    }

    async fn update_account(&self, id: i64, changes: &AccountChanges) -> Result<Option<Account>, StoreError> {
        Ok(account_queries::update(&self.pool, id, changes).await?)
    }

    async fn toggle_status(&self, id: i64) -> Result<Option<Account>, StoreError> {
        Ok(account_queries::toggle_status(&self.pool, id).await?)
    }

    async fn delete_account(&self, id: i64) -> Result<bool, StoreError> {
        Ok(account_queries::delete(&self.pool, id).await? > 0)
    }

    async fn fetch_settings(&self) -> Result<Option<Settings>, StoreError> {
        Ok(settings_queries::fetch(&self.pool).await?)
    }

    async fn ensure_settings(&self, defaults: &Settings) -> Result<Settings, StoreError> {
        Ok(settings_queries::ensure(&self.pool, defaults).await?)
    }

    async fn upsert_settings(&self, defaults: &Settings, changes: &SettingsChanges) -> Result<Settings, StoreError> {
        Ok(settings_queries::upsert(&self.pool, defaults, changes).await?)
    }

    async fn list_faqs(&self) -> Result<Vec<Faq>, StoreError> {
        Ok(faq_queries::fetch_all(&self.pool).await?)
    }

    async fn insert_faq(&self, faq: FaqContent) -> Result<Faq, StoreError> {
        Ok(faq_queries::insert(&self.pool, faq).await?)
    }

    async fn update_faq(&self, id: i64, content: &FaqContent) -> Result<Option<Faq>, StoreError> {
        Ok(faq_queries::update(&self.pool, id, content).await?)
    }

    async fn delete_faq(&self, id: i64) -> Result<bool, StoreError> {
        Ok(faq_queries::delete(&self.pool, id).await? > 0)
    }
}
