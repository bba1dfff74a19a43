pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Account, AccountChanges, Faq, FaqContent, Settings, SettingsChanges};

pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Document store holding accounts, the settings singleton and FAQs.
///
/// Implementations must make `increment_views` and `toggle_status` atomic at
/// the store: concurrent callers never lose an update.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All accounts, highest id first.
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;

    async fn find_account(&self, id: i64) -> Result<Option<Account>, StoreError>;

    /// Adds one to `views` and returns the post-increment record.
    async fn increment_views(&self, id: i64) -> Result<Option<Account>, StoreError>;

    async fn max_account_id(&self) -> Result<Option<i64>, StoreError>;

    async fn insert_account(&self, account: Account) -> Result<Account, StoreError>;

    async fn update_account(&self, id: i64, changes: &AccountChanges) -> Result<Option<Account>, StoreError>;

    async fn toggle_status(&self, id: i64) -> Result<Option<Account>, StoreError>;

    /// Returns false when no account had that id.
    async fn delete_account(&self, id: i64) -> Result<bool, StoreError>;

    async fn fetch_settings(&self) -> Result<Option<Settings>, StoreError>;

    /// Creates the settings record from `defaults` unless one already exists.
    async fn ensure_settings(&self, defaults: &Settings) -> Result<Settings, StoreError>;

    /// Creates the record from `defaults` if absent, then merges `changes`.
    async fn upsert_settings(&self, defaults: &Settings, changes: &SettingsChanges) -> Result<Settings, StoreError>;

    async fn list_faqs(&self) -> Result<Vec<Faq>, StoreError>;

    async fn insert_faq(&self, faq: FaqContent) -> Result<Faq, StoreError>;

    async fn update_faq(&self, id: i64, content: &FaqContent) -> Result<Option<Faq>, StoreError>;

    async fn delete_faq(&self, id: i64) -> Result<bool, StoreError>;
}
