use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::models::{Account, AccountChanges, Faq, FaqContent, Settings, SettingsChanges};
use crate::store::{CatalogStore, StoreError};

#[derive(Default)]
struct Collections {
    accounts: BTreeMap<i64, Account>,
    settings: Option<Settings>,
    faqs: BTreeMap<i64, Faq>,
    last_faq_id: i64,
}

/// In-process store. Every operation runs under one lock, which makes
/// increments and toggles atomic just like the single-statement SQL versions.
#[derive(Default)]
pub struct MemoryCatalogStore {
    inner: Mutex<Collections>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings_count(&self) -> usize {
        usize::from(self.inner.lock().settings.is_some())
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.inner.lock().accounts.values().rev().cloned().collect())
    }

    async fn find_account(&self, id: i64) -> Result<Option<Account>, StoreError> {
        Ok(self.inner.lock().accounts.get(&id).cloned())
    }

    async fn increment_views(&self, id: i64) -> Result<Option<Account>, StoreError> {
        let mut inner = self.inner.lock();
        Ok(inner.accounts.get_mut(&id).map(|account| {
            account.views += 1;
            account.clone()
        }))
    }

    async fn max_account_id(&self) -> Result<Option<i64>, StoreError> {
        Ok(self.inner.lock().accounts.keys().next_back().copied())
    }

    async fn insert_account(&self, account: Account) -> Result<Account, StoreError> {
        let mut inner = self.inner.lock();
        if inner.accounts.contains_key(&account.id) {
            return Err(StoreError::Unavailable(format!(
                "duplicate account id {}",
                account.id
            )));
        }
        inner.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update_account(&self, id: i64, changes: &AccountChanges) -> Result<Option<Account>, StoreError> {
        let mut inner = self.inner.lock();
        Ok(inner.accounts.get_mut(&id).map(|account| {
            account.apply(changes);
            account.clone()
        }))
    }

    async fn toggle_status(&self, id: i64) -> Result<Option<Account>, StoreError> {
        let mut inner = self.inner.lock();
        Ok(inner.accounts.get_mut(&id).map(|account| {
            account.status = account.status.toggled();
            account.clone()
        }))
    }

    async fn delete_account(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.lock().accounts.remove(&id).is_some())
    }

    async fn fetch_settings(&self) -> Result<Option<Settings>, StoreError> {
        Ok(self.inner.lock().settings.clone())
    }

    async fn ensure_settings(&self, defaults: &Settings) -> Result<Settings, StoreError> {
        let mut inner = self.inner.lock();
        Ok(inner
            .settings
            .get_or_insert_with(|| defaults.clone())
            .clone())
    }

    async fn upsert_settings(&self, defaults: &Settings, changes: &SettingsChanges) -> Result<Settings, StoreError> {
        let mut inner = self.inner.lock();
        let settings = inner.settings.get_or_insert_with(|| defaults.clone());
        settings.apply(changes);
        Ok(settings.clone())
    }

    async fn list_faqs(&self) -> Result<Vec<Faq>, StoreError> {
        Ok(self.inner.lock().faqs.values().cloned().collect())
    }

    async fn insert_faq(&self, faq: FaqContent) -> Result<Faq, StoreError> {
        let mut inner = self.inner.lock();
        inner.last_faq_id += 1;
        let faq = Faq {
            id: inner.last_faq_id,
            question: faq.question,
            answer: faq.answer,
            created_at: Utc::now(),
        };
        inner.faqs.insert(faq.id, faq.clone());
        Ok(faq)
    }

    async fn update_faq(&self, id: i64, content: &FaqContent) -> Result<Option<Faq>, StoreError> {
        let mut inner = self.inner.lock();
        Ok(inner.faqs.get_mut(&id).map(|faq| {
            faq.question = content.question.clone();
            faq.answer = content.answer.clone();
            faq.clone()
        }))
    }

    async fn delete_faq(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.lock().faqs.remove(&id).is_some())
    }
}
