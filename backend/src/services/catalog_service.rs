use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{next_account_id, Account, AccountChanges, NewAccount, MAX_ACCOUNT_IMAGES};
use crate::store::CatalogStore;

/// All listings, newest (highest id) first.
pub async fn list_accounts(store: &dyn CatalogStore) -> Result<Vec<Account>, AppError> {
    Ok(store.list_accounts().await?)
}

/// Fetches a listing for its detail page, counting the visit.
pub async fn view_account(store: &dyn CatalogStore, id: i64) -> Result<Account, AppError> {
    store.increment_views(id).await?.ok_or(AppError::NotFound)
}

/// Lists a new account under the next sequential id.
///
/// The id is derived from the current maximum, so two admins creating at the
/// same instant could collide; the store's primary key rejects the loser.
pub async fn create_account(
    store: &dyn CatalogStore,
    fields: NewAccount,
    image_urls: Vec<String>,
) -> Result<Account, AppError> {
    if image_urls.len() > MAX_ACCOUNT_IMAGES {
        return Err(AppError::Validation(format!(
            "At most {} images per account",
            MAX_ACCOUNT_IMAGES
        )));
    }
    let id = next_account_id(store.max_account_id().await?);
    let account = store.insert_account(Account::new(id, fields, image_urls)).await?;
    info!("Created account {} with {} images", account.id, account.images.len());
    Ok(account)
}

pub async fn edit_account(
    store: &dyn CatalogStore,
    id: i64,
    changes: AccountChanges,
) -> Result<Account, AppError> {
    if changes.images.as_ref().is_some_and(|images| images.len() > MAX_ACCOUNT_IMAGES) {
        return Err(AppError::Validation(format!(
            "At most {} images per account",
            MAX_ACCOUNT_IMAGES
        )));
    }
    store.update_account(id, &changes).await?.ok_or_else(|| {
        warn!("Edit requested for missing account {}", id);
        AppError::NotFound
    })
}

pub async fn toggle_status(store: &dyn CatalogStore, id: i64) -> Result<Account, AppError> {
    let account = store.toggle_status(id).await?.ok_or(AppError::NotFound)?;
    info!("Account {} is now {}", id, account.status);
    Ok(account)
}

pub async fn delete_account(store: &dyn CatalogStore, id: i64) -> Result<i64, AppError> {
    if store.delete_account(id).await? {
        info!("Deleted account {}", id);
        Ok(id)
    } else {
        warn!("Delete requested for missing account {}", id);
        Err(AppError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountStatus;
    use crate::store::MemoryCatalogStore;
    use std::sync::Arc;

    fn titled(title: &str) -> NewAccount {
        NewAccount {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_first_account_gets_id_one() {
        let store = MemoryCatalogStore::new();
        let account = create_account(&store, titled("X"), vec![]).await.unwrap();
        assert_eq!(account.id, 1);
        assert_eq!(account.title.as_deref(), Some("X"));
        assert_eq!(account.status, AccountStatus::Available);
        assert_eq!(account.views, 0);
    }

    #[tokio::test]
    async fn test_listing_is_newest_first() {
        let store = MemoryCatalogStore::new();
        create_account(&store, titled("X"), vec![]).await.unwrap();
        let second = create_account(&store, titled("Y"), vec![]).await.unwrap();
        assert_eq!(second.id, 2);

        let titles: Vec<_> = list_accounts(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.title.unwrap())
            .collect();
        assert_eq!(titles, vec!["Y", "X"]);
    }

    #[tokio::test]
    async fn test_new_id_exceeds_every_existing_id_after_deletes() {
        let store = MemoryCatalogStore::new();
        for title in ["a", "b", "c"] {
            create_account(&store, titled(title), vec![]).await.unwrap();
        }
        delete_account(&store, 2).await.unwrap();
        let next = create_account(&store, titled("d"), vec![]).await.unwrap();
        assert_eq!(next.id, 4);

        delete_account(&store, 4).await.unwrap();
        let reused = create_account(&store, titled("e"), vec![]).await.unwrap();
        assert_eq!(reused.id, 4);

        let ids: Vec<i64> = list_accounts(&store).await.unwrap().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![4, 3, 1]);
    }

    #[tokio::test]
    async fn test_rejects_more_than_five_images() {
        let store = MemoryCatalogStore::new();
        let urls = (0..6).map(|i| format!("https://img.example/{}.png", i)).collect();
        let err = create_account(&store, titled("X"), urls).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(list_accounts(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_each_view_counts_once() {
        let store = MemoryCatalogStore::new();
        create_account(&store, titled("X"), vec![]).await.unwrap();
        for expected in 1..=3 {
            let account = view_account(&store, 1).await.unwrap();
            assert_eq!(account.views, expected);
        }
    }

    #[tokio::test]
    async fn test_view_missing_account_is_not_found() {
        let store = MemoryCatalogStore::new();
        let err = view_account(&store, 999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_views_are_not_lost() {
        let store = Arc::new(MemoryCatalogStore::new());
        create_account(store.as_ref(), titled("X"), vec![]).await.unwrap();

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { view_account(store.as_ref(), 1).await.unwrap().views })
            })
            .collect();

        let mut seen: Vec<i64> = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (1..=64).collect::<Vec<i64>>());

        let account = store.find_account(1).await.unwrap().unwrap();
        assert_eq!(account.views, 64);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_status() {
        let store = MemoryCatalogStore::new();
        create_account(&store, titled("X"), vec![]).await.unwrap();
        assert_eq!(toggle_status(&store, 1).await.unwrap().status, AccountStatus::Sold);
        assert_eq!(toggle_status(&store, 1).await.unwrap().status, AccountStatus::Available);
    }

    #[tokio::test]
    async fn test_edit_merges_only_supplied_fields() {
        let store = MemoryCatalogStore::new();
        create_account(
            &store,
            NewAccount {
                title: Some("X".into()),
                price_usd: Some("10".into()),
                ..Default::default()
            },
            vec!["https://img.example/1.png".into()],
        )
        .await
        .unwrap();

        let edited = edit_account(
            &store,
            1,
            AccountChanges {
                price_usd: Some("12".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(edited.title.as_deref(), Some("X"));
        assert_eq!(edited.price_usd.as_deref(), Some("12"));
        assert_eq!(edited.images.len(), 1);
    }

    #[tokio::test]
    async fn test_edit_rejects_more_than_five_images() {
        let store = MemoryCatalogStore::new();
        create_account(&store, titled("X"), vec!["https://img.example/1.png".into()])
            .await
            .unwrap();

        let six: Vec<String> = (1..=6).map(|n| format!("https://img.example/{}.png", n)).collect();
        let result = edit_account(&store, 1, AccountChanges::from_fields(NewAccount::default(), six)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.find_account(1).await.unwrap().unwrap().images.len(), 1);
    }

    #[tokio::test]
    async fn test_mutations_on_missing_account_are_not_found() {
        let store = MemoryCatalogStore::new();
        assert!(matches!(
            edit_account(&store, 5, AccountChanges::default()).await,
            Err(AppError::NotFound)
        ));
        assert!(matches!(toggle_status(&store, 5).await, Err(AppError::NotFound)));
        assert!(matches!(delete_account(&store, 5).await, Err(AppError::NotFound)));
    }
}
