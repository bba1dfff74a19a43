use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maximum number of hosted images attached to a single listing.
pub const MAX_ACCOUNT_IMAGES: usize = 5;

/// Availability of a listed game account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum AccountStatus {
    #[serde(rename = "Available")]
    Available,
    #[serde(rename = "Sold")]
    Sold,
}

impl Default for AccountStatus {
    fn default() -> Self {
        AccountStatus::Available
    }
}

impl AccountStatus {
    pub fn toggled(self) -> Self {
        match self {
            AccountStatus::Available => AccountStatus::Sold,
            AccountStatus::Sold => AccountStatus::Available,
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Available => write!(f, "Available"),
            AccountStatus::Sold => write!(f, "Sold"),
        }
    }
}

// A game account listed for sale. Display fields are free-form strings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub title: Option<String>,
    #[serde(rename = "priceUSD")]
    pub price_usd: Option<String>,
    #[serde(rename = "priceDZ")]
    pub price_dz: Option<String>,
    pub coins: Option<String>,
    pub gems: Option<String>,
    pub images: Vec<String>,
    pub status: AccountStatus,
    pub views: i64,
    pub created_at: DateTime<Utc>,
}

/// Fields an admin supplies when listing a new account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewAccount {
    pub title: Option<String>,
    #[serde(rename = "priceUSD")]
    pub price_usd: Option<String>,
    #[serde(rename = "priceDZ")]
    pub price_dz: Option<String>,
    pub coins: Option<String>,
    pub gems: Option<String>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AccountChanges {
    pub title: Option<String>,
    #[serde(rename = "priceUSD")]
    pub price_usd: Option<String>,
    #[serde(rename = "priceDZ")]
    pub price_dz: Option<String>,
    pub coins: Option<String>,
    pub gems: Option<String>,
    /// Replacement image set; only filled from uploaded files.
    #[serde(skip)]
    pub images: Option<Vec<String>>,
}

impl AccountChanges {
    /// Text fields from an account form; an empty upload keeps the stored images.
    pub fn from_fields(fields: NewAccount, images: Vec<String>) -> Self {
        Self {
            title: fields.title,
            price_usd: fields.price_usd,
            price_dz: fields.price_dz,
            coins: fields.coins,
            gems: fields.gems,
            images: if images.is_empty() { None } else { Some(images) },
        }
    }
}

impl Account {
    pub fn new(id: i64, fields: NewAccount, images: Vec<String>) -> Self {
        Self {
            id,
            title: fields.title,
            price_usd: fields.price_usd,
            price_dz: fields.price_dz,
            coins: fields.coins,
            gems: fields.gems,
            images,
            status: AccountStatus::default(),
            views: 0,
            created_at: Utc::now(),
        }
    }

    /// Merge the supplied fields into this record.
    pub fn apply(&mut self, changes: &AccountChanges) {
        if let Some(title) = &changes.title {
            self.title = Some(title.clone());
        }
        if let Some(price_usd) = &changes.price_usd {
            self.price_usd = Some(price_usd.clone());
        }
        if let Some(price_dz) = &changes.price_dz {
            self.price_dz = Some(price_dz.clone());
        }
        if let Some(coins) = &changes.coins {
            self.coins = Some(coins.clone());
        }
        if let Some(gems) = &changes.gems {
            self.gems = Some(gems.clone());
        }
        if let Some(images) = &changes.images {
            self.images = images.clone();
        }
    }
}

/// Next id for a new listing: one past the current maximum, or 1 for an empty catalog.
pub fn next_account_id(max_existing: Option<i64>) -> i64 {
    max_existing.map_or(1, |max| max + 1)
}
