use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_LINK: &str = "#";
pub const DEFAULT_ANNOUNCEMENT: &str = "مرحباً بكم في متجرنا";
pub const DEFAULT_USD_RATE: f64 = 240.0;

/// Storefront-wide settings. At most one record exists per store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub support_link: String,
    pub mediation_link: String,
    pub sell_account_link: String,
    pub buy_now_link: String,
    pub announcement: String,
    pub logo_url: Option<String>,
    pub usd_rate: f64,
    pub updated_at: DateTime<Utc>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            support_link: DEFAULT_LINK.to_string(),
            mediation_link: DEFAULT_LINK.to_string(),
            sell_account_link: DEFAULT_LINK.to_string(),
            buy_now_link: DEFAULT_LINK.to_string(),
            announcement: DEFAULT_ANNOUNCEMENT.to_string(),
            logo_url: None,
            usd_rate: DEFAULT_USD_RATE,
            updated_at: Utc::now(),
        }
    }
}

/// Admin update to the settings record; `None` keeps the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsChanges {
    pub support_link: Option<String>,
    pub mediation_link: Option<String>,
    pub sell_account_link: Option<String>,
    pub buy_now_link: Option<String>,
    pub announcement: Option<String>,
    pub logo_url: Option<String>,
    pub usd_rate: Option<f64>,
}

impl SettingsChanges {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(rate) = self.usd_rate {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(format!("USD rate must be a positive number, got {}", rate));
            }
        }
        Ok(())
    }
}

impl Settings {
    pub fn apply(&mut self, changes: &SettingsChanges) {
        if let Some(v) = &changes.support_link {
            self.support_link = v.clone();
        }
        if let Some(v) = &changes.mediation_link {
            self.mediation_link = v.clone();
        }
        if let Some(v) = &changes.sell_account_link {
            self.sell_account_link = v.clone();
        }
        if let Some(v) = &changes.buy_now_link {
            self.buy_now_link = v.clone();
        }
        if let Some(v) = &changes.announcement {
            self.announcement = v.clone();
        }
        if let Some(v) = &changes.logo_url {
            self.logo_url = Some(v.clone());
        }
        if let Some(rate) = changes.usd_rate {
            self.usd_rate = rate;
        }
        self.updated_at = Utc::now();
    }
}
