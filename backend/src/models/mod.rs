mod account;
mod faq;
mod settings;

pub use account::{next_account_id, Account, AccountChanges, AccountStatus, NewAccount, MAX_ACCOUNT_IMAGES};
pub use faq::{Faq, FaqContent};
pub use settings::{Settings, SettingsChanges, DEFAULT_ANNOUNCEMENT, DEFAULT_LINK, DEFAULT_USD_RATE};
