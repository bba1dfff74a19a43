pub mod account_queries;
pub mod faq_queries;
pub mod settings_queries;
