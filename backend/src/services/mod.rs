pub mod auth_service;
pub mod catalog_service;
pub mod faq_service;
pub mod job_scheduler_service;
pub mod sanitize;
pub mod session_store;
pub mod settings_service;
