//! Background Jobs Module
//!
//! Periodic tasks run by the job scheduler service, independent of user
//! requests. None of them touch the catalog.
//!
//! # Available Jobs
//!
//! - `keepalive_job` - Pings the public URL so the hosting platform does not idle the service

pub mod keepalive_job;
