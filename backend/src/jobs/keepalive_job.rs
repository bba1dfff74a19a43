//! Keep-alive Background Job
//!
//! Free hosting tiers put a web service to sleep after a stretch without
//! inbound traffic. When `KEEPALIVE_URL` is configured this job requests that
//! URL on a fixed schedule (every 10 minutes by default).
//!
//! # Error Handling
//!
//! - Failures are logged and the job simply waits for the next tick
//! - A non-2xx response counts as a failed ping

use std::time::Duration;

use tracing::{info, warn};

use crate::errors::AppError;
use crate::services::job_scheduler_service::{JobContext, JobResult};

const PING_TIMEOUT: Duration = Duration::from_secs(30);

/// Entry point called by the scheduler.
pub async fn ping_public_url(context: JobContext) -> Result<JobResult, AppError> {
    let response = context
        .http
        .get(context.keepalive_url.clone())
        .timeout(PING_TIMEOUT)
        .send()
        .await
        .map_err(|e| {
            warn!("❌ Keep-alive ping to {} failed: {}", context.keepalive_url, e);
            AppError::Internal(format!("keep-alive ping failed: {}", e))
        })?;

    let status = response.status();
    if !status.is_success() {
        warn!("❌ Keep-alive ping to {} returned {}", context.keepalive_url, status);
        return Ok(JobResult {
            items_processed: 0,
            items_failed: 1,
        });
    }

    info!("⚡ Keep-alive ping ok ({})", status);
    Ok(JobResult {
        items_processed: 1,
        items_failed: 0,
    })
}
