// Deadline for external calls (capability provider, tools)

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::types::{AppError, AppResult};

/// Awaits `operation`, failing with [`AppError::Timeout`] once `limit` elapses.
pub async fn with_timeout<F, T>(limit: Duration, operation: &str, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation = %operation, secs = limit.as_secs(), "External call timed out");
            Err(AppError::Timeout {
                operation: operation.to_string(),
                secs: limit.as_secs(),
            })
        }
    }
}
