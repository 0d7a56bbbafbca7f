//! Time budget for port calls

use ashmart_ports::{MarketError, MarketResult};
use std::future::Future;
use std::time::Duration;

/// Await `call`, failing with `MarketError::Timeout` once `limit` elapses
pub async fn bounded<T>(
    limit: Duration,
    operation: &'static str,
    call: impl Future<Output = T>,
) -> MarketResult<T> {
    tokio::time::timeout(limit, call).await.map_err(|_| {
        tracing::warn!(operation, limit_ms = limit.as_millis() as u64, "port call timed out");
        MarketError::Timeout { operation }
    })
}

/// Like [`bounded`] for calls that can fail on their own
pub async fn bounded_try<T>(
    limit: Duration,
    operation: &'static str,
    call: impl Future<Output = MarketResult<T>>,
) -> MarketResult<T> {
    bounded(limit, operation, call).await?
}
