use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{Result, StoreError};

/// Runs a store operation, failing with [`StoreError::Unavailable`] when it
/// does not finish within `limit`.
pub(crate) async fn bounded<T, F>(limit: Duration, operation: &'static str, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation, ?limit, "Store operation timed out");
            Err(StoreError::Unavailable(format!(
                "{} did not complete within {:?}",
                operation, limit
            )))
        }
    }
}
