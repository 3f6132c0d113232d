use std::time::Duration;

use crate::error::LookupError;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            delay: Duration::from_millis(500),
        }
    }
}

/// Run a lookup, retrying transient failures up to the policy's bound.
/// `NotFound` and malformed responses are surfaced immediately.
pub async fn with_retry<T, F, Fut>(
    policy: RetryPolicy,
    what: &str,
    mut op: F,
) -> Result<T, LookupError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LookupError>>,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < policy.retries => {
                attempt += 1;
                tracing::warn!(
                    what,
                    attempt,
                    retries = policy.retries,
                    error = %err,
                    "transient source failure, retrying"
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
