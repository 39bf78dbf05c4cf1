//! Rate limiter combining quotas, a concurrency cap, and bounded retry.

use crate::Tier;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter as GovernorLimiter};
use karigari_error::RetryableError;
use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

struct LimiterState<T> {
    inner: T,
    /// Requests-per-minute quota, when the tier caps RPM
    request_quota: Option<DefaultDirectRateLimiter>,
    /// Tokens-per-minute quota, when the tier caps TPM
    token_quota: Option<DefaultDirectRateLimiter>,
    /// Burst ceiling of the token quota; estimates are clamped to it
    token_burst: u32,
    /// Concurrency cap, when the tier sets max_concurrent
    concurrency: Option<Arc<Semaphore>>,
    no_retry: bool,
    max_retries: Option<usize>,
    retry_backoff_ms: Option<u64>,
}

/// Wraps a client with its tier's rate limits and retry policy.
///
/// Calls go through [`RateLimiter::execute`], which waits for quota,
/// holds a concurrency permit for the duration of the call, and retries
/// transient failures (as classified by [`RetryableError`]) with
/// exponential backoff and jitter. Permanent errors are never retried.
///
/// Cloning is cheap; clones share the same quotas and permits.
pub struct RateLimiter<T> {
    state: Arc<LimiterState<T>>,
}

impl<T> Clone for RateLimiter<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Tier> std::fmt::Debug for RateLimiter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("tier", &self.state.inner.name().to_string())
            .field("no_retry", &self.state.no_retry)
            .finish_non_exhaustive()
    }
}

/// Guard returned by [`RateLimiter::acquire`].
///
/// Holds the concurrency permit; dropping it releases the slot.
pub struct RateLimiterGuard {
    _permit: Option<OwnedSemaphorePermit>,
}

impl<T: Tier> RateLimiter<T> {
    /// Wrap a client with the rate limits its tier declares.
    pub fn new(inner: T) -> Self {
        Self::new_with_retry(inner, false, None, None)
    }

    /// Wrap a client with rate limits and a retry policy override.
    ///
    /// # Arguments
    ///
    /// * `no_retry` - Disable automatic retry entirely
    /// * `max_retries` - Override the error-specific retry count
    /// * `retry_backoff_ms` - Override the error-specific initial backoff
    pub fn new_with_retry(
        inner: T,
        no_retry: bool,
        max_retries: Option<usize>,
        retry_backoff_ms: Option<u64>,
    ) -> Self {
        let request_quota = inner
            .rpm()
            .and_then(NonZeroU32::new)
            .map(|rpm| GovernorLimiter::direct(Quota::per_minute(rpm)));

        let token_burst = inner
            .tpm()
            .map(|tpm| u32::try_from(tpm).unwrap_or(u32::MAX))
            .unwrap_or(u32::MAX);
        let token_quota = inner
            .tpm()
            .and_then(|tpm| NonZeroU32::new(u32::try_from(tpm).unwrap_or(u32::MAX)))
            .map(|tpm| GovernorLimiter::direct(Quota::per_minute(tpm)));

        let concurrency = inner
            .max_concurrent()
            .filter(|max| *max > 0)
            .map(|max| Arc::new(Semaphore::new(max as usize)));

        debug!(
            tier = inner.name(),
            rpm = ?inner.rpm(),
            tpm = ?inner.tpm(),
            max_concurrent = ?inner.max_concurrent(),
            "Created rate limiter"
        );

        Self {
            state: Arc::new(LimiterState {
                inner,
                request_quota,
                token_quota,
                token_burst,
                concurrency,
                no_retry,
                max_retries,
                retry_backoff_ms,
            }),
        }
    }

    /// Access the wrapped client.
    pub fn inner(&self) -> &T {
        &self.state.inner
    }

    /// Wait until quota allows one request of `estimated_tokens`, then
    /// take a concurrency permit. The returned guard must be held for the
    /// duration of the call.
    pub async fn acquire(&self, estimated_tokens: u64) -> RateLimiterGuard {
        if let Some(quota) = &self.state.request_quota {
            quota.until_ready().await;
        }

        if let Some(quota) = &self.state.token_quota {
            // Clamp to the quota's burst ceiling so a large estimate can
            // still be admitted rather than erroring as un-satisfiable.
            let clamped =
                u32::try_from(estimated_tokens.min(self.state.token_burst as u64)).unwrap_or(1);
            if let Some(tokens) = NonZeroU32::new(clamped) {
                let _ = quota.until_n_ready(tokens).await;
            }
        }

        let permit = match &self.state.concurrency {
            Some(semaphore) => Arc::clone(semaphore).acquire_owned().await.ok(),
            None => None,
        };

        RateLimiterGuard { _permit: permit }
    }

    /// Run `op` under rate limiting, retrying transient failures.
    ///
    /// The first attempt's error picks the retry strategy (initial
    /// backoff, attempt count, delay cap) from
    /// [`RetryableError::retry_strategy_params`]; constructor overrides
    /// take precedence. Each retry re-acquires quota.
    pub async fn execute<R, E, F, Fut>(&self, estimated_tokens: u64, mut op: F) -> Result<R, E>
    where
        E: RetryableError + std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let first_err = {
            let _guard = self.acquire(estimated_tokens).await;
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            }
        };

        if self.state.no_retry || !first_err.is_retryable() {
            return Err(first_err);
        }

        let (mut initial_ms, mut retries, max_delay_secs) = first_err.retry_strategy_params();
        if let Some(backoff) = self.state.retry_backoff_ms {
            initial_ms = backoff;
        }
        if let Some(max) = self.state.max_retries {
            retries = max;
        }

        warn!(
            error = %first_err,
            initial_backoff_ms = initial_ms,
            max_retries = retries,
            max_delay_secs,
            "Transient failure, retrying with backoff"
        );

        let delays = ExponentialBackoff::from_millis(initial_ms)
            .factor(2)
            .max_delay(Duration::from_secs(max_delay_secs))
            .map(jitter)
            .take(retries);

        let mut last_err = first_err;
        for delay in delays {
            tokio::time::sleep(delay).await;

            let _guard = self.acquire(estimated_tokens).await;
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() => {
                    warn!(error = %e, "Retry attempt failed");
                    last_err = e;
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TierConfig;
    use karigari_error::{ModelError, ModelErrorKind};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn roomy_tier() -> TierConfig {
        TierConfig {
            name: "Test".to_string(),
            rpm: Some(6000),
            tpm: Some(1_000_000),
            rpd: None,
            max_concurrent: Some(2),
            daily_quota_usd: None,
            cost_per_million_input_tokens: None,
            cost_per_million_output_tokens: None,
            models: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn execute_passes_through_success() {
        let limiter = RateLimiter::new(roomy_tier());
        let calls = AtomicUsize::new(0);

        let result: Result<u32, ModelError> = limiter
            .execute(100, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let limiter = RateLimiter::new(roomy_tier());
        let calls = AtomicUsize::new(0);

        let result: Result<u32, ModelError> = limiter
            .execute(100, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ModelError::new(ModelErrorKind::ApiRequest(
                    "bad prompt".to_string(),
                )))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transient_errors_retry_until_success() {
        let limiter = RateLimiter::new_with_retry(roomy_tier(), false, Some(5), Some(1));
        let calls = AtomicUsize::new(0);

        let result: Result<u32, ModelError> = limiter
            .execute(100, || async {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                if attempt < 2 {
                    Err(ModelError::new(ModelErrorKind::HttpError {
                        status_code: 503,
                        message: "overloaded".to_string(),
                    }))
                } else {
                    Ok(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn no_retry_fails_fast_on_transient_errors() {
        let limiter = RateLimiter::new_with_retry(roomy_tier(), true, None, None);
        let calls = AtomicUsize::new(0);

        let result: Result<u32, ModelError> = limiter
            .execute(100, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ModelError::new(ModelErrorKind::HttpError {
                    status_code: 503,
                    message: "overloaded".to_string(),
                }))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
