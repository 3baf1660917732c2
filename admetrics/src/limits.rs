//! Request rate limiting for protecting system capacity.
//!
//! A token-bucket limiter keyed by client address, applied as middleware in
//! front of the analysis endpoints. Buckets refill continuously at
//! `max_requests / window`; a request that finds an empty bucket receives
//! HTTP 429.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::Mutex;

use crate::config::RateLimitConfig;
use crate::errors::Error;
use crate::AppState;

/// Container for all resource limiters.
///
/// Add new limiters here as fields when implementing additional rate
/// limiting.
#[derive(Debug, Default, Clone)]
pub struct Limiters {
    /// Limiter for analysis requests. None means unlimited.
    pub requests: Option<Arc<RequestLimiter>>,
}

impl Limiters {
    /// Creates all limiters from configuration.
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            requests: RequestLimiter::new(config).map(Arc::new),
        }
    }
}

#[derive(Debug, Clone)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token-bucket limiter keyed by client address.
#[derive(Debug)]
pub struct RequestLimiter {
    buckets: Mutex<HashMap<String, Bucket>>,
    capacity: f64,
    refill_per_sec: f64,
}

impl RequestLimiter {
    /// Creates a new request limiter from configuration.
    ///
    /// If `max_requests` is 0, returns `None` (unlimited requests).
    pub fn new(config: &RateLimitConfig) -> Option<Self> {
        if config.max_requests == 0 {
            return None;
        }

        Some(Self {
            buckets: Mutex::new(HashMap::new()),
            capacity: f64::from(config.max_requests),
            refill_per_sec: f64::from(config.max_requests) / config.window.as_secs_f64(),
        })
    }

    /// Take one token for `key`, refilling the bucket for the time elapsed
    /// since its last use. Returns false when the bucket is empty.
    pub async fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut lock = self.buckets.lock().await;
        let bucket = lock.entry(key.to_string()).or_insert_with(|| Bucket {
            tokens: self.capacity,
            last_refill: now,
        });
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.last_refill = now;
        bucket.tokens = (bucket.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Middleware applying the request limiter to the analysis endpoints.
///
/// Requests are keyed by peer IP when the server was started with connect
/// info; otherwise everything shares one bucket (single-tenant deployments
/// and tests).
pub async fn rate_limit_middleware(State(state): State<AppState>, request: Request, next: Next) -> Result<Response, Error> {
    if let Some(limiter) = state.limiters.requests.as_ref() {
        let key = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip().to_string())
            .unwrap_or_else(|| "local".to_string());

        if !limiter.allow(&key).await {
            return Err(Error::TooManyRequests {
                message: "Too many requests. Please retry later.".to_string(),
            });
        }
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config(max_requests: u32, window: Duration) -> RateLimitConfig {
        RateLimitConfig { max_requests, window }
    }

    #[test]
    fn test_unlimited_returns_none() {
        let config = test_config(0, Duration::from_secs(60));
        assert!(RequestLimiter::new(&config).is_none());
    }

    #[tokio::test]
    async fn test_allows_up_to_capacity() {
        let config = test_config(2, Duration::from_secs(3600));
        let limiter = RequestLimiter::new(&config).unwrap();

        assert!(limiter.allow("10.0.0.1").await);
        assert!(limiter.allow("10.0.0.1").await);
        // Bucket exhausted, refill over an hour is negligible here.
        assert!(!limiter.allow("10.0.0.1").await);
    }

    #[tokio::test]
    async fn test_keys_have_independent_buckets() {
        let config = test_config(1, Duration::from_secs(3600));
        let limiter = RequestLimiter::new(&config).unwrap();

        assert!(limiter.allow("10.0.0.1").await);
        assert!(!limiter.allow("10.0.0.1").await);
        // A different client is unaffected.
        assert!(limiter.allow("10.0.0.2").await);
    }

    #[tokio::test]
    async fn test_bucket_refills_over_time() {
        // 1 request per 100ms window = 10 tokens/sec refill.
        let config = test_config(1, Duration::from_millis(100));
        let limiter = RequestLimiter::new(&config).unwrap();

        assert!(limiter.allow("10.0.0.1").await);
        assert!(!limiter.allow("10.0.0.1").await);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(limiter.allow("10.0.0.1").await);
    }
}
