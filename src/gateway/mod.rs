//! Fetch-with-cache-and-fallback shared by every external data source.
//!
//! A [`DataGateway`] answers a keyed request from its cache while the entry
//! is fresh, otherwise calls the remote source (bounded by a timeout and a
//! small retry budget), and on any failure substitutes a deterministic
//! simulated payload. Callers always get a value; failures are only logged.
//!
//! Concurrent requests for the same key share one in-flight operation, so
//! at most one remote call or fallback runs per key at a time.

pub mod cache;
pub mod clock;
pub mod seed;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::error::{GatewayError, GatewayResult};

use self::cache::ResponseCache;
use self::clock::Clock;

pub use self::cache::CacheEntry;
pub use self::clock::{ManualClock, SystemClock};
pub use self::seed::SeededRng;

/// A payload plus whether it was synthesised by a fallback generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fetched<T> {
    pub payload: T,
    pub simulated: bool,
}

/// Timeout, retry and offline behaviour of a gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayPolicy {
    /// Upper bound on a single remote attempt.
    pub timeout: Duration,
    /// Total attempts per fetch, including the first. Treated as at least 1.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub retry_delay: Duration,
    /// Skip remote calls entirely and always simulate.
    pub offline: bool,
}

impl Default for GatewayPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_attempts: 2,
            retry_delay: Duration::from_millis(250),
            offline: false,
        }
    }
}

type InFlight<T> = Arc<OnceCell<Fetched<T>>>;

/// Cache, in-flight map and retry policy for one family of payloads.
pub struct DataGateway<T> {
    name: &'static str,
    cache: ResponseCache<T>,
    in_flight: Mutex<HashMap<String, InFlight<T>>>,
    policy: GatewayPolicy,
}

impl<T> std::fmt::Debug for DataGateway<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataGateway")
            .field("name", &self.name)
            .field("cache", &self.cache)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<T: Clone> DataGateway<T> {
    /// Creates a gateway.
    ///
    /// # Arguments
    ///
    /// * `name` - Source label used in log messages
    /// * `clock` - Time source for cache freshness
    /// * `policy` - Timeout and retry behaviour
    pub fn new(name: &'static str, clock: Arc<dyn Clock>, policy: GatewayPolicy) -> Self {
        Self {
            name,
            cache: ResponseCache::new(clock),
            in_flight: Mutex::new(HashMap::new()),
            policy,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn policy(&self) -> &GatewayPolicy {
        &self.policy
    }

    pub fn cache(&self) -> &ResponseCache<T> {
        &self.cache
    }

    /// Returns the payload for `key`.
    ///
    /// # Arguments
    ///
    /// * `key` - Cache key; also seeds the fallback
    /// * `ttl` - Maximum age of a cached entry
    /// * `remote` - Produces one remote attempt; called again on retry
    /// * `fallback` - Deterministic generator invoked with `key` on failure
    ///
    /// # Returns
    ///
    /// The cached, fetched or simulated payload. Never fails.
    pub async fn fetch<R, Fut, F>(&self, key: &str, ttl: Duration, remote: R, fallback: F) -> Fetched<T>
    where
        R: Fn() -> Fut,
        Fut: Future<Output = GatewayResult<T>>,
        F: FnOnce(&str) -> T,
    {
        self.fetch_with(key, ttl, &remote, fallback, Some(self.policy.timeout))
            .await
    }

    /// Like [`fetch`](Self::fetch) for a remote operation made of several
    /// stages, each bounding its own calls with the policy timeout.
    ///
    /// No overall timeout is applied, so a stage that times out can still
    /// hand over to the next one. Retries and the fallback work as in `fetch`.
    pub async fn fetch_staged<R, Fut, F>(
        &self,
        key: &str,
        ttl: Duration,
        remote: R,
        fallback: F,
    ) -> Fetched<T>
    where
        R: Fn() -> Fut,
        Fut: Future<Output = GatewayResult<T>>,
        F: FnOnce(&str) -> T,
    {
        self.fetch_with(key, ttl, &remote, fallback, None).await
    }

    async fn fetch_with<R, Fut, F>(
        &self,
        key: &str,
        ttl: Duration,
        remote: &R,
        fallback: F,
        timeout: Option<Duration>,
    ) -> Fetched<T>
    where
        R: Fn() -> Fut,
        Fut: Future<Output = GatewayResult<T>>,
        F: FnOnce(&str) -> T,
    {
        if let Some(entry) = self.cache.get(key, ttl) {
            debug!(source = self.name, key, "cache hit");
            return Fetched {
                payload: entry.payload,
                simulated: entry.simulated,
            };
        }

        let cell = {
            let mut in_flight = self.in_flight.lock();
            Arc::clone(in_flight.entry(key.to_string()).or_default())
        };

        let fetched = cell
            .get_or_init(|| self.resolve(key, ttl, remote, fallback, timeout))
            .await
            .clone();

        let mut in_flight = self.in_flight.lock();
        if in_flight.get(key).is_some_and(|c| Arc::ptr_eq(c, &cell)) {
            in_flight.remove(key);
        }
        fetched
    }

    async fn resolve<R, Fut, F>(
        &self,
        key: &str,
        ttl: Duration,
        remote: &R,
        fallback: F,
        timeout: Option<Duration>,
    ) -> Fetched<T>
    where
        R: Fn() -> Fut,
        Fut: Future<Output = GatewayResult<T>>,
        F: FnOnce(&str) -> T,
    {
        // Another request may have filled the cache while this one queued.
        if let Some(entry) = self.cache.get(key, ttl) {
            return Fetched {
                payload: entry.payload,
                simulated: entry.simulated,
            };
        }

        let outcome = if self.policy.offline {
            Err(GatewayError::Offline)
        } else {
            self.call_remote(key, remote, timeout).await
        };

        match outcome {
            Ok(payload) => {
                info!(source = self.name, key, "fetched from remote");
                self.cache.insert(key, payload.clone(), false);
                Fetched {
                    payload,
                    simulated: false,
                }
            }
            Err(e) => {
                match &e {
                    GatewayError::Offline | GatewayError::MissingCredential(_) => {
                        debug!(source = self.name, key, reason = %e, "using simulated data");
                    }
                    _ => warn!(source = self.name, key, error = %e, "remote failed, using simulated data"),
                }
                let payload = fallback(key);
                self.cache.insert(key, payload.clone(), true);
                Fetched {
                    payload,
                    simulated: true,
                }
            }
        }
    }

    async fn call_remote<R, Fut>(
        &self,
        key: &str,
        remote: &R,
        timeout: Option<Duration>,
    ) -> GatewayResult<T>
    where
        R: Fn() -> Fut,
        Fut: Future<Output = GatewayResult<T>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempts = 0;
        let mut delay = self.policy.retry_delay;

        loop {
            attempts += 1;
            let result = match timeout {
                Some(limit) => bounded(limit, remote()).await,
                None => remote().await,
            };
            match result {
                Ok(payload) => return Ok(payload),
                Err(e) if e.is_retryable() && attempts < max_attempts => {
                    warn!(
                        "{} request {} failed (attempt {}/{}): {}. Retrying in {:?}",
                        self.name, key, attempts, max_attempts, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Runs `call` under `limit`, turning expiry into [`GatewayError::Timeout`].
pub async fn bounded<T, Fut>(limit: Duration, call: Fut) -> GatewayResult<T>
where
    Fut: Future<Output = GatewayResult<T>>,
{
    tokio::time::timeout(limit, call)
        .await
        .unwrap_or(Err(GatewayError::Timeout(limit)))
}
