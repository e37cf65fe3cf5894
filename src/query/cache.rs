use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use super::policy::QueryPolicy;
use crate::errors::ApiError;

/// State of a query as seen by a view
#[derive(Debug, Clone)]
pub struct QueryResult<V> {
    pub data: Option<V>,
    pub error: Option<ApiError>,
    /// First fetch in flight, nothing to show yet
    pub is_loading: bool,
    /// Any fetch in flight, including background refreshes
    pub is_fetching: bool,
    pub is_stale: bool,
}

impl<V> QueryResult<V> {
    /// Result of a disabled query
    pub fn idle() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: false,
            is_fetching: false,
            is_stale: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.data.is_some() && self.error.is_none()
    }
}

struct Entry<V> {
    data: Option<V>,
    error: Option<ApiError>,
    updated_at: Option<Instant>,
    last_used: Instant,
    fetching: bool,
    invalidated: bool,
}

impl<V> Entry<V> {
    fn new(now: Instant) -> Self {
        Self {
            data: None,
            error: None,
            updated_at: None,
            last_used: now,
            fetching: false,
            invalidated: false,
        }
    }
}

/// Clears the in-flight flag when a fetch is dropped before it settles
struct InFlight<'a, K: Eq + Hash, V> {
    entries: &'a DashMap<K, Entry<V>>,
    key: &'a K,
    armed: bool,
}

impl<K: Eq + Hash, V> InFlight<'_, K, V> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<K: Eq + Hash, V> Drop for InFlight<'_, K, V> {
    fn drop(&mut self) {
        if self.armed {
            if let Some(mut entry) = self.entries.get_mut(self.key) {
                entry.fetching = false;
            }
        }
    }
}

/// In-memory query cache with staleness, retention and retries.
///
/// Concurrent fetches of one key share a single request: later callers wait
/// for the in-flight fetch and read its outcome.
pub struct QueryCache<K, V> {
    name: &'static str,
    policy: QueryPolicy,
    entries: DashMap<K, Entry<V>>,
    locks: DashMap<K, Arc<Mutex<()>>>,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    /// Create a new cache
    pub fn new(name: &'static str, policy: QueryPolicy) -> Self {
        Self {
            name,
            policy,
            entries: DashMap::new(),
            locks: DashMap::new(),
        }
    }

    pub fn policy(&self) -> &QueryPolicy {
        &self.policy
    }

    fn is_fresh(&self, entry: &Entry<V>, now: Instant) -> bool {
        !entry.invalidated
            && entry
                .updated_at
                .map_or(false, |t| now.duration_since(t) < self.policy.stale_time)
    }

    fn result_of(&self, entry: &Entry<V>, now: Instant) -> QueryResult<V> {
        QueryResult {
            data: entry.data.clone(),
            error: entry.error.clone(),
            is_loading: entry.fetching && entry.data.is_none(),
            is_fetching: entry.fetching,
            is_stale: entry.data.is_some() && !self.is_fresh(entry, now),
        }
    }

    /// Cached result if it is fresh
    fn fresh(&self, key: &K) -> Option<QueryResult<V>> {
        let now = Instant::now();
        let mut entry = self.entries.get_mut(key)?;
        entry.last_used = now;
        self.is_fresh(&entry, now).then(|| self.result_of(&entry, now))
    }

    /// Current state of `key` without fetching
    pub fn snapshot(&self, key: &K) -> QueryResult<V> {
        let now = Instant::now();
        match self.entries.get_mut(key) {
            Some(mut entry) => {
                entry.last_used = now;
                self.result_of(&entry, now)
            }
            None => QueryResult::idle(),
        }
    }

    /// Return fresh data for `key`, fetching (with retries) when missing or stale
    pub async fn fetch<F, Fut>(&self, key: K, fetcher: F) -> QueryResult<V>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<V, ApiError>>,
    {
        self.collect_garbage();

        if let Some(result) = self.fresh(&key) {
            debug!("{} {:?}: cache hit", self.name, key);
            return result;
        }

        let lock = self
            .locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        // Whoever held the lock may have just refreshed it.
        if let Some(result) = self.fresh(&key) {
            return result;
        }

        self.entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(Instant::now()))
            .fetching = true;
        let in_flight = InFlight {
            entries: &self.entries,
            key: &key,
            armed: true,
        };

        let outcome = self.fetch_with_retry(&key, &fetcher).await;
        in_flight.disarm();
        self.settle(&key, outcome)
    }

    async fn fetch_with_retry<F, Fut>(&self, key: &K, fetcher: &F) -> Result<V, ApiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<V, ApiError>>,
    {
        let mut attempt = 0;
        loop {
            match fetcher().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.policy.retry && err.is_retryable() => {
                    attempt += 1;
                    warn!(
                        "{} {:?}: attempt {} failed ({}), retrying",
                        self.name, key, attempt, err
                    );
                    if !self.policy.retry_delay.is_zero() {
                        sleep(self.policy.retry_delay).await;
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn settle(&self, key: &K, outcome: Result<V, ApiError>) -> QueryResult<V> {
        let now = Instant::now();
        let mut entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(now));

        entry.fetching = false;
        entry.last_used = now;
        match outcome {
            Ok(value) => {
                entry.data = Some(value);
                entry.error = None;
                entry.updated_at = Some(now);
                entry.invalidated = false;
            }
            Err(err) => {
                warn!("{} {:?}: fetch failed: {}", self.name, key, err);
                entry.error = Some(err);
            }
        }
        self.result_of(&entry, now)
    }

    /// Mark `key` stale so the next read refetches
    pub fn invalidate(&self, key: &K) {
        if let Some(mut entry) = self.entries.get_mut(key) {
            entry.invalidated = true;
        }
    }

    pub fn invalidate_all(&self) {
        for mut entry in self.entries.iter_mut() {
            entry.invalidated = true;
        }
    }

    /// Keys due for a refresh: stale data, or a first fetch that failed
    pub fn stale_keys(&self) -> Vec<K> {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|e| !e.fetching)
            .filter(|e| match e.data {
                Some(_) => !self.is_fresh(e.value(), now),
                None => e.error.is_some(),
            })
            .map(|e| e.key().clone())
            .collect()
    }

    /// Every cached key accepted by `pred`
    pub fn keys_matching(&self, pred: impl Fn(&K) -> bool) -> Vec<K> {
        self.entries
            .iter()
            .filter(|e| pred(e.key()))
            .map(|e| e.key().clone())
            .collect()
    }

    /// Evict entries unused for longer than the retention window
    pub fn collect_garbage(&self) {
        let now = Instant::now();
        let gc_time = self.policy.gc_time;
        let mut evicted = Vec::new();

        self.entries.retain(|key, entry| {
            let keep = entry.fetching || now.duration_since(entry.last_used) < gc_time;
            if !keep {
                evicted.push(key.clone());
            }
            keep
        });

        for key in evicted {
            debug!("{} {:?}: evicted", self.name, key);
            self.locks.remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn policy(retry: u32) -> QueryPolicy {
        QueryPolicy {
            stale_time: Duration::from_secs(60),
            gc_time: Duration::from_secs(300),
            retry,
            refetch_on_focus: false,
            retry_delay: Duration::ZERO,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_data_is_served_from_cache() {
        let cache: QueryCache<&str, u32> = QueryCache::new("test", policy(0));
        let calls = &AtomicU32::new(0);
        let fetcher = move || async move {
            Ok::<_, ApiError>(calls.fetch_add(1, Ordering::SeqCst) + 1)
        };

        assert_eq!(cache.fetch("k", &fetcher).await.data, Some(1));
        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(cache.fetch("k", &fetcher).await.data, Some(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(cache.snapshot(&"k").is_stale);
        assert_eq!(cache.fetch("k", &fetcher).await.data, Some(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_up_to_the_policy_count() {
        let cache: QueryCache<&str, u32> = QueryCache::new("test", policy(2));
        let calls = &AtomicU32::new(0);

        let result = cache
            .fetch("k", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(ApiError::Network("refused".into()))
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(result.error, Some(ApiError::Network(_))));
        assert!(!result.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_on_a_later_attempt() {
        let cache: QueryCache<&str, u32> = QueryCache::new("test", policy(1));
        let calls = &AtomicU32::new(0);

        let result = cache
            .fetch("k", move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(ApiError::Network("reset".into()))
                } else {
                    Ok(7)
                }
            })
            .await;

        assert!(result.is_success());
        assert_eq!(result.data, Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn validation_errors_are_not_retried() {
        let cache: QueryCache<&str, u32> = QueryCache::new("test", policy(2));
        let calls = &AtomicU32::new(0);

        cache
            .fetch("k", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(ApiError::validation("User address is required"))
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_keeps_stale_data() {
        let cache: QueryCache<&str, u32> = QueryCache::new("test", policy(0));
        cache.fetch("k", || async { Ok(1) }).await;
        tokio::time::advance(Duration::from_secs(61)).await;

        let result = cache
            .fetch("k", || async { Err(ApiError::Network("down".into())) })
            .await;

        assert_eq!(result.data, Some(1));
        assert!(result.error.is_some());
        assert!(result.is_stale);
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_forces_refetch() {
        let cache: QueryCache<&str, u32> = QueryCache::new("test", policy(0));
        cache.fetch("k", || async { Ok(1) }).await;
        cache.invalidate(&"k");
        assert_eq!(cache.stale_keys(), vec!["k"]);
        assert_eq!(cache.fetch("k", || async { Ok(2) }).await.data, Some(2));
        assert!(cache.stale_keys().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unused_entries_are_evicted_after_retention() {
        let cache: QueryCache<&str, u32> = QueryCache::new("test", policy(0));
        cache.fetch("old", || async { Ok(1) }).await;
        tokio::time::advance(Duration::from_secs(200)).await;
        cache.fetch("new", || async { Ok(2) }).await;
        tokio::time::advance(Duration::from_secs(101)).await;

        cache.collect_garbage();
        assert!(!cache.contains(&"old"));
        assert!(cache.contains(&"new"));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_fetches_share_one_request() {
        let cache: QueryCache<&str, u32> = QueryCache::new("test", policy(0));
        let calls = &AtomicU32::new(0);
        let fetcher = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            sleep(Duration::from_millis(50)).await;
            Ok::<_, ApiError>(5)
        };

        let (a, b) = tokio::join!(cache.fetch("k", &fetcher), cache.fetch("k", &fetcher));
        assert_eq!(a.data, Some(5));
        assert_eq!(b.data, Some(5));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_fetch_does_not_stay_in_flight() {
        let cache: QueryCache<&str, u32> = QueryCache::new("test", policy(0));
        let slow = cache.fetch("k", || async {
            sleep(Duration::from_secs(5)).await;
            Ok(1)
        });
        assert!(tokio::time::timeout(Duration::from_millis(10), slow).await.is_err());

        let result = cache.snapshot(&"k");
        assert!(!result.is_loading);
        assert!(!result.is_fetching);

        tokio::time::advance(Duration::from_secs(3600)).await;
        cache.collect_garbage();
        assert!(!cache.contains(&"k"));

        assert_eq!(cache.fetch("k", || async { Ok(2) }).await.data, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_first_fetch_is_due_for_refresh() {
        let cache: QueryCache<&str, u32> = QueryCache::new("test", policy(0));
        cache
            .fetch("k", || async { Err(ApiError::Network("down".into())) })
            .await;
        assert_eq!(cache.stale_keys(), vec!["k"]);

        cache.fetch("k", || async { Ok(3) }).await;
        assert!(cache.stale_keys().is_empty());
    }

    #[test]
    fn snapshot_of_unknown_key_is_idle() {
        let cache: QueryCache<&str, u32> = QueryCache::new("test", policy(0));
        let result = cache.snapshot(&"missing");
        assert!(result.data.is_none());
        assert!(!result.is_loading);
    }
}
