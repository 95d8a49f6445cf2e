use super::coalesce::QueryCoalescer;
use super::key::QueryKey;
use crate::utils::error::{ClientError, Result};
use chrono::{DateTime, Utc};
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

type AnyData = Arc<dyn Any + Send + Sync>;
pub type SharedError = Arc<ClientError>;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    /// How long fetched data counts as fresh. Zero means "always refetch,
    /// but still share a fetch that is already in flight".
    pub stale_time: Duration,
    pub retry: u32,
    /// First retry delay; doubles per attempt, capped at 30s.
    pub retry_delay: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::ZERO,
            retry: 0,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl QueryOptions {
    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn with_retry(mut self, retry: u32) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.retry_delay
            .checked_mul(factor)
            .unwrap_or(MAX_RETRY_DELAY)
            .min(MAX_RETRY_DELAY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Pending,
    Success,
    Error,
}

/// Snapshot of a query as seen by one caller.
#[derive(Debug)]
pub struct QueryResult<T> {
    pub status: QueryStatus,
    pub data: Option<Arc<T>>,
    pub error: Option<SharedError>,
    pub data_updated_at: Option<DateTime<Utc>>,
}

impl<T> QueryResult<T> {
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Pending
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    pub fn data_ref(&self) -> Option<&T> {
        self.data.as_deref()
    }
}

impl<T> Clone for QueryResult<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            data_updated_at: self.data_updated_at,
        }
    }
}

#[derive(Default)]
struct CacheEntry {
    data: Option<AnyData>,
    data_fetched_at: Option<Instant>,
    data_updated_at: Option<DateTime<Utc>>,
    error: Option<SharedError>,
    error_at: Option<Instant>,
    is_fetching: bool,
    is_invalidated: bool,
}

impl CacheEntry {
    fn data_as<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.data.clone().and_then(|d| d.downcast::<T>().ok())
    }

    fn is_fresh(&self, stale_time: Duration) -> bool {
        !self.is_invalidated
            && self
                .data_fetched_at
                .is_some_and(|at| at.elapsed() < stale_time)
    }

    fn status(&self) -> QueryStatus {
        let error_newer = match (self.error_at, self.data_fetched_at) {
            (Some(e), Some(d)) => e > d,
            (Some(_), None) => true,
            _ => false,
        };
        if error_newer && !self.is_fetching {
            QueryStatus::Error
        } else if self.data.is_some() {
            QueryStatus::Success
        } else {
            QueryStatus::Pending
        }
    }
}

/// In-memory query cache with per-key request de-duplication.
///
/// Build one per application and hand it around explicitly; see
/// `app::layout::RootLayout`.
pub struct QueryClient {
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
    coalescer: QueryCoalescer,
    default_options: QueryOptions,
}

impl QueryClient {
    pub fn new(default_options: QueryOptions) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            coalescer: QueryCoalescer::new(),
            default_options,
        }
    }

    pub fn default_options(&self) -> &QueryOptions {
        &self.default_options
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<QueryKey, CacheEntry>> {
        // 沒有任何持鎖區段會 panic 於不一致狀態，直接取回內容
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return cached data for `key` or run `fetcher` to produce it.
    ///
    /// Concurrent callers for the same key wait for the one running fetch
    /// and receive its outcome, success or failure.
    pub async fn fetch_query<T, F, Fut>(
        &self,
        key: &QueryKey,
        options: &QueryOptions,
        fetcher: F,
    ) -> std::result::Result<Arc<T>, SharedError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let requested_at = Instant::now();

        if let Some(data) = self.fresh_data::<T>(key, options.stale_time) {
            tracing::debug!("Query {} served from cache", key);
            return Ok(data);
        }

        let _guard = self.coalescer.acquire(key).await;

        if let Some(outcome) = self.settled_since::<T>(key, requested_at, options.stale_time) {
            tracing::debug!("Query {} shared an in-flight fetch", key);
            return outcome;
        }

        let fetching = FetchingGuard::start(self, key);
        tracing::debug!("Query {} fetching", key);

        let outcome = self.run_with_retry(key, options, &fetcher).await;
        drop(fetching);

        let mut entries = self.entries();
        let entry = entries.entry(key.clone()).or_default();
        match outcome {
            Ok(data) => {
                let data = Arc::new(data);
                entry.data = Some(data.clone() as AnyData);
                entry.data_fetched_at = Some(Instant::now());
                entry.data_updated_at = Some(Utc::now());
                entry.error = None;
                entry.error_at = None;
                entry.is_invalidated = false;
                Ok(data)
            }
            Err(error) => {
                let error = Arc::new(error);
                entry.error = Some(error.clone());
                entry.error_at = Some(Instant::now());
                Err(error)
            }
        }
    }

    /// Like [`fetch_query`](Self::fetch_query) but reports a state snapshot
    /// that keeps previous data next to a refetch error.
    pub async fn use_query<T, F, Fut>(
        &self,
        key: &QueryKey,
        options: &QueryOptions,
        fetcher: F,
    ) -> QueryResult<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let outcome = self.fetch_query(key, options, fetcher).await;
        let data_updated_at = self.entries().get(key).and_then(|e| e.data_updated_at);
        match outcome {
            Ok(data) => QueryResult {
                status: QueryStatus::Success,
                data: Some(data),
                error: None,
                data_updated_at,
            },
            Err(error) => QueryResult {
                status: QueryStatus::Error,
                data: self.get_query_data::<T>(key),
                error: Some(error),
                data_updated_at,
            },
        }
    }

    pub fn query_state(&self, key: &QueryKey) -> QueryStatus {
        self.entries()
            .get(key)
            .map(CacheEntry::status)
            .unwrap_or(QueryStatus::Pending)
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.entries().get(key).is_some_and(|e| e.is_fetching)
    }

    pub fn get_query_data<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        self.entries().get(key).and_then(CacheEntry::data_as::<T>)
    }

    pub fn set_query_data<T: Send + Sync + 'static>(&self, key: &QueryKey, value: T) -> Arc<T> {
        let data = Arc::new(value);
        let mut entries = self.entries();
        let entry = entries.entry(key.clone()).or_default();
        entry.data = Some(data.clone() as AnyData);
        entry.data_fetched_at = Some(Instant::now());
        entry.data_updated_at = Some(Utc::now());
        entry.error = None;
        entry.error_at = None;
        entry.is_invalidated = false;
        data
    }

    /// Mark every query under `prefix` stale; the next read refetches.
    pub fn invalidate_queries(&self, prefix: &QueryKey) -> usize {
        let mut count = 0;
        for (key, entry) in self.entries().iter_mut() {
            if key.starts_with(prefix) {
                entry.is_invalidated = true;
                count += 1;
            }
        }
        tracing::debug!("Invalidated {} quer(ies) under {}", count, prefix);
        count
    }

    pub fn remove_queries(&self, prefix: &QueryKey) -> usize {
        let removed = {
            let mut entries = self.entries();
            let before = entries.len();
            entries.retain(|key, _| !key.starts_with(prefix));
            before - entries.len()
        };
        self.coalescer.prune();
        removed
    }

    pub fn clear(&self) {
        self.entries().clear();
        self.coalescer.prune();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn fresh_data<T: Send + Sync + 'static>(
        &self,
        key: &QueryKey,
        stale_time: Duration,
    ) -> Option<Arc<T>> {
        let entries = self.entries();
        let entry = entries.get(key)?;
        if entry.is_fresh(stale_time) {
            entry.data_as::<T>()
        } else {
            None
        }
    }

    /// Outcome written by another fetcher after `since`, or still-fresh data.
    fn settled_since<T: Send + Sync + 'static>(
        &self,
        key: &QueryKey,
        since: Instant,
        stale_time: Duration,
    ) -> Option<std::result::Result<Arc<T>, SharedError>> {
        let entries = self.entries();
        let entry = entries.get(key)?;

        if let (Some(error), Some(at)) = (&entry.error, entry.error_at) {
            if at >= since {
                return Some(Err(error.clone()));
            }
        }
        let fetched_since = entry.data_fetched_at.is_some_and(|at| at >= since);
        if fetched_since || entry.is_fresh(stale_time) {
            return entry.data_as::<T>().map(Ok);
        }
        None
    }

    async fn run_with_retry<T, F, Fut>(
        &self,
        key: &QueryKey,
        options: &QueryOptions,
        fetcher: &F,
    ) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match fetcher().await {
                Ok(data) => return Ok(data),
                Err(e) if attempt < options.retry => {
                    let delay = options.delay_for(attempt);
                    attempt += 1;
                    tracing::warn!(
                        "⚠️ Query {} failed (attempt {}/{}): {}; retrying in {:?}",
                        key,
                        attempt,
                        options.retry + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Marks a key as fetching; clears the flag on drop so a cancelled fetch
/// does not leave the entry stuck in the fetching state.
struct FetchingGuard<'a> {
    client: &'a QueryClient,
    key: &'a QueryKey,
}

impl<'a> FetchingGuard<'a> {
    fn start(client: &'a QueryClient, key: &'a QueryKey) -> Self {
        client.entries().entry(key.clone()).or_default().is_fetching = true;
        Self { client, key }
    }
}

impl Drop for FetchingGuard<'_> {
    fn drop(&mut self) {
        if let Some(entry) = self.client.entries().get_mut(self.key) {
            entry.is_fetching = false;
        }
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(QueryOptions::default())
    }
}
