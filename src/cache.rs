//! Response cache for account queries whose answers rarely change.

use std::time::Duration;

use crate::domain::{CountryCode, MessageId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Identity of a cached account query.
pub enum CacheKey {
    Pricing(CountryCode),
    NumberSearch {
        country: CountryCode,
        pattern: String,
    },
    Message(MessageId),
}

/// Storage for successful response bodies.
///
/// Implementations must be internally synchronized; the client shares one instance
/// across clones.
pub trait ResponseCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<String>;
    fn insert(&self, key: CacheKey, body: String);
    fn invalidate(&self, key: &CacheKey);
    fn clear(&self);
}

/// In-memory cache with a time-to-live and bounded capacity.
#[derive(Clone)]
pub struct TtlCache {
    inner: moka::sync::Cache<CacheKey, String>,
}

impl TtlCache {
    /// Entries expire ten minutes after insertion.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(600);
    /// Maximum number of cached bodies.
    pub const DEFAULT_CAPACITY: u64 = 1_024;

    /// Create a cache whose entries live for `ttl`, holding at most `max_capacity` bodies.
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        Self {
            inner: moka::sync::Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL, Self::DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for TtlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

impl ResponseCache for TtlCache {
    fn get(&self, key: &CacheKey) -> Option<String> {
        self.inner.get(key)
    }

    fn insert(&self, key: CacheKey, body: String) {
        self.inner.insert(key, body);
    }

    fn invalidate(&self, key: &CacheKey) {
        self.inner.invalidate(key);
    }

    fn clear(&self) {
        self.inner.invalidate_all();
    }
}

/// Cache that stores nothing; every query reaches Nexmo.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl ResponseCache for NoCache {
    fn get(&self, _key: &CacheKey) -> Option<String> {
        None
    }

    fn insert(&self, _key: CacheKey, _body: String) {}

    fn invalidate(&self, _key: &CacheKey) {}

    fn clear(&self) {}
}
