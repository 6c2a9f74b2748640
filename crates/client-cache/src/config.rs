use std::time::Duration;

const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Time-to-live settings for the three caches, settable independently.
///
/// Each defaults to 30 minutes. Staleness is bounded only by these
/// values; there is no upstream-triggered invalidation.
#[derive(Clone, Copy, Debug)]
pub struct CacheConfig {
    pub decision_ttl: Duration,
    pub group_ttl: Duration,
    pub protected_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            decision_ttl: DEFAULT_TTL,
            group_ttl: DEFAULT_TTL,
            protected_ttl: DEFAULT_TTL,
        }
    }
}
