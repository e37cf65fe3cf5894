use std::time::Duration;

/// Caching and retry behavior of one kind of query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPolicy {
    /// Age after which cached data is refetched (and still shown meanwhile)
    pub stale_time: Duration,
    /// Idle time after which an entry is evicted
    pub gc_time: Duration,
    /// Extra attempts after a failed fetch
    pub retry: u32,
    pub refetch_on_focus: bool,
    /// Fixed pause between attempts
    pub retry_delay: Duration,
}

const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

impl QueryPolicy {
    pub const ASSETS: Self = Self {
        stale_time: Duration::from_secs(5 * 60),
        gc_time: Duration::from_secs(10 * 60),
        retry: 2,
        refetch_on_focus: false,
        retry_delay: DEFAULT_RETRY_DELAY,
    };

    pub const MARKETS: Self = Self {
        stale_time: Duration::from_secs(2 * 60),
        gc_time: Duration::from_secs(5 * 60),
        retry: 1,
        refetch_on_focus: false,
        retry_delay: DEFAULT_RETRY_DELAY,
    };

    pub const USER_PORTFOLIO: Self = Self {
        stale_time: Duration::from_secs(60),
        gc_time: Duration::from_secs(5 * 60),
        retry: 2,
        refetch_on_focus: true,
        retry_delay: DEFAULT_RETRY_DELAY,
    };

    pub const TOKEN_BALANCE: Self = Self {
        stale_time: Duration::from_secs(30),
        gc_time: Duration::from_secs(2 * 60),
        retry: 1,
        refetch_on_focus: true,
        retry_delay: DEFAULT_RETRY_DELAY,
    };

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}
