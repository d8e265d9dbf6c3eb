use std::time::Duration;

/// Request budget for a quote provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderPolicy {
    pub quota_window: Duration,
    pub quota_limit: u32,
    /// Advisory wait surfaced to the caller when the budget is exhausted.
    /// There is no automatic retry; a throttled add simply fails.
    pub cooldown: Duration,
}

impl ProviderPolicy {
    /// Alpha Vantage free tier: 5 requests per rolling minute, so one slot
    /// frees up roughly every 12 seconds.
    pub const fn alphavantage_free_tier() -> Self {
        Self {
            quota_window: Duration::from_secs(60),
            quota_limit: 5,
            cooldown: Duration::from_secs(12),
        }
    }
}
