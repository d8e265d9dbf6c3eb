use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

use crate::policy::ProviderPolicy;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Gate on a provider's request budget.
///
/// A rejected call is not queued or retried anywhere in this system; the gate
/// reports the provider's advisory cooldown and the caller turns that into a
/// rate-limited fetch outcome.
#[derive(Clone)]
pub struct QuotaGate {
    limiter: Arc<DirectRateLimiter>,
    cooldown: Duration,
}

impl QuotaGate {
    pub fn new(quota_window: Duration, quota_limit: u32, cooldown: Duration) -> Self {
        let burst = NonZeroU32::new(quota_limit.max(1)).expect("clamped limit is non-zero");
        let window = quota_window.max(Duration::from_millis(1));
        let quota = Quota::with_period(window / burst.get())
            .expect("clamped window is non-zero")
            .allow_burst(burst);

        Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
            cooldown,
        }
    }

    pub fn from_policy(policy: &ProviderPolicy) -> Self {
        Self::new(policy.quota_window, policy.quota_limit, policy.cooldown)
    }

    /// Ok while budget remains in the current window; otherwise the advisory
    /// wait before the provider will accept another call.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        self.limiter.check().map_err(|_| self.cooldown)
    }
}
