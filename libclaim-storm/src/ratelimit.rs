use dashmap::DashMap;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{num::NonZeroU32, sync::Arc};

type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// One limiter per request host, created on first use.
pub struct HostRateLimiters {
    limiters: DashMap<String, Arc<Limiter>>,
    rate: NonZeroU32,
}

impl HostRateLimiters {
    pub fn new(rate_per_second: u32) -> Self {
        Self {
            limiters: DashMap::new(),
            rate: NonZeroU32::new(rate_per_second).unwrap_or(NonZeroU32::MIN),
        }
    }

    pub async fn acquire(&self, host: &str) {
        let limiter = self.get_or_create(host);
        limiter.until_ready().await;
    }

    fn get_or_create(&self, host: &str) -> Arc<Limiter> {
        self.limiters
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(RateLimiter::direct(Quota::per_second(self.rate))))
            .clone()
    }

    #[cfg(test)]
    fn tracked_hosts(&self) -> usize {
        self.limiters.len()
    }
}
