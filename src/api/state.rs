use std::num::NonZeroU32;
use std::sync::Arc;

use anyhow::anyhow;
use governor::{clock::DefaultClock, state::keyed::DashMapStateStore, Quota, RateLimiter};

use crate::core::AppConfig;
use crate::generators::{LogoFetcher, Renderers};

pub type KeyedRateLimiter = Arc<RateLimiter<String, DashMapStateStore<String>, DefaultClock>>;

#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<AppConfig>,
    pub renderers: Arc<Renderers>,
    pub logo_fetcher: Arc<LogoFetcher>,
    pub rate_limiter: KeyedRateLimiter,
}

impl ApiState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let renderers = Arc::new(Renderers::new(&config)?);
        let logo_fetcher = Arc::new(LogoFetcher::new(
            config.logo_timeout(),
            config.logo_max_bytes,
        )?);

        // Límite por IP de cliente
        let per_minute = NonZeroU32::new(config.rate_limit_per_minute)
            .ok_or_else(|| anyhow!("rate_limit_per_minute must be greater than zero"))?;
        let burst = NonZeroU32::new(config.rate_limit_burst)
            .ok_or_else(|| anyhow!("rate_limit_burst must be greater than zero"))?;
        let quota = Quota::per_minute(per_minute).allow_burst(burst);
        let rate_limiter = Arc::new(RateLimiter::dashmap_with_clock(quota, &DefaultClock::default()));

        Ok(ApiState {
            config: Arc::new(config),
            renderers,
            logo_fetcher,
            rate_limiter,
        })
    }
}
