// src/presentation/http/middleware/rate_limit.rs
use ::governor::middleware::NoOpMiddleware;
use axum::body::Body;
use std::time::Duration;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

/// Per-client-IP limit applied to the credential endpoints (`/token`,
/// `/login`, `POST /auth`).
#[derive(Debug, Clone, Copy)]
pub struct RateLimitSettings {
    /// Sustained requests per second; one permit is replenished every
    /// `1s / per_second`.
    pub per_second: u64,
    pub burst: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            per_second: 10,
            burst: 20,
        }
    }
}

fn replenish_interval(per_second: u64) -> Option<Duration> {
    let nanos = 1_000_000_000u64.checked_div(per_second)?;
    (nanos > 0).then_some(Duration::from_nanos(nanos))
}

/// Returns `None` when the settings are rejected (zero values, or a rate
/// above one request per nanosecond).
pub fn rate_limit_layer(
    settings: RateLimitSettings,
) -> Option<GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware, Body>> {
    let mut builder = GovernorConfigBuilder::default();
    builder.period(replenish_interval(settings.per_second)?);
    builder.burst_size(settings.burst);
    let config = builder.key_extractor(SmartIpKeyExtractor).finish()?;

    Some(GovernorLayer::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_burst_is_rejected() {
        assert!(
            rate_limit_layer(RateLimitSettings {
                per_second: 1,
                burst: 0
            })
            .is_none()
        );
        assert!(rate_limit_layer(RateLimitSettings::default()).is_some());
    }

    #[test]
    fn interval_is_the_inverse_of_the_rate() {
        assert_eq!(replenish_interval(10), Some(Duration::from_millis(100)));
        assert_eq!(replenish_interval(1), Some(Duration::from_secs(1)));
        assert_eq!(replenish_interval(0), None);
        assert_eq!(replenish_interval(2_000_000_000), None);
    }
}
