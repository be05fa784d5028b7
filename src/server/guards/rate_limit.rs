//! Per-client rate limiting.
//!
//! Two independent policies share one in-memory, process-wide table set:
//! - a vote allowance of one per rolling `vote_period_secs`, checked by the
//!   submission handler
//! - a global cap (per second and per minute) checked for every request by
//!   [`global_rate_limit`]
//!
//! Limits are GCRA cells from `governor`, keyed by client IP. Nothing here
//! survives a restart.

use crate::config::LimitsConfig;
use crate::error::VoeError;
use crate::server::guards::ClientAddr;
use crate::server::router::VoeState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use rand::Rng as _;
use std::{
    net::IpAddr,
    num::NonZeroU32,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};
use tracing::{debug, warn};

const SECS_PER_DAY: u64 = 24 * 60 * 60;
/// Stale entries are swept inline once per this many global checks.
const RETAIN_EVERY: u64 = 1024;

pub struct ClientLimiter {
    votes: DefaultKeyedRateLimiter<IpAddr>,
    per_second: DefaultKeyedRateLimiter<IpAddr>,
    per_minute: DefaultKeyedRateLimiter<IpAddr>,
    vote_rule: String,
    per_second_rule: String,
    per_minute_rule: String,
    max_penalty: Duration,
    checks: AtomicU64,
}

fn non_zero(value: u32, field: &str) -> Result<NonZeroU32, VoeError> {
    NonZeroU32::new(value).ok_or_else(|| VoeError::Config(format!("limits.{field} must be > 0")))
}

fn describe_period(secs: u64) -> String {
    match secs {
        s if s % SECS_PER_DAY == 0 => format!("{} day", s / SECS_PER_DAY),
        s if s % 3600 == 0 => format!("{} hour", s / 3600),
        s if s % 60 == 0 => format!("{} minute", s / 60),
        s => format!("{s} second"),
    }
}

impl ClientLimiter {
    pub fn new(cfg: &LimitsConfig) -> Result<Self, VoeError> {
        let vote_quota = Quota::with_period(Duration::from_secs(cfg.vote_period_secs))
            .ok_or_else(|| VoeError::Config("limits.vote_period_secs must be > 0".to_string()))?;
        let rps = non_zero(cfg.requests_per_second, "requests_per_second")?;
        let rpm = non_zero(cfg.requests_per_minute, "requests_per_minute")?;

        Ok(Self {
            votes: RateLimiter::keyed(vote_quota),
            per_second: RateLimiter::keyed(Quota::per_second(rps)),
            per_minute: RateLimiter::keyed(Quota::per_minute(rpm)),
            vote_rule: format!("1 per {}", describe_period(cfg.vote_period_secs)),
            per_second_rule: format!("{rps} per 1 second"),
            per_minute_rule: format!("{rpm} per 1 minute"),
            max_penalty: Duration::from_secs(cfg.max_penalty_secs),
            checks: AtomicU64::new(0),
        })
    }

    /// Consumes one request from the client's global allowance.
    pub fn check_request(&self, client: IpAddr) -> Result<(), VoeError> {
        if self.checks.fetch_add(1, Ordering::Relaxed) % RETAIN_EVERY == RETAIN_EVERY - 1 {
            self.retain_recent();
        }

        if self.per_second.check_key(&client).is_err() {
            return Err(VoeError::RateLimited(self.per_second_rule.clone()));
        }
        if self.per_minute.check_key(&client).is_err() {
            return Err(VoeError::RateLimited(self.per_minute_rule.clone()));
        }
        Ok(())
    }

    /// Consumes the client's vote allowance for the current window.
    pub fn check_vote(&self, client: IpAddr) -> Result<(), VoeError> {
        self.votes
            .check_key(&client)
            .map_err(|_| VoeError::RateLimited(self.vote_rule.clone()))
    }

    /// Uniformly random delay in `[0, max_penalty)`.
    pub fn penalty_delay(&self) -> Duration {
        if self.max_penalty.is_zero() {
            return Duration::ZERO;
        }
        self.max_penalty.mul_f64(rand::rng().random::<f64>())
    }

    /// Sleeps for a random penalty before a 429 goes out. Returns the delay.
    pub async fn penalize(&self) -> Duration {
        let delay = self.penalty_delay();
        if !delay.is_zero() {
            debug!(delay_ms = delay.as_millis(), "Delaying rate limited response");
            tokio::time::sleep(delay).await;
        }
        delay
    }

    /// Drops limiter entries whose cells have fully replenished.
    pub fn retain_recent(&self) {
        self.votes.retain_recent();
        self.per_second.retain_recent();
        self.per_minute.retain_recent();
        debug!(
            tracked_clients = self.tracked_clients(),
            "Swept replenished limiter entries"
        );
    }

    pub fn tracked_clients(&self) -> usize {
        self.votes
            .len()
            .max(self.per_second.len())
            .max(self.per_minute.len())
    }
}

/// Middleware applying the global per-client request cap to every route.
pub async fn global_rate_limit(
    State(state): State<VoeState>,
    ClientAddr(client): ClientAddr,
    req: Request,
    next: Next,
) -> Response {
    if let Err(err) = state.limiter.check_request(client) {
        warn!(%client, path = %req.uri().path(), error = %err, "Request rate limited");
        state.limiter.penalize().await;
        return err.into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> LimitsConfig {
        LimitsConfig {
            max_penalty_secs: 0,
            ..LimitsConfig::default()
        }
    }

    fn client(last: u8) -> IpAddr {
        IpAddr::from([192, 0, 2, last])
    }

    #[test]
    fn one_vote_per_window_per_client() {
        let limiter = ClientLimiter::new(&limits()).unwrap();
        assert!(limiter.check_vote(client(1)).is_ok());
        assert!(matches!(
            limiter.check_vote(client(1)),
            Err(VoeError::RateLimited(rule)) if rule == "1 per 1 day"
        ));
        // Other clients keep their own allowance.
        assert!(limiter.check_vote(client(2)).is_ok());
    }

    #[test]
    fn seventh_request_in_a_second_is_rejected() {
        let limiter = ClientLimiter::new(&limits()).unwrap();
        for _ in 0..6 {
            assert!(limiter.check_request(client(3)).is_ok());
        }
        assert!(matches!(
            limiter.check_request(client(3)),
            Err(VoeError::RateLimited(rule)) if rule == "6 per 1 second"
        ));
        assert!(limiter.check_request(client(4)).is_ok());
    }

    #[test]
    fn minute_cap_applies_independently() {
        let cfg = LimitsConfig {
            requests_per_second: 100,
            requests_per_minute: 3,
            ..limits()
        };
        let limiter = ClientLimiter::new(&cfg).unwrap();
        for _ in 0..3 {
            assert!(limiter.check_request(client(5)).is_ok());
        }
        assert!(matches!(
            limiter.check_request(client(5)),
            Err(VoeError::RateLimited(rule)) if rule == "3 per 1 minute"
        ));
    }

    #[test]
    fn vote_and_request_allowances_are_separate() {
        let limiter = ClientLimiter::new(&limits()).unwrap();
        assert!(limiter.check_vote(client(6)).is_ok());
        assert!(limiter.check_request(client(6)).is_ok());
        assert!(limiter.check_vote(client(6)).is_err());
        assert!(limiter.check_request(client(6)).is_ok());
        assert!(limiter.tracked_clients() >= 1);
    }

    #[test]
    fn zero_quotas_are_rejected() {
        let cfg = LimitsConfig {
            requests_per_second: 0,
            ..limits()
        };
        assert!(matches!(ClientLimiter::new(&cfg), Err(VoeError::Config(_))));

        let cfg = LimitsConfig {
            vote_period_secs: 0,
            ..limits()
        };
        assert!(matches!(ClientLimiter::new(&cfg), Err(VoeError::Config(_))));
    }

    #[test]
    fn penalty_stays_within_bound() {
        let cfg = LimitsConfig {
            max_penalty_secs: 15,
            ..LimitsConfig::default()
        };
        let limiter = ClientLimiter::new(&cfg).unwrap();
        for _ in 0..100 {
            assert!(limiter.penalty_delay() < Duration::from_secs(15));
        }
        assert_eq!(
            ClientLimiter::new(&limits()).unwrap().penalty_delay(),
            Duration::ZERO
        );
    }

    #[tokio::test(start_paused = true)]
    async fn penalize_sleeps_for_the_drawn_delay() {
        let cfg = LimitsConfig {
            max_penalty_secs: 15,
            ..LimitsConfig::default()
        };
        let limiter = ClientLimiter::new(&cfg).unwrap();

        let start = tokio::time::Instant::now();
        let delay = limiter.penalize().await;
        let elapsed = start.elapsed();

        assert!(delay < Duration::from_secs(15));
        assert!(elapsed >= delay, "slept {elapsed:?}, drew {delay:?}");
        assert!(elapsed <= delay + Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_penalty_does_not_sleep() {
        let limiter = ClientLimiter::new(&limits()).unwrap();
        let start = tokio::time::Instant::now();
        assert_eq!(limiter.penalize().await, Duration::ZERO);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn periods_are_described_in_the_largest_whole_unit() {
        assert_eq!(describe_period(86_400), "1 day");
        assert_eq!(describe_period(7_200), "2 hour");
        assert_eq!(describe_period(120), "2 minute");
        assert_eq!(describe_period(45), "45 second");
    }
}
