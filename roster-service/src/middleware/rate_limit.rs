//! Per-client rate limiting for the listing route
//!
//! An in-memory keyed GCRA limiter (governor). Each client starts with a full
//! burst of `max_requests` and regains one request every
//! `window / max_requests`.

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::{Clock, DefaultClock},
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter,
};

use crate::{config::Config, error::Error, ids::request_id_from};

type KeyedLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Forget idle clients once this many are tracked
const MAX_TRACKED_CLIENTS: usize = 10_000;

/// Keyed limiter shared by every request to the guarded routes
#[derive(Clone)]
pub struct ListingRateLimit {
    limiter: Arc<KeyedLimiter>,
    clock: DefaultClock,
    max_requests: u32,
    window: Duration,
    trust_forwarded_for: bool,
}

impl std::fmt::Debug for ListingRateLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingRateLimit")
            .field("max_requests", &self.max_requests)
            .field("window", &self.window)
            .field("trust_forwarded_for", &self.trust_forwarded_for)
            .finish()
    }
}

impl ListingRateLimit {
    /// Allow `max_requests` per `window` for each client
    ///
    /// Returns `None` when either value is zero.
    pub fn new(max_requests: u32, window: Duration) -> Option<Self> {
        let burst = NonZeroU32::new(max_requests)?;
        let quota = Quota::with_period(window / max_requests)?.allow_burst(burst);

        Some(Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
            clock: DefaultClock::default(),
            max_requests,
            window,
            trust_forwarded_for: false,
        })
    }

    /// Key clients by `X-Forwarded-For` rather than the peer address
    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    /// Build from configuration; `None` when limiting is off or misconfigured
    pub fn from_config(config: &Config) -> Option<Self> {
        let settings = config.middleware.rate_limit.as_ref()?;
        if !settings.enabled {
            return None;
        }

        let (max_requests, window) = settings.quota_for(&config.service);
        let limit = Self::new(max_requests, window)
            .map(|limit| limit.trust_forwarded_for(settings.trust_forwarded_for));
        if limit.is_none() {
            tracing::warn!(
                max_requests,
                window_secs = window.as_secs(),
                "Rate limit disabled: quota must be non-zero"
            );
        }
        limit
    }

    /// Requests allowed per window
    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Window length
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admit or reject one request from `client`
    ///
    /// On rejection, returns how long the client must wait.
    pub fn check(&self, client: &str) -> Result<(), Duration> {
        let outcome = self
            .limiter
            .check_key(&client.to_string())
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()));

        if self.limiter.len() > MAX_TRACKED_CLIENTS {
            self.limiter.retain_recent();
        }

        outcome
    }

    /// Axum middleware enforcing the limit
    pub async fn middleware(
        State(limit): State<Self>,
        request: Request,
        next: Next,
    ) -> Response {
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        let client = client_key(request.headers(), peer, limit.trust_forwarded_for);

        match limit.check(&client) {
            Ok(()) => next.run(request).await,
            Err(retry_after) => {
                tracing::warn!(
                    ip = %client,
                    path = %request.uri().path(),
                    user_agent = ?request.headers().get(header::USER_AGENT),
                    retry_after_ms = retry_after.as_millis() as u64,
                    "Rate limit exceeded"
                );
                Error::RateLimitExceeded { retry_after }
                    .with_request_id(request_id_from(request.headers()))
                    .into_response()
            }
        }
    }
}

/// Identify the caller by peer address
///
/// With `trust_forwarded_for`, the first `X-Forwarded-For` hop wins when
/// present. Otherwise the header is ignored.
pub fn client_key(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> String {
    let forwarded = if trust_forwarded_for {
        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
    } else {
        None
    };

    forwarded
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_burst_then_reject() {
        let limit = ListingRateLimit::new(3, Duration::from_secs(60)).unwrap();
        for _ in 0..3 {
            assert!(limit.check("10.0.0.1").is_ok());
        }
        let wait = limit.check("10.0.0.1").unwrap_err();
        assert!(wait > Duration::ZERO);
        assert!(wait <= Duration::from_secs(20));
    }

    #[test]
    fn test_clients_are_independent() {
        let limit = ListingRateLimit::new(1, Duration::from_secs(60)).unwrap();
        assert!(limit.check("10.0.0.1").is_ok());
        assert!(limit.check("10.0.0.1").is_err());
        assert!(limit.check("10.0.0.2").is_ok());
    }

    #[test]
    fn test_zero_quota_is_rejected() {
        assert!(ListingRateLimit::new(0, Duration::from_secs(60)).is_none());
        assert!(ListingRateLimit::new(10, Duration::ZERO).is_none());
    }

    #[test]
    fn test_from_config_respects_switch() {
        let mut config = Config::default();
        let limit = ListingRateLimit::from_config(&config).unwrap();
        assert_eq!(limit.max_requests(), 1000);
        assert_eq!(limit.window(), Duration::from_secs(60));

        if let Some(settings) = config.middleware.rate_limit.as_mut() {
            settings.enabled = false;
        }
        assert!(ListingRateLimit::from_config(&config).is_none());

        config.middleware.rate_limit = None;
        assert!(ListingRateLimit::from_config(&config).is_none());
    }

    #[test]
    fn test_client_key() {
        let peer: SocketAddr = "192.168.1.9:51000".parse().unwrap();

        let mut headers = HeaderMap::new();
        assert_eq!(client_key(&headers, Some(peer), false), "192.168.1.9");
        assert_eq!(client_key(&headers, None, false), "unknown");
        assert_eq!(client_key(&headers, Some(peer), true), "192.168.1.9");

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(client_key(&headers, Some(peer), true), "203.0.113.7");
    }

    #[test]
    fn test_forwarded_for_ignored_unless_trusted() {
        let peer: SocketAddr = "192.168.1.9:51000".parse().unwrap();

        for hop in ["1.1.1.1", "1.1.1.2", "1.1.1.3"] {
            let mut headers = HeaderMap::new();
            headers.insert("x-forwarded-for", HeaderValue::from_static(hop));
            assert_eq!(client_key(&headers, Some(peer), false), "192.168.1.9");
        }
    }

    #[test]
    fn test_from_config_carries_forwarded_for_switch() {
        let mut config = Config::default();
        assert!(!ListingRateLimit::from_config(&config).unwrap().trust_forwarded_for);

        if let Some(settings) = config.middleware.rate_limit.as_mut() {
            settings.trust_forwarded_for = true;
        }
        assert!(ListingRateLimit::from_config(&config).unwrap().trust_forwarded_for);
    }
}
