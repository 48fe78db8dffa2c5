//! Login rate limiting.
//!
//! Limits admin login attempts per client address with a token bucket per
//! address.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovRateLimiter,
};
use serde_json::json;
use std::{
    collections::HashMap,
    net::SocketAddr,
    num::NonZeroU32,
    sync::{Arc, RwLock},
};

use crate::app::AppState;

/// Type alias for the rate limiter used per client.
type ClientRateLimiter = GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limiter state shared across all requests, keyed by client address.
pub struct RateLimiterState {
    limiters: RwLock<HashMap<String, Arc<ClientRateLimiter>>>,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// Create a new rate limiter state with the specified limit per minute.
    pub fn new(rate_limit_per_minute: u32) -> Self {
        Self {
            limiters: RwLock::new(HashMap::new()),
            rate_limit_per_minute,
        }
    }

    pub fn rate_limit_per_minute(&self) -> u32 {
        self.rate_limit_per_minute
    }

    fn quota(&self) -> Quota {
        Quota::per_minute(NonZeroU32::new(self.rate_limit_per_minute).unwrap_or(NonZeroU32::MIN))
    }

    /// Get or create the limiter for a client.
    fn get_or_create_limiter(&self, client: &str) -> Arc<ClientRateLimiter> {
        if let Ok(limiters) = self.limiters.read() {
            if let Some(limiter) = limiters.get(client) {
                return limiter.clone();
            }
        }

        let Ok(mut limiters) = self.limiters.write() else {
            return Arc::new(GovRateLimiter::direct(self.quota()));
        };

        // Double-check in case another request created it
        limiters
            .entry(client.to_string())
            .or_insert_with(|| Arc::new(GovRateLimiter::direct(self.quota())))
            .clone()
    }

    /// Check if a request from `client` should be allowed.
    /// Returns Err with retry-after seconds when the client is limited.
    pub fn check(&self, client: &str) -> Result<(), u64> {
        let limiter = self.get_or_create_limiter(client);

        match limiter.check() {
            Ok(_) => Ok(()),
            Err(not_until) => {
                let wait_time = not_until.wait_time_from(DefaultClock::default().now());
                Err(wait_time.as_secs().max(1))
            }
        }
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let active = self.limiters.read().map(|l| l.len()).unwrap_or(0);
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("active_limiters", &active)
            .finish()
    }
}

/// Best-effort client address: the first `X-Forwarded-For` hop, then the
/// socket peer address.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware that limits login attempts per client address.
pub async fn login_rate_limit(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(ref rate_limiter) = state.rate_limiter {
        let peer = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0);
        let client = client_key(req.headers(), peer);

        if let Err(retry_after) = rate_limiter.check(&client) {
            tracing::warn!(client = %client, "Login rate limit exceeded");
            return rate_limited_response(rate_limiter.rate_limit_per_minute(), retry_after);
        }
    }

    next.run(req).await
}

/// Create a rate limited response with a Retry-After header.
fn rate_limited_response(limit: u32, retry_after: u64) -> Response {
    let body = json!({
        "error": "rate_limited",
        "message": format!("Rate limit of {} login attempts/minute exceeded", limit),
        "retryAfter": retry_after
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }
    response
}
