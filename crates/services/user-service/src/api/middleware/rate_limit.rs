//! Per-client fixed-window rate limiting.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tokio::time::Instant;

use common::{AppError, RateLimitConfig};

use crate::api::AppState;

/// Counters are dropped once the table grows past this many clients.
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u64,
}

/// In-memory request counter keyed by client.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u64,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(max_requests: u64, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, Duration::from_secs(config.window_seconds))
    }

    pub fn max_requests(&self) -> u64 {
        self.max_requests
    }

    /// Seconds a rejected client should wait, at least 1.
    pub fn retry_after(&self) -> u64 {
        self.window.as_secs().max(1)
    }

    /// Count a request for `key`; returns the count in the current window
    /// and whether it is within the limit.
    pub fn check_rate_limit(&self, key: &str) -> (u64, bool) {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        if windows.len() > PRUNE_THRESHOLD {
            let window = self.window;
            windows.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        entry.count += 1;
        (entry.count, entry.count <= self.max_requests)
    }
}

/// Rate limit error response
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert("Retry-After", HeaderValue::from(self.retry_after));
        headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));

        (
            StatusCode::TOO_MANY_REQUESTS,
            headers,
            Json(json!({ "error": AppError::TooManyRequests.to_string() })),
        )
            .into_response()
    }
}

/// Extract client identifier for rate limiting.
/// Uses X-Forwarded-For header if behind proxy, otherwise uses connection IP.
fn get_client_identifier(request: &Request) -> String {
    // First entry of X-Forwarded-For is the original client
    if let Some(forwarded) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(ip) = forwarded.split(',').next().map(str::trim).filter(|ip| !ip.is_empty()) {
            return ip.to_string();
        }
    }

    if let Some(real_ip) = request
        .headers()
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
    {
        return real_ip.trim().to_string();
    }

    if let Some(connect_info) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return connect_info.0.ip().to_string();
    }

    "unknown".to_string()
}

/// Rejects clients over their per-window budget with 429.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let limiter = &state.rate_limiter;
    let client_id = get_client_identifier(&request);

    let (count, allowed) = limiter.check_rate_limit(&client_id);
    if !allowed {
        tracing::warn!(client = %client_id, count, "Rate limit exceeded");
        return Err(RateLimitError {
            retry_after: limiter.retry_after(),
        });
    }

    let mut response = next.run(request).await;

    let remaining = limiter.max_requests().saturating_sub(count);
    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Limit", HeaderValue::from(limiter.max_requests()));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(remaining));

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[tokio::test(start_paused = true)]
    async fn test_fixed_window() {
        let limiter = RateLimiter::new(2, Duration::from_secs(1));

        assert_eq!(limiter.check_rate_limit("a"), (1, true));
        assert_eq!(limiter.check_rate_limit("a"), (2, true));
        assert_eq!(limiter.check_rate_limit("a"), (3, false));
        // Other clients have their own budget
        assert_eq!(limiter.check_rate_limit("b"), (1, true));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(limiter.check_rate_limit("a"), (1, true));
    }

    #[test]
    fn test_rate_limit_error_response() {
        let response = RateLimitError { retry_after: 1 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["Retry-After"], "1");
    }

    #[test]
    fn test_client_identifier_prefers_forwarded_for() {
        let request = axum::http::Request::builder()
            .header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
            .header("X-Real-IP", "10.0.0.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(get_client_identifier(&request), "203.0.113.7");

        let request = axum::http::Request::builder()
            .header("X-Real-IP", "10.0.0.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(get_client_identifier(&request), "10.0.0.2");

        let request = axum::http::Request::builder().body(Body::empty()).unwrap();
        assert_eq!(get_client_identifier(&request), "unknown");
    }
}
