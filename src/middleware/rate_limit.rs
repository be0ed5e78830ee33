use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

/// Sliding one-second window over the credential endpoints. In-process
/// only; a single instance is shared by the register/login routes to slow
/// brute-force attempts.
#[derive(Clone, Debug)]
pub struct AuthRateLimiter {
    max_per_second: u32,
    hits: Arc<Mutex<VecDeque<Instant>>>,
}

impl AuthRateLimiter {
    pub fn new(max_per_second: u32) -> Self {
        Self {
            max_per_second: max_per_second.max(1),
            hits: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    fn try_acquire(&self) -> bool {
        let mut hits = self.hits.lock().expect("rate limiter mutex poisoned");
        let now = Instant::now();
        while hits
            .front()
            .map_or(false, |t| now.duration_since(*t) >= Duration::from_secs(1))
        {
            hits.pop_front();
        }
        if (hits.len() as u32) < self.max_per_second {
            hits.push_back(now);
            true
        } else {
            false
        }
    }
}

pub async fn limit_middleware(
    State(limiter): State<AuthRateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    if limiter.try_acquire() {
        next.run(req).await
    } else {
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "Too many requests, slow down" })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_the_limit_then_blocks() {
        let limiter = AuthRateLimiter::new(3);
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn zero_limit_is_clamped_to_one() {
        let limiter = AuthRateLimiter::new(0);
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }
}
