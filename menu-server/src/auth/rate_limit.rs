//! Attempt limiting for the two credential gates
//!
//! Each gate keeps its own fixed window per client. Clients are keyed by
//! peer address; `X-Forwarded-For` is only honoured when the server is
//! configured to sit behind a trusted proxy.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use http::header;
use shared::error::{AppError, ErrorCode};
use tokio::time::Instant;

use crate::config::Config;
use crate::state::AppState;

/// Credential gate an attempt is charged to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    /// `POST /api/auth/login`
    SignIn,
    /// `POST /api/admin/login`
    AccessCode,
}

impl Gate {
    pub fn as_str(self) -> &'static str {
        match self {
            Gate::SignIn => "sign_in",
            Gate::AccessCode => "access_code",
        }
    }
}

/// Attempts allowed per client and gate within one window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptBudget {
    pub max_attempts: u32,
    pub window: Duration,
}

impl AttemptBudget {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.login_max_attempts.max(1),
            window: Duration::from_secs(config.login_window_secs.max(1)),
        }
    }
}

impl Default for AttemptBudget {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window: Duration::from_secs(60),
        }
    }
}

struct Window {
    opened: Instant,
    attempts: u32,
}

#[derive(Clone)]
pub struct RateLimiter {
    budget: AttemptBudget,
    trust_forwarded_for: bool,
    windows: Arc<DashMap<(Gate, String), Window>>,
}

impl RateLimiter {
    pub fn new(budget: AttemptBudget, trust_forwarded_for: bool) -> Self {
        Self {
            budget,
            trust_forwarded_for,
            windows: Arc::new(DashMap::new()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(AttemptBudget::from_config(config), config.trust_forwarded_for)
    }

    /// Charge one attempt. `Err` carries how long until the window reopens.
    pub fn attempt(&self, gate: Gate, client: &str) -> Result<(), Duration> {
        let now = Instant::now();
        let mut window = self
            .windows
            .entry((gate, client.to_owned()))
            .or_insert_with(|| Window {
                opened: now,
                attempts: 0,
            });

        let elapsed = now.duration_since(window.opened);
        if elapsed >= self.budget.window {
            window.opened = now;
            window.attempts = 0;
        }

        if window.attempts >= self.budget.max_attempts {
            return Err(self.budget.window - now.duration_since(window.opened));
        }
        window.attempts += 1;
        Ok(())
    }

    /// Drop windows that have already closed
    pub fn prune(&self) {
        let now = Instant::now();
        self.windows
            .retain(|_, window| now.duration_since(window.opened) < self.budget.window);
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    /// Key a request by client address
    pub fn client_key(&self, request: &Request) -> String {
        if self.trust_forwarded_for
            && let Some(client) = request
                .headers()
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        {
            return client.to_owned();
        }

        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_owned())
    }
}

async fn limit(state: &AppState, gate: Gate, request: Request, next: Next) -> Response {
    let client = state.rate_limiter.client_key(&request);
    match state.rate_limiter.attempt(gate, &client) {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            let secs = retry_after.as_secs().max(1);
            tracing::warn!(gate = gate.as_str(), client = %client, retry_after = secs, "Too many attempts");
            let error = AppError::new(ErrorCode::TooManyRequests).with_detail("retry_after", secs);
            ([(header::RETRY_AFTER, secs.to_string())], error).into_response()
        }
    }
}

pub async fn sign_in_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    limit(&state, Gate::SignIn, request, next).await
}

pub async fn access_code_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    limit(&state, Gate::AccessCode, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn limiter(max_attempts: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(
            AttemptBudget {
                max_attempts,
                window: Duration::from_secs(window_secs),
            },
            false,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn gates_and_clients_have_separate_budgets() {
        let limiter = limiter(3, 60);
        for _ in 0..3 {
            assert!(limiter.attempt(Gate::SignIn, "10.0.0.1").is_ok());
        }
        assert!(limiter.attempt(Gate::SignIn, "10.0.0.1").is_err());

        assert!(limiter.attempt(Gate::SignIn, "10.0.0.2").is_ok());
        assert!(limiter.attempt(Gate::AccessCode, "10.0.0.1").is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn refused_attempts_report_time_left_and_do_not_extend_the_window() {
        let limiter = limiter(2, 60);
        limiter.attempt(Gate::AccessCode, "a").unwrap();
        limiter.attempt(Gate::AccessCode, "a").unwrap();

        tokio::time::advance(Duration::from_secs(20)).await;
        assert_eq!(
            limiter.attempt(Gate::AccessCode, "a"),
            Err(Duration::from_secs(40))
        );

        tokio::time::advance(Duration::from_secs(40)).await;
        assert!(limiter.attempt(Gate::AccessCode, "a").is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn prune_keeps_open_windows_only() {
        let limiter = limiter(5, 60);
        limiter.attempt(Gate::SignIn, "old").unwrap();
        tokio::time::advance(Duration::from_secs(45)).await;
        limiter.attempt(Gate::SignIn, "new").unwrap();
        tokio::time::advance(Duration::from_secs(20)).await;

        limiter.prune();
        assert_eq!(limiter.tracked_clients(), 1);
        assert!(limiter.windows.contains_key(&(Gate::SignIn, "new".to_owned())));
    }

    #[test]
    fn budget_from_config_never_drops_to_zero() {
        let config = Config {
            login_max_attempts: 0,
            login_window_secs: 0,
            ..Config::default()
        };
        let budget = AttemptBudget::from_config(&config);
        assert_eq!(budget.max_attempts, 1);
        assert_eq!(budget.window, Duration::from_secs(1));
        assert_eq!(
            AttemptBudget::from_config(&Config::default()),
            AttemptBudget::default()
        );
    }

    fn forwarded(value: &str) -> Request {
        Request::builder()
            .header("x-forwarded-for", value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn forwarded_for_is_ignored_unless_trusted() {
        let direct = limiter(5, 60);
        assert_eq!(direct.client_key(&forwarded("203.0.113.7")), "unknown");

        let mut request = forwarded("203.0.113.7");
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 10], 41000))));
        assert_eq!(direct.client_key(&request), "192.0.2.10");

        let proxied = RateLimiter::new(AttemptBudget::default(), true);
        assert_eq!(
            proxied.client_key(&forwarded("203.0.113.7, 10.0.0.1")),
            "203.0.113.7"
        );
        assert_eq!(proxied.client_key(&forwarded(" ")), "unknown");
    }
}
