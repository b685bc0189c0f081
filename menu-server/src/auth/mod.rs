//! Authentication for the admin surface
//!
//! Two independent gates:
//! - session gate: `AuthProvider` sessions, required by every admin write route
//! - access-code gate: a shared code exchanged for a signed `cafein_admin` cookie

pub mod access_code;
pub mod gate;
pub mod password;
pub mod rate_limit;
pub mod session;

use async_trait::async_trait;
use http::HeaderMap;
use serde::Serialize;
use thiserror::Error;

use crate::error::BoxError;

pub use access_code::AccessCodeGate;
pub use gate::{AdminGate, GateState, GateView, Route};
pub use password::PasswordAuthProvider;
pub use rate_limit::RateLimiter;
pub use session::require_admin;

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "cafein_session";

/// A valid admin session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    #[serde(skip_serializing)]
    pub token: String,
    pub email: String,
    /// Expiry (Unix millis)
    pub expires_at: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("auth provider unavailable: {0}")]
    Unavailable(BoxError),
}

/// Session-based auth collaborator. Session validity is decided here only.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// `Ok(None)` for unknown, expired or revoked tokens
    async fn get_session(&self, token: &str) -> Result<Option<Session>, AuthError>;

    async fn sign_in_with_password(&self, email: &str, password: &str)
    -> Result<Session, AuthError>;

    async fn sign_out(&self, token: &str) -> Result<(), AuthError>;
}

/// Read a cookie value from the request headers
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

/// Session token from `Authorization: Bearer` or the session cookie
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .or_else(|| cookie_value(headers, SESSION_COOKIE))
}

/// `Set-Cookie` value for an HttpOnly cookie. `max_age = 0` clears it.
pub fn http_only_cookie(name: &str, value: &str, max_age: i64, secure: bool) -> String {
    let mut cookie = format!("{name}={value}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
