//! Access-code gate
//!
//! A shared code (`ADMIN_ACCESS_CODE`) is exchanged for a signed, 24 hour
//! `cafein_admin` cookie. Independent of admin sessions.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared::error::{AppError, ErrorCode};

use super::{cookie_value, http_only_cookie};

pub const ACCESS_COOKIE: &str = "cafein_admin";

/// Cookie lifetime (seconds)
pub const ACCESS_MAX_AGE: i64 = 60 * 60 * 24;

const ACCESS_SCOPE: &str = "cafein_admin";

#[derive(Debug, Serialize, Deserialize)]
struct AccessClaims {
    scope: String,
    exp: usize,
    iat: usize,
}

#[derive(Clone)]
pub struct AccessCodeGate {
    code: Option<String>,
    secret: String,
    secure_cookie: bool,
}

impl AccessCodeGate {
    pub fn new(code: Option<String>, secret: &str, secure_cookie: bool) -> Self {
        Self {
            code: code.filter(|c| !c.is_empty()),
            secret: secret.to_string(),
            secure_cookie,
        }
    }

    /// Check a submitted code and return the `Set-Cookie` value on success.
    ///
    /// The configuration check comes first: with no code configured every
    /// submission is a server error, never a 401.
    pub fn login(&self, submitted: Option<&str>) -> Result<String, AppError> {
        let expected = self.code.as_deref().ok_or_else(|| {
            AppError::config("ADMIN_ACCESS_CODE is not configured on the server")
        })?;

        let submitted = submitted.unwrap_or_default();
        if submitted.is_empty() || !codes_match(submitted, expected) {
            return Err(AppError::new(ErrorCode::AccessCodeInvalid));
        }

        let token = self.sign().map_err(|e| {
            tracing::error!("Access token signing failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;
        Ok(http_only_cookie(
            ACCESS_COOKIE,
            &token,
            ACCESS_MAX_AGE,
            self.secure_cookie,
        ))
    }

    /// Whether the request carries a valid, unexpired access cookie
    pub fn is_granted(&self, headers: &http::HeaderMap) -> bool {
        cookie_value(headers, ACCESS_COOKIE).is_some_and(|token| self.verify(token))
    }

    fn sign(&self) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = AccessClaims {
            scope: ACCESS_SCOPE.to_string(),
            exp: (now + chrono::Duration::seconds(ACCESS_MAX_AGE)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    fn verify(&self, token: &str) -> bool {
        jsonwebtoken::decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims.scope == ACCESS_SCOPE)
        .unwrap_or(false)
    }
}

/// Compare fixed-length digests so timing does not leak the code length
/// or the matching prefix.
fn codes_match(submitted: &str, expected: &str) -> bool {
    let a = Sha256::digest(submitted.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, HeaderValue};

    fn gate() -> AccessCodeGate {
        AccessCodeGate::new(Some("latte-art".into()), "test-secret", false)
    }

    fn token_of(cookie: &str) -> &str {
        cookie
            .strip_prefix("cafein_admin=")
            .and_then(|rest| rest.split(';').next())
            .unwrap()
    }

    #[test]
    fn unset_code_is_a_config_error() {
        let gate = AccessCodeGate::new(None, "test-secret", false);
        let err = gate.login(Some("anything")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);

        let gate = AccessCodeGate::new(Some(String::new()), "test-secret", false);
        assert_eq!(gate.login(None).unwrap_err().code, ErrorCode::ConfigError);
    }

    #[test]
    fn wrong_or_missing_code_is_rejected() {
        assert_eq!(
            gate().login(Some("latte")).unwrap_err().code,
            ErrorCode::AccessCodeInvalid
        );
        assert_eq!(
            gate().login(None).unwrap_err().code,
            ErrorCode::AccessCodeInvalid
        );
    }

    #[test]
    fn right_code_sets_http_only_cookie() {
        let cookie = gate().login(Some("latte-art")).unwrap();
        assert!(cookie.starts_with("cafein_admin="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(!cookie.contains("Secure"));

        let secure = AccessCodeGate::new(Some("latte-art".into()), "s", true)
            .login(Some("latte-art"))
            .unwrap();
        assert!(secure.ends_with("; Secure"));
    }

    #[test]
    fn issued_cookie_is_recognized() {
        let gate = gate();
        let cookie = gate.login(Some("latte-art")).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::COOKIE,
            HeaderValue::from_str(&format!("cafein_admin={}", token_of(&cookie))).unwrap(),
        );
        assert!(gate.is_granted(&headers));

        let other = AccessCodeGate::new(Some("latte-art".into()), "other-secret", false);
        assert!(!other.is_granted(&headers));
    }

    #[test]
    fn forged_cookie_value_is_not_granted() {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::COOKIE, HeaderValue::from_static("cafein_admin=1"));
        assert!(!gate().is_granted(&headers));
        assert!(!gate().is_granted(&HeaderMap::new()));
    }
}
