//! Single-admin password provider with JWT sessions

use async_trait::async_trait;
use dashmap::DashMap;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{AuthError, AuthProvider, Session};
use crate::util::verify_password;

/// JWT claims for an admin session
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Admin email
    pub sub: String,
    /// Token id, used for revocation
    pub jti: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// One admin account from configuration; sessions are HS256 tokens valid
/// for 24 hours. Sign-out revokes the token id in-process.
pub struct PasswordAuthProvider {
    admin_email: String,
    password_hash: String,
    secret: String,
    /// jti -> exp (seconds)
    revoked: DashMap<String, usize>,
}

impl PasswordAuthProvider {
    pub fn new(admin_email: &str, password_hash: &str, secret: &str) -> Self {
        Self {
            admin_email: admin_email.trim().to_lowercase(),
            password_hash: password_hash.to_string(),
            secret: secret.to_string(),
            revoked: DashMap::new(),
        }
    }

    fn create_token(&self) -> Result<(String, SessionClaims), jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = SessionClaims {
            sub: self.admin_email.clone(),
            jti: uuid::Uuid::new_v4().to_string(),
            exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok((token, claims))
    }

    fn decode(&self, token: &str) -> Option<SessionClaims> {
        jsonwebtoken::decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| tracing::debug!("Session token rejected: {e}"))
        .ok()
        .map(|data| data.claims)
    }

    fn purge_revoked(&self) {
        let now = chrono::Utc::now().timestamp() as usize;
        self.revoked.retain(|_, exp| *exp > now);
    }
}

fn session_from(token: String, claims: &SessionClaims) -> Session {
    Session {
        token,
        email: claims.sub.clone(),
        expires_at: claims.exp as i64 * 1000,
    }
}

#[async_trait]
impl AuthProvider for PasswordAuthProvider {
    async fn get_session(&self, token: &str) -> Result<Option<Session>, AuthError> {
        let Some(claims) = self.decode(token) else {
            return Ok(None);
        };
        if self.revoked.contains_key(&claims.jti) || claims.sub != self.admin_email {
            return Ok(None);
        }
        Ok(Some(session_from(token.to_string(), &claims)))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let email = email.trim().to_lowercase();
        if email != self.admin_email || !verify_password(password, &self.password_hash) {
            tracing::info!(email = %email, "Admin sign-in rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let (token, claims) = self
            .create_token()
            .map_err(|e| AuthError::Unavailable(e.into()))?;
        tracing::info!(email = %email, "Admin signed in");
        Ok(session_from(token, &claims))
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        self.purge_revoked();
        if let Some(claims) = self.decode(token) {
            tracing::info!(email = %claims.sub, "Admin signed out");
            self.revoked.insert(claims.jti, claims.exp);
        }
        Ok(())
    }
}
