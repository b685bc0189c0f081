//! Menu server configuration

use crate::error::BoxError;

/// Menu server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP listen port
    pub http_port: u16,
    /// PostgreSQL connection URL (`None` = in-memory content store, development only)
    pub database_url: Option<String>,
    /// Shared access code for the cookie gate (`None` = gate reports a config error)
    pub admin_access_code: Option<String>,
    /// HMAC secret for session and access-code tokens
    pub jwt_secret: String,
    /// Admin account email
    pub admin_email: String,
    /// Argon2 PHC hash of the admin password
    pub admin_password_hash: String,
    /// S3 bucket for item images (`None` = local media directory)
    pub s3_bucket: Option<String>,
    /// Public base URL objects in `s3_bucket` are reachable under
    pub s3_public_base_url: Option<String>,
    /// Directory for locally stored images
    pub media_dir: String,
    /// Public base URL of this server (used for local image URLs)
    pub public_base_url: String,
    /// Log level when `RUST_LOG` is not set
    pub log_level: String,
    /// Emit JSON log lines
    pub log_json: bool,
    /// Directory for daily rolling log files
    pub log_dir: Option<String>,
    /// Allowed CORS origin (`None` = permissive)
    pub cors_allow_origin: Option<String>,
    /// Sign-in and access-code attempts per client and window
    pub login_max_attempts: u32,
    pub login_window_secs: u64,
    /// Take the client address from `X-Forwarded-For` (only behind a proxy that sets it)
    pub trust_forwarded_for: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".into(),
            http_port: 8080,
            database_url: None,
            admin_access_code: None,
            jwt_secret: "dev-JWT_SECRET-not-for-production".into(),
            admin_email: "admin@cafein.local".into(),
            admin_password_hash: String::new(),
            s3_bucket: None,
            s3_public_base_url: None,
            media_dir: "media".into(),
            public_base_url: "http://localhost:8080".into(),
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            cors_allow_origin: None,
            login_max_attempts: 5,
            login_window_secs: 60,
            trust_forwarded_for: false,
        }
    }
}

fn flag_env(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn parsed_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let http_port = parsed_env("HTTP_PORT", 8080);

        let database_url = optional_env("DATABASE_URL");
        if database_url.is_none() && environment != "development" {
            return Err(format!("DATABASE_URL must be set in {environment} environment").into());
        }

        let s3_bucket = optional_env("S3_BUCKET");
        let s3_public_base_url = optional_env("S3_PUBLIC_BASE_URL");
        if s3_bucket.is_some() && s3_public_base_url.is_none() {
            return Err("S3_PUBLIC_BASE_URL must be set when S3_BUCKET is set".into());
        }

        Ok(Self {
            http_port,
            database_url,
            // Not required at startup: the access-code route reports it per request
            admin_access_code: optional_env("ADMIN_ACCESS_CODE"),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@cafein.local".into())
                .trim()
                .to_lowercase(),
            admin_password_hash: Self::require_secret("ADMIN_PASSWORD_HASH", &environment)?,
            s3_bucket,
            s3_public_base_url,
            media_dir: std::env::var("MEDIA_DIR").unwrap_or_else(|_| "media".into()),
            public_base_url: optional_env("PUBLIC_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{http_port}")),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: flag_env("LOG_JSON"),
            log_dir: optional_env("LOG_DIR"),
            cors_allow_origin: optional_env("CORS_ALLOW_ORIGIN"),
            login_max_attempts: parsed_env("LOGIN_MAX_ATTEMPTS", 5),
            login_window_secs: parsed_env("LOGIN_WINDOW_SECS", 60),
            trust_forwarded_for: flag_env("TRUST_FORWARDED_FOR"),
            environment,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
