//! Application state for menu-server

use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::{AccessCodeGate, AuthProvider, PasswordAuthProvider, RateLimiter};
use crate::config::Config;
use crate::db::{ContentStore, MemoryContentStore, PgContentStore};
use crate::error::BoxError;
use crate::menu::MenuEditor;
use crate::storage::{BlobStore, LocalBlobStore, S3BlobStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Menu reads and admin writes; owns the content store and the write lock
    pub editor: MenuEditor,
    /// Session auth collaborator
    pub auth: Arc<dyn AuthProvider>,
    /// Access-code cookie gate
    pub access: AccessCodeGate,
    /// Attempt limiter for the sign-in and access-code routes
    pub rate_limiter: RateLimiter,
    /// Directory served under `/media` when images are stored locally
    pub media_dir: Option<PathBuf>,
    /// Mark cookies `Secure`
    pub secure_cookies: bool,
    /// Allowed CORS origin (`None` = permissive)
    pub cors_allow_origin: Option<String>,
}

impl AppState {
    /// Create the state from configuration, connecting real backends
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let content: Arc<dyn ContentStore> = match &config.database_url {
            Some(url) => {
                let store = PgContentStore::connect(url).await?;
                tracing::info!("Content store: PostgreSQL");
                Arc::new(store)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory content store");
                Arc::new(MemoryContentStore::new())
            }
        };

        let (blobs, media_dir): (Arc<dyn BlobStore>, Option<PathBuf>) =
            match (&config.s3_bucket, &config.s3_public_base_url) {
                (Some(bucket), Some(base_url)) => {
                    tracing::info!(bucket = %bucket, "Blob store: S3");
                    (
                        Arc::new(S3BlobStore::from_env(bucket.clone(), base_url).await),
                        None,
                    )
                }
                _ => {
                    let local = LocalBlobStore::new(&config.media_dir, &config.public_base_url);
                    tracing::info!(dir = %local.root().display(), "Blob store: local directory");
                    let dir = local.root().to_path_buf();
                    (Arc::new(local), Some(dir))
                }
            };

        let auth: Arc<dyn AuthProvider> = Arc::new(PasswordAuthProvider::new(
            &config.admin_email,
            &config.admin_password_hash,
            &config.jwt_secret,
        ));

        Ok(Self::with_backends(config, content, blobs, auth, media_dir))
    }

    /// Assemble the state around already-built collaborators
    pub fn with_backends(
        config: &Config,
        content: Arc<dyn ContentStore>,
        blobs: Arc<dyn BlobStore>,
        auth: Arc<dyn AuthProvider>,
        media_dir: Option<PathBuf>,
    ) -> Self {
        if config.admin_access_code.is_none() {
            tracing::warn!("ADMIN_ACCESS_CODE not set, access-code login will report a config error");
        }

        Self {
            editor: MenuEditor::new(content, blobs),
            auth,
            access: AccessCodeGate::new(
                config.admin_access_code.clone(),
                &config.jwt_secret,
                config.is_production(),
            ),
            rate_limiter: RateLimiter::from_config(config),
            media_dir,
            secure_cookies: config.is_production(),
            cors_allow_origin: config.cors_allow_origin.clone(),
        }
    }
}
