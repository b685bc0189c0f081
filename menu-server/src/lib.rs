//! menu-server: public café menu plus the admin surface that edits it
//!
//! # Module layout
//!
//! ```text
//! menu-server/src/
//! ├── api/        # HTTP routes and handlers
//! ├── auth/       # session provider, admin gate, access-code gate, rate limit
//! ├── db/         # Content Store (PostgreSQL, in-memory)
//! ├── storage/    # Blob store for item images (S3, local directory)
//! ├── menu/       # snapshot (read side) and editor (write side)
//! ├── config.rs   # environment configuration
//! ├── error.rs    # ServiceError -> AppError
//! └── state.rs    # shared application state
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod menu;
pub mod state;
pub mod storage;
pub mod util;

pub use config::Config;
pub use error::{BoxError, ServiceError};
pub use state::AppState;
