//! Data models
//!
//! Shared between menu-server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes assigned by the content store.

pub mod menu_item;
pub mod section;

// Re-exports
pub use menu_item::*;
pub use section::*;
