//! Shared types for the cafe menu
//!
//! Domain models, the pure menu read model, and the error/response types
//! that cross the HTTP boundary.

pub mod error;
pub mod menu;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use menu::{MenuView, SectionGroup, group_by_section};
