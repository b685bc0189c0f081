//! Section Model

use serde::{Deserialize, Serialize};

/// Menu section entity (e.g. "Coffee", "Snacks")
///
/// `id` and `created_at` are assigned by the content store and never change.
/// `created_at` (Unix millis) is the only ordering key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Section {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
}

/// Create section payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionCreate {
    pub name: String,
}
