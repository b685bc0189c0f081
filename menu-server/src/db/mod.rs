//! Content Store: persisted sections and menu items
//!
//! The store is the sole owner of records. It assigns ids and `created_at`
//! and returns both lists ordered by `created_at` (ties by `id`).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use shared::models::{MenuItem, MenuItemCreate, Section, SectionCreate};

use crate::error::BoxError;

pub use memory::MemoryContentStore;
pub use postgres::PgContentStore;

#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn list_sections(&self) -> Result<Vec<Section>, BoxError>;

    async fn list_menu_items(&self) -> Result<Vec<MenuItem>, BoxError>;

    async fn find_section(&self, id: i64) -> Result<Option<Section>, BoxError>;

    async fn find_menu_item(&self, id: i64) -> Result<Option<MenuItem>, BoxError>;

    async fn insert_section(&self, data: &SectionCreate) -> Result<Section, BoxError>;

    async fn insert_menu_item(&self, data: &MenuItemCreate) -> Result<MenuItem, BoxError>;

    /// Delete a section together with every item that references it.
    /// Returns `false` when the section did not exist.
    async fn delete_section(&self, id: i64) -> Result<bool, BoxError>;

    /// Returns `false` when the item did not exist.
    async fn delete_menu_item(&self, id: i64) -> Result<bool, BoxError>;
}
