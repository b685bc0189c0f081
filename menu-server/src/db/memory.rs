use async_trait::async_trait;
use parking_lot::RwLock;
use shared::models::{MenuItem, MenuItemCreate, Section, SectionCreate};
use shared::util::{now_millis, snowflake_id};

use super::ContentStore;
use crate::error::BoxError;

#[derive(Default)]
struct Tables {
    sections: Vec<Section>,
    items: Vec<MenuItem>,
    last_created_at: i64,
}

impl Tables {
    fn fresh_id(&self) -> i64 {
        loop {
            let id = snowflake_id();
            if !self.sections.iter().any(|s| s.id == id) && !self.items.iter().any(|i| i.id == id) {
                return id;
            }
        }
    }

    /// Strictly increasing timestamp so insertion order survives sorting
    fn next_created_at(&mut self) -> i64 {
        let ts = now_millis().max(self.last_created_at + 1);
        self.last_created_at = ts;
        ts
    }
}

/// In-process content store for development and tests
#[derive(Default)]
pub struct MemoryContentStore {
    tables: RwLock<Tables>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed raw records, bypassing id and timestamp assignment
    pub fn with_records(sections: Vec<Section>, items: Vec<MenuItem>) -> Self {
        let last_created_at = sections
            .iter()
            .map(|s| s.created_at)
            .chain(items.iter().map(|i| i.created_at))
            .max()
            .unwrap_or(0);
        Self {
            tables: RwLock::new(Tables {
                sections,
                items,
                last_created_at,
            }),
        }
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn list_sections(&self) -> Result<Vec<Section>, BoxError> {
        let mut sections = self.tables.read().sections.clone();
        sections.sort_by_key(|s| (s.created_at, s.id));
        Ok(sections)
    }

    async fn list_menu_items(&self) -> Result<Vec<MenuItem>, BoxError> {
        let mut items = self.tables.read().items.clone();
        items.sort_by_key(|i| (i.created_at, i.id));
        Ok(items)
    }

    async fn find_section(&self, id: i64) -> Result<Option<Section>, BoxError> {
        Ok(self.tables.read().sections.iter().find(|s| s.id == id).cloned())
    }

    async fn find_menu_item(&self, id: i64) -> Result<Option<MenuItem>, BoxError> {
        Ok(self.tables.read().items.iter().find(|i| i.id == id).cloned())
    }

    async fn insert_section(&self, data: &SectionCreate) -> Result<Section, BoxError> {
        let mut tables = self.tables.write();
        let section = Section {
            id: tables.fresh_id(),
            name: data.name.clone(),
            created_at: tables.next_created_at(),
        };
        tables.sections.push(section.clone());
        Ok(section)
    }

    async fn insert_menu_item(&self, data: &MenuItemCreate) -> Result<MenuItem, BoxError> {
        let mut tables = self.tables.write();
        let item = MenuItem {
            id: tables.fresh_id(),
            name: data.name.clone(),
            description: data.description.clone(),
            price: data.price,
            section_id: data.section_id,
            image_url: data.image_url.clone(),
            created_at: tables.next_created_at(),
        };
        tables.items.push(item.clone());
        Ok(item)
    }

    async fn delete_section(&self, id: i64) -> Result<bool, BoxError> {
        let mut tables = self.tables.write();
        let before = tables.sections.len();
        tables.sections.retain(|s| s.id != id);
        if tables.sections.len() == before {
            return Ok(false);
        }
        tables.items.retain(|i| i.section_id != id);
        Ok(true)
    }

    async fn delete_menu_item(&self, id: i64) -> Result<bool, BoxError> {
        let mut tables = self.tables.write();
        let before = tables.items.len();
        tables.items.retain(|i| i.id != id);
        Ok(tables.items.len() != before)
    }
}
