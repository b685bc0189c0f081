use serde::Serialize;
use shared::menu::MenuView;
use shared::models::{MenuItem, Section};

use crate::db::ContentStore;

/// Read-only copy of both collections, fetched in one go.
///
/// Sections and items load independently: a failure on one side is logged
/// and that side comes back empty, flagged as degraded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MenuSnapshot {
    pub sections: Vec<Section>,
    pub items: Vec<MenuItem>,
    pub sections_degraded: bool,
    pub items_degraded: bool,
}

impl MenuSnapshot {
    pub async fn load(store: &dyn ContentStore) -> Self {
        let (sections, items) = tokio::join!(store.list_sections(), store.list_menu_items());

        let (sections, sections_degraded) = match sections {
            Ok(sections) => (sections, false),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load sections");
                (Vec::new(), true)
            }
        };
        let (items, items_degraded) = match items {
            Ok(items) => (items, false),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load menu items");
                (Vec::new(), true)
            }
        };

        Self {
            sections,
            items,
            sections_degraded,
            items_degraded,
        }
    }

    /// Group into a view with an optional active-section choice
    pub fn view(&self, selection: Option<i64>) -> MenuView {
        let view = MenuView::new(&self.sections, &self.items).with_selection(selection);
        if view.orphan_count > 0 {
            tracing::debug!(orphans = view.orphan_count, "Menu items without a section skipped");
        }
        view
    }
}
