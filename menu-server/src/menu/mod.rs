//! Menu snapshot (read side) and editor (admin write side)

mod editor;
mod snapshot;

pub use editor::{Confirmation, MenuEditor, MenuItemDraft};
pub use snapshot::MenuSnapshot;
