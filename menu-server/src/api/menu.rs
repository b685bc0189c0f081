//! Public menu

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use shared::menu::MenuView;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    /// Active section; unknown or malformed ids fall back to the first section
    pub section: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PublicMenu {
    #[serde(flatten)]
    pub view: MenuView,
    pub sections_degraded: bool,
    pub items_degraded: bool,
}

/// GET /api/menu?section=<id>
///
/// Always answers 200: a failing side of the store degrades to empty.
pub async fn public_menu(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> Json<PublicMenu> {
    let selection = query.section.and_then(|s| s.trim().parse::<i64>().ok());
    let snapshot = state.editor.snapshot().await;

    Json(PublicMenu {
        view: snapshot.view(selection),
        sections_degraded: snapshot.sections_degraded,
        items_degraded: snapshot.items_degraded,
    })
}
