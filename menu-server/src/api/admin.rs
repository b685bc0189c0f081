//! Admin CRUD over sections and menu items
//!
//! Every route sits behind `require_admin` and answers with the re-fetched
//! `MenuSnapshot`.

use axum::Json;
use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, Query, State};
use http::StatusCode;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};

use super::{ApiResult, parse_id, parse_json};
use crate::menu::{Confirmation, MenuItemDraft, MenuSnapshot};
use crate::state::AppState;
use crate::storage::ImageUpload;

/// `?confirm=true`; any other value (or none) leaves the delete unconfirmed
#[derive(Debug, Deserialize)]
pub struct ConfirmQuery {
    pub confirm: Option<String>,
}

impl ConfirmQuery {
    pub fn confirmation(&self) -> Confirmation {
        matches!(self.confirm.as_deref(), Some("true" | "1")).into()
    }
}

/// Section form. A missing or null name is left to the editor's validation.
#[derive(Debug, Default, Deserialize)]
struct SectionForm {
    #[serde(default)]
    name: Option<String>,
}

/// GET /api/admin/menu
pub async fn get_menu(State(state): State<AppState>) -> Json<MenuSnapshot> {
    Json(state.editor.snapshot().await)
}

/// POST /api/admin/sections
pub async fn create_section(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<MenuSnapshot> {
    let form: SectionForm = parse_json(&body)?;
    let name = form.name.unwrap_or_default();
    Ok(Json(state.editor.add_section(&name).await?))
}

/// DELETE /api/admin/sections/{id}?confirm=true
pub async fn delete_section(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ConfirmQuery>,
) -> ApiResult<MenuSnapshot> {
    Ok(Json(
        state
            .editor
            .delete_section(parse_id(&id)?, query.confirmation())
            .await?,
    ))
}

/// POST /api/admin/menu-items (multipart: name, description, price, section_id, image)
pub async fn create_menu_item(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<MenuSnapshot> {
    let (draft, image) = read_item_form(multipart).await?;
    Ok(Json(state.editor.add_menu_item(draft, image).await?))
}

/// DELETE /api/admin/menu-items/{id}?confirm=true
pub async fn delete_menu_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ConfirmQuery>,
) -> ApiResult<MenuSnapshot> {
    Ok(Json(
        state
            .editor
            .delete_menu_item(parse_id(&id)?, query.confirmation())
            .await?,
    ))
}

/// Collect the item form. An empty file part (no file chosen) means no image.
async fn read_item_form(
    mut multipart: Multipart,
) -> Result<(MenuItemDraft, Option<ImageUpload>), AppError> {
    let mut draft = MenuItemDraft::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if !(file_name.is_empty() && bytes.is_empty()) {
                    image = Some(ImageUpload {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            "name" => draft.name = field.text().await.map_err(multipart_error)?,
            "description" => draft.description = field.text().await.map_err(multipart_error)?,
            "price" => draft.price = field.text().await.map_err(multipart_error)?,
            "section_id" => {
                let text = field.text().await.map_err(multipart_error)?;
                draft.section_id = text.trim().parse().ok();
            }
            other => tracing::debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    Ok((draft, image))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::invalid_field(ErrorCode::FileTooLarge, "image");
    }
    AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {e}"))
}
