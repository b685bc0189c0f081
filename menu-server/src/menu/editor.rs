//! Admin write model
//!
//! Every operation validates first, then runs one write unit under the
//! editor's lock and answers with a fresh [`MenuSnapshot`]. Nothing is
//! retried; a failed write leaves the store as it was.

use std::sync::Arc;

use shared::error::ErrorCode;
use shared::models::{MenuItemCreate, SectionCreate, parse_price};
use tokio::sync::Mutex;

use super::MenuSnapshot;
use crate::db::ContentStore;
use crate::error::{ServiceError, ServiceResult};
use crate::storage::{BlobStore, ImageUpload, key_from_url, validate_image};

/// Destructive operations must be confirmed by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Unconfirmed,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Unconfirmed
        }
    }
}

impl Confirmation {
    fn require(self) -> ServiceResult<()> {
        match self {
            Confirmation::Confirmed => Ok(()),
            Confirmation::Unconfirmed => {
                Err(ServiceError::invalid("confirm", ErrorCode::ConfirmationRequired))
            }
        }
    }
}

/// Item form as typed by the admin
#[derive(Debug, Clone, Default)]
pub struct MenuItemDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub section_id: Option<i64>,
}

#[derive(Clone)]
pub struct MenuEditor {
    store: Arc<dyn ContentStore>,
    blobs: Arc<dyn BlobStore>,
    write_lock: Arc<Mutex<()>>,
}

impl MenuEditor {
    pub fn new(store: Arc<dyn ContentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            blobs,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn snapshot(&self) -> MenuSnapshot {
        MenuSnapshot::load(self.store.as_ref()).await
    }

    pub async fn add_section(&self, name: &str) -> ServiceResult<MenuSnapshot> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::invalid("name", ErrorCode::SectionNameRequired));
        }

        let _guard = self.write_lock.lock().await;
        let section = self
            .store
            .insert_section(&SectionCreate {
                name: name.to_string(),
            })
            .await
            .map_err(ServiceError::content_store)?;
        tracing::info!(section_id = section.id, name = %section.name, "Section created");

        Ok(self.snapshot().await)
    }

    /// Deletes the section and every item in it
    pub async fn delete_section(
        &self,
        id: i64,
        confirmation: Confirmation,
    ) -> ServiceResult<MenuSnapshot> {
        confirmation.require()?;

        let _guard = self.write_lock.lock().await;
        if self
            .store
            .find_section(id)
            .await
            .map_err(ServiceError::content_store)?
            .is_none()
        {
            return Err(ServiceError::section_not_found(id));
        }

        let images: Vec<String> = self
            .store
            .list_menu_items()
            .await
            .map_err(ServiceError::content_store)?
            .into_iter()
            .filter(|item| item.section_id == id && item.has_image())
            .map(|item| item.image_url)
            .collect();

        if !self
            .store
            .delete_section(id)
            .await
            .map_err(ServiceError::content_store)?
        {
            return Err(ServiceError::section_not_found(id));
        }
        tracing::info!(section_id = id, "Section deleted");
        self.discard_images(&images).await;

        Ok(self.snapshot().await)
    }

    /// Validation runs before any collaborator call, in form order:
    /// section, name, price. The image is uploaded before the insert so the
    /// item never references a missing blob.
    pub async fn add_menu_item(
        &self,
        draft: MenuItemDraft,
        image: Option<ImageUpload>,
    ) -> ServiceResult<MenuSnapshot> {
        let section_id = draft
            .section_id
            .ok_or_else(|| ServiceError::invalid("section_id", ErrorCode::SectionRequired))?;
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(ServiceError::invalid("name", ErrorCode::MenuItemNameRequired));
        }
        let price = parse_price(&draft.price).map_err(|e| {
            ServiceError::invalid_with(
                "price",
                ErrorCode::MenuItemInvalidPrice,
                format!("{}: {e}", ErrorCode::MenuItemInvalidPrice.message()),
            )
        })?;

        let _guard = self.write_lock.lock().await;
        if self
            .store
            .find_section(section_id)
            .await
            .map_err(ServiceError::content_store)?
            .is_none()
        {
            return Err(ServiceError::section_not_found(section_id));
        }

        let uploaded = match image {
            Some(upload) => {
                let image = validate_image(upload)?;
                let key = image.object_key();
                self.blobs
                    .upload(&key, image.bytes, &image.content_type)
                    .await
                    .map_err(ServiceError::blob_store)?;
                Some(key)
            }
            None => None,
        };
        let image_url = uploaded
            .as_deref()
            .map(|key| self.blobs.public_url(key))
            .unwrap_or_default();

        let data = MenuItemCreate {
            name: name.to_string(),
            description: draft.description.trim().to_string(),
            price,
            section_id,
            image_url,
        };
        let item = match self.store.insert_menu_item(&data).await {
            Ok(item) => item,
            Err(e) => {
                if let Some(key) = uploaded.as_deref()
                    && let Err(cleanup) = self.blobs.delete(key).await
                {
                    tracing::warn!(key = %key, error = %cleanup, "Failed to remove image of rejected item");
                }
                return Err(ServiceError::content_store(e));
            }
        };
        tracing::info!(item_id = item.id, section_id, name = %item.name, "Menu item created");

        Ok(self.snapshot().await)
    }

    pub async fn delete_menu_item(
        &self,
        id: i64,
        confirmation: Confirmation,
    ) -> ServiceResult<MenuSnapshot> {
        confirmation.require()?;

        let _guard = self.write_lock.lock().await;
        let item = self
            .store
            .find_menu_item(id)
            .await
            .map_err(ServiceError::content_store)?
            .ok_or_else(|| ServiceError::menu_item_not_found(id))?;

        if !self
            .store
            .delete_menu_item(id)
            .await
            .map_err(ServiceError::content_store)?
        {
            return Err(ServiceError::menu_item_not_found(id));
        }
        tracing::info!(item_id = id, "Menu item deleted");
        if item.has_image() {
            self.discard_images(&[item.image_url]).await;
        }

        Ok(self.snapshot().await)
    }

    /// Best effort; failures are logged and the records stay deleted
    async fn discard_images(&self, urls: &[String]) {
        for url in urls {
            let Some(key) = key_from_url(self.blobs.as_ref(), url) else {
                tracing::debug!(url = %url, "Image not owned by this blob store, left in place");
                continue;
            };
            if let Err(e) = self.blobs.delete(key).await {
                tracing::warn!(key = %key, error = %e, "Failed to delete image");
            }
        }
    }
}
