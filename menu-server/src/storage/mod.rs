//! Blob store for menu item images
//!
//! Uploads are validated here before any network call:
//! size <= 5MB, extension png/jpg/jpeg/webp, content decodable as one of
//! those formats. Stored under `<snowflake>.<ext>`.

pub mod local;
pub mod s3;

use async_trait::async_trait;
use image::ImageFormat;
use shared::error::ErrorCode;

use crate::error::{BoxError, ServiceError};

pub use local::LocalBlobStore;
pub use s3::S3BlobStore;

/// Maximum file size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), BoxError>;

    /// Fully-qualified URL an uploaded key is served from
    fn public_url(&self, key: &str) -> String;

    async fn delete(&self, key: &str) -> Result<(), BoxError>;
}

/// An image file as received from the admin form
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Image that passed validation, ready to upload
#[derive(Debug, Clone)]
pub struct ValidatedImage {
    pub extension: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ValidatedImage {
    /// Collision-resistant object key
    pub fn object_key(&self) -> String {
        format!("{}.{}", shared::util::snowflake_id(), self.extension)
    }
}

fn file_extension(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

fn expected_format(ext: &str) -> Option<ImageFormat> {
    match ext {
        "png" => Some(ImageFormat::Png),
        "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
        "webp" => Some(ImageFormat::WebP),
        _ => None,
    }
}

/// Validate an uploaded image without touching any collaborator
pub fn validate_image(upload: ImageUpload) -> Result<ValidatedImage, ServiceError> {
    if upload.bytes.is_empty() {
        return Err(ServiceError::invalid("image", ErrorCode::EmptyFile));
    }

    if upload.bytes.len() > MAX_FILE_SIZE {
        return Err(ServiceError::invalid_with(
            "image",
            ErrorCode::FileTooLarge,
            format!(
                "File too large: {} bytes (max {})",
                upload.bytes.len(),
                MAX_FILE_SIZE
            ),
        ));
    }

    let ext = file_extension(&upload.file_name);
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(ServiceError::invalid_with(
            "image",
            ErrorCode::UnsupportedFileFormat,
            format!("Unsupported format: {ext}. Supported: png, jpg, jpeg, webp"),
        ));
    }

    let format = image::guess_format(&upload.bytes)
        .ok()
        .filter(|f| Some(*f) == expected_format(&ext))
        .ok_or_else(|| {
            ServiceError::invalid_with(
                "image",
                ErrorCode::InvalidImageFile,
                format!("File content is not a valid {ext} image"),
            )
        })?;

    image::load_from_memory_with_format(&upload.bytes, format).map_err(|e| {
        ServiceError::invalid_with(
            "image",
            ErrorCode::InvalidImageFile,
            format!("Invalid image: {e}"),
        )
    })?;

    let content_type = mime_guess::from_ext(&ext)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    Ok(ValidatedImage {
        extension: ext,
        content_type,
        bytes: upload.bytes,
    })
}

/// Map a public URL produced by `store` back to its object key
pub fn key_from_url<'a>(store: &dyn BlobStore, url: &'a str) -> Option<&'a str> {
    let prefix = store.public_url("");
    url.strip_prefix(prefix.as_str()).filter(|k| !k.is_empty())
}
