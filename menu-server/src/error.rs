//! Unified service-layer error type for menu-server
//!
//! `ServiceError` bridges collaborator failures (`sqlx::Error`, blob store,
//! auth provider) and business-rule failures to the API-layer error
//! (`AppError`), so handlers can use `?` without hand-written mapping.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Which collaborator an upstream failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    ContentStore,
    BlobStore,
    AuthProvider,
}

impl Upstream {
    fn error_code(self) -> ErrorCode {
        match self {
            Upstream::ContentStore => ErrorCode::DatabaseError,
            Upstream::BlobStore => ErrorCode::FileStorageFailed,
            Upstream::AuthProvider => ErrorCode::AuthProviderError,
        }
    }
}

impl std::fmt::Display for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Upstream::ContentStore => "content store",
            Upstream::BlobStore => "blob store",
            Upstream::AuthProvider => "auth provider",
        };
        f.write_str(name)
    }
}

/// Service-layer error.
///
/// - `Validation`: rejected input, reported next to the offending field
/// - `NotFound`: the record disappeared (or never existed)
/// - `Upstream`: a collaborator call failed; logged, never retried
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        code: ErrorCode,
        message: String,
    },
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },
    #[error("{source_kind} failure: {source}")]
    Upstream {
        source_kind: Upstream,
        #[source]
        source: BoxError,
    },
}

impl ServiceError {
    /// Validation error carrying the default message of `code`
    pub fn invalid(field: &'static str, code: ErrorCode) -> Self {
        ServiceError::Validation {
            field,
            code,
            message: code.message().to_string(),
        }
    }

    pub fn invalid_with(field: &'static str, code: ErrorCode, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field,
            code,
            message: message.into(),
        }
    }

    pub fn section_not_found(id: i64) -> Self {
        ServiceError::NotFound {
            resource: "section",
            id,
        }
    }

    pub fn menu_item_not_found(id: i64) -> Self {
        ServiceError::NotFound {
            resource: "menu_item",
            id,
        }
    }

    pub fn content_store(e: impl Into<BoxError>) -> Self {
        ServiceError::Upstream {
            source_kind: Upstream::ContentStore,
            source: e.into(),
        }
    }

    pub fn blob_store(e: impl Into<BoxError>) -> Self {
        ServiceError::Upstream {
            source_kind: Upstream::BlobStore,
            source: e.into(),
        }
    }

    pub fn auth_provider(e: impl Into<BoxError>) -> Self {
        ServiceError::Upstream {
            source_kind: Upstream::AuthProvider,
            source: e.into(),
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::content_store(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation {
                field,
                code,
                message,
            } => AppError {
                message,
                ..AppError::invalid_field(code, field)
            },
            ServiceError::NotFound { resource, id } => {
                let code = match resource {
                    "section" => ErrorCode::SectionNotFound,
                    "menu_item" => ErrorCode::MenuItemNotFound,
                    _ => ErrorCode::NotFound,
                };
                AppError::new(code)
                    .with_detail("resource", resource)
                    .with_detail("id", id)
            }
            ServiceError::Upstream {
                source_kind,
                source,
            } => {
                tracing::error!(upstream = %source_kind, error = %source, "Upstream call failed");
                AppError::new(source_kind.error_code())
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn validation_maps_to_field_detail() {
        let err = ServiceError::invalid_with(
            "price",
            ErrorCode::MenuItemInvalidPrice,
            "Price is not a number",
        );

        let app: AppError = err.into();
        assert_eq!(app.message, "Price is not a number");
        assert_eq!(app.code, ErrorCode::MenuItemInvalidPrice);
        assert_eq!(app.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(app.details.unwrap().get("field").unwrap(), "price");
    }

    #[test]
    fn not_found_maps_to_resource_code() {
        let app: AppError = ServiceError::section_not_found(7).into();
        assert_eq!(app.code, ErrorCode::SectionNotFound);
        assert_eq!(app.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(app.details.unwrap().get("id").unwrap(), 7);

        let app: AppError = ServiceError::menu_item_not_found(9).into();
        assert_eq!(app.code, ErrorCode::MenuItemNotFound);
    }

    #[test]
    fn upstream_hides_source_from_client() {
        let app: AppError = ServiceError::blob_store("bucket exploded").into();
        assert_eq!(app.code, ErrorCode::FileStorageFailed);
        assert_eq!(app.http_status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(!app.message.contains("bucket"));

        let app: AppError = ServiceError::content_store("connection refused").into();
        assert_eq!(app.code, ErrorCode::DatabaseError);
        assert_eq!(app.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
