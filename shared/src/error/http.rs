//! HTTP status for each error code

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::NotFound | Self::SectionNotFound | Self::MenuItemNotFound => {
                StatusCode::NOT_FOUND
            }

            Self::NotAuthenticated | Self::InvalidCredentials | Self::AccessCodeInvalid => {
                StatusCode::UNAUTHORIZED
            }

            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,

            // Collaborator down; the client may retry by hand
            Self::FileStorageFailed | Self::AuthProviderError => StatusCode::SERVICE_UNAVAILABLE,

            Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            Self::InvalidRequest
            | Self::ConfirmationRequired
            | Self::SectionNameRequired
            | Self::SectionRequired
            | Self::MenuItemNameRequired
            | Self::MenuItemInvalidPrice
            | Self::UnsupportedFileFormat
            | Self::InvalidImageFile
            | Self::EmptyFile => StatusCode::BAD_REQUEST,
        }
    }
}
