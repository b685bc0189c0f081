//! Error codes returned by the menu service
//!
//! - 0xxx: General
//! - 1xxx: Authentication
//! - 2xxx: Section
//! - 3xxx: Menu item
//! - 4xxx: Image upload
//! - 9xxx: System

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric error code, serialized as a bare `u16` so the admin client can
/// switch on it without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    NotFound = 3,
    /// Malformed request body
    InvalidRequest = 5,
    /// Destructive operation was not confirmed
    ConfirmationRequired = 9,

    // ==================== 1xxx: Auth ====================
    /// No valid admin session
    NotAuthenticated = 1001,
    /// Email/password rejected
    InvalidCredentials = 1002,
    /// Admin access code did not match
    AccessCodeInvalid = 1006,
    /// Too many attempts from one client
    TooManyRequests = 1007,

    // ==================== 2xxx: Section ====================
    SectionNotFound = 2001,
    /// Section name is blank
    SectionNameRequired = 2002,
    /// Menu item form has no section selected
    SectionRequired = 2003,

    // ==================== 3xxx: Menu item ====================
    MenuItemNotFound = 3001,
    /// Menu item name is blank
    MenuItemNameRequired = 3002,
    /// Price is not a non-negative number
    MenuItemInvalidPrice = 3003,

    // ==================== 4xxx: Upload ====================
    FileTooLarge = 4001,
    UnsupportedFileFormat = 4002,
    /// Content does not decode as the claimed format
    InvalidImageFile = 4003,
    EmptyFile = 4004,
    /// Blob store rejected the upload
    FileStorageFailed = 4005,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    /// Content store unreachable or failing
    DatabaseError = 9002,
    /// Server configuration missing or invalid
    ConfigError = 9004,
    /// Authentication provider unreachable
    AuthProviderError = 9005,
}

/// Every code, in numeric order
const ALL: &[ErrorCode] = &[
    ErrorCode::NotFound,
    ErrorCode::InvalidRequest,
    ErrorCode::ConfirmationRequired,
    ErrorCode::NotAuthenticated,
    ErrorCode::InvalidCredentials,
    ErrorCode::AccessCodeInvalid,
    ErrorCode::TooManyRequests,
    ErrorCode::SectionNotFound,
    ErrorCode::SectionNameRequired,
    ErrorCode::SectionRequired,
    ErrorCode::MenuItemNotFound,
    ErrorCode::MenuItemNameRequired,
    ErrorCode::MenuItemInvalidPrice,
    ErrorCode::FileTooLarge,
    ErrorCode::UnsupportedFileFormat,
    ErrorCode::InvalidImageFile,
    ErrorCode::EmptyFile,
    ErrorCode::FileStorageFailed,
    ErrorCode::InternalError,
    ErrorCode::DatabaseError,
    ErrorCode::ConfigError,
    ErrorCode::AuthProviderError,
];

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default user-facing message
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::ConfirmationRequired => "This action must be confirmed",

            ErrorCode::NotAuthenticated => "Not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::AccessCodeInvalid => "Invalid access code",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            ErrorCode::SectionNotFound => "Section not found",
            ErrorCode::SectionNameRequired => "Section name is required",
            ErrorCode::SectionRequired => "Please select a section",

            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemNameRequired => "Item name is required",
            ErrorCode::MenuItemInvalidPrice => "Price must be a non-negative number",

            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::EmptyFile => "Empty file",
            ErrorCode::FileStorageFailed => "Image upload failed",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Menu data is temporarily unavailable",
            ErrorCode::ConfigError => "Server is not configured",
            ErrorCode::AuthProviderError => "Sign-in service is temporarily unavailable",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A `u16` that is not a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        ALL.iter()
            .copied()
            .find(|c| c.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
