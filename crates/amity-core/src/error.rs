//! Error types for Amity Core

use crate::user::UserId;
use thiserror::Error;

/// Result type alias using Amity's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Amity error types
///
/// Graph queries never return these; they cover snapshot handling and the
/// collaborators built on top of the engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User already exists: {0}")]
    UserExists(String),

    #[error("User {0} cannot befriend themselves")]
    SelfFriendship(UserId),

    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
