//! Input validation limits for user records and query parameters

/// Maximum length for usernames (64 chars)
pub const MAX_USERNAME_LEN: usize = 64;

/// Maximum length for display names (256 chars)
pub const MAX_NAME_LEN: usize = 256;

/// Maximum hop distance accepted for friend suggestions (16)
pub const MAX_SUGGEST_DEPTH: u32 = 16;

/// Validation error type
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyUsername,
    UsernameTooLong { len: usize, max: usize },
    InvalidUsernameChar(char),
    NumericUsername,
    EmptyName,
    NameTooLong { len: usize, max: usize },
    SuggestDepthTooLarge { depth: u32, max: u32 },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "Username cannot be empty"),
            Self::UsernameTooLong { len, max } => {
                write!(f, "Username too long: {} chars (max {})", len, max)
            }
            Self::InvalidUsernameChar(c) => {
                write!(f, "Username contains invalid character {:?}", c)
            }
            Self::NumericUsername => {
                write!(f, "Username must contain at least one non-digit character")
            }
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::NameTooLong { len, max } => {
                write!(f, "Name too long: {} chars (max {})", len, max)
            }
            Self::SuggestDepthTooLarge { depth, max } => {
                write!(f, "Suggestion depth too large: {} (max {})", depth, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a username
///
/// Usernames are ASCII alphanumerics plus `_`, `-` and `.`. A purely
/// numeric username would be ambiguous with an id on the command line,
/// so at least one non-digit is required.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(ValidationError::UsernameTooLong {
            len: username.len(),
            max: MAX_USERNAME_LEN,
        });
    }
    if let Some(c) = username
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(ValidationError::InvalidUsernameChar(c));
    }
    if username.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::NumericUsername);
    }
    Ok(())
}

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong {
            len: name.len(),
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

/// Validate friend suggestion depth
pub fn validate_suggest_depth(depth: u32) -> Result<(), ValidationError> {
    if depth > MAX_SUGGEST_DEPTH {
        return Err(ValidationError::SuggestDepthTooLarge {
            depth,
            max: MAX_SUGGEST_DEPTH,
        });
    }
    Ok(())
}
