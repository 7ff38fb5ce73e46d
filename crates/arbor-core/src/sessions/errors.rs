//! Session resolver error types.
//!
//! "Not found" is not an error here - searches return `Ok(None)`. The only
//! error class is caller misuse of the options.

use crate::errors::ArborError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid session search options: {message}")]
    InvalidOptions { message: String },
}

impl ArborError for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            SessionError::InvalidOptions { .. } => "INVALID_SESSION_OPTIONS",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}
