//! API error types.

use std::fmt;

use serde::Deserialize;

/// Marker error for 401/403 responses.
///
/// Callers downcast to this to route the user to the login screen instead
/// of surfacing a generic failure:
///
/// ```text
/// if err.downcast_ref::<AuthRequired>().is_some() { show_login() }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthRequired;

impl fmt::Display for AuthRequired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "authentication required")
    }
}

impl std::error::Error for AuthRequired {}

/// Error payload the API attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message)
    }
}
