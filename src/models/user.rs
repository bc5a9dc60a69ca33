//! Defines the user identity supplied by the external identity provider.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque stable identifier for an authenticated user.
///
/// Issued by the external identity provider. Callers without one have no
/// authenticated identity and must not run any ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Wrap an identifier issued by the identity provider.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An authenticated user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's stable identifier.
    pub id: UserId,
    /// The user's display name.
    pub display_name: String,
    /// URL of the user's profile photo, if they have one.
    pub photo_url: Option<String>,
}
