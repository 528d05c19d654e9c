use leadline_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::Role;

/// Authenticated actor handed over by the authentication gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: NonEmptyString,
    username: String,
    role: Role,
}

impl Principal {
    /// Creates a principal from gateway-supplied identity data.
    ///
    /// Falls back to the id when no username is provided.
    pub fn new(id: impl Into<String>, username: impl Into<String>, role: Role) -> AppResult<Self> {
        let id = NonEmptyString::new(id)?;
        let username = username.into();
        let username = if username.trim().is_empty() {
            id.as_str().to_owned()
        } else {
            username
        };

        Ok(Self { id, username, role })
    }

    /// Returns the stable principal identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the display name for the principal.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the single role assigned to the principal.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }
}

#[cfg(test)]
mod tests {
    use super::Principal;
    use crate::Role;

    #[test]
    fn principal_requires_identifier() {
        assert!(Principal::new("  ", "ann", Role::Viewer).is_err());
    }

    #[test]
    fn blank_username_falls_back_to_identifier() {
        let principal = Principal::new("u-42", "", Role::SalesRep);
        assert!(principal.is_ok());

        let principal = principal.unwrap_or_else(|_| unreachable!());
        assert_eq!(principal.username(), "u-42");
        assert_eq!(principal.role(), Role::SalesRep);
    }
}
