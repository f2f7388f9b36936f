//! Principals (users) and their roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two roles a principal can hold.
///
/// The wire names come from the remote API: operators are `"developer"`,
/// reporters are `"user"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Triages, assigns and resolves reports; manages users.
    #[serde(rename = "developer")]
    Operator,
    /// Files reports and follows up on their own reports.
    #[serde(rename = "user")]
    Reporter,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Role; 2] = [Role::Operator, Role::Reporter];

    /// The wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Operator => "developer",
            Role::Reporter => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a role name that is neither variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}' (expected developer/operator or user/reporter)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "developer" | "operator" => Ok(Role::Operator),
            "user" | "reporter" => Ok(Role::Reporter),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// An identity with a role.
///
/// `password` is only populated in creation/reset flows. It is redacted from
/// `Debug` output and stripped before a principal is persisted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub username: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Principal {
    /// Display name if set, otherwise the username.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }

    pub fn is_operator(&self) -> bool {
        self.role == Role::Operator
    }

    /// Drop any credential carried by this record.
    pub fn without_credentials(mut self) -> Self {
        self.password = None;
        self
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("role", &self.role)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Where session resolution stands for one client instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// The persisted session has not been read yet.
    #[default]
    Resolving,
    /// Resolution finished and nobody is logged in.
    Anonymous,
    /// Resolution finished with a current principal.
    Authenticated(Principal),
}

impl SessionState {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            SessionState::Authenticated(principal) => Some(principal),
            SessionState::Resolving | SessionState::Anonymous => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, SessionState::Resolving)
    }
}

/// Profile for a user account to be created.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}
