//! User directory (operator-only account management).

use crate::error::DeskError;
use crate::gateway::RemoteDataGateway;
use bugdesk_core::{NewUser, Principal};
use bugdesk_policy::{AccessRequest, Action, ActionValidator};
use std::sync::Arc;

/// Password the server assigns on reset.
pub const DEFAULT_RESET_PASSWORD: &str = "1234";

pub struct UserDirectory {
    gateway: Arc<dyn RemoteDataGateway>,
    principal: Principal,
    validator: ActionValidator,
}

impl UserDirectory {
    pub fn new(gateway: Arc<dyn RemoteDataGateway>, principal: Principal) -> Self {
        Self {
            gateway,
            principal,
            validator: ActionValidator::new(),
        }
    }

    fn authorize(&self) -> Result<(), DeskError> {
        self.validator
            .authorize(&AccessRequest::new(Action::ManageUsers, &self.principal))?;
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Principal>, DeskError> {
        self.authorize()?;
        let users = self.gateway.list_users().await?;
        Ok(users.into_iter().map(Principal::without_credentials).collect())
    }

    /// Users that can hold assignments.
    pub async fn operators(&self) -> Result<Vec<Principal>, DeskError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(Principal::is_operator)
            .collect())
    }

    /// Look up a user by username (case-sensitive) or id.
    pub async fn find(&self, username_or_id: &str) -> Result<Option<Principal>, DeskError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|user| user.username == username_or_id || user.id == username_or_id))
    }

    /// Create an account. Username and password must be non-blank.
    pub async fn create(&self, user: NewUser) -> Result<Principal, DeskError> {
        self.authorize()?;
        if user.username.trim().is_empty() {
            return Err(DeskError::MissingField("username"));
        }
        if user.password.is_empty() {
            return Err(DeskError::MissingField("password"));
        }

        let user = NewUser {
            name: user.name.filter(|n| !n.trim().is_empty()),
            username: user.username.trim().to_string(),
            ..user
        };
        let created = self
            .gateway
            .create_user(&user)
            .await
            .inspect_err(|e| tracing::warn!(username = %user.username, error = %e, "User creation failed"))?;
        tracing::info!(username = %created.username, role = %created.role, "User created");
        Ok(created.without_credentials())
    }

    /// Reset a user's password to [`DEFAULT_RESET_PASSWORD`].
    pub async fn reset_password(&self, user_id: &str) -> Result<(), DeskError> {
        self.authorize()?;
        self.gateway.reset_password(user_id).await?;
        tracing::info!(user_id, "Password reset");
        Ok(())
    }
}
