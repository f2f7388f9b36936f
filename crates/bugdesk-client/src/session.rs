//! Session store.
//!
//! Holds at most one current principal per client instance, persisted under
//! the [`SESSION_KEY`] slot so a restart resumes the session.

use crate::error::{SessionError, StoreError};
use crate::gateway::RemoteDataGateway;
use crate::notify::PushRegistration;
use crate::store::KeyValueStore;
use bugdesk_core::{Principal, SessionState};
use std::sync::Arc;

/// Slot holding the serialized current principal.
pub const SESSION_KEY: &str = "current_user";

/// Current-session owner.
///
/// Starts in [`SessionState::Resolving`]; [`restore`](Self::restore) reads
/// the persisted slot once and settles the state.
pub struct SessionStore {
    gateway: Arc<dyn RemoteDataGateway>,
    store: Box<dyn KeyValueStore>,
    push: Option<PushRegistration>,
    state: SessionState,
}

impl SessionStore {
    pub fn new(gateway: Arc<dyn RemoteDataGateway>, store: Box<dyn KeyValueStore>) -> Self {
        Self {
            gateway,
            store,
            push: None,
            state: SessionState::Resolving,
        }
    }

    /// Register push device tokens after each successful login.
    pub fn with_push_registration(mut self, push: PushRegistration) -> Self {
        self.push = Some(push);
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current(&self) -> Option<&Principal> {
        self.state.principal()
    }

    /// Read the persisted session.
    ///
    /// A corrupt value is removed and treated as absent; an unreadable store
    /// also resolves to anonymous.
    pub fn restore(&mut self) -> &SessionState {
        self.state = match self.store.get(SESSION_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Principal>(&raw) {
                Ok(principal) => {
                    tracing::debug!(username = %principal.username, "Restored session");
                    SessionState::Authenticated(principal.without_credentials())
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding corrupt persisted session");
                    if let Err(e) = self.store.remove(SESSION_KEY) {
                        tracing::warn!(error = %e, "Failed to remove corrupt session");
                    }
                    SessionState::Anonymous
                }
            },
            Ok(None) => SessionState::Anonymous,
            Err(e) => {
                tracing::warn!(error = %e, "Session store unreadable; starting anonymous");
                SessionState::Anonymous
            }
        };
        &self.state
    }

    /// Authenticate, persist the principal and register for push.
    ///
    /// The persisted record never carries a password. Push registration runs
    /// after the session is established and cannot fail the login.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<Principal, SessionError> {
        let principal = self
            .gateway
            .login(username, password)
            .await?
            .without_credentials();

        let raw = serde_json::to_string(&principal).map_err(StoreError::from)?;
        self.store.set(SESSION_KEY, &raw)?;
        tracing::info!(username = %principal.username, role = %principal.role, "Logged in");

        if let Some(push) = &self.push {
            push.register(self.gateway.as_ref(), &principal).await;
        }

        self.state = SessionState::Authenticated(principal.clone());
        Ok(principal)
    }

    /// Clear the persisted and in-memory session.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.store.remove(SESSION_KEY)?;
        if let Some(principal) = self.state.principal() {
            tracing::info!(username = %principal.username, "Logged out");
        }
        self.state = SessionState::Anonymous;
        Ok(())
    }
}
