//! Notification permission gate.
//!
//! Content stays blocked until the user has granted notification permission.
//! A denial is final from the client's point of view: the user must change it
//! in their environment's settings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Notification permission as reported by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    /// The user has not been asked yet.
    #[default]
    Undetermined,
    Granted,
    Denied,
}

impl fmt::Display for NotificationPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationPermission::Undetermined => write!(f, "undetermined"),
            NotificationPermission::Granted => write!(f, "granted"),
            NotificationPermission::Denied => write!(f, "denied"),
        }
    }
}

/// Source of the notification permission.
///
/// `request` prompts the user (once) and returns the resulting permission.
/// Implementations degrade to `Undetermined` or `Denied` rather than fail.
#[async_trait]
pub trait PermissionProvider: Send + Sync {
    async fn current(&self) -> NotificationPermission;

    async fn request(&self) -> NotificationPermission;
}

#[async_trait]
impl<P: PermissionProvider + ?Sized> PermissionProvider for Arc<P> {
    async fn current(&self) -> NotificationPermission {
        (**self).current().await
    }

    async fn request(&self) -> NotificationPermission {
        (**self).request().await
    }
}

/// What the gate lets through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Permission granted; content is shown.
    Unblocked,
    /// Not asked yet; content is blocked and a request is offered.
    Prompt,
    /// Denied; content is blocked and only remediation instructions are shown.
    Blocked { remediation: String },
}

impl GateOutcome {
    pub fn is_unblocked(&self) -> bool {
        matches!(self, GateOutcome::Unblocked)
    }
}

/// Instructions shown when permission has been denied.
pub const DENIED_REMEDIATION: &str = "Notifications are blocked. Re-enable them in your \
     notification settings (for this client: `bugdesk notifications reset`), then try again.";

/// Gate over a [`PermissionProvider`].
pub struct NotificationGate<P> {
    provider: P,
}

impl<P: PermissionProvider> NotificationGate<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Map a permission to a gate outcome.
    pub fn outcome_for(permission: NotificationPermission) -> GateOutcome {
        match permission {
            NotificationPermission::Granted => GateOutcome::Unblocked,
            NotificationPermission::Undetermined => GateOutcome::Prompt,
            NotificationPermission::Denied => GateOutcome::Blocked {
                remediation: DENIED_REMEDIATION.to_string(),
            },
        }
    }

    /// Evaluate the current permission without prompting.
    pub async fn check(&self) -> GateOutcome {
        let permission = self.provider.current().await;
        tracing::debug!(%permission, "Notification permission checked");
        Self::outcome_for(permission)
    }

    /// Ask for permission if it is still undetermined.
    ///
    /// A prior denial is never re-prompted.
    pub async fn request(&self) -> GateOutcome {
        let permission = match self.provider.current().await {
            NotificationPermission::Undetermined => self.provider.request().await,
            decided => decided,
        };
        tracing::info!(%permission, "Notification permission resolved");
        Self::outcome_for(permission)
    }

    pub async fn is_granted(&self) -> bool {
        self.provider.current().await == NotificationPermission::Granted
    }
}
