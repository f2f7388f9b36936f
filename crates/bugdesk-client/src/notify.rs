//! Push-token registration and local mutation notices.
//!
//! Both side channels only operate while notification permission is granted.
//! Neither ever fails the operation that triggered it.

use crate::gateway::RemoteDataGateway;
use bugdesk_core::{Principal, ReportStatus};
use bugdesk_policy::{NotificationPermission, PermissionProvider};
use std::sync::Arc;

/// Supplies the push device token for this client, if one exists.
pub trait PushTokenSource: Send + Sync {
    fn device_token(&self) -> Option<String>;
}

/// A fixed token, or none.
#[derive(Debug, Clone, Default)]
pub struct StaticPushToken(pub Option<String>);

impl PushTokenSource for StaticPushToken {
    fn device_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Shows a local notice to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// A user-visible notice about a confirmed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
}

impl Notice {
    pub fn status_updated(report_id: &str, status: ReportStatus) -> Self {
        Self {
            title: "Status Updated".to_string(),
            body: format!("Report #{} is now {}", report_id, status.label()),
        }
    }

    pub fn assigned(report_id: &str, assignee_name: Option<&str>) -> Self {
        let body = match assignee_name {
            Some(name) => format!("Report #{} assigned to {}", report_id, name),
            None => format!("Report #{} is no longer assigned", report_id),
        };
        Self {
            title: "Report Assigned".to_string(),
            body,
        }
    }

    pub fn commented(report_id: &str, author_name: &str) -> Self {
        Self {
            title: "New Comment".to_string(),
            body: format!("Report #{}: {} commented", report_id, author_name),
        }
    }
}

/// Logs notices through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        tracing::info!(title = %notice.title, "{}", notice.body);
    }
}

/// Permission-gated notice delivery.
#[derive(Clone)]
pub struct Notices {
    permission: Arc<dyn PermissionProvider>,
    notifier: Arc<dyn Notifier>,
}

impl Notices {
    pub fn new(permission: Arc<dyn PermissionProvider>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            permission,
            notifier,
        }
    }

    /// Deliver `notice` if permission is currently granted; drop it otherwise.
    pub async fn emit(&self, notice: Notice) {
        if self.permission.current().await == NotificationPermission::Granted {
            self.notifier.notify(&notice);
        } else {
            tracing::debug!(title = %notice.title, "Notice suppressed without permission");
        }
    }
}

/// Registers the device token against a principal after login.
#[derive(Clone)]
pub struct PushRegistration {
    permission: Arc<dyn PermissionProvider>,
    tokens: Arc<dyn PushTokenSource>,
}

impl PushRegistration {
    pub fn new(permission: Arc<dyn PermissionProvider>, tokens: Arc<dyn PushTokenSource>) -> Self {
        Self { permission, tokens }
    }

    /// Register if permission is granted and a token exists.
    ///
    /// Returns whether a registration was accepted by the server. Failures
    /// are logged and swallowed.
    pub async fn register(&self, gateway: &dyn RemoteDataGateway, principal: &Principal) -> bool {
        let permission = self.permission.current().await;
        if permission != NotificationPermission::Granted {
            tracing::debug!(%permission, "Skipping push registration");
            return false;
        }

        let Some(token) = self.tokens.device_token() else {
            tracing::debug!("No push device token available");
            return false;
        };

        match gateway.register_push_token(&principal.id, &token).await {
            Ok(()) => {
                tracing::info!(user_id = %principal.id, "Registered push device token");
                true
            }
            Err(e) => {
                tracing::warn!(user_id = %principal.id, error = %e, "Push registration failed");
                false
            }
        }
    }
}
