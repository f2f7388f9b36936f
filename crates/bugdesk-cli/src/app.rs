//! Wiring shared by every command: configuration, gateway, session and the
//! two gates each screen passes through.

use crate::permission::FilePermissionProvider;
use anyhow::{Result, bail};
use bugdesk_client::{
    FileKeyValueStore, HttpGateway, Notice, Notices, Notifier, PushRegistration, RemoteDataGateway,
    ReportDesk, SessionStore, StaticPushToken,
};
use bugdesk_core::{BugdeskConfig, Principal};
use bugdesk_policy::{
    GateDecision, GateOutcome, NotificationGate, RedirectTarget, Screen, authorize_screen,
};
use std::sync::Arc;

/// Prints notices to the terminal.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        println!("🔔 {}: {}", notice.title, notice.body);
    }
}

pub struct App {
    pub config: BugdeskConfig,
    pub gateway: Arc<dyn RemoteDataGateway>,
    pub session: SessionStore,
    permission: Arc<FilePermissionProvider>,
}

impl App {
    /// Build the client from configuration and resolve the persisted session.
    pub fn new(config: BugdeskConfig) -> Result<Self> {
        let gateway: Arc<dyn RemoteDataGateway> = Arc::new(HttpGateway::from_config(&config.api));
        let permission = Arc::new(FilePermissionProvider::new(&config.session.directory));
        let store = FileKeyValueStore::new(&config.session.directory)?;

        let push = PushRegistration::new(
            permission.clone(),
            Arc::new(StaticPushToken(config.notifications.resolve_device_token())),
        );
        let mut session =
            SessionStore::new(gateway.clone(), Box::new(store)).with_push_registration(push);
        session.restore();

        tracing::debug!(
            api = %config.api.base_url(),
            session_dir = %config.session.directory.display(),
            "Client ready"
        );

        Ok(Self {
            config,
            gateway,
            session,
            permission,
        })
    }

    pub fn permission(&self) -> &FilePermissionProvider {
        &self.permission
    }

    /// Block until notification permission is granted.
    ///
    /// Undetermined permission is requested once (interactively when
    /// possible); a denial stops with remediation instructions.
    pub async fn require_notifications(&self) -> Result<()> {
        let gate = NotificationGate::new(self.permission.clone());
        let outcome = match gate.check().await {
            GateOutcome::Prompt => gate.request().await,
            outcome => outcome,
        };
        match outcome {
            GateOutcome::Unblocked => Ok(()),
            GateOutcome::Prompt => bail!(
                "Notification permission is required. Run `bugdesk notifications allow` to grant it."
            ),
            GateOutcome::Blocked { remediation } => bail!("{}", remediation),
        }
    }

    /// Pass both gates for `screen`.
    ///
    /// Returns `None` when the principal was redirected to the dashboard,
    /// which has then already been shown.
    pub async fn enter(&self, screen: Screen) -> Result<Option<Principal>> {
        self.require_notifications().await?;
        match authorize_screen(self.session.state(), screen) {
            GateDecision::Allow(principal) => Ok(Some(principal.clone())),
            GateDecision::Suspend => bail!("Session is still being resolved"),
            GateDecision::Redirect(RedirectTarget::Login) => {
                bail!("Not logged in. Run `bugdesk login <username>` first.")
            }
            GateDecision::Redirect(RedirectTarget::Dashboard) => {
                let Some(principal) = self.session.current().cloned() else {
                    bail!("Not logged in. Run `bugdesk login <username>` first.")
                };
                println!("⚠️  That screen is not available for your role. Showing the dashboard.");
                println!();
                crate::commands::dashboard::show(self, principal).await?;
                Ok(None)
            }
        }
    }

    /// A report desk for `principal`, emitting notices to the terminal.
    pub fn desk(&self, principal: Principal) -> ReportDesk {
        ReportDesk::new(self.gateway.clone(), principal).with_notices(Notices::new(
            self.permission.clone(),
            Arc::new(ConsoleNotifier),
        ))
    }
}
