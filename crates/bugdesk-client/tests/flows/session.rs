//! Session store tests.

use crate::common::{FakeGateway, FixedPermission, PASSWORD, alice};
use bugdesk_client::{
    FileKeyValueStore, GatewayError, KeyValueStore, MemoryKeyValueStore, PushRegistration,
    SESSION_KEY, SessionError, SessionStore, StaticPushToken,
};
use bugdesk_core::{Principal, SessionState};
use bugdesk_policy::{GateDecision, NotificationPermission, RedirectTarget, Screen, authorize_screen};
use std::sync::Arc;
use tempfile::TempDir;

fn push(permission: NotificationPermission, token: Option<&str>) -> PushRegistration {
    PushRegistration::new(
        Arc::new(FixedPermission(permission)),
        Arc::new(StaticPushToken(token.map(str::to_string))),
    )
}

#[tokio::test]
async fn test_login_persists_and_restores() {
    let temp_dir = TempDir::new().unwrap();
    let gateway = Arc::new(FakeGateway::new());

    let mut session = SessionStore::new(
        gateway.clone(),
        Box::new(FileKeyValueStore::new(temp_dir.path()).unwrap()),
    );
    assert_eq!(session.state(), &SessionState::Resolving);
    assert_eq!(session.restore(), &SessionState::Anonymous);

    let principal = session.login("alice", PASSWORD).await.unwrap();
    assert_eq!(principal.username, "alice");
    assert!(principal.password.is_none());

    let raw = std::fs::read_to_string(temp_dir.path().join("current_user.json")).unwrap();
    assert!(!raw.contains(PASSWORD));
    assert!(!raw.contains("password"));

    // A second client instance over the same directory resumes the session.
    let mut resumed = SessionStore::new(
        gateway,
        Box::new(FileKeyValueStore::new(temp_dir.path()).unwrap()),
    );
    let restored = resumed.restore().principal().cloned().unwrap();
    assert_eq!(restored, alice());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let gateway = Arc::new(FakeGateway::new());
    let mut session = SessionStore::new(gateway, Box::new(MemoryKeyValueStore::new()));
    session.restore();
    session.login("alice", PASSWORD).await.unwrap();

    session.logout().unwrap();
    assert_eq!(session.state(), &SessionState::Anonymous);
    assert_eq!(
        authorize_screen(session.state(), Screen::Dashboard),
        GateDecision::Redirect(RedirectTarget::Login)
    );
    assert_eq!(session.restore(), &SessionState::Anonymous);
}

#[tokio::test]
async fn test_corrupt_session_is_discarded() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileKeyValueStore::new(temp_dir.path()).unwrap();
    store.set(SESSION_KEY, "{not json").unwrap();

    let mut session = SessionStore::new(Arc::new(FakeGateway::new()), Box::new(store.clone()));
    assert_eq!(session.restore(), &SessionState::Anonymous);
    assert_eq!(store.get(SESSION_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_bad_credentials() {
    let gateway = Arc::new(FakeGateway::new());
    let mut session = SessionStore::new(gateway, Box::new(MemoryKeyValueStore::new()));
    session.restore();

    let err = session.login("alice", "wrong").await.unwrap_err();
    assert!(matches!(err, SessionError::Gateway(GatewayError::Auth(_))));
    assert_eq!(session.state(), &SessionState::Anonymous);
}

#[tokio::test]
async fn test_push_token_registered_only_when_granted() {
    let gateway = Arc::new(FakeGateway::new());
    let mut session = SessionStore::new(gateway.clone(), Box::new(MemoryKeyValueStore::new()))
        .with_push_registration(push(NotificationPermission::Granted, Some("device-1")));
    session.login("alice", PASSWORD).await.unwrap();
    assert_eq!(
        gateway.push_tokens(),
        vec![("u-alice".to_string(), "device-1".to_string())]
    );

    let gateway = Arc::new(FakeGateway::new());
    let mut session = SessionStore::new(gateway.clone(), Box::new(MemoryKeyValueStore::new()))
        .with_push_registration(push(NotificationPermission::Denied, Some("device-1")));
    session.login("alice", PASSWORD).await.unwrap();
    assert!(gateway.push_tokens().is_empty());
    assert!(!gateway.called("register_push_token"));
}

#[tokio::test]
async fn test_push_failure_does_not_fail_login() {
    /// Fails only the push registration call.
    struct FailingPush(FakeGateway);

    #[async_trait::async_trait]
    impl bugdesk_client::RemoteDataGateway for FailingPush {
        async fn login(&self, u: &str, p: &str) -> Result<Principal, GatewayError> {
            self.0.login(u, p).await
        }
        async fn register_push_token(&self, _: &str, _: &str) -> Result<(), GatewayError> {
            Err(GatewayError::Network("unreachable".to_string()))
        }
        async fn list_users(&self) -> Result<Vec<Principal>, GatewayError> {
            self.0.list_users().await
        }
        async fn create_user(&self, u: &bugdesk_core::NewUser) -> Result<Principal, GatewayError> {
            self.0.create_user(u).await
        }
        async fn reset_password(&self, id: &str) -> Result<(), GatewayError> {
            self.0.reset_password(id).await
        }
        async fn list_reports(&self) -> Result<Vec<bugdesk_core::Report>, GatewayError> {
            self.0.list_reports().await
        }
        async fn get_report(&self, id: &str) -> Result<bugdesk_core::Report, GatewayError> {
            self.0.get_report(id).await
        }
        async fn create_report(
            &self,
            r: &bugdesk_core::NewReport,
        ) -> Result<bugdesk_core::Report, GatewayError> {
            self.0.create_report(r).await
        }
        async fn update_status(
            &self,
            id: &str,
            s: bugdesk_core::ReportStatus,
        ) -> Result<bugdesk_core::Report, GatewayError> {
            self.0.update_status(id, s).await
        }
        async fn assign(
            &self,
            id: &str,
            a: Option<&bugdesk_core::Assignee>,
        ) -> Result<bugdesk_core::Report, GatewayError> {
            self.0.assign(id, a).await
        }
        async fn add_comment(
            &self,
            id: &str,
            c: &bugdesk_core::NewComment,
        ) -> Result<bugdesk_core::Comment, GatewayError> {
            self.0.add_comment(id, c).await
        }
    }

    let mut session = SessionStore::new(
        Arc::new(FailingPush(FakeGateway::new())),
        Box::new(MemoryKeyValueStore::new()),
    )
    .with_push_registration(push(NotificationPermission::Granted, Some("device-1")));

    let principal = session.login("alice", PASSWORD).await.unwrap();
    assert_eq!(principal.id, "u-alice");
    assert!(session.current().is_some());
}
