//! User directory tests.

use crate::common::{FakeGateway, alice, bob};
use bugdesk_client::{DeskError, GatewayError, UserDirectory};
use bugdesk_core::{NewUser, Role};
use std::sync::Arc;

fn new_user(username: &str, role: Role) -> NewUser {
    NewUser {
        name: Some(String::new()),
        username: username.to_string(),
        password: "changeme".to_string(),
        role,
    }
}

#[tokio::test]
async fn test_operator_creates_and_lists_users() {
    let gateway = Arc::new(FakeGateway::new());
    let directory = UserDirectory::new(gateway, bob());

    let created = directory
        .create(new_user("  dave ", Role::Operator))
        .await
        .unwrap();
    assert_eq!(created.username, "dave");
    assert_eq!(created.name, None);
    assert_eq!(created.role, Role::Operator);

    let operators: Vec<_> = directory
        .operators()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(operators, vec!["bob", "dave"]);
    assert_eq!(directory.find("dave").await.unwrap().unwrap().id, created.id);
}

#[tokio::test]
async fn test_duplicate_username_conflicts() {
    let directory = UserDirectory::new(Arc::new(FakeGateway::new()), bob());
    let err = directory
        .create(new_user("alice", Role::Reporter))
        .await
        .unwrap_err();
    assert!(matches!(err, DeskError::Gateway(GatewayError::Conflict(_))));
}

#[tokio::test]
async fn test_blank_fields_rejected_locally() {
    let gateway = Arc::new(FakeGateway::new());
    let directory = UserDirectory::new(gateway.clone(), bob());

    let err = directory.create(new_user(" ", Role::Reporter)).await.unwrap_err();
    assert!(matches!(err, DeskError::MissingField("username")));

    let mut no_password = new_user("erin", Role::Reporter);
    no_password.password.clear();
    let err = directory.create(no_password).await.unwrap_err();
    assert!(matches!(err, DeskError::MissingField("password")));

    assert!(!gateway.called("create_user"));
}

#[tokio::test]
async fn test_reporter_cannot_manage_users() {
    let gateway = Arc::new(FakeGateway::new());
    let directory = UserDirectory::new(gateway.clone(), alice());
    assert!(matches!(directory.list().await, Err(DeskError::Forbidden(_))));
    assert!(matches!(
        directory.reset_password("u-alice").await,
        Err(DeskError::Forbidden(_))
    ));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_reset_password() {
    let gateway = Arc::new(FakeGateway::new());
    let directory = UserDirectory::new(gateway.clone(), bob());
    directory.reset_password("u-alice").await.unwrap();
    assert!(matches!(
        directory.reset_password("nobody").await,
        Err(DeskError::Gateway(GatewayError::NotFound(_)))
    ));
}
