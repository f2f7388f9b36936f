//! Report submission tests.

use crate::common::{FakeGateway, alice, bob, data_url_dimensions, png};
use bugdesk_client::{Attachment, GatewayError, ReportDraft, ReportSubmissionFlow, SubmissionError};
use bugdesk_core::{FormField, ReportForm, ReportStatus, Severity};
use bugdesk_media::{JpegNormalizer, MediaError};
use bugdesk_policy::AccessErrorKind;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn flow(gateway: &Arc<FakeGateway>) -> ReportSubmissionFlow {
    ReportSubmissionFlow::new(gateway.clone(), Arc::new(JpegNormalizer::default()))
}

fn form() -> ReportForm {
    ReportForm {
        app: "Checkout".to_string(),
        page: "Payment".to_string(),
        url: "https://shop.example.com/pay".to_string(),
        description: "Pay button does nothing".to_string(),
        severity: Severity::High,
    }
}

#[tokio::test]
async fn test_submit_end_to_end_as_alice() {
    let gateway = Arc::new(FakeGateway::new());
    let mut draft = ReportDraft::new(form());
    draft.attach(Attachment::new("wide.png", png(3000, 1500)));
    draft.attach(Attachment::new("small.png", png(200, 100)));

    let report = flow(&gateway).submit_draft(&alice(), draft).await.unwrap();

    assert_eq!(report.reporter_id, "u-alice");
    assert_eq!(report.reporter_name, "alice");
    assert_eq!(report.status, ReportStatus::Open);
    assert_eq!(report.severity, Severity::High);
    assert_eq!(report.assignee(), None);
    assert_eq!(report.screenshots.len(), 2);

    // Order preserved; large image bounded, small image re-encoded at original size.
    assert_eq!(data_url_dimensions(&report.screenshots[0]), (1280, 640));
    assert_eq!(data_url_dimensions(&report.screenshots[1]), (200, 100));
    assert_eq!(gateway.calls(), vec!["create_report"]);
}

#[tokio::test]
async fn test_submit_without_attachments_as_alice() {
    let gateway = Arc::new(FakeGateway::new());
    let form = ReportForm {
        app: "Checkout".to_string(),
        page: "Payment".to_string(),
        url: String::new(),
        description: "Button missing".to_string(),
        severity: Severity::High,
    };

    let report = flow(&gateway).submit(&alice(), &form, Vec::new()).await.unwrap();

    assert_eq!(report.status, ReportStatus::Open);
    assert_eq!(report.assignee(), None);
    assert!(report.comments.is_empty());
    assert_eq!(report.reporter_name, "alice");
    assert_eq!(report.url, "");
    assert_eq!(report.description, "Button missing");
    assert!(report.screenshots.is_empty());
    assert_eq!(gateway.server_report(&report.id), report);
}

#[tokio::test]
async fn test_zero_attachments_give_empty_screenshots() {
    let gateway = Arc::new(FakeGateway::new());
    let report = flow(&gateway)
        .submit(&alice(), &form(), Vec::new())
        .await
        .unwrap();
    assert!(report.screenshots.is_empty());
}

#[tokio::test]
async fn test_failing_attachment_aborts_before_create() {
    let gateway = Arc::new(FakeGateway::new());
    let attachments = vec![
        Attachment::new("ok.png", png(64, 64)),
        Attachment::new("broken.png", b"definitely not an image".to_vec()),
        Attachment::new("also-ok.png", png(32, 32)),
    ];

    let err = flow(&gateway)
        .submit(&alice(), &form(), attachments)
        .await
        .unwrap_err();

    match err {
        SubmissionError::Attachment { index, source } => {
            assert_eq!(index, 1);
            assert!(matches!(source, MediaError::Decode(_)));
        }
        other => panic!("expected attachment error, got {:?}", other),
    }
    assert!(!gateway.called("create_report"));
}

#[tokio::test]
async fn test_missing_fields_block_network() {
    let gateway = Arc::new(FakeGateway::new());
    let blank = ReportForm {
        app: " ".to_string(),
        description: String::new(),
        ..form()
    };

    let err = flow(&gateway)
        .submit(&alice(), &blank, vec![Attachment::new("ok.png", png(8, 8))])
        .await
        .unwrap_err();

    match err {
        SubmissionError::Validation { missing } => {
            assert_eq!(missing, vec![FormField::App, FormField::Description]);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_operator_cannot_submit() {
    let gateway = Arc::new(FakeGateway::new());
    let err = flow(&gateway)
        .submit(&bob(), &form(), Vec::new())
        .await
        .unwrap_err();
    match err {
        SubmissionError::Forbidden(denial) => {
            assert_eq!(denial.kind, AccessErrorKind::RoleNotPermitted)
        }
        other => panic!("expected forbidden, got {:?}", other),
    }
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_create_failure_is_not_retried() {
    let gateway = Arc::new(FakeGateway::new());
    gateway.fail_next(GatewayError::Network("connection reset".to_string()));

    let err = flow(&gateway)
        .submit(&alice(), &form(), Vec::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SubmissionError::Gateway(GatewayError::Network(_))));
    assert_eq!(gateway.calls(), vec!["create_report"]);
}
