//! Shared fixtures: an in-memory gateway, permission and notifier fakes, and
//! image generators.

#![allow(dead_code)]

use async_trait::async_trait;
use bugdesk_client::{GatewayError, Notice, Notifier, RemoteDataGateway};
use bugdesk_core::{
    Assignee, Comment, NewComment, NewReport, NewUser, Principal, Report, ReportStatus, Role,
};
use bugdesk_policy::{NotificationPermission, PermissionProvider};
use chrono::{DateTime, TimeZone, Utc};
use std::io::Cursor;
use std::sync::Mutex;

// =============================================================================
// PRINCIPALS
// =============================================================================

pub fn alice() -> Principal {
    Principal {
        id: "u-alice".to_string(),
        name: Some("Alice Adams".to_string()),
        username: "alice".to_string(),
        role: Role::Reporter,
        password: None,
    }
}

pub fn carol() -> Principal {
    Principal {
        id: "u-carol".to_string(),
        name: None,
        username: "carol".to_string(),
        role: Role::Reporter,
        password: None,
    }
}

pub fn bob() -> Principal {
    Principal {
        id: "d-bob".to_string(),
        name: Some("Bob Builder".to_string()),
        username: "bob".to_string(),
        role: Role::Operator,
        password: None,
    }
}

pub const PASSWORD: &str = "secret";

// =============================================================================
// FAKE GATEWAY
// =============================================================================

#[derive(Default)]
struct FakeState {
    users: Vec<Principal>,
    reports: Vec<Report>,
    calls: Vec<String>,
    push_tokens: Vec<(String, String)>,
    fail_next: Option<GatewayError>,
    ticks: i64,
    next_id: u32,
}

impl FakeState {
    fn now(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        Utc.timestamp_opt(1_714_557_600 + self.ticks, 0).unwrap()
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }

    fn report_mut(&mut self, id: &str) -> Result<&mut Report, GatewayError> {
        self.reports
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| GatewayError::NotFound(format!("report {}", id)))
    }
}

/// In-memory stand-in for the remote API.
///
/// Every user's password is [`PASSWORD`]. Each mutation advances a fake clock
/// so `updated_at` strictly increases.
pub struct FakeGateway {
    state: Mutex<FakeState>,
}

impl FakeGateway {
    pub fn new() -> Self {
        let state = FakeState {
            users: vec![alice(), carol(), bob()],
            ..FakeState::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    /// Seed a report filed by `reporter`.
    pub fn seed_report(&self, reporter: &Principal, app: &str, status: ReportStatus) -> Report {
        let mut state = self.state.lock().unwrap();
        let now = state.now();
        let report = Report {
            id: state.next_id("r"),
            reporter_id: reporter.id.clone(),
            reporter_name: reporter.username.clone(),
            app: app.to_string(),
            page: "Home".to_string(),
            url: String::new(),
            description: format!("{} is broken", app),
            screenshots: vec![],
            severity: Default::default(),
            status,
            assigned_to_id: None,
            assigned_to_name: None,
            created_at: now,
            updated_at: now,
            comments: vec![],
        };
        state.reports.push(report.clone());
        report
    }

    /// Make the next gateway call fail with `error`.
    pub fn fail_next(&self, error: GatewayError) {
        self.state.lock().unwrap().fail_next = Some(error);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn called(&self, operation: &str) -> bool {
        self.calls().iter().any(|c| c == operation)
    }

    pub fn push_tokens(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().push_tokens.clone()
    }

    pub fn server_report(&self, id: &str) -> Report {
        let state = self.state.lock().unwrap();
        state.reports.iter().find(|r| r.id == id).cloned().unwrap()
    }

    fn begin(&self, operation: &str) -> Result<std::sync::MutexGuard<'_, FakeState>, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(operation.to_string());
        match state.fail_next.take() {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }
}

#[async_trait]
impl RemoteDataGateway for FakeGateway {
    async fn login(&self, username: &str, password: &str) -> Result<Principal, GatewayError> {
        let state = self.begin("login")?;
        state
            .users
            .iter()
            .find(|u| u.username == username && password == PASSWORD)
            .map(|u| Principal {
                password: Some(PASSWORD.to_string()),
                ..u.clone()
            })
            .ok_or_else(|| GatewayError::Auth("Invalid credentials".to_string()))
    }

    async fn register_push_token(&self, user_id: &str, token: &str) -> Result<(), GatewayError> {
        let mut state = self.begin("register_push_token")?;
        state.push_tokens.push((user_id.to_string(), token.to_string()));
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<Principal>, GatewayError> {
        Ok(self.begin("list_users")?.users.clone())
    }

    async fn create_user(&self, user: &NewUser) -> Result<Principal, GatewayError> {
        let mut state = self.begin("create_user")?;
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(GatewayError::Conflict("Username already exists".to_string()));
        }
        let created = Principal {
            id: state.next_id("u"),
            name: user.name.clone(),
            username: user.username.clone(),
            role: user.role,
            password: None,
        };
        state.users.push(created.clone());
        Ok(created)
    }

    async fn reset_password(&self, user_id: &str) -> Result<(), GatewayError> {
        let state = self.begin("reset_password")?;
        if state.users.iter().any(|u| u.id == user_id) {
            Ok(())
        } else {
            Err(GatewayError::NotFound(format!("user {}", user_id)))
        }
    }

    async fn list_reports(&self) -> Result<Vec<Report>, GatewayError> {
        Ok(self.begin("list_reports")?.reports.clone())
    }

    async fn get_report(&self, id: &str) -> Result<Report, GatewayError> {
        let mut state = self.begin("get_report")?;
        state.report_mut(id).map(|r| r.clone())
    }

    async fn create_report(&self, report: &NewReport) -> Result<Report, GatewayError> {
        let mut state = self.begin("create_report")?;
        let now = state.now();
        let created = Report {
            id: state.next_id("r"),
            reporter_id: report.reporter_id.clone(),
            reporter_name: report.reporter_name.clone(),
            app: report.app.clone(),
            page: report.page.clone(),
            url: report.url.clone(),
            description: report.description.clone(),
            screenshots: report.screenshots.clone(),
            severity: report.severity,
            status: ReportStatus::Open,
            assigned_to_id: None,
            assigned_to_name: None,
            created_at: now,
            updated_at: now,
            comments: vec![],
        };
        state.reports.push(created.clone());
        Ok(created)
    }

    async fn update_status(&self, id: &str, status: ReportStatus) -> Result<Report, GatewayError> {
        let mut state = self.begin("update_status")?;
        let now = state.now();
        let report = state.report_mut(id)?;
        report.status = status;
        report.updated_at = now;
        Ok(report.clone())
    }

    async fn assign(&self, id: &str, assignee: Option<&Assignee>) -> Result<Report, GatewayError> {
        let mut state = self.begin("assign")?;
        let now = state.now();
        let report = state.report_mut(id)?;
        report.assigned_to_id = assignee.map(|a| a.id.clone());
        report.assigned_to_name = assignee.map(|a| a.name.clone());
        report.updated_at = now;
        Ok(report.clone())
    }

    async fn add_comment(
        &self,
        report_id: &str,
        comment: &NewComment,
    ) -> Result<Comment, GatewayError> {
        let mut state = self.begin("add_comment")?;
        let now = state.now();
        let id = state.next_id("c");
        let report = state.report_mut(report_id)?;
        let created = Comment {
            id,
            author_id: comment.author_id.clone(),
            author_name: comment.author_name.clone(),
            message: comment.message.clone(),
            timestamp: now,
        };
        report.comments.push(created.clone());
        report.updated_at = now;
        Ok(created)
    }
}

// =============================================================================
// PERMISSION AND NOTIFIER FAKES
// =============================================================================

/// A permission that never changes.
pub struct FixedPermission(pub NotificationPermission);

#[async_trait]
impl PermissionProvider for FixedPermission {
    async fn current(&self) -> NotificationPermission {
        self.0
    }

    async fn request(&self) -> NotificationPermission {
        self.0
    }
}

/// Collects every delivered notice.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}

// =============================================================================
// IMAGES
// =============================================================================

/// A PNG of the given size.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 30, 30, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

/// Decode a JPEG data URL and return its dimensions.
pub fn data_url_dimensions(data_url: &str) -> (u32, u32) {
    let decoded = bugdesk_media::decode_data_url(data_url).unwrap();
    assert_eq!(decoded.mime_type, "image/jpeg");
    let image = image::load_from_memory(&decoded.bytes).unwrap();
    (image.width(), image.height())
}
