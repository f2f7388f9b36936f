//! Remote data gateway.
//!
//! The remote API is the system of record for users, reports and comments.
//! Everything the client shows is a copy of what a gateway call returned.

mod http;

pub use http::HttpGateway;

use crate::error::GatewayError;
use async_trait::async_trait;
use bugdesk_core::{
    Assignee, Comment, NewComment, NewReport, NewUser, Principal, Report, ReportStatus,
};

/// Operations against the remote bug-tracker API.
#[async_trait]
pub trait RemoteDataGateway: Send + Sync {
    /// Authenticate and return the principal.
    async fn login(&self, username: &str, password: &str) -> Result<Principal, GatewayError>;

    /// Register a push device token against a user.
    async fn register_push_token(&self, user_id: &str, token: &str) -> Result<(), GatewayError>;

    async fn list_users(&self) -> Result<Vec<Principal>, GatewayError>;

    /// Create a user account. Duplicate usernames yield [`GatewayError::Conflict`].
    async fn create_user(&self, user: &NewUser) -> Result<Principal, GatewayError>;

    /// Reset a user's password to the server default.
    async fn reset_password(&self, user_id: &str) -> Result<(), GatewayError>;

    async fn list_reports(&self) -> Result<Vec<Report>, GatewayError>;

    async fn get_report(&self, id: &str) -> Result<Report, GatewayError>;

    async fn create_report(&self, report: &NewReport) -> Result<Report, GatewayError>;

    async fn update_status(&self, id: &str, status: ReportStatus) -> Result<Report, GatewayError>;

    /// Set the assignee, or clear it with `None`.
    async fn assign(&self, id: &str, assignee: Option<&Assignee>) -> Result<Report, GatewayError>;

    async fn add_comment(&self, report_id: &str, comment: &NewComment)
    -> Result<Comment, GatewayError>;
}
