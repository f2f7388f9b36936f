//! Shared domain types for the Bugdesk client.
//!
//! Everything here mirrors the JSON shapes served by the remote bug-tracker
//! API (camelCase on the wire). Records are transient copies: the remote
//! system of record owns reports, comments and users.

// Configuration types shared across all Bugdesk crates
pub mod config;

pub mod principal;
pub mod report;

pub use config::{
    ApiConfig, BugdeskConfig, ConfigError, LoggingConfig, NotificationsConfig, SessionConfig,
};
pub use principal::{NewUser, Principal, Role, SessionState, UnknownRole};
pub use report::{
    Assignee, Comment, DashboardStats, FormField, NewComment, NewReport, Report, ReportForm,
    ReportStatus, Severity, UnknownVariant,
};
