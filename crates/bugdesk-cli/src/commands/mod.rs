//! CLI command implementations for Bugdesk.

pub mod dashboard;
pub mod notifications;
pub mod reports;
pub mod session;
pub mod users;
