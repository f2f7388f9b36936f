//! Access error types.
//!
//! Denials carry a kind (for callers that branch on the reason) and a
//! human-readable message (for display).

use bugdesk_core::{ReportStatus, Role};
use std::fmt;

/// Error type for denied actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessError {
    /// The kind of denial.
    pub kind: AccessErrorKind,
    /// Human-readable error message.
    pub message: String,
}

impl AccessError {
    /// Create a new access error.
    pub fn new(kind: AccessErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    // =========================================================================
    // ROLE ERRORS
    // =========================================================================

    /// The principal's role does not permit the action.
    pub fn role_not_permitted(action: impl fmt::Display, role: Role) -> Self {
        Self::new(
            AccessErrorKind::RoleNotPermitted,
            format!("Role '{}' is not permitted to {}", role, action),
        )
    }

    // =========================================================================
    // REPORT ERRORS
    // =========================================================================

    /// The action needs a target report but none was supplied.
    pub fn report_required(action: impl fmt::Display) -> Self {
        Self::new(
            AccessErrorKind::ReportRequired,
            format!("Cannot {} without a target report", action),
        )
    }

    /// A reporter tried to reach someone else's report.
    pub fn not_report_owner(report_id: &str) -> Self {
        Self::new(
            AccessErrorKind::NotReportOwner,
            format!("Report '{}' was filed by another user", report_id),
        )
    }

    /// The report's status blocks the action for this role.
    pub fn report_closed(report_id: &str, status: ReportStatus) -> Self {
        Self::new(
            AccessErrorKind::ReportClosed,
            format!(
                "Report '{}' is {}; only developers can comment on it",
                report_id,
                status.label()
            ),
        )
    }

    // =========================================================================
    // ASSIGNMENT ERRORS
    // =========================================================================

    /// Reports can only be assigned to operators.
    pub fn invalid_assignee(username: &str) -> Self {
        Self::new(
            AccessErrorKind::InvalidAssignee,
            format!(
                "User '{}' is not a developer and cannot be assigned reports",
                username
            ),
        )
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AccessError {}

/// Categories of access denials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessErrorKind {
    /// The role does not grant the action.
    RoleNotPermitted,
    /// A report-scoped action was evaluated without its report.
    ReportRequired,
    /// The report belongs to a different reporter.
    NotReportOwner,
    /// The report's status rejects the action for this role.
    ReportClosed,
    /// The chosen assignee cannot hold assignments.
    InvalidAssignee,
}
