//! Access request types.

use bugdesk_core::{Principal, Report};
use std::fmt;

/// An action a principal may attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// File a new report.
    SubmitReport,
    /// Open a single report.
    ViewReport,
    /// Move a report to another status.
    ChangeStatus,
    /// Set or clear a report's assignee.
    Assign,
    /// Add a comment to a report.
    Comment,
    /// List, create and reset user accounts.
    ManageUsers,
}

impl Action {
    /// Whether the action targets one report.
    pub fn is_report_scoped(&self) -> bool {
        matches!(
            self,
            Action::ViewReport | Action::ChangeStatus | Action::Assign | Action::Comment
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::SubmitReport => write!(f, "submit reports"),
            Action::ViewReport => write!(f, "view this report"),
            Action::ChangeStatus => write!(f, "change report status"),
            Action::Assign => write!(f, "assign reports"),
            Action::Comment => write!(f, "comment on this report"),
            Action::ManageUsers => write!(f, "manage users"),
        }
    }
}

/// Everything needed to decide one action.
#[derive(Debug, Clone, Copy)]
pub struct AccessRequest<'a> {
    /// The action being attempted.
    pub action: Action,
    /// Who is attempting it.
    pub principal: &'a Principal,
    /// The target report, for report-scoped actions.
    pub report: Option<&'a Report>,
    /// For `Assign`: the new assignee, or `None` to clear.
    pub assignee: Option<&'a Principal>,
}

impl<'a> AccessRequest<'a> {
    pub fn new(action: Action, principal: &'a Principal) -> Self {
        Self {
            action,
            principal,
            report: None,
            assignee: None,
        }
    }

    pub fn on_report(mut self, report: &'a Report) -> Self {
        self.report = Some(report);
        self
    }

    pub fn with_assignee(mut self, assignee: Option<&'a Principal>) -> Self {
        self.assignee = assignee;
        self
    }
}
