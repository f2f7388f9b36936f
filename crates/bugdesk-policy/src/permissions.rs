//! Action-level permissions.
//!
//! The `ActionValidator` decides whether a principal may perform an action,
//! checked in two steps:
//!
//! 1. **Role** - does the principal's role grant the action at all
//! 2. **Report scope** - ownership, status and assignee checks against the
//!    target report

use crate::error::AccessError;
use crate::request::{AccessRequest, Action};
use bugdesk_core::{Principal, Report, ReportStatus, Role};

/// Validates [`AccessRequest`]s against the role capability table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionValidator;

impl ActionValidator {
    pub fn new() -> Self {
        Self
    }

    /// Roles that may attempt an action.
    pub fn roles_for(action: Action) -> &'static [Role] {
        match action {
            Action::SubmitReport => &[Role::Reporter],
            Action::ViewReport | Action::Comment => &[Role::Operator, Role::Reporter],
            Action::ChangeStatus | Action::Assign | Action::ManageUsers => &[Role::Operator],
        }
    }

    /// Validate an access request.
    pub fn authorize(&self, request: &AccessRequest) -> Result<(), AccessError> {
        let role = request.principal.role;

        // 1. Role capability
        if !Self::roles_for(request.action).contains(&role) {
            tracing::debug!(
                action = %request.action,
                role = %role,
                "Action denied by role"
            );
            return Err(AccessError::role_not_permitted(request.action, role));
        }

        if !request.action.is_report_scoped() {
            return Ok(());
        }

        // 2. Report scope
        let Some(report) = request.report else {
            return Err(AccessError::report_required(request.action));
        };

        match request.action {
            Action::ViewReport => self.validate_view(request.principal, report),
            Action::Comment => self.validate_comment(request.principal, report),
            Action::Assign => self.validate_assign(request.assignee),
            Action::ChangeStatus | Action::SubmitReport | Action::ManageUsers => Ok(()),
        }
    }

    /// Whether the principal may see a report at all.
    pub fn can_view(&self, principal: &Principal, report: &Report) -> bool {
        self.validate_view(principal, report).is_ok()
    }

    /// Whether the comment box should be offered for this report.
    pub fn can_comment(&self, principal: &Principal, report: &Report) -> bool {
        self.authorize(&AccessRequest::new(Action::Comment, principal).on_report(report))
            .is_ok()
    }

    /// The subset of `reports` visible to `principal`, order preserved.
    ///
    /// Operators see everything; reporters see only what they filed.
    pub fn visible_reports<'r>(&self, principal: &Principal, reports: &'r [Report]) -> Vec<&'r Report> {
        reports
            .iter()
            .filter(|report| self.can_view(principal, report))
            .collect()
    }

    fn validate_view(&self, principal: &Principal, report: &Report) -> Result<(), AccessError> {
        if principal.is_operator() || report.is_filed_by(&principal.id) {
            Ok(())
        } else {
            Err(AccessError::not_report_owner(&report.id))
        }
    }

    fn validate_comment(&self, principal: &Principal, report: &Report) -> Result<(), AccessError> {
        self.validate_view(principal, report)?;
        if !principal.is_operator() && report.status == ReportStatus::Closed {
            return Err(AccessError::report_closed(&report.id, report.status));
        }
        Ok(())
    }

    fn validate_assign(&self, assignee: Option<&Principal>) -> Result<(), AccessError> {
        match assignee {
            Some(assignee) if !assignee.is_operator() => {
                Err(AccessError::invalid_assignee(&assignee.username))
            }
            _ => Ok(()),
        }
    }
}
