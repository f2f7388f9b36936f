//! Screen-level authorization.
//!
//! Every screen transition is decided here before any content is produced.
//! The decision reads only the explicitly passed [`SessionState`].

use bugdesk_core::{Principal, Role, SessionState};

const ALL_ROLES: &[Role] = &[Role::Operator, Role::Reporter];
const OPERATOR_ONLY: &[Role] = &[Role::Operator];
const REPORTER_ONLY: &[Role] = &[Role::Reporter];

/// A gated screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Dashboard,
    SubmitReport,
    ReportList,
    ReportDetail,
    UserManagement,
}

impl Screen {
    /// Every gated screen, in navigation order.
    pub const ALL: [Screen; 5] = [
        Screen::Dashboard,
        Screen::SubmitReport,
        Screen::ReportList,
        Screen::ReportDetail,
        Screen::UserManagement,
    ];

    /// Roles allowed past the gate.
    ///
    /// The report list and detail admit both roles; what each role sees is
    /// filtered inside the screen, not here.
    pub fn required_roles(&self) -> &'static [Role] {
        match self {
            Screen::Dashboard => ALL_ROLES,
            Screen::SubmitReport => REPORTER_ONLY,
            Screen::ReportList | Screen::ReportDetail => ALL_ROLES,
            Screen::UserManagement => OPERATOR_ONLY,
        }
    }

    /// Navigation label for a role, or `None` if the screen is not offered
    /// in navigation (detail screens are reached from the list).
    pub fn nav_label(&self, role: Role) -> Option<&'static str> {
        if !self.required_roles().contains(&role) {
            return None;
        }
        match (self, role) {
            (Screen::Dashboard, _) => Some("Dashboard"),
            (Screen::SubmitReport, _) => Some("Report Bug"),
            (Screen::ReportList, Role::Reporter) => Some("My Reports"),
            (Screen::ReportList, Role::Operator) => Some("All Reports"),
            (Screen::ReportDetail, _) => None,
            (Screen::UserManagement, _) => Some("Manage Users"),
        }
    }
}

/// Where a refused screen transition lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    /// The login entry point. Used when nobody is authenticated.
    Login,
    /// The default landing screen. Used when the principal is authenticated
    /// but not authorized for the requested screen.
    Dashboard,
}

/// Outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision<'a> {
    /// Session resolution is still in progress; render nothing yet.
    Suspend,
    /// Proceed; the guarded content receives this principal.
    Allow(&'a Principal),
    /// Navigate elsewhere instead.
    Redirect(RedirectTarget),
}

impl GateDecision<'_> {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allow(_))
    }
}

/// Decide whether content guarded by `required_roles` may be shown.
///
/// Rules, in order:
/// 1. Unresolved session: suspend.
/// 2. No principal: redirect to login.
/// 3. Role outside `required_roles` (when given): redirect to the landing screen.
/// 4. Otherwise allow.
pub fn authorize<'a>(session: &'a SessionState, required_roles: Option<&[Role]>) -> GateDecision<'a> {
    let principal = match session {
        SessionState::Resolving => return GateDecision::Suspend,
        SessionState::Anonymous => return GateDecision::Redirect(RedirectTarget::Login),
        SessionState::Authenticated(principal) => principal,
    };

    if let Some(roles) = required_roles
        && !roles.contains(&principal.role)
    {
        tracing::debug!(
            username = %principal.username,
            role = %principal.role,
            "Role not admitted by gate; redirecting to landing screen"
        );
        return GateDecision::Redirect(RedirectTarget::Dashboard);
    }

    GateDecision::Allow(principal)
}

/// [`authorize`] against a screen's capability entry.
pub fn authorize_screen(session: &SessionState, screen: Screen) -> GateDecision<'_> {
    authorize(session, Some(screen.required_roles()))
}

/// Screens offered in navigation for a role, with their labels.
pub fn navigation(role: Role) -> Vec<(Screen, &'static str)> {
    Screen::ALL
        .iter()
        .filter_map(|screen| screen.nav_label(role).map(|label| (*screen, label)))
        .collect()
}
