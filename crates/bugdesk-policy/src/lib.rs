//! Bugdesk access policy
//!
//! Three layers decide what a principal may see and do:
//!
//! 1. **Notification gate** - blocks all content until notification
//!    permission is granted ([`NotificationGate`])
//! 2. **Authorization gate** - session and role check for each screen
//!    ([`authorize`], [`authorize_screen`])
//! 3. **Action permissions** - per-report rules for viewing, commenting,
//!    assignment and status changes ([`ActionValidator`])
//!
//! # Example
//!
//! ```ignore
//! use bugdesk_policy::{authorize_screen, GateDecision, Screen};
//!
//! match authorize_screen(&session, Screen::UserManagement) {
//!     GateDecision::Allow(principal) => render(principal),
//!     GateDecision::Redirect(target) => navigate(target),
//!     GateDecision::Suspend => {}
//! }
//! ```

pub mod error;
pub mod gate;
pub mod notification;
pub mod permissions;
pub mod request;

pub use error::{AccessError, AccessErrorKind};
pub use gate::{GateDecision, RedirectTarget, Screen, authorize, authorize_screen, navigation};
pub use notification::{
    DENIED_REMEDIATION, GateOutcome, NotificationGate, NotificationPermission, PermissionProvider,
};
pub use permissions::ActionValidator;
pub use request::{AccessRequest, Action};
