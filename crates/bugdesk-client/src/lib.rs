//! # bugdesk-client
//!
//! Everything between the user's actions and the remote bug-tracker API:
//!
//! - [`RemoteDataGateway`] and its HTTP implementation [`HttpGateway`]
//! - [`SessionStore`] for login, logout and session restore
//! - [`ReportSubmissionFlow`] for filing reports with screenshots
//! - [`ReportDesk`] for the role-filtered report list, status changes,
//!   assignment and comments
//! - [`UserDirectory`] for account management
//!
//! The remote API is the system of record. Local state only ever reflects
//! what the server has confirmed.

pub mod desk;
pub mod error;
pub mod gateway;
pub mod notify;
pub mod session;
pub mod store;
pub mod submission;
pub mod users;

pub use desk::ReportDesk;
pub use error::{DeskError, GatewayError, SessionError, StoreError, SubmissionError};
pub use gateway::{HttpGateway, RemoteDataGateway};
pub use notify::{
    Notice, Notices, Notifier, PushRegistration, PushTokenSource, StaticPushToken, TracingNotifier,
};
pub use session::{SESSION_KEY, SessionStore};
pub use store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use submission::{Attachment, AttachmentPreview, ReportDraft, ReportSubmissionFlow};
pub use users::{DEFAULT_RESET_PASSWORD, UserDirectory};
