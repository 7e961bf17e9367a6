//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the strongly typed entities of the feedback portal and the
//! services that enforce its invariants. Types are immutable except through
//! methods that uphold their documented invariants; serialisation contracts
//! live in the inbound adapter, never here.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`] — transport-agnostic failure payload.
//! - [`User`], [`Username`], [`Role`] — identity entities.
//! - [`AuthContext`] — tagged caller context passed into every service call.
//! - [`FeedbackRecord`] and friends — the central entity.
//! - [`summarize`] — derived sentiment aggregation.

pub mod auth;
mod dashboard_service;
pub mod error;
pub mod feedback;
mod feedback_service;
mod identity_service;
pub mod password;
pub mod ports;
pub mod summary;
mod team_service;
pub mod user;

pub use self::auth::{
    AccessToken, AuthContext, AuthValidationError, Identity, LoginCredentials,
    LoginValidationError,
};
pub use self::dashboard_service::DashboardQueryService;
pub use self::error::{Error, ErrorCode};
pub use self::feedback::{
    FeedbackDraft, FeedbackEdit, FeedbackId, FeedbackMutationError, FeedbackRecord, FeedbackText,
    FeedbackValidationError, Sentiment, Tags, sort_newest_first,
};
pub use self::feedback_service::FeedbackService;
pub use self::identity_service::IdentityServiceImpl;
pub use self::password::PasswordHash;
pub use self::summary::{FeedbackSummary, summarize};
pub use self::team_service::TeamQueryService;
pub use self::user::{Role, User, UserId, UserValidationError, Username};
