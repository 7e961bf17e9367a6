//! Domain ports.
//!
//! Driving ports are the use-case traits inbound adapters call; driven ports
//! are the persistence and token-store traits outbound adapters implement.
//! Handlers depend only on driving ports, services only on driven ports, so
//! either side can be substituted with a test double.

mod dashboard;
mod feedback;
mod feedback_repository;
mod identity;
mod team;
mod token_store;
mod user_repository;

pub use dashboard::{DashboardQuery, ManagerDashboard, MemberFeedbackCount};
pub use feedback::{FeedbackCommand, FeedbackQuery, SubmitFeedbackRequest};
pub use feedback_repository::{FeedbackRepository, FeedbackRepositoryError};
pub use identity::{IdentityService, LoginGrant, RegisterUserRequest, UserProfile};
pub use team::{TeamMember, TeamQuery};
pub use token_store::{TokenStore, TokenStoreError};
pub use user_repository::{UserRepository, UserRepositoryError};

#[cfg(test)]
pub use feedback_repository::MockFeedbackRepository;
#[cfg(test)]
pub use token_store::MockTokenStore;
#[cfg(test)]
pub use user_repository::MockUserRepository;
