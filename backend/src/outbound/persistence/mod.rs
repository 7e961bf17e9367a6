//! In-memory persistence adapters.
//!
//! Process-local stores behind `RwLock`s. Every mutation happens inside a
//! single write-lock acquisition, so each port call is atomic from the
//! caller's perspective. State does not survive a restart.

mod memory_feedback_repository;
mod memory_token_store;
mod memory_user_repository;

pub use memory_feedback_repository::MemoryFeedbackRepository;
pub use memory_token_store::MemoryTokenStore;
pub use memory_user_repository::MemoryUserRepository;
