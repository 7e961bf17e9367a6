//! HTTP inbound adapter exposing REST endpoints.

pub mod bearer;
pub mod dashboard;
pub mod error;
pub mod feedback;
pub mod health;
pub mod identity;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;
