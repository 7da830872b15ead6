//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps and error types that form the
//! vocabulary of the AHP engine.

mod ahp_error;
mod errors;
mod ids;
mod timestamp;

pub use ahp_error::AhpError;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{EvaluatorId, NodeId, ProjectId};
pub use timestamp::Timestamp;
