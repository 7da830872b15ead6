//! Fatal engine errors.
//!
//! Only structural and numeric-scale problems are fatal. Inconsistent or
//! incomplete judgments are advisory and surface through the result validator.

use thiserror::Error;

use super::{DomainError, ErrorCode, EvaluatorId, NodeId, ProjectId};

/// Errors that abort a single engine computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AhpError {
    #[error("Invalid hierarchy: {reason}")]
    InvalidHierarchy { reason: String },

    #[error(
        "Judgment out of range: evaluator '{evaluator_id}' rated {node_a} vs {node_b} at {value} (allowed 1/9..=9)"
    )]
    JudgmentOutOfRange {
        evaluator_id: EvaluatorId,
        node_a: NodeId,
        node_b: NodeId,
        value: f64,
    },

    #[error("Group aggregation requires at least one individual result")]
    EmptyGroup,

    #[error("Result belongs to project {found}, expected {expected}")]
    ProjectMismatch {
        expected: ProjectId,
        found: ProjectId,
    },

    #[error("No evaluators found in the judgment set")]
    NoEvaluators,
}

impl AhpError {
    /// Creates an invalid hierarchy error.
    pub fn invalid_hierarchy(reason: impl Into<String>) -> Self {
        AhpError::InvalidHierarchy {
            reason: reason.into(),
        }
    }

    /// Returns the error code this error maps to.
    pub fn code(&self) -> ErrorCode {
        match self {
            AhpError::InvalidHierarchy { .. } => ErrorCode::InvalidHierarchy,
            AhpError::JudgmentOutOfRange { .. } => ErrorCode::JudgmentOutOfRange,
            AhpError::EmptyGroup => ErrorCode::EmptyGroup,
            AhpError::ProjectMismatch { .. } => ErrorCode::ProjectMismatch,
            AhpError::NoEvaluators => ErrorCode::EvaluatorNotFound,
        }
    }
}

impl From<AhpError> for DomainError {
    fn from(err: AhpError) -> Self {
        let domain = DomainError::new(err.code(), err.to_string());
        match err {
            AhpError::JudgmentOutOfRange {
                evaluator_id,
                node_a,
                node_b,
                ..
            } => domain
                .with_detail("evaluator_id", evaluator_id.to_string())
                .with_detail("node_a", node_a.to_string())
                .with_detail("node_b", node_b.to_string()),
            _ => domain,
        }
    }
}
