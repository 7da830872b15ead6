//! Judgment reader port.
//!
//! Judgments arrive from the evaluation UI as evaluators answer pairwise
//! prompts. The engine only reads them.

use crate::domain::analysis::JudgmentSet;
use crate::domain::foundation::{DomainError, EvaluatorId, ProjectId};
use async_trait::async_trait;

/// Reader port for recorded pairwise judgments.
#[async_trait]
pub trait JudgmentReader: Send + Sync {
    /// All judgments recorded for a project, every evaluator included.
    ///
    /// Returns judgments in recording order.
    async fn list_for_project(&self, project_id: &ProjectId) -> Result<JudgmentSet, DomainError>;

    /// Judgments recorded by one evaluator for a project.
    async fn list_for_evaluator(
        &self,
        project_id: &ProjectId,
        evaluator_id: &EvaluatorId,
    ) -> Result<JudgmentSet, DomainError>;
}
