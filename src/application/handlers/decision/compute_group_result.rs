//! ComputeGroupResultHandler - Query handler for a group decision.
//!
//! Each evaluator's result is assembled on its own blocking task; the group
//! aggregate is built only after every task has joined.

use std::sync::Arc;

use tracing::info;

use crate::domain::analysis::{
    GroupAggregationResult, GroupAggregator, ResultValidator, ValidationReport,
    CONSISTENCY_THRESHOLD,
};
use crate::domain::foundation::{AhpError, DomainError, EvaluatorId, ProjectId};
use crate::ports::{HierarchyReader, JudgmentReader};

use super::{assemble_all, load_hierarchy, DEFAULT_MAX_PARALLEL_EVALUATORS};

/// Command to compute a group result.
#[derive(Debug, Clone)]
pub struct ComputeGroupResultCommand {
    pub project_id: ProjectId,
    /// Evaluators to include; `None` means everyone who recorded a judgment.
    pub evaluator_ids: Option<Vec<EvaluatorId>>,
}

/// Group aggregation with validation of the aggregate.
#[derive(Debug, Clone)]
pub struct ComputeGroupResultOutput {
    pub group: GroupAggregationResult,
    pub validation: ValidationReport,
}

/// Handler for computing group results.
pub struct ComputeGroupResultHandler {
    hierarchy_reader: Arc<dyn HierarchyReader>,
    judgment_reader: Arc<dyn JudgmentReader>,
    max_parallel_evaluators: usize,
    consistency_threshold: f64,
}

impl ComputeGroupResultHandler {
    pub fn new(
        hierarchy_reader: Arc<dyn HierarchyReader>,
        judgment_reader: Arc<dyn JudgmentReader>,
    ) -> Self {
        Self {
            hierarchy_reader,
            judgment_reader,
            max_parallel_evaluators: DEFAULT_MAX_PARALLEL_EVALUATORS,
            consistency_threshold: CONSISTENCY_THRESHOLD,
        }
    }

    /// Caps concurrently running assemblies (minimum 1).
    pub fn with_max_parallel_evaluators(mut self, max: usize) -> Self {
        self.max_parallel_evaluators = max.max(1);
        self
    }

    /// Overrides the CR threshold used for validation.
    pub fn with_consistency_threshold(mut self, threshold: f64) -> Self {
        self.consistency_threshold = threshold;
        self
    }

    pub async fn handle(
        &self,
        cmd: ComputeGroupResultCommand,
    ) -> Result<ComputeGroupResultOutput, DomainError> {
        // 1. Load inputs
        let hierarchy = load_hierarchy(self.hierarchy_reader.as_ref(), &cmd.project_id).await?;
        let judgments = self.judgment_reader.list_for_project(&cmd.project_id).await?;
        let evaluators = cmd.evaluator_ids.unwrap_or_else(|| judgments.evaluators());
        if evaluators.is_empty() {
            return Err(AhpError::EmptyGroup.into());
        }

        // 2. Fan out one assembly per evaluator, then join
        let results = assemble_all(
            Arc::new(hierarchy),
            Arc::new(judgments),
            evaluators,
            self.max_parallel_evaluators,
        )
        .await?;

        // 3. Aggregate and validate
        let group = GroupAggregator::aggregate(results)?;
        let validation =
            ResultValidator::validate_with_threshold(&group.aggregated, self.consistency_threshold);

        info!(
            project_id = %cmd.project_id,
            evaluators = group.individual_results.len(),
            consensus_level = group.consensus_level,
            is_valid = validation.is_valid,
            "Computed group AHP result"
        );

        Ok(ComputeGroupResultOutput { group, validation })
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{evaluator, hierarchy, judgments_for, node};
    use super::*;
    use crate::adapters::{InMemoryHierarchyReader, InMemoryJudgmentReader};
    use crate::domain::analysis::{Judgment, ValidationIssueKind};
    use crate::domain::foundation::ErrorCode;

    async fn handler_with(
        project_id: ProjectId,
        judgments: Vec<Judgment>,
    ) -> ComputeGroupResultHandler {
        let hierarchies = InMemoryHierarchyReader::with_hierarchies(vec![hierarchy(project_id)]);
        let judgment_reader = InMemoryJudgmentReader::new();
        judgment_reader.record_all(project_id, judgments).await;
        ComputeGroupResultHandler::new(Arc::new(hierarchies), Arc::new(judgment_reader))
    }

    #[tokio::test]
    async fn identical_evaluators_reach_full_consensus() {
        let project_id = ProjectId::new();
        let mut judgments = judgments_for("alice", 3.0);
        judgments.extend(judgments_for("bob", 3.0));
        let handler = handler_with(project_id, judgments).await;

        let output = handler
            .handle(ComputeGroupResultCommand {
                project_id,
                evaluator_ids: None,
            })
            .await
            .unwrap();

        assert_eq!(output.group.individual_results.len(), 2);
        assert!((output.group.consensus_level - 1.0).abs() < 1e-9);
        assert!(output.group.aggregated.is_group());
        let alice_x = output.group.individual_results[0].scores[&node("x")];
        assert!((output.group.aggregated.scores[&node("x")] - alice_x).abs() < 1e-9);
    }

    #[tokio::test]
    async fn runs_with_single_permit() {
        let project_id = ProjectId::new();
        let mut judgments = judgments_for("alice", 3.0);
        judgments.extend(judgments_for("bob", 1.0 / 3.0));
        judgments.extend(judgments_for("carol", 1.0));
        let handler = handler_with(project_id, judgments)
            .await
            .with_max_parallel_evaluators(1);

        let output = handler
            .handle(ComputeGroupResultCommand {
                project_id,
                evaluator_ids: None,
            })
            .await
            .unwrap();

        let order: Vec<_> = output
            .group
            .individual_results
            .iter()
            .map(|r| r.evaluator_id.clone())
            .collect();
        assert_eq!(
            order,
            vec![
                Some(evaluator("alice")),
                Some(evaluator("bob")),
                Some(evaluator("carol"))
            ]
        );
        assert!(output.group.consensus_level < 1.0);
        assert_eq!(output.group.disagreements.len(), 3);
    }

    #[tokio::test]
    async fn explicit_evaluator_list_limits_the_group() {
        let project_id = ProjectId::new();
        let mut judgments = judgments_for("alice", 3.0);
        judgments.extend(judgments_for("bob", 5.0));
        let handler = handler_with(project_id, judgments).await;

        let output = handler
            .handle(ComputeGroupResultCommand {
                project_id,
                evaluator_ids: Some(vec![evaluator("bob")]),
            })
            .await
            .unwrap();

        assert_eq!(output.group.individual_results.len(), 1);
        assert_eq!(
            output.group.individual_results[0].evaluator_id,
            Some(evaluator("bob"))
        );
    }

    #[tokio::test]
    async fn project_without_judgments_is_an_empty_group() {
        let project_id = ProjectId::new();
        let handler = handler_with(project_id, vec![]).await;

        let err = handler
            .handle(ComputeGroupResultCommand {
                project_id,
                evaluator_ids: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, AhpError::EmptyGroup.code());
    }

    #[tokio::test]
    async fn one_bad_evaluator_fails_the_group() {
        let project_id = ProjectId::new();
        let mut judgments = judgments_for("alice", 3.0);
        let mut bad = judgments_for("bob", 3.0);
        bad[1].value = 0.0;
        judgments.extend(bad);
        let handler = handler_with(project_id, judgments).await;

        let err = handler
            .handle(ComputeGroupResultCommand {
                project_id,
                evaluator_ids: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::JudgmentOutOfRange);
        assert_eq!(err.details.get("evaluator_id").map(String::as_str), Some("bob"));
    }

    #[tokio::test]
    async fn divided_group_of_valid_evaluators_validates() {
        let project_id = ProjectId::new();
        let mut judgments = judgments_for("alice", 9.0);
        judgments.extend(judgments_for("bob", 1.0 / 9.0));
        let handler = handler_with(project_id, judgments).await;

        let output = handler
            .handle(ComputeGroupResultCommand {
                project_id,
                evaluator_ids: None,
            })
            .await
            .unwrap();

        assert!(output.group.consensus_level < 1.0);
        assert!((output.group.aggregated.score_sum() - 1.0).abs() < 1e-9);
        assert!(output.validation.is_valid, "{:?}", output.validation.issues);
        assert!(output.validation.recommendations.is_empty());
    }

    #[tokio::test]
    async fn inconsistent_evaluator_flags_the_group_node() {
        let project_id = ProjectId::new();
        let mut judgments = judgments_for("alice", 3.0);
        let mut cyclic = judgments_for("bob", 3.0);
        // x > y > z > x under price
        cyclic[1].value = 9.0;
        cyclic[2].value = 1.0 / 9.0;
        cyclic[3].value = 9.0;
        judgments.extend(cyclic);
        let handler = handler_with(project_id, judgments).await;

        let output = handler
            .handle(ComputeGroupResultCommand {
                project_id,
                evaluator_ids: None,
            })
            .await
            .unwrap();

        assert!(!output.validation.is_valid);
        let flagged = output.validation.issues_of(ValidationIssueKind::InconsistentNode);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].node_id, Some(node("price")));
        assert!((output.group.aggregated.score_sum() - 1.0).abs() < 1e-9);
    }
}
