//! AnalyzeSensitivityHandler - Query handler for ranking stability.
//!
//! The baseline uses the same per-evaluator fan-out as the group handler;
//! the perturbation runs afterwards on a single blocking task.

use std::sync::Arc;

use tracing::info;

use crate::config::SensitivityConfig;
use crate::domain::analysis::{AhpResult, GroupAggregator, SensitivityAnalyzer, SensitivityReport};
use crate::domain::foundation::{AhpError, DomainError, ErrorCode, EvaluatorId, ProjectId};
use crate::ports::{HierarchyReader, JudgmentReader};

use super::{assemble_all, load_hierarchy, DEFAULT_MAX_PARALLEL_EVALUATORS};

/// Command to analyze sensitivity for one evaluator or the whole group.
#[derive(Debug, Clone)]
pub struct AnalyzeSensitivityCommand {
    pub project_id: ProjectId,
    /// `None` analyzes the group aggregate.
    pub evaluator_id: Option<EvaluatorId>,
    /// Overrides the configured perturbation fraction.
    pub perturbation: Option<f64>,
}

/// Baseline plus one report per criterion, least stable first.
#[derive(Debug, Clone)]
pub struct AnalyzeSensitivityResult {
    pub baseline: AhpResult,
    pub reports: Vec<SensitivityReport>,
}

impl AnalyzeSensitivityResult {
    /// Criteria whose perturbation changed the ranking.
    pub fn sensitive_criteria(&self) -> Vec<&SensitivityReport> {
        self.reports.iter().filter(|r| !r.is_stable()).collect()
    }
}

/// Handler for sensitivity analysis.
pub struct AnalyzeSensitivityHandler {
    hierarchy_reader: Arc<dyn HierarchyReader>,
    judgment_reader: Arc<dyn JudgmentReader>,
    config: SensitivityConfig,
    max_parallel_evaluators: usize,
}

impl AnalyzeSensitivityHandler {
    pub fn new(
        hierarchy_reader: Arc<dyn HierarchyReader>,
        judgment_reader: Arc<dyn JudgmentReader>,
        config: SensitivityConfig,
    ) -> Self {
        Self {
            hierarchy_reader,
            judgment_reader,
            config,
            max_parallel_evaluators: DEFAULT_MAX_PARALLEL_EVALUATORS,
        }
    }

    /// Caps concurrently running baseline assemblies (minimum 1).
    pub fn with_max_parallel_evaluators(mut self, max: usize) -> Self {
        self.max_parallel_evaluators = max.max(1);
        self
    }

    pub async fn handle(
        &self,
        cmd: AnalyzeSensitivityCommand,
    ) -> Result<AnalyzeSensitivityResult, DomainError> {
        // 1. Load inputs
        let hierarchy = load_hierarchy(self.hierarchy_reader.as_ref(), &cmd.project_id).await?;
        let judgments = match &cmd.evaluator_id {
            Some(evaluator_id) => {
                self.judgment_reader
                    .list_for_evaluator(&cmd.project_id, evaluator_id)
                    .await?
            }
            None => self.judgment_reader.list_for_project(&cmd.project_id).await?,
        };

        // 2. Baseline
        let evaluators = match &cmd.evaluator_id {
            Some(evaluator_id) => vec![evaluator_id.clone()],
            None => judgments.evaluators(),
        };
        if evaluators.is_empty() {
            return Err(AhpError::NoEvaluators.into());
        }
        let hierarchy = Arc::new(hierarchy);
        let judgments = Arc::new(judgments);
        let mut results = assemble_all(
            Arc::clone(&hierarchy),
            Arc::clone(&judgments),
            evaluators,
            self.max_parallel_evaluators,
        )
        .await?;
        let baseline = if cmd.evaluator_id.is_some() {
            results.pop().ok_or(AhpError::NoEvaluators)?
        } else {
            GroupAggregator::aggregate(results)?.aggregated
        };

        // 3. Perturb off the async workers
        let perturbation = cmd.perturbation.unwrap_or(self.config.perturbation);
        let mut rng = self.config.rng();
        let (baseline, reports) = tokio::task::spawn_blocking(move || {
            SensitivityAnalyzer::analyze_with_rng(
                &baseline,
                &hierarchy,
                &judgments,
                Some(perturbation),
                &mut rng,
            )
            .map(|reports| (baseline, reports))
        })
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Sensitivity task failed: {}", e),
            )
        })??;

        info!(
            project_id = %cmd.project_id,
            criteria = reports.len(),
            perturbation,
            seeded = self.config.seed.is_some(),
            "Completed sensitivity analysis"
        );

        Ok(AnalyzeSensitivityResult { baseline, reports })
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{evaluator, hierarchy, judgments_for};
    use super::*;
    use crate::adapters::{InMemoryHierarchyReader, InMemoryJudgmentReader};
    use crate::domain::analysis::Judgment;

    async fn handler_with(
        project_id: ProjectId,
        judgments: Vec<Judgment>,
        seed: Option<u64>,
    ) -> AnalyzeSensitivityHandler {
        let hierarchies = InMemoryHierarchyReader::with_hierarchies(vec![hierarchy(project_id)]);
        let judgment_reader = InMemoryJudgmentReader::new();
        judgment_reader.record_all(project_id, judgments).await;
        AnalyzeSensitivityHandler::new(
            Arc::new(hierarchies),
            Arc::new(judgment_reader),
            SensitivityConfig {
                perturbation: 0.3,
                seed,
            },
        )
    }

    #[tokio::test]
    async fn seeded_runs_are_reproducible() {
        let project_id = ProjectId::new();
        let handler = handler_with(project_id, judgments_for("alice", 3.0), Some(17)).await;
        let cmd = AnalyzeSensitivityCommand {
            project_id,
            evaluator_id: Some(evaluator("alice")),
            perturbation: None,
        };

        let first = handler.handle(cmd.clone()).await.unwrap();
        let second = handler.handle(cmd).await.unwrap();

        assert_eq!(first.reports, second.reports);
        assert_eq!(first.reports.len(), 2);
    }

    #[tokio::test]
    async fn zero_perturbation_override_is_fully_stable() {
        let project_id = ProjectId::new();
        let handler = handler_with(project_id, judgments_for("alice", 3.0), None).await;

        let output = handler
            .handle(AnalyzeSensitivityCommand {
                project_id,
                evaluator_id: Some(evaluator("alice")),
                perturbation: Some(0.0),
            })
            .await
            .unwrap();

        assert!(output.sensitive_criteria().is_empty());
        assert!(output.reports.iter().all(|r| r.rank_stability == 1.0));
    }

    #[tokio::test]
    async fn group_analysis_uses_aggregate_baseline() {
        let project_id = ProjectId::new();
        let mut judgments = judgments_for("alice", 3.0);
        judgments.extend(judgments_for("bob", 2.0));
        let handler = handler_with(project_id, judgments, Some(1)).await;

        let output = handler
            .handle(AnalyzeSensitivityCommand {
                project_id,
                evaluator_id: None,
                perturbation: None,
            })
            .await
            .unwrap();

        assert!(output.baseline.is_group());
        assert_eq!(output.reports.len(), 2);
    }

    #[tokio::test]
    async fn group_analysis_without_judgments_fails() {
        let project_id = ProjectId::new();
        let handler = handler_with(project_id, vec![], None).await;

        let err = handler
            .handle(AnalyzeSensitivityCommand {
                project_id,
                evaluator_id: None,
                perturbation: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, AhpError::NoEvaluators.code());
    }

    #[tokio::test]
    async fn missing_project_is_not_found() {
        let handler = handler_with(ProjectId::new(), vec![], None).await;

        let err = handler
            .handle(AnalyzeSensitivityCommand {
                project_id: ProjectId::new(),
                evaluator_id: None,
                perturbation: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ProjectNotFound);
    }

    #[tokio::test]
    async fn group_baseline_runs_with_single_permit() {
        let project_id = ProjectId::new();
        let mut judgments = judgments_for("alice", 3.0);
        judgments.extend(judgments_for("bob", 1.0 / 3.0));
        judgments.extend(judgments_for("carol", 1.0));
        let handler = handler_with(project_id, judgments, Some(5))
            .await
            .with_max_parallel_evaluators(1);

        let output = handler
            .handle(AnalyzeSensitivityCommand {
                project_id,
                evaluator_id: None,
                perturbation: None,
            })
            .await
            .unwrap();

        assert!(output.baseline.is_group());
        assert!((output.baseline.score_sum() - 1.0).abs() < 1e-9);
        assert_eq!(output.reports.len(), 2);
    }
}
