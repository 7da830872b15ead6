//! ComputeIndividualResultHandler - Query handler for one evaluator's result.

use std::sync::Arc;

use tracing::info;

use crate::domain::analysis::{
    AhpResult, ResultAssembler, ResultValidator, ValidationReport, CONSISTENCY_THRESHOLD,
};
use crate::domain::foundation::{DomainError, ErrorCode, EvaluatorId, ProjectId};
use crate::ports::{HierarchyReader, JudgmentReader};

use super::load_hierarchy;

/// Command to compute one evaluator's AHP result.
#[derive(Debug, Clone)]
pub struct ComputeIndividualResultCommand {
    pub project_id: ProjectId,
    pub evaluator_id: EvaluatorId,
}

/// The computed result with its advisory validation.
#[derive(Debug, Clone)]
pub struct ComputeIndividualResultOutput {
    pub result: AhpResult,
    pub validation: ValidationReport,
}

/// Handler for computing individual results.
pub struct ComputeIndividualResultHandler {
    hierarchy_reader: Arc<dyn HierarchyReader>,
    judgment_reader: Arc<dyn JudgmentReader>,
    consistency_threshold: f64,
}

impl ComputeIndividualResultHandler {
    pub fn new(
        hierarchy_reader: Arc<dyn HierarchyReader>,
        judgment_reader: Arc<dyn JudgmentReader>,
    ) -> Self {
        Self {
            hierarchy_reader,
            judgment_reader,
            consistency_threshold: CONSISTENCY_THRESHOLD,
        }
    }

    /// Overrides the CR threshold used for validation.
    pub fn with_consistency_threshold(mut self, threshold: f64) -> Self {
        self.consistency_threshold = threshold;
        self
    }

    pub async fn handle(
        &self,
        cmd: ComputeIndividualResultCommand,
    ) -> Result<ComputeIndividualResultOutput, DomainError> {
        // 1. Load hierarchy
        let hierarchy = load_hierarchy(self.hierarchy_reader.as_ref(), &cmd.project_id).await?;

        // 2. Load this evaluator's judgments
        let judgments = self
            .judgment_reader
            .list_for_evaluator(&cmd.project_id, &cmd.evaluator_id)
            .await?;
        if judgments.is_empty() {
            return Err(DomainError::new(
                ErrorCode::EvaluatorNotFound,
                format!("Evaluator {} has no judgments", cmd.evaluator_id),
            )
            .with_detail("evaluator_id", cmd.evaluator_id.to_string()));
        }

        // 3. Compute and validate
        let result = ResultAssembler::compute_individual(&hierarchy, &judgments, &cmd.evaluator_id)?;
        let validation = ResultValidator::validate_with_threshold(&result, self.consistency_threshold);

        info!(
            project_id = %cmd.project_id,
            evaluator_id = %cmd.evaluator_id,
            overall_cr = result.overall_consistency_ratio,
            is_valid = validation.is_valid,
            "Computed individual AHP result"
        );

        Ok(ComputeIndividualResultOutput { result, validation })
    }
}
