//! Engine entry points.
//!
//! Thin free functions over the analyzers so embedders need only one import.

use rand::Rng;

use crate::domain::foundation::{AhpError, EvaluatorId};
use crate::domain::hierarchy::Hierarchy;

use super::{
    AhpResult, GroupAggregationResult, GroupAggregator, JudgmentSet, ResultAssembler,
    ResultValidator, SensitivityAnalyzer, SensitivityReport, ValidationReport,
};

/// Computes one evaluator's weights, scores, ranking and consistency.
pub fn compute_individual(
    hierarchy: &Hierarchy,
    judgments: &JudgmentSet,
    evaluator_id: &EvaluatorId,
) -> Result<AhpResult, AhpError> {
    ResultAssembler::compute_individual(hierarchy, judgments, evaluator_id)
}

/// Combines individual results by geometric mean.
pub fn aggregate_group(results: Vec<AhpResult>) -> Result<GroupAggregationResult, AhpError> {
    GroupAggregator::aggregate(results)
}

/// Measures ranking stability per criterion using a thread-local RNG.
pub fn analyze_sensitivity(
    baseline: &AhpResult,
    hierarchy: &Hierarchy,
    judgments: &JudgmentSet,
    perturbation: Option<f64>,
) -> Result<Vec<SensitivityReport>, AhpError> {
    SensitivityAnalyzer::analyze(baseline, hierarchy, judgments, perturbation)
}

/// Measures ranking stability per criterion using the given RNG.
pub fn analyze_sensitivity_with_rng<R: Rng + ?Sized>(
    baseline: &AhpResult,
    hierarchy: &Hierarchy,
    judgments: &JudgmentSet,
    perturbation: Option<f64>,
    rng: &mut R,
) -> Result<Vec<SensitivityReport>, AhpError> {
    SensitivityAnalyzer::analyze_with_rng(baseline, hierarchy, judgments, perturbation, rng)
}

/// Runs the advisory checks on one result.
pub fn validate(result: &AhpResult) -> ValidationReport {
    ResultValidator::validate(result)
}
