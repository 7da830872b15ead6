//! Analysis Module - Pure AHP computation services.
//!
//! Everything here is synchronous and free of I/O. The components run in
//! dependency order:
//!
//! # Components
//!
//! - `ComparisonMatrix` - Reciprocal matrix over one sibling group
//! - `WeightSolver` - Normalized-column-sum priority vector
//! - `ConsistencyEvaluator` - λmax, CI and CR against the random index table
//! - `HierarchicalAggregator` - Global weights, composite scores, ranking
//! - `ResultAssembler` - One evaluator's full computation
//! - `GroupAggregator` - Geometric-mean aggregation, consensus, disagreement
//! - `SensitivityAnalyzer` - Ranking stability under perturbed judgments
//! - `ResultValidator` - Advisory consistency/completeness/normalization checks

mod comparison_matrix;
mod consistency;
mod engine;
mod group_aggregator;
mod hierarchical_aggregator;
mod judgment;
mod result;
mod result_assembler;
mod result_validator;
mod sensitivity_analyzer;
pub mod statistics;
mod weight_solver;

pub use comparison_matrix::{ComparisonMatrix, MatrixCompleteness};
pub use consistency::{
    ConsistencyEvaluator, CONSISTENCY_THRESHOLD, OVERSIZED_GROUP_CR, RANDOM_INDEX,
};
pub use engine::{
    aggregate_group, analyze_sensitivity, analyze_sensitivity_with_rng, compute_individual,
    validate,
};
pub use group_aggregator::{Disagreement, GroupAggregationResult, GroupAggregator};
pub use hierarchical_aggregator::{AggregatedWeights, HierarchicalAggregator};
pub use judgment::{Judgment, JudgmentSet, JUDGMENT_TOLERANCE, MAX_JUDGMENT, MIN_JUDGMENT};
pub use result::{AhpResult, RankedAlternative};
pub use result_assembler::{ResultAssembler, SolvedGroup};
pub use result_validator::{
    ResultValidator, ValidationIssue, ValidationIssueKind, ValidationReport, SCORE_SUM_TOLERANCE,
};
pub use sensitivity_analyzer::{
    SensitivityAnalyzer, SensitivityReport, DEFAULT_PERTURBATION, MAX_PERTURBATION,
};
pub use weight_solver::WeightSolver;
