//! Sensitivity Analyzer - Ranking stability under judgment perturbation.
//!
//! Perturbation is random: two runs with different random sources can
//! produce different reports. Pass a seeded RNG for reproducible output.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::foundation::{AhpError, EvaluatorId, NodeId};
use crate::domain::hierarchy::Hierarchy;

use super::{statistics, AhpResult, GroupAggregator, Judgment, JudgmentSet, ResultAssembler};

/// Perturbation fraction used when none is given.
pub const DEFAULT_PERTURBATION: f64 = 0.1;

/// Upper bound on the perturbation fraction; keeps factors positive.
pub const MAX_PERTURBATION: f64 = 0.99;

/// Ranking stability when one criterion's judgments are perturbed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityReport {
    pub criterion_id: NodeId,
    pub criterion_name: String,
    pub original_weight: f64,
    pub perturbed_weight: f64,
    /// Kendall's tau against the baseline ranking: 1 identical, −1 reversed.
    pub rank_stability: f64,
    /// Alternatives whose rank changed.
    pub affected_alternatives: Vec<NodeId>,
}

impl SensitivityReport {
    /// True if the perturbation left the ranking untouched.
    pub fn is_stable(&self) -> bool {
        self.affected_alternatives.is_empty()
    }
}

/// Perturbs judgments per criterion and measures ranking stability.
pub struct SensitivityAnalyzer;

impl SensitivityAnalyzer {
    /// Runs the analysis with a thread-local random source.
    pub fn analyze(
        baseline: &AhpResult,
        hierarchy: &Hierarchy,
        judgments: &JudgmentSet,
        perturbation: Option<f64>,
    ) -> Result<Vec<SensitivityReport>, AhpError> {
        Self::analyze_with_rng(
            baseline,
            hierarchy,
            judgments,
            perturbation,
            &mut rand::thread_rng(),
        )
    }

    /// Runs the analysis with an injected random source.
    ///
    /// # Algorithm
    /// For each criterion node:
    /// 1. Multiply every judgment naming that node by a factor drawn from
    ///    `[1 − p, 1 + p]`, clamped back onto the 1/9..9 scale
    /// 2. Recompute the result (re-aggregating when the baseline is a group)
    /// 3. Compare the new ranking with the baseline using Kendall's tau
    ///
    /// Reports are sorted least-stable first.
    ///
    /// # Edge Cases
    /// - `perturbation` missing or non-finite: [`DEFAULT_PERTURBATION`]
    /// - `perturbation` outside `[0, 0.99]`: clamped
    /// - Group baseline with no judgments: `AhpError::NoEvaluators`
    pub fn analyze_with_rng<R: Rng + ?Sized>(
        baseline: &AhpResult,
        hierarchy: &Hierarchy,
        judgments: &JudgmentSet,
        perturbation: Option<f64>,
        rng: &mut R,
    ) -> Result<Vec<SensitivityReport>, AhpError> {
        let p = Self::effective_perturbation(perturbation);
        let evaluators = match &baseline.evaluator_id {
            Some(evaluator_id) => vec![evaluator_id.clone()],
            None => judgments.evaluators(),
        };
        if evaluators.is_empty() {
            return Err(AhpError::NoEvaluators);
        }

        let baseline_order = baseline.ranked_ids();
        let mut reports = Vec::new();

        for criterion in hierarchy.criteria() {
            let perturbed: JudgmentSet = judgments
                .iter()
                .map(|j| {
                    let mut j = j.clone();
                    if evaluators.contains(&j.evaluator_id) && j.involves(&criterion.id) {
                        let factor = rng.gen_range((1.0 - p)..=(1.0 + p));
                        j.value = Judgment::clamp_to_scale(j.value * factor);
                    }
                    j
                })
                .collect();

            let recomputed = Self::recompute(hierarchy, &perturbed, &evaluators)?;
            let new_order = recomputed.ranked_ids();

            let affected_alternatives = baseline_order
                .iter()
                .filter(|alt| baseline.rank_of(alt) != recomputed.rank_of(alt))
                .cloned()
                .collect();

            reports.push(SensitivityReport {
                criterion_id: criterion.id.clone(),
                criterion_name: criterion.name.clone(),
                original_weight: baseline
                    .global_weights
                    .get(&criterion.id)
                    .copied()
                    .unwrap_or(0.0),
                perturbed_weight: recomputed
                    .global_weights
                    .get(&criterion.id)
                    .copied()
                    .unwrap_or(0.0),
                rank_stability: statistics::kendall_tau(&baseline_order, &new_order),
                affected_alternatives,
            });
        }

        reports.sort_by(|a, b| {
            a.rank_stability
                .partial_cmp(&b.rank_stability)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!(
            project_id = %baseline.project_id,
            criteria = reports.len(),
            perturbation = p,
            "Completed sensitivity analysis"
        );

        Ok(reports)
    }

    fn effective_perturbation(perturbation: Option<f64>) -> f64 {
        match perturbation {
            Some(p) if p.is_finite() => p.clamp(0.0, MAX_PERTURBATION),
            _ => DEFAULT_PERTURBATION,
        }
    }

    fn recompute(
        hierarchy: &Hierarchy,
        judgments: &JudgmentSet,
        evaluators: &[EvaluatorId],
    ) -> Result<AhpResult, AhpError> {
        let mut results = evaluators
            .iter()
            .map(|e| ResultAssembler::compute_individual(hierarchy, judgments, e))
            .collect::<Result<Vec<_>, _>>()?;

        if results.len() == 1 {
            return results.pop().ok_or(AhpError::NoEvaluators);
        }
        Ok(GroupAggregator::aggregate(results)?.aggregated)
    }
}
