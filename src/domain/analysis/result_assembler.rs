//! Individual Result Assembler - One evaluator's full AHP computation.

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::domain::foundation::{AhpError, EvaluatorId, NodeId, Timestamp};
use crate::domain::hierarchy::{Hierarchy, HierarchyNode};

use super::{
    statistics, AhpResult, ComparisonMatrix, ConsistencyEvaluator, HierarchicalAggregator,
    Judgment, JudgmentSet, MatrixCompleteness, WeightSolver, CONSISTENCY_THRESHOLD,
};

/// Solved sibling group: one context node's matrix outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedGroup {
    pub context_id: NodeId,
    /// `(child id, local weight)` in sibling order.
    pub weights: Vec<(NodeId, f64)>,
    pub consistency_ratio: f64,
    pub completeness: MatrixCompleteness,
}

/// Runs matrix building, weight solving, consistency and aggregation
/// for one evaluator across the whole hierarchy.
pub struct ResultAssembler;

impl ResultAssembler {
    /// Computes one evaluator's result.
    ///
    /// Sibling groups are solved top-down, each with its own matrix:
    /// the criteria under every goal/criterion node, then the alternatives
    /// under every covering criterion.
    ///
    /// # Errors
    /// - `AhpError::JudgmentOutOfRange` if any of this evaluator's judgments
    ///   lies outside `[1/9, 9]` (rejected, never clamped)
    ///
    /// # Edge Cases
    /// - Missing judgments default to "equal" and are reported through
    ///   `AhpResult::completeness`
    /// - Single-child groups get local weight 1 and CR 0
    /// - An evaluator with no judgments still gets an all-equal result
    pub fn compute_individual(
        hierarchy: &Hierarchy,
        judgments: &JudgmentSet,
        evaluator_id: &EvaluatorId,
    ) -> Result<AhpResult, AhpError> {
        let own = judgments.for_evaluator(evaluator_id);
        if let Some(bad) = own.iter().find(|j| !j.is_in_range()) {
            warn!(
                evaluator_id = %evaluator_id,
                node_a = %bad.node_a,
                node_b = %bad.node_b,
                value = bad.value,
                "Rejecting judgment outside the 1/9..9 scale"
            );
            return Err(AhpError::JudgmentOutOfRange {
                evaluator_id: evaluator_id.clone(),
                node_a: bad.node_a.clone(),
                node_b: bad.node_b.clone(),
                value: bad.value,
            });
        }

        let mut by_context: HashMap<&NodeId, Vec<&Judgment>> = HashMap::new();
        for judgment in own {
            by_context.entry(&judgment.context_id).or_default().push(judgment);
        }
        let context_judgments =
            |context: &NodeId| by_context.get(context).cloned().unwrap_or_default();

        let mut local_weights = HashMap::new();
        let mut criteria_groups = HashMap::new();
        let mut alternative_priorities = HashMap::new();
        let mut consistency_ratios = HashMap::new();
        let mut completeness = HashMap::new();
        // Solve order; HashMap iteration order is not stable.
        let mut ratios = Vec::new();

        let root = hierarchy.root();
        local_weights.insert(root.id.clone(), 1.0);

        // Criteria groups, parents before children.
        for node in hierarchy.top_down() {
            let group = hierarchy.criterion_children(&node.id);
            if group.is_empty() {
                continue;
            }
            let solved = Self::solve_group(&node.id, &group, &context_judgments(&node.id));
            for (child_id, weight) in &solved.weights {
                local_weights.insert(child_id.clone(), *weight);
            }
            criteria_groups.insert(
                node.id.clone(),
                solved.weights.iter().map(|(id, _)| id.clone()).collect::<Vec<_>>(),
            );
            consistency_ratios.insert(node.id.clone(), solved.consistency_ratio);
            completeness.insert(node.id.clone(), solved.completeness);
            ratios.push(solved.consistency_ratio);
        }

        // Alternative groups, one independent matrix per covering criterion.
        let alternatives = hierarchy.alternatives();
        if !alternatives.is_empty() {
            for context in HierarchicalAggregator::covering_contexts(hierarchy) {
                let solved =
                    Self::solve_group(&context.id, &alternatives, &context_judgments(&context.id));
                alternative_priorities.insert(
                    context.id.clone(),
                    solved.weights.into_iter().collect::<HashMap<_, _>>(),
                );
                consistency_ratios.insert(context.id.clone(), solved.consistency_ratio);
                completeness.insert(context.id.clone(), solved.completeness);
                ratios.push(solved.consistency_ratio);
            }
        }

        let aggregated =
            HierarchicalAggregator::aggregate(hierarchy, &local_weights, &alternative_priorities);

        let overall_consistency_ratio = statistics::mean(&ratios);

        debug!(
            evaluator_id = %evaluator_id,
            project_id = %hierarchy.project_id(),
            contexts = consistency_ratios.len(),
            overall_cr = overall_consistency_ratio,
            "Assembled individual AHP result"
        );

        Ok(AhpResult {
            project_id: hierarchy.project_id(),
            evaluator_id: Some(evaluator_id.clone()),
            alternatives: alternatives.iter().map(|n| n.id.clone()).collect(),
            criteria_groups,
            local_weights,
            global_weights: aggregated.global_weights,
            alternative_priorities,
            scores: aggregated.scores,
            ranking: aggregated.ranking,
            consistency_ratios,
            overall_consistency_ratio,
            completeness,
            computed_at: Timestamp::now(),
        })
    }

    /// Builds, solves and checks one sibling group's matrix.
    pub fn solve_group(
        context_id: &NodeId,
        siblings: &[&HierarchyNode],
        judgments: &[&Judgment],
    ) -> SolvedGroup {
        let ids: Vec<NodeId> = siblings.iter().map(|n| n.id.clone()).collect();
        let matrix = ComparisonMatrix::from_judgments(&ids, judgments.iter().copied());
        let weights = WeightSolver::solve(&matrix);
        let consistency_ratio = ConsistencyEvaluator::consistency_ratio(&matrix, &weights);

        if consistency_ratio > CONSISTENCY_THRESHOLD {
            warn!(
                context_id = %context_id,
                consistency_ratio,
                "Sibling group judgments are inconsistent"
            );
        }
        debug!(
            context_id = %context_id,
            size = matrix.size(),
            consistency_ratio,
            "Solved sibling group"
        );

        SolvedGroup {
            context_id: context_id.clone(),
            weights: ids.into_iter().zip(weights).collect(),
            consistency_ratio,
            completeness: matrix.completeness(),
        }
    }
}
