//! AHP result structures.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::{EvaluatorId, NodeId, ProjectId, Timestamp};

use super::MatrixCompleteness;

/// An alternative's place in the final ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAlternative {
    pub alternative_id: NodeId,
    pub name: String,
    pub score: f64,
    /// 1-based position; ties keep their original relative order.
    pub rank: usize,
}

impl RankedAlternative {
    /// Ranks `(id, name, score)` entries by score, highest first.
    ///
    /// The sort is stable, so equal scores keep input order.
    pub fn rank(entries: Vec<(NodeId, String, f64)>) -> Vec<RankedAlternative> {
        let mut entries = entries;
        entries.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (alternative_id, name, score))| RankedAlternative {
                alternative_id,
                name,
                score,
                rank: i + 1,
            })
            .collect()
    }
}

/// The outcome of one AHP computation (an evaluator, or a group aggregate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AhpResult {
    pub project_id: ProjectId,
    /// `None` for a group aggregate.
    pub evaluator_id: Option<EvaluatorId>,
    /// Alternative ids in hierarchy order; equal scores rank in this order.
    pub alternatives: Vec<NodeId>,
    /// Goal/criterion node -> its criterion children, in sibling order.
    pub criteria_groups: HashMap<NodeId, Vec<NodeId>>,
    /// Weight of each goal/criterion node within its sibling group.
    pub local_weights: HashMap<NodeId, f64>,
    /// Weight of each goal/criterion node relative to the goal.
    pub global_weights: HashMap<NodeId, f64>,
    /// Covering criterion -> alternative -> local alternative weight.
    pub alternative_priorities: HashMap<NodeId, HashMap<NodeId, f64>>,
    /// Composite score per alternative.
    pub scores: HashMap<NodeId, f64>,
    pub ranking: Vec<RankedAlternative>,
    /// CR per context node that owns a comparison matrix.
    pub consistency_ratios: HashMap<NodeId, f64>,
    /// Mean of `consistency_ratios`.
    pub overall_consistency_ratio: f64,
    /// Judged vs required pairs per context node.
    pub completeness: HashMap<NodeId, MatrixCompleteness>,
    pub computed_at: Timestamp,
}

impl AhpResult {
    /// Returns true for a group aggregate.
    pub fn is_group(&self) -> bool {
        self.evaluator_id.is_none()
    }

    /// Sum of all alternative scores (≈1 for an individual result).
    pub fn score_sum(&self) -> f64 {
        self.scores.values().sum()
    }

    /// Alternative ids in rank order.
    pub fn ranked_ids(&self) -> Vec<NodeId> {
        self.ranking.iter().map(|r| r.alternative_id.clone()).collect()
    }

    /// Rank of an alternative, if it was ranked.
    pub fn rank_of(&self, alternative_id: &NodeId) -> Option<usize> {
        self.ranking
            .iter()
            .find(|r| &r.alternative_id == alternative_id)
            .map(|r| r.rank)
    }

    /// The top-ranked alternative.
    pub fn best(&self) -> Option<&RankedAlternative> {
        self.ranking.first()
    }

    /// Returns true if any context matrix was only partially judged.
    pub fn is_incomplete(&self) -> bool {
        self.completeness.values().any(|c| !c.is_complete())
    }
}
