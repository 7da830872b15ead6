//! Hierarchical Aggregator - Global weights, composite scores, ranking.

use std::collections::HashMap;

use crate::domain::foundation::NodeId;
use crate::domain::hierarchy::{Hierarchy, HierarchyNode, NodeKind};

use super::RankedAlternative;

/// Global weights and alternative scores for one hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedWeights {
    pub global_weights: HashMap<NodeId, f64>,
    pub scores: HashMap<NodeId, f64>,
    pub ranking: Vec<RankedAlternative>,
}

/// Propagates local weights down the hierarchy and scores alternatives.
pub struct HierarchicalAggregator;

impl HierarchicalAggregator {
    /// Contexts under which alternatives are compared.
    ///
    /// These are the leaf criteria; a hierarchy without criteria compares
    /// alternatives directly under the goal.
    pub fn covering_contexts(hierarchy: &Hierarchy) -> Vec<&HierarchyNode> {
        let leaves = hierarchy.leaf_criteria();
        if leaves.is_empty() {
            vec![hierarchy.root()]
        } else {
            leaves
        }
    }

    /// Aggregates local weights into global weights and composite scores.
    ///
    /// # Algorithm
    /// - goal: global = 1
    /// - criterion: global = parent.global × local
    /// - alternative score = Σ over covering contexts of
    ///   context.global × alternative's local weight under that context
    ///
    /// # Edge Cases
    /// - Missing local weight: treated as 0
    /// - Missing alternative priority: contributes 0
    /// - No alternatives: empty scores and ranking
    pub fn aggregate(
        hierarchy: &Hierarchy,
        local_weights: &HashMap<NodeId, f64>,
        alternative_priorities: &HashMap<NodeId, HashMap<NodeId, f64>>,
    ) -> AggregatedWeights {
        let mut global_weights: HashMap<NodeId, f64> = HashMap::new();

        for node in hierarchy.top_down() {
            let global = match node.kind {
                NodeKind::Goal => 1.0,
                NodeKind::Criterion | NodeKind::SubCriterion => {
                    let parent_global = node
                        .parent_id
                        .as_ref()
                        .and_then(|p| global_weights.get(p))
                        .copied()
                        .unwrap_or(0.0);
                    let local = local_weights.get(&node.id).copied().unwrap_or(0.0);
                    parent_global * local
                }
                // Alternatives are scored below, not propagated.
                NodeKind::Alternative => continue,
            };
            global_weights.insert(node.id.clone(), global);
        }

        let contexts = Self::covering_contexts(hierarchy);
        let mut scores = HashMap::new();
        let mut entries = Vec::new();

        for alternative in hierarchy.alternatives() {
            let score: f64 = contexts
                .iter()
                .map(|context| {
                    let context_global = global_weights.get(&context.id).copied().unwrap_or(0.0);
                    let local = alternative_priorities
                        .get(&context.id)
                        .and_then(|p| p.get(&alternative.id))
                        .copied()
                        .unwrap_or(0.0);
                    context_global * local
                })
                .sum();

            scores.insert(alternative.id.clone(), score);
            entries.push((alternative.id.clone(), alternative.name.clone(), score));
        }

        AggregatedWeights {
            global_weights,
            scores,
            ranking: RankedAlternative::rank(entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ProjectId;

    fn id(s: &str) -> NodeId {
        NodeId::new(s).unwrap()
    }

    fn weights(pairs: &[(&str, f64)]) -> HashMap<NodeId, f64> {
        pairs.iter().map(|(k, v)| (id(k), *v)).collect()
    }

    fn two_level_hierarchy() -> Hierarchy {
        Hierarchy::builder(ProjectId::new())
            .goal("goal", "Pick a supplier")
            .criterion("quality", "Quality", "goal")
            .criterion("cost", "Cost", "goal")
            .sub_criterion("unit", "Unit price", "cost")
            .sub_criterion("shipping", "Shipping", "cost")
            .alternative("acme", "Acme")
            .alternative("globex", "Globex")
            .build()
            .unwrap()
    }

    #[test]
    fn global_weight_is_product_of_local_weights() {
        let h = two_level_hierarchy();
        let local = weights(&[
            ("quality", 0.6),
            ("cost", 0.4),
            ("unit", 0.75),
            ("shipping", 0.25),
        ]);

        let result = HierarchicalAggregator::aggregate(&h, &local, &HashMap::new());

        assert_eq!(result.global_weights[&id("goal")], 1.0);
        assert!((result.global_weights[&id("unit")] - 0.3).abs() < 1e-12);
        assert!((result.global_weights[&id("shipping")] - 0.1).abs() < 1e-12);
        assert!(!result.global_weights.contains_key(&id("acme")));
    }

    #[test]
    fn scores_sum_over_covering_criteria() {
        let h = two_level_hierarchy();
        let local = weights(&[
            ("quality", 0.6),
            ("cost", 0.4),
            ("unit", 0.75),
            ("shipping", 0.25),
        ]);
        let mut priorities = HashMap::new();
        priorities.insert(id("quality"), weights(&[("acme", 0.8), ("globex", 0.2)]));
        priorities.insert(id("unit"), weights(&[("acme", 0.5), ("globex", 0.5)]));
        priorities.insert(id("shipping"), weights(&[("acme", 0.0), ("globex", 1.0)]));

        let result = HierarchicalAggregator::aggregate(&h, &local, &priorities);

        // acme = 0.6*0.8 + 0.3*0.5 + 0.1*0 = 0.63
        assert!((result.scores[&id("acme")] - 0.63).abs() < 1e-12);
        assert!((result.scores[&id("globex")] - 0.37).abs() < 1e-12);
        assert_eq!(result.ranking[0].alternative_id, id("acme"));
        assert_eq!(result.ranking[1].rank, 2);
    }

    #[test]
    fn hierarchy_without_criteria_scores_under_goal() {
        let h = Hierarchy::builder(ProjectId::new())
            .goal("goal", "Lunch")
            .alternative("pizza", "Pizza")
            .alternative("salad", "Salad")
            .build()
            .unwrap();
        let mut priorities = HashMap::new();
        priorities.insert(id("goal"), weights(&[("pizza", 0.7), ("salad", 0.3)]));

        let result = HierarchicalAggregator::aggregate(&h, &HashMap::new(), &priorities);

        assert_eq!(HierarchicalAggregator::covering_contexts(&h).len(), 1);
        assert!((result.scores[&id("pizza")] - 0.7).abs() < 1e-12);
    }

    #[test]
    fn no_alternatives_yields_empty_ranking() {
        let h = Hierarchy::builder(ProjectId::new())
            .goal("goal", "Goal")
            .criterion("c1", "C1", "goal")
            .build()
            .unwrap();

        let result = HierarchicalAggregator::aggregate(&h, &weights(&[("c1", 1.0)]), &HashMap::new());
        assert!(result.scores.is_empty());
        assert!(result.ranking.is_empty());
    }
}
