//! Group Aggregator - Combines individual evaluators into one decision.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::domain::foundation::{AhpError, EvaluatorId, NodeId, Timestamp};

use super::{statistics, AhpResult, MatrixCompleteness, RankedAlternative};

/// Guard below which a mean is treated as zero.
const MEAN_EPSILON: f64 = 1e-12;

/// Score variance is scaled by this before being subtracted from 1.
const CONSENSUS_VARIANCE_SCALE: f64 = 10.0;

/// Evaluators deviating by more than this many standard deviations are outliers.
const OUTLIER_STD_DEVS: f64 = 2.0;

/// How much evaluators disagree about one alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disagreement {
    pub alternative_id: NodeId,
    pub alternative_name: String,
    pub mean_score: f64,
    pub std_dev: f64,
    /// std_dev / mean (0 when the mean is 0).
    pub coefficient_of_variation: f64,
    pub outlier_evaluators: Vec<EvaluatorId>,
}

/// Individual results plus their aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAggregationResult {
    pub individual_results: Vec<AhpResult>,
    pub aggregated: AhpResult,
    /// 1 = full agreement, 0 = strong disagreement.
    pub consensus_level: f64,
    /// Sorted by coefficient of variation, highest first.
    pub disagreements: Vec<Disagreement>,
}

impl GroupAggregationResult {
    /// Alternatives where at least one evaluator is an outlier.
    pub fn contested_alternatives(&self) -> Vec<&Disagreement> {
        self.disagreements
            .iter()
            .filter(|d| !d.outlier_evaluators.is_empty())
            .collect()
    }
}

/// Geometric-mean group aggregation.
pub struct GroupAggregator;

impl GroupAggregator {
    /// Aggregates individual results for the same project.
    ///
    /// # Algorithm
    /// - Alternative scores: geometric mean across evaluators (non-positive
    ///   values excluded), renormalized to sum to 1
    /// - Local weights: geometric mean, renormalized within each sibling group;
    ///   global weights are recomputed from them top-down
    /// - Alternative priorities: geometric mean, renormalized per context
    /// - Per-context CR: arithmetic mean
    /// - Consensus = clamp(1 − 10 × mean per-alternative score variance, 0, 1)
    /// - Disagreement: coefficient of variation and > 2σ outliers per alternative
    ///
    /// # Errors
    /// - `AhpError::EmptyGroup` for an empty input
    /// - `AhpError::ProjectMismatch` if results come from different projects
    pub fn aggregate(results: Vec<AhpResult>) -> Result<GroupAggregationResult, AhpError> {
        let first = results.first().ok_or(AhpError::EmptyGroup)?;
        let project_id = first.project_id;
        if let Some(other) = results.iter().find(|r| r.project_id != project_id) {
            return Err(AhpError::ProjectMismatch {
                expected: project_id,
                found: other.project_id,
            });
        }

        let alternatives = Self::alternative_order(&results);

        let mut group_scores = Vec::with_capacity(alternatives.len());
        let mut variances = Vec::with_capacity(alternatives.len());
        let mut disagreements = Vec::with_capacity(alternatives.len());

        for (alternative_id, name) in &alternatives {
            let per_evaluator: Vec<(Option<&EvaluatorId>, f64)> = results
                .iter()
                .filter_map(|r| {
                    r.scores
                        .get(alternative_id)
                        .map(|s| (r.evaluator_id.as_ref(), *s))
                })
                .collect();
            let values: Vec<f64> = per_evaluator.iter().map(|(_, s)| *s).collect();

            group_scores.push(statistics::geometric_mean(&values));
            variances.push(statistics::variance(&values));
            disagreements.push(Self::disagreement(alternative_id, name, &per_evaluator));
        }

        statistics::normalize(&mut group_scores);
        let entries: Vec<(NodeId, String, f64)> = alternatives
            .iter()
            .zip(&group_scores)
            .map(|((id, name), score)| (id.clone(), name.clone(), *score))
            .collect();
        let scores: HashMap<NodeId, f64> =
            entries.iter().map(|(id, _, score)| (id.clone(), *score)).collect();

        let consensus_level = if variances.is_empty() {
            1.0
        } else {
            (1.0 - CONSENSUS_VARIANCE_SCALE * statistics::mean(&variances)).clamp(0.0, 1.0)
        };

        disagreements.sort_by(|a, b| {
            b.coefficient_of_variation
                .partial_cmp(&a.coefficient_of_variation)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let consistency_ratios = Self::mean_by_key(results.iter().map(|r| &r.consistency_ratios));
        let overall: Vec<f64> = results.iter().map(|r| r.overall_consistency_ratio).collect();
        let criteria_groups = Self::criteria_groups(&results);
        let (local_weights, global_weights) = Self::group_weights(&results, &criteria_groups);

        let aggregated = AhpResult {
            project_id,
            evaluator_id: None,
            alternatives: alternatives.into_iter().map(|(id, _)| id).collect(),
            criteria_groups,
            local_weights,
            global_weights,
            alternative_priorities: Self::aggregate_priorities(&results),
            scores,
            ranking: RankedAlternative::rank(entries),
            consistency_ratios,
            overall_consistency_ratio: statistics::mean(&overall),
            completeness: Self::weakest_completeness(&results),
            computed_at: Timestamp::now(),
        };

        debug!(
            project_id = %project_id,
            evaluators = results.len(),
            consensus_level,
            "Aggregated group AHP result"
        );

        Ok(GroupAggregationResult {
            individual_results: results,
            aggregated,
            consensus_level,
            disagreements,
        })
    }

    /// Alternatives in hierarchy order, named from the individual rankings.
    ///
    /// Independent of the order of `results`, so ties rank the same way
    /// however the group is listed.
    fn alternative_order(results: &[AhpResult]) -> Vec<(NodeId, String)> {
        let names: HashMap<&NodeId, &str> = results
            .iter()
            .flat_map(|r| r.ranking.iter())
            .map(|r| (&r.alternative_id, r.name.as_str()))
            .collect();
        let mut seen = HashSet::new();
        results
            .iter()
            .flat_map(|r| r.alternatives.iter())
            .filter(|id| seen.insert((*id).clone()))
            .map(|id| {
                let name = names
                    .get(id)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| id.to_string());
                (id.clone(), name)
            })
            .collect()
    }

    fn criteria_groups(results: &[AhpResult]) -> HashMap<NodeId, Vec<NodeId>> {
        let mut groups = HashMap::new();
        for result in results {
            for (context, children) in &result.criteria_groups {
                groups
                    .entry(context.clone())
                    .or_insert_with(|| children.clone());
            }
        }
        groups
    }

    /// Local weights renormalized per sibling group, plus the global
    /// weights they imply.
    fn group_weights(
        results: &[AhpResult],
        groups: &HashMap<NodeId, Vec<NodeId>>,
    ) -> (HashMap<NodeId, f64>, HashMap<NodeId, f64>) {
        let mut local = Self::geometric_by_key(results.iter().map(|r| &r.local_weights));
        for children in groups.values() {
            let mut weights: Vec<f64> = children
                .iter()
                .map(|c| local.get(c).copied().unwrap_or(0.0))
                .collect();
            statistics::normalize(&mut weights);
            for (child, weight) in children.iter().zip(weights) {
                local.insert(child.clone(), weight);
            }
        }

        // Nodes outside every sibling group are roots (the goal).
        let grouped: HashSet<&NodeId> = groups.values().flatten().collect();
        let mut pending: Vec<NodeId> = local
            .keys()
            .filter(|id| !grouped.contains(id))
            .cloned()
            .collect();
        let mut global: HashMap<NodeId, f64> = pending
            .iter()
            .map(|id| (id.clone(), local.get(id).copied().unwrap_or(0.0)))
            .collect();

        while let Some(parent) = pending.pop() {
            let parent_global = global.get(&parent).copied().unwrap_or(0.0);
            if let Some(children) = groups.get(&parent) {
                for child in children {
                    let weight = local.get(child).copied().unwrap_or(0.0);
                    global.insert(child.clone(), parent_global * weight);
                    pending.push(child.clone());
                }
            }
        }

        (local, global)
    }

    fn disagreement(
        alternative_id: &NodeId,
        name: &str,
        per_evaluator: &[(Option<&EvaluatorId>, f64)],
    ) -> Disagreement {
        let values: Vec<f64> = per_evaluator.iter().map(|(_, s)| *s).collect();
        let mean_score = statistics::mean(&values);
        let std_dev = statistics::std_dev(&values);
        let coefficient_of_variation = if mean_score.abs() < MEAN_EPSILON {
            0.0
        } else {
            std_dev / mean_score
        };

        let outlier_evaluators = if std_dev > 0.0 {
            per_evaluator
                .iter()
                .filter(|(_, s)| (s - mean_score).abs() > OUTLIER_STD_DEVS * std_dev)
                .filter_map(|(e, _)| (*e).cloned())
                .collect()
        } else {
            Vec::new()
        };

        Disagreement {
            alternative_id: alternative_id.clone(),
            alternative_name: name.to_string(),
            mean_score,
            std_dev,
            coefficient_of_variation,
            outlier_evaluators,
        }
    }

    /// Collects values per key across maps, keeping first-seen key order.
    fn collect_by_key<'a>(
        maps: impl Iterator<Item = &'a HashMap<NodeId, f64>>,
    ) -> Vec<(NodeId, Vec<f64>)> {
        let mut order: Vec<NodeId> = Vec::new();
        let mut values: HashMap<NodeId, Vec<f64>> = HashMap::new();
        for map in maps {
            let mut keys: Vec<&NodeId> = map.keys().collect();
            keys.sort();
            for key in keys {
                let entry = values.entry(key.clone()).or_insert_with(|| {
                    order.push(key.clone());
                    Vec::new()
                });
                entry.push(map[key]);
            }
        }
        order
            .into_iter()
            .map(|k| {
                let v = values.remove(&k).unwrap_or_default();
                (k, v)
            })
            .collect()
    }

    fn geometric_by_key<'a>(
        maps: impl Iterator<Item = &'a HashMap<NodeId, f64>>,
    ) -> HashMap<NodeId, f64> {
        Self::collect_by_key(maps)
            .into_iter()
            .map(|(k, v)| (k, statistics::geometric_mean(&v)))
            .collect()
    }

    fn mean_by_key<'a>(
        maps: impl Iterator<Item = &'a HashMap<NodeId, f64>>,
    ) -> HashMap<NodeId, f64> {
        Self::collect_by_key(maps)
            .into_iter()
            .map(|(k, v)| (k, statistics::mean(&v)))
            .collect()
    }

    fn aggregate_priorities(results: &[AhpResult]) -> HashMap<NodeId, HashMap<NodeId, f64>> {
        let contexts: HashSet<&NodeId> = results
            .iter()
            .flat_map(|r| r.alternative_priorities.keys())
            .collect();
        contexts
            .into_iter()
            .map(|context| {
                let (ids, mut weights): (Vec<NodeId>, Vec<f64>) = Self::geometric_by_key(
                    results
                        .iter()
                        .filter_map(|r| r.alternative_priorities.get(context)),
                )
                .into_iter()
                .unzip();
                statistics::normalize(&mut weights);
                (context.clone(), ids.into_iter().zip(weights).collect())
            })
            .collect()
    }

    /// Per context, the evaluator with the fewest judged pairs.
    fn weakest_completeness(results: &[AhpResult]) -> HashMap<NodeId, MatrixCompleteness> {
        let mut merged: HashMap<NodeId, MatrixCompleteness> = HashMap::new();
        for result in results {
            for (context, completeness) in &result.completeness {
                merged
                    .entry(context.clone())
                    .and_modify(|c| {
                        if completeness.missing_pairs() > c.missing_pairs() {
                            *c = *completeness;
                        }
                    })
                    .or_insert(*completeness);
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::{
        Judgment, JudgmentSet, ResultAssembler, ResultValidator, ValidationIssueKind,
    };
    use crate::domain::foundation::ProjectId;
    use crate::domain::hierarchy::Hierarchy;

    fn id(s: &str) -> NodeId {
        NodeId::new(s).unwrap()
    }

    fn individual(project_id: ProjectId, evaluator: &str, scores: &[(&str, f64)]) -> AhpResult {
        let score_map: HashMap<NodeId, f64> = scores.iter().map(|(k, v)| (id(k), *v)).collect();
        let ranking = RankedAlternative::rank(
            scores
                .iter()
                .map(|(k, v)| (id(k), k.to_uppercase(), *v))
                .collect(),
        );
        let mut consistency_ratios = HashMap::new();
        consistency_ratios.insert(id("goal"), 0.04);
        AhpResult {
            project_id,
            evaluator_id: Some(EvaluatorId::new(evaluator).unwrap()),
            alternatives: scores.iter().map(|(k, _)| id(k)).collect(),
            criteria_groups: HashMap::new(),
            local_weights: HashMap::new(),
            global_weights: HashMap::new(),
            alternative_priorities: HashMap::new(),
            scores: score_map,
            ranking,
            consistency_ratios,
            overall_consistency_ratio: 0.04,
            completeness: HashMap::new(),
            computed_at: Timestamp::now(),
        }
    }

    fn two_alternative_hierarchy(project: ProjectId) -> Hierarchy {
        Hierarchy::builder(project)
            .goal("goal", "Choose")
            .criterion("price", "Price", "goal")
            .criterion("battery", "Battery", "goal")
            .alternative("x", "X")
            .alternative("y", "Y")
            .build()
            .unwrap()
    }

    fn evaluator_favouring(
        evaluator: &str,
        price_over_battery: f64,
        x_over_y: f64,
    ) -> Vec<Judgment> {
        let e = EvaluatorId::new(evaluator).unwrap();
        vec![
            Judgment::new(e.clone(), id("price"), id("battery"), id("goal"), price_over_battery),
            Judgment::new(e.clone(), id("x"), id("y"), id("price"), x_over_y),
            Judgment::new(e, id("x"), id("y"), id("battery"), x_over_y),
        ]
    }

    fn assemble(hierarchy: &Hierarchy, judgments: Vec<Judgment>, evaluator: &str) -> AhpResult {
        let set = JudgmentSet::new(judgments);
        ResultAssembler::compute_individual(hierarchy, &set, &EvaluatorId::new(evaluator).unwrap())
            .unwrap()
    }

    #[test]
    fn empty_group_is_rejected() {
        assert_eq!(GroupAggregator::aggregate(vec![]).unwrap_err(), AhpError::EmptyGroup);
    }

    #[test]
    fn mixed_projects_are_rejected() {
        let results = vec![
            individual(ProjectId::new(), "alice", &[("x", 0.5)]),
            individual(ProjectId::new(), "bob", &[("x", 0.5)]),
        ];
        assert!(matches!(
            GroupAggregator::aggregate(results),
            Err(AhpError::ProjectMismatch { .. })
        ));
    }

    #[test]
    fn identical_scores_give_full_consensus() {
        let project = ProjectId::new();
        let results = vec![
            individual(project, "alice", &[("x", 0.5), ("y", 0.5)]),
            individual(project, "bob", &[("x", 0.5), ("y", 0.5)]),
        ];

        let group = GroupAggregator::aggregate(results).unwrap();

        assert!((group.aggregated.scores[&id("x")] - 0.5).abs() < 1e-12);
        assert_eq!(group.consensus_level, 1.0);
        assert!(group.aggregated.is_group());
        assert_eq!(group.individual_results.len(), 2);
    }

    #[test]
    fn group_scores_are_normalized_geometric_means() {
        let project = ProjectId::new();
        let results = vec![
            individual(project, "alice", &[("x", 0.2), ("y", 0.8)]),
            individual(project, "bob", &[("x", 0.8), ("y", 0.2)]),
        ];

        let group = GroupAggregator::aggregate(results).unwrap();

        // Both geometric means are 0.4 before normalizing.
        assert!((group.aggregated.scores[&id("x")] - 0.5).abs() < 1e-12);
        assert!((group.aggregated.scores[&id("y")] - 0.5).abs() < 1e-12);
        assert!((group.aggregated.score_sum() - 1.0).abs() < 1e-12);
        // variance 0.09 per alternative => 1 - 0.9
        assert!((group.consensus_level - 0.1).abs() < 1e-9);
    }

    #[test]
    fn zero_scores_are_excluded_from_geometric_mean() {
        let project = ProjectId::new();
        let results = vec![
            individual(project, "alice", &[("x", 0.0), ("y", 0.52)]),
            individual(project, "bob", &[("x", 0.36), ("y", 0.52)]),
            individual(project, "carol", &[("x", 0.64), ("y", 0.52)]),
        ];

        let group = GroupAggregator::aggregate(results).unwrap();
        assert!((group.aggregated.scores[&id("x")] - 0.48).abs() < 1e-12);
        assert!((group.aggregated.scores[&id("y")] - 0.52).abs() < 1e-12);
    }

    #[test]
    fn opposed_evaluators_aggregate_to_a_valid_result() {
        let project = ProjectId::new();
        let h = two_alternative_hierarchy(project);
        let alice = assemble(&h, evaluator_favouring("alice", 3.0, 9.0), "alice");
        let bob = assemble(&h, evaluator_favouring("bob", 1.0 / 3.0, 1.0 / 9.0), "bob");
        assert!(ResultValidator::validate(&alice).is_valid);
        assert!(ResultValidator::validate(&bob).is_valid);

        let group = GroupAggregator::aggregate(vec![alice, bob]).unwrap();
        let aggregated = &group.aggregated;

        assert!((aggregated.score_sum() - 1.0).abs() < 1e-9);
        assert!((aggregated.scores[&id("x")] - 0.5).abs() < 1e-9);
        let local = &aggregated.local_weights;
        assert!((local[&id("price")] + local[&id("battery")] - 1.0).abs() < 1e-9);
        assert!((aggregated.global_weights[&id("price")] - 0.5).abs() < 1e-9);
        assert_eq!(aggregated.global_weights[&id("goal")], 1.0);
        for priorities in aggregated.alternative_priorities.values() {
            assert!((priorities.values().sum::<f64>() - 1.0).abs() < 1e-9);
        }

        let report = ResultValidator::validate(aggregated);
        assert!(report.is_valid, "{:?}", report.issues);
        assert!(report.issues_of(ValidationIssueKind::ScoreSumDeviation).is_empty());
    }

    #[test]
    fn group_local_weights_renormalize_within_sibling_groups() {
        let project = ProjectId::new();
        let h = two_alternative_hierarchy(project);
        let alice = assemble(&h, evaluator_favouring("alice", 9.0, 1.0), "alice");
        let bob = assemble(&h, evaluator_favouring("bob", 1.0, 1.0), "bob");

        let group = GroupAggregator::aggregate(vec![alice, bob]).unwrap();
        let local = &group.aggregated.local_weights;

        // Geometric means sqrt(0.9 * 0.5) and sqrt(0.1 * 0.5), rescaled.
        let price = (0.45_f64).sqrt();
        let battery = (0.05_f64).sqrt();
        let expected = price / (price + battery);
        assert!((local[&id("price")] - expected).abs() < 1e-9);
        assert!((local[&id("price")] + local[&id("battery")] - 1.0).abs() < 1e-12);
        assert!((group.aggregated.global_weights[&id("price")] - expected).abs() < 1e-9);
    }

    #[test]
    fn tied_group_ranking_ignores_input_order() {
        let project = ProjectId::new();
        let alice = individual(project, "alice", &[("x", 0.9), ("y", 0.1)]);
        let bob = individual(project, "bob", &[("x", 0.1), ("y", 0.9)]);

        let ab = GroupAggregator::aggregate(vec![alice.clone(), bob.clone()]).unwrap();
        let ba = GroupAggregator::aggregate(vec![bob, alice]).unwrap();

        assert_eq!(ab.aggregated.ranked_ids(), ba.aggregated.ranked_ids());
        // Tied scores keep hierarchy order.
        assert_eq!(ab.aggregated.ranked_ids(), vec![id("x"), id("y")]);
        assert_eq!(ab.aggregated.alternatives, vec![id("x"), id("y")]);
    }

    #[test]
    fn consistency_ratios_use_arithmetic_mean() {
        let project = ProjectId::new();
        let mut a = individual(project, "alice", &[("x", 0.5)]);
        let mut b = individual(project, "bob", &[("x", 0.5)]);
        a.consistency_ratios.insert(id("goal"), 0.02);
        b.consistency_ratios.insert(id("goal"), 0.08);
        a.overall_consistency_ratio = 0.02;
        b.overall_consistency_ratio = 0.08;

        let group = GroupAggregator::aggregate(vec![a, b]).unwrap();
        assert!((group.aggregated.consistency_ratios[&id("goal")] - 0.05).abs() < 1e-12);
        assert!((group.aggregated.overall_consistency_ratio - 0.05).abs() < 1e-12);
    }

    #[test]
    fn outlier_evaluator_is_reported() {
        let project = ProjectId::new();
        let mut results: Vec<AhpResult> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|e| individual(project, e, &[("x", 0.3), ("y", 0.7)]))
            .collect();
        results.push(individual(project, "maverick", &[("x", 0.9), ("y", 0.1)]));

        let group = GroupAggregator::aggregate(results).unwrap();

        let x = group
            .disagreements
            .iter()
            .find(|d| d.alternative_id == id("x"))
            .unwrap();
        assert_eq!(x.outlier_evaluators, vec![EvaluatorId::new("maverick").unwrap()]);
        assert!((x.mean_score - 0.4).abs() < 1e-12);
        assert_eq!(group.contested_alternatives().len(), 2);
    }

    #[test]
    fn disagreements_sorted_by_coefficient_of_variation() {
        let project = ProjectId::new();
        let results = vec![
            individual(project, "alice", &[("calm", 0.5), ("wild", 0.1)]),
            individual(project, "bob", &[("calm", 0.5), ("wild", 0.9)]),
        ];

        let group = GroupAggregator::aggregate(results).unwrap();

        assert_eq!(group.disagreements[0].alternative_id, id("wild"));
        assert_eq!(group.disagreements[1].coefficient_of_variation, 0.0);
    }

    #[test]
    fn zero_mean_has_zero_coefficient_of_variation() {
        let project = ProjectId::new();
        let results = vec![
            individual(project, "alice", &[("x", 0.0)]),
            individual(project, "bob", &[("x", 0.0)]),
        ];

        let group = GroupAggregator::aggregate(results).unwrap();
        assert_eq!(group.disagreements[0].coefficient_of_variation, 0.0);
        assert_eq!(group.aggregated.scores[&id("x")], 0.0);
    }
}
