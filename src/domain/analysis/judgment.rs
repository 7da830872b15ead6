//! Judgments - Directed pairwise comparisons on the Saaty 1/9..9 scale.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::foundation::{AhpError, EvaluatorId, NodeId};

/// Smallest admissible ratio ("extremely less important").
pub const MIN_JUDGMENT: f64 = 1.0 / 9.0;

/// Largest admissible ratio ("extremely more important").
pub const MAX_JUDGMENT: f64 = 9.0;

/// Float slack when checking the scale bounds.
pub const JUDGMENT_TOLERANCE: f64 = 1e-9;

/// "a is `value` times as important as b" under `context_id`.
///
/// Only one direction is stored; the reciprocal is implied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    pub evaluator_id: EvaluatorId,
    pub node_a: NodeId,
    pub node_b: NodeId,
    /// Parent node the comparison was made under.
    pub context_id: NodeId,
    pub value: f64,
}

impl Judgment {
    /// Creates a new judgment.
    pub fn new(
        evaluator_id: EvaluatorId,
        node_a: NodeId,
        node_b: NodeId,
        context_id: NodeId,
        value: f64,
    ) -> Self {
        Self {
            evaluator_id,
            node_a,
            node_b,
            context_id,
            value,
        }
    }

    /// The implied b-over-a ratio.
    pub fn reciprocal_value(&self) -> f64 {
        1.0 / self.value
    }

    /// True if `node` is either side of the comparison.
    pub fn involves(&self, node: &NodeId) -> bool {
        &self.node_a == node || &self.node_b == node
    }

    /// True if the value is finite and within `[1/9, 9]`.
    pub fn is_in_range(&self) -> bool {
        self.value.is_finite()
            && self.value >= MIN_JUDGMENT - JUDGMENT_TOLERANCE
            && self.value <= MAX_JUDGMENT + JUDGMENT_TOLERANCE
    }

    /// Clamps a ratio back onto the scale.
    pub fn clamp_to_scale(value: f64) -> f64 {
        if value.is_nan() {
            return 1.0;
        }
        value.clamp(MIN_JUDGMENT, MAX_JUDGMENT)
    }
}

/// An evaluator-agnostic collection of judgments for one project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JudgmentSet {
    judgments: Vec<Judgment>,
}

impl JudgmentSet {
    /// Wraps a list of judgments.
    pub fn new(judgments: Vec<Judgment>) -> Self {
        Self { judgments }
    }

    /// Creates an empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends a judgment as the evaluator answers another prompt.
    pub fn record(&mut self, judgment: Judgment) {
        self.judgments.push(judgment);
    }

    /// All judgments in recording order.
    pub fn as_slice(&self) -> &[Judgment] {
        &self.judgments
    }

    /// Iterates judgments in recording order.
    pub fn iter(&self) -> std::slice::Iter<'_, Judgment> {
        self.judgments.iter()
    }

    /// Returns the number of judgments.
    pub fn len(&self) -> usize {
        self.judgments.len()
    }

    /// Returns true if no judgments are recorded.
    pub fn is_empty(&self) -> bool {
        self.judgments.is_empty()
    }

    /// Judgments made by one evaluator.
    pub fn for_evaluator(&self, evaluator_id: &EvaluatorId) -> Vec<&Judgment> {
        self.judgments
            .iter()
            .filter(|j| &j.evaluator_id == evaluator_id)
            .collect()
    }

    /// Judgments made by one evaluator under one context node.
    pub fn for_context(&self, evaluator_id: &EvaluatorId, context_id: &NodeId) -> Vec<&Judgment> {
        self.judgments
            .iter()
            .filter(|j| &j.evaluator_id == evaluator_id && &j.context_id == context_id)
            .collect()
    }

    /// Distinct evaluators, in first-seen order.
    pub fn evaluators(&self) -> Vec<EvaluatorId> {
        let mut seen = HashSet::new();
        self.judgments
            .iter()
            .filter(|j| seen.insert(j.evaluator_id.clone()))
            .map(|j| j.evaluator_id.clone())
            .collect()
    }

    /// Rejects the first judgment whose value is off the 1/9..9 scale.
    pub fn validate_range(&self) -> Result<(), AhpError> {
        match self.judgments.iter().find(|j| !j.is_in_range()) {
            Some(j) => Err(AhpError::JudgmentOutOfRange {
                evaluator_id: j.evaluator_id.clone(),
                node_a: j.node_a.clone(),
                node_b: j.node_b.clone(),
                value: j.value,
            }),
            None => Ok(()),
        }
    }
}

impl From<Vec<Judgment>> for JudgmentSet {
    fn from(judgments: Vec<Judgment>) -> Self {
        Self::new(judgments)
    }
}

impl FromIterator<Judgment> for JudgmentSet {
    fn from_iter<I: IntoIterator<Item = Judgment>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a JudgmentSet {
    type Item = &'a Judgment;
    type IntoIter = std::slice::Iter<'a, Judgment>;

    fn into_iter(self) -> Self::IntoIter {
        self.judgments.iter()
    }
}
