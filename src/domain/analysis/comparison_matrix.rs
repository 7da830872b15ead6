//! Comparison Matrix - Reciprocal matrix over one sibling group.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::domain::foundation::NodeId;

use super::Judgment;

/// How many of a sibling group's pairs were actually judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixCompleteness {
    pub judged_pairs: usize,
    pub required_pairs: usize,
}

impl MatrixCompleteness {
    /// Returns true if every unordered pair has a judgment.
    pub fn is_complete(&self) -> bool {
        self.judged_pairs >= self.required_pairs
    }

    /// Pairs that defaulted to "equal".
    pub fn missing_pairs(&self) -> usize {
        self.required_pairs.saturating_sub(self.judged_pairs)
    }
}

/// Square reciprocal matrix: diagonal 1, `m[i][j] * m[j][i] == 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMatrix {
    ids: Vec<NodeId>,
    values: Vec<Vec<f64>>,
    judged_pairs: usize,
}

impl ComparisonMatrix {
    /// All-equal matrix over the given ids.
    pub fn identity(ids: Vec<NodeId>) -> Self {
        let n = ids.len();
        Self {
            ids,
            values: vec![vec![1.0; n]; n],
            judged_pairs: 0,
        }
    }

    /// Builds the matrix for one sibling group.
    ///
    /// `judgments` should already be filtered to one evaluator and one
    /// context node.
    ///
    /// # Edge Cases
    /// - Unjudged pairs default to 1 ("equal"); see [`Self::completeness`]
    /// - Judgments naming a node outside `sibling_ids` are ignored
    /// - Self-comparisons and non-positive or non-finite values are ignored
    /// - A later judgment on the same pair replaces an earlier one
    /// - Empty `sibling_ids` yields a 0x0 matrix
    pub fn from_judgments<'a>(
        sibling_ids: &[NodeId],
        judgments: impl IntoIterator<Item = &'a Judgment>,
    ) -> Self {
        let mut matrix = Self::identity(sibling_ids.to_vec());
        let position: HashMap<&NodeId, usize> = sibling_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id, i))
            .collect();
        let mut judged = HashSet::new();

        for judgment in judgments {
            let (Some(&i), Some(&j)) = (position.get(&judgment.node_a), position.get(&judgment.node_b))
            else {
                continue;
            };
            if i == j || !judgment.value.is_finite() || judgment.value <= 0.0 {
                continue;
            }
            matrix.values[i][j] = judgment.value;
            matrix.values[j][i] = 1.0 / judgment.value;
            judged.insert((i.min(j), i.max(j)));
        }

        matrix.judged_pairs = judged.len();
        matrix
    }

    /// Returns the matrix order.
    pub fn size(&self) -> usize {
        self.ids.len()
    }

    /// Returns true for a 0x0 matrix.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Row/column ids in matrix order.
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// Entry `[i][j]`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    /// Judged vs required unordered pairs.
    pub fn completeness(&self) -> MatrixCompleteness {
        let n = self.size();
        MatrixCompleteness {
            judged_pairs: self.judged_pairs,
            required_pairs: n * n.saturating_sub(1) / 2,
        }
    }

    /// Checks `m[i][j] * m[j][i] == 1` for every pair within `tolerance`.
    pub fn is_reciprocal(&self, tolerance: f64) -> bool {
        let n = self.size();
        (0..n).all(|i| {
            (0..n).all(|j| (self.values[i][j] * self.values[j][i] - 1.0).abs() <= tolerance)
        })
    }
}
