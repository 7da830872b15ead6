//! Consistency Evaluator - Saaty consistency ratio.

use super::ComparisonMatrix;

/// Saaty random consistency index for matrix orders 1..=10.
pub const RANDOM_INDEX: [f64; 10] = [0.0, 0.0, 0.58, 0.90, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49];

/// CR reported for groups larger than the random-index table.
pub const OVERSIZED_GROUP_CR: f64 = 0.1;

/// Conventional acceptability threshold; applied by the result validator.
pub const CONSISTENCY_THRESHOLD: f64 = 0.1;

/// Consistency ratio computation.
pub struct ConsistencyEvaluator;

impl ConsistencyEvaluator {
    /// Computes CR = CI / RI[n].
    ///
    /// # Algorithm
    /// - λmax = mean over rows of `(Σ_j m[i][j]·w[j]) / w[i]`
    /// - CI = (λmax − n) / (n − 1)
    /// - CR = CI / RI[n]
    ///
    /// # Edge Cases
    /// - n ≤ 2: Returns 0 (always consistent)
    /// - n > 10: Returns [`OVERSIZED_GROUP_CR`]
    /// - Weight vector length mismatch or no positive weights: Returns 0
    /// - Float noise below zero is clamped to 0
    pub fn consistency_ratio(matrix: &ComparisonMatrix, weights: &[f64]) -> f64 {
        let n = matrix.size();
        if n <= 2 {
            return 0.0;
        }
        if n > RANDOM_INDEX.len() {
            return OVERSIZED_GROUP_CR;
        }
        if weights.len() != n {
            return 0.0;
        }

        let ratios: Vec<f64> = (0..n)
            .filter(|&i| weights[i] > 0.0)
            .map(|i| {
                let weighted_sum: f64 = (0..n).map(|j| matrix.get(i, j) * weights[j]).sum();
                weighted_sum / weights[i]
            })
            .collect();
        if ratios.is_empty() {
            return 0.0;
        }

        let lambda_max = ratios.iter().sum::<f64>() / ratios.len() as f64;
        let consistency_index = (lambda_max - n as f64) / (n as f64 - 1.0);
        let cr = consistency_index / RANDOM_INDEX[n - 1];

        if cr.is_finite() {
            cr.max(0.0)
        } else {
            0.0
        }
    }

    /// True if `cr` does not exceed the conventional 0.1 threshold.
    pub fn is_acceptable(cr: f64) -> bool {
        cr <= CONSISTENCY_THRESHOLD
    }
}
