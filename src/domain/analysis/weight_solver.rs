//! Weight Solver - Priority vector from a comparison matrix.

use super::ComparisonMatrix;

/// Derives priority vectors with the normalized-column-sum method.
pub struct WeightSolver;

impl WeightSolver {
    /// Computes the priority vector of a reciprocal matrix.
    ///
    /// # Algorithm
    /// 1. Sum each column
    /// 2. Divide every entry by its column sum
    /// 3. Weight of row i = average of normalized row i
    ///
    /// Matches the principal eigenvector exactly for consistent matrices and
    /// approximates it otherwise.
    ///
    /// # Edge Cases
    /// - 0x0 matrix: Returns empty Vec
    /// - 1x1 matrix: Returns `[1.0]`
    /// - Zero column sum (cannot occur for positive entries): column skipped
    pub fn solve(matrix: &ComparisonMatrix) -> Vec<f64> {
        let n = matrix.size();
        match n {
            0 => return Vec::new(),
            1 => return vec![1.0],
            _ => {}
        }

        let column_sums: Vec<f64> = (0..n)
            .map(|j| (0..n).map(|i| matrix.get(i, j)).sum())
            .collect();

        let mut weights: Vec<f64> = (0..n)
            .map(|i| {
                let normalized_row: f64 = (0..n)
                    .filter(|&j| column_sums[j] > 0.0)
                    .map(|j| matrix.get(i, j) / column_sums[j])
                    .sum();
                normalized_row / n as f64
            })
            .collect();

        let total: f64 = weights.iter().sum();
        if total > 0.0 && total.is_finite() {
            weights.iter_mut().for_each(|w| *w /= total);
        } else {
            weights = vec![1.0 / n as f64; n];
        }
        weights
    }
}
