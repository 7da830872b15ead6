//! Small descriptive statistics used by group and sensitivity analysis.

use std::collections::HashMap;
use std::hash::Hash;

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance; 0 for an empty slice.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Geometric mean of the positive, finite values.
///
/// Non-positive values are excluded instead of collapsing the product to 0.
/// Returns 0 when nothing positive remains.
pub fn geometric_mean(values: &[f64]) -> f64 {
    let logs: Vec<f64> = values
        .iter()
        .filter(|v| v.is_finite() && **v > 0.0)
        .map(|v| v.ln())
        .collect();
    if logs.is_empty() {
        return 0.0;
    }
    (logs.iter().sum::<f64>() / logs.len() as f64).exp()
}

/// Scales values to sum to 1; left unchanged when the sum is not positive.
pub fn normalize(values: &mut [f64]) {
    let sum: f64 = values.iter().sum();
    if sum > 0.0 && sum.is_finite() {
        for v in values.iter_mut() {
            *v /= sum;
        }
    }
}

/// Kendall's tau-a between two orderings of the same items.
///
/// Items present in only one ordering are ignored. Returns 1 when fewer
/// than two shared items remain.
pub fn kendall_tau<T: Eq + Hash>(baseline: &[T], other: &[T]) -> f64 {
    let other_position: HashMap<&T, usize> =
        other.iter().enumerate().map(|(i, item)| (item, i)).collect();
    let positions: Vec<usize> = baseline
        .iter()
        .filter_map(|item| other_position.get(item).copied())
        .collect();

    let n = positions.len();
    if n < 2 {
        return 1.0;
    }

    let mut concordant = 0i64;
    let mut discordant = 0i64;
    for i in 0..n {
        for j in (i + 1)..n {
            if positions[i] < positions[j] {
                concordant += 1;
            } else {
                discordant += 1;
            }
        }
    }

    let pairs = (n * (n - 1) / 2) as f64;
    (concordant - discordant) as f64 / pairs
}
