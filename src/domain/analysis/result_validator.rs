//! Result Validator - Advisory sanity checks on a computed result.
//!
//! Nothing here fails a computation. Issues describe what looks wrong and
//! recommendations describe what to do about it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::foundation::NodeId;

use super::{AhpResult, CONSISTENCY_THRESHOLD};

/// Maximum allowed deviation of the alternative score sum from 1.
pub const SCORE_SUM_TOLERANCE: f64 = 0.01;

/// Category of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationIssueKind {
    /// A context node's comparison matrix exceeds the CR threshold.
    InconsistentNode,
    /// The overall (mean) CR exceeds the threshold.
    InconsistentOverall,
    /// Alternative scores do not sum to 1.
    ScoreSumDeviation,
    /// A context node's matrix has unjudged pairs.
    IncompleteJudgments,
}

/// One advisory finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: ValidationIssueKind,
    /// The offending context node, when the issue is local to one.
    pub node_id: Option<NodeId>,
    pub message: String,
}

/// Outcome of validating one result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when there are no issues.
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
    pub recommendations: Vec<String>,
}

impl ValidationReport {
    fn from_findings(issues: Vec<ValidationIssue>, recommendations: Vec<String>) -> Self {
        Self {
            is_valid: issues.is_empty(),
            issues,
            recommendations,
        }
    }

    /// Issues of one kind.
    pub fn issues_of(&self, kind: ValidationIssueKind) -> Vec<&ValidationIssue> {
        self.issues.iter().filter(|i| i.kind == kind).collect()
    }

    /// Context nodes named by any issue, each once, in first-seen order.
    pub fn flagged_nodes(&self) -> Vec<&NodeId> {
        let mut seen = HashSet::new();
        self.issues
            .iter()
            .filter_map(|i| i.node_id.as_ref())
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

/// Checks consistency, completeness and score normalization.
pub struct ResultValidator;

impl ResultValidator {
    /// Validates with the conventional CR threshold of 0.1.
    pub fn validate(result: &AhpResult) -> ValidationReport {
        Self::validate_with_threshold(result, CONSISTENCY_THRESHOLD)
    }

    /// Validates with a caller-supplied CR threshold.
    ///
    /// Checks, in order:
    /// - every context CR > threshold
    /// - overall CR > threshold
    /// - every context with missing judgments
    /// - |Σ scores − 1| > [`SCORE_SUM_TOLERANCE`] (skipped without alternatives)
    ///
    /// Per-node findings are reported in node id order.
    pub fn validate_with_threshold(result: &AhpResult, threshold: f64) -> ValidationReport {
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        let mut ratios: Vec<(&NodeId, f64)> = result
            .consistency_ratios
            .iter()
            .map(|(id, cr)| (id, *cr))
            .collect();
        ratios.sort_by(|a, b| a.0.cmp(b.0));

        for (node_id, cr) in ratios {
            if cr > threshold {
                issues.push(ValidationIssue {
                    kind: ValidationIssueKind::InconsistentNode,
                    node_id: Some(node_id.clone()),
                    message: format!(
                        "Judgments under '{}' are inconsistent (CR {:.3} > {:.2})",
                        node_id, cr, threshold
                    ),
                });
                recommendations.push(format!(
                    "Re-judge the comparisons under '{}'",
                    node_id
                ));
            }
        }

        if result.overall_consistency_ratio > threshold {
            issues.push(ValidationIssue {
                kind: ValidationIssueKind::InconsistentOverall,
                node_id: None,
                message: format!(
                    "Overall consistency ratio {:.3} exceeds {:.2}",
                    result.overall_consistency_ratio, threshold
                ),
            });
            recommendations.push("Review the judgments with the highest inconsistency".to_string());
        }

        let mut incomplete: Vec<_> = result
            .completeness
            .iter()
            .filter(|(_, c)| !c.is_complete())
            .collect();
        incomplete.sort_by(|a, b| a.0.cmp(b.0));

        for (node_id, completeness) in incomplete {
            issues.push(ValidationIssue {
                kind: ValidationIssueKind::IncompleteJudgments,
                node_id: Some(node_id.clone()),
                message: format!(
                    "{} of {} comparisons under '{}' are missing and were treated as equal",
                    completeness.missing_pairs(),
                    completeness.required_pairs,
                    node_id
                ),
            });
            recommendations.push(format!("Complete the comparisons under '{}'", node_id));
        }

        if !result.ranking.is_empty() {
            let sum = result.score_sum();
            if (sum - 1.0).abs() > SCORE_SUM_TOLERANCE {
                issues.push(ValidationIssue {
                    kind: ValidationIssueKind::ScoreSumDeviation,
                    node_id: None,
                    message: format!("Alternative scores sum to {:.4}, expected 1", sum),
                });
                recommendations.push("Recompute the result from the current judgments".to_string());
            }
        }

        ValidationReport::from_findings(issues, recommendations)
    }
}
