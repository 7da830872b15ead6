//! Hierarchy node records.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::NodeId;

/// The closed set of node kinds in a decision hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Goal,
    Criterion,
    SubCriterion,
    Alternative,
}

impl NodeKind {
    /// True for criteria and sub-criteria, the nodes that carry weights.
    pub fn is_criterion(&self) -> bool {
        matches!(self, NodeKind::Criterion | NodeKind::SubCriterion)
    }

    /// Returns the display label for this kind.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Goal => "goal",
            NodeKind::Criterion => "criterion",
            NodeKind::SubCriterion => "sub_criterion",
            NodeKind::Alternative => "alternative",
        }
    }
}

/// A node in the decision hierarchy.
///
/// `parent_id` is a lookup key into the owning [`super::Hierarchy`] arena,
/// never an owning reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub parent_id: Option<NodeId>,
    /// Ordered child ids; sibling order is the comparison-matrix order.
    pub child_ids: Vec<NodeId>,
    /// Depth below the goal (goal = 0).
    pub level: u32,
    #[serde(default)]
    pub local_weight: f64,
    #[serde(default)]
    pub global_weight: f64,
}

impl HierarchyNode {
    /// Creates a node with no weights assigned.
    pub fn new(
        id: NodeId,
        name: impl Into<String>,
        kind: NodeKind,
        parent_id: Option<NodeId>,
        child_ids: Vec<NodeId>,
        level: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            parent_id,
            child_ids,
            level,
            local_weight: 0.0,
            global_weight: 0.0,
        }
    }

    /// Returns true if this node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Returns true if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.child_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criterion_kinds_are_criteria() {
        assert!(NodeKind::Criterion.is_criterion());
        assert!(NodeKind::SubCriterion.is_criterion());
        assert!(!NodeKind::Goal.is_criterion());
        assert!(!NodeKind::Alternative.is_criterion());
    }

    #[test]
    fn node_kind_serializes_snake_case() {
        let json = serde_json::to_string(&NodeKind::SubCriterion).unwrap();
        assert_eq!(json, "\"sub_criterion\"");
        assert_eq!(NodeKind::SubCriterion.label(), "sub_criterion");
    }

    #[test]
    fn new_node_has_zero_weights() {
        let node = HierarchyNode::new(
            NodeId::new("goal").unwrap(),
            "Pick a vendor",
            NodeKind::Goal,
            None,
            vec![],
            0,
        );
        assert!(node.is_root());
        assert!(node.is_leaf());
        assert_eq!(node.local_weight, 0.0);
        assert_eq!(node.global_weight, 0.0);
    }
}
