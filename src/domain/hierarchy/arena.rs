//! Arena - Id-indexed storage and validation of decision nodes.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::domain::foundation::{AhpError, NodeId, ProjectId};

use super::{HierarchyNode, NodeKind};

/// A validated, immutable decision hierarchy.
///
/// Nodes live in an ordered arena; parent and child links are ids resolved
/// through `index`. Construction checks every tree invariant, so the engine
/// can walk the hierarchy without cycle guards.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    project_id: ProjectId,
    nodes: Vec<HierarchyNode>,
    index: HashMap<NodeId, usize>,
    root: usize,
}

impl Hierarchy {
    /// Validates raw nodes from the project collaborator and builds the arena.
    ///
    /// # Errors
    /// `AhpError::InvalidHierarchy` when:
    /// - the node list is empty or contains duplicate ids
    /// - there is not exactly one root, or the root is not a goal
    /// - a parent or child reference does not resolve, or the two disagree
    /// - an alternative has children
    /// - a node is unreachable from the root (cycle or detached subtree)
    /// - a level differs from `parent.level + 1` (root must be level 0)
    pub fn from_nodes(project_id: ProjectId, nodes: Vec<HierarchyNode>) -> Result<Self, AhpError> {
        if nodes.is_empty() {
            return Err(AhpError::invalid_hierarchy("hierarchy has no nodes"));
        }

        let mut index = HashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), position).is_some() {
                return Err(AhpError::invalid_hierarchy(format!(
                    "duplicate node id '{}'",
                    node.id
                )));
            }
        }

        let roots: Vec<usize> = nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_root())
            .map(|(i, _)| i)
            .collect();
        let root = match roots.as_slice() {
            [single] => *single,
            [] => return Err(AhpError::invalid_hierarchy("hierarchy has no root")),
            _ => {
                return Err(AhpError::invalid_hierarchy(format!(
                    "hierarchy has {} roots",
                    roots.len()
                )))
            }
        };
        if nodes[root].kind != NodeKind::Goal {
            return Err(AhpError::invalid_hierarchy(format!(
                "root '{}' must be a goal",
                nodes[root].id
            )));
        }

        for node in &nodes {
            Self::check_links(node, &nodes, &index)?;
        }

        let hierarchy = Self {
            project_id,
            nodes,
            index,
            root,
        };
        hierarchy.check_reachable_and_levels()?;
        Ok(hierarchy)
    }

    fn check_links(
        node: &HierarchyNode,
        nodes: &[HierarchyNode],
        index: &HashMap<NodeId, usize>,
    ) -> Result<(), AhpError> {
        if node.kind == NodeKind::Goal && !node.is_root() {
            return Err(AhpError::invalid_hierarchy(format!(
                "goal '{}' must be the root",
                node.id
            )));
        }
        if node.kind == NodeKind::Alternative && !node.is_leaf() {
            return Err(AhpError::invalid_hierarchy(format!(
                "alternative '{}' cannot have children",
                node.id
            )));
        }

        if let Some(parent_id) = &node.parent_id {
            let parent = index.get(parent_id).map(|&i| &nodes[i]).ok_or_else(|| {
                AhpError::invalid_hierarchy(format!(
                    "node '{}' references missing parent '{}'",
                    node.id, parent_id
                ))
            })?;
            if !parent.child_ids.contains(&node.id) {
                return Err(AhpError::invalid_hierarchy(format!(
                    "parent '{}' does not list '{}' as a child",
                    parent_id, node.id
                )));
            }
        }

        let mut seen = HashSet::new();
        for child_id in &node.child_ids {
            if !seen.insert(child_id) {
                return Err(AhpError::invalid_hierarchy(format!(
                    "node '{}' lists child '{}' twice",
                    node.id, child_id
                )));
            }
            let child = index.get(child_id).map(|&i| &nodes[i]).ok_or_else(|| {
                AhpError::invalid_hierarchy(format!(
                    "node '{}' references missing child '{}'",
                    node.id, child_id
                ))
            })?;
            if child.parent_id.as_ref() != Some(&node.id) {
                return Err(AhpError::invalid_hierarchy(format!(
                    "child '{}' does not point back to parent '{}'",
                    child_id, node.id
                )));
            }
        }

        Ok(())
    }

    fn check_reachable_and_levels(&self) -> Result<(), AhpError> {
        let root = &self.nodes[self.root];
        if root.level != 0 {
            return Err(AhpError::invalid_hierarchy(format!(
                "root '{}' must be at level 0, got {}",
                root.id, root.level
            )));
        }

        let mut visited = HashSet::with_capacity(self.nodes.len());
        visited.insert(self.root);
        let mut queue = VecDeque::from([self.root]);

        while let Some(current) = queue.pop_front() {
            let node = &self.nodes[current];
            for child_id in &node.child_ids {
                let child_index = self.index[child_id];
                if !visited.insert(child_index) {
                    return Err(AhpError::invalid_hierarchy(format!(
                        "cycle detected at node '{}'",
                        child_id
                    )));
                }
                let child = &self.nodes[child_index];
                if child.level != node.level + 1 {
                    return Err(AhpError::invalid_hierarchy(format!(
                        "node '{}' is at level {}, expected {}",
                        child.id,
                        child.level,
                        node.level + 1
                    )));
                }
                queue.push_back(child_index);
            }
        }

        if visited.len() != self.nodes.len() {
            let unreachable = self
                .nodes
                .iter()
                .enumerate()
                .find(|(i, _)| !visited.contains(i))
                .map(|(_, n)| n.id.to_string())
                .unwrap_or_default();
            return Err(AhpError::invalid_hierarchy(format!(
                "node '{}' is not reachable from the root",
                unreachable
            )));
        }

        Ok(())
    }

    /// Creates a builder that derives links and levels.
    pub fn builder(project_id: ProjectId) -> HierarchyBuilder {
        HierarchyBuilder::new(project_id)
    }

    /// Returns the owning project.
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the goal node.
    pub fn root(&self) -> &HierarchyNode {
        &self.nodes[self.root]
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&HierarchyNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// All nodes in arena (input) order.
    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a validated hierarchy; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ordered children of a node. Unknown ids yield an empty list.
    pub fn children(&self, id: &NodeId) -> Vec<&HierarchyNode> {
        self.node(id)
            .map(|n| n.child_ids.iter().filter_map(|c| self.node(c)).collect())
            .unwrap_or_default()
    }

    /// The criteria sibling group under a node (children that are not alternatives).
    pub fn criterion_children(&self, id: &NodeId) -> Vec<&HierarchyNode> {
        self.children(id)
            .into_iter()
            .filter(|n| n.kind != NodeKind::Alternative)
            .collect()
    }

    /// All alternatives in arena order; this is the alternative sibling group.
    pub fn alternatives(&self) -> Vec<&HierarchyNode> {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Alternative)
            .collect()
    }

    /// All criteria and sub-criteria in top-down order.
    pub fn criteria(&self) -> Vec<&HierarchyNode> {
        self.top_down()
            .into_iter()
            .filter(|n| n.kind.is_criterion())
            .collect()
    }

    /// Criteria with no criterion children, in top-down order.
    ///
    /// These are the covering criteria under which alternatives are compared.
    pub fn leaf_criteria(&self) -> Vec<&HierarchyNode> {
        self.criteria()
            .into_iter()
            .filter(|n| self.criterion_children(&n.id).is_empty())
            .collect()
    }

    /// Breadth-first order from the root, so every parent precedes its children.
    pub fn top_down(&self) -> Vec<&HierarchyNode> {
        let mut ordered = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::from([self.root]);
        while let Some(current) = queue.pop_front() {
            let node = &self.nodes[current];
            ordered.push(node);
            queue.extend(node.child_ids.iter().map(|c| self.index[c]));
        }
        ordered
    }
}

/// Builder for constructing hierarchies without spelling out links and levels.
#[derive(Debug)]
pub struct HierarchyBuilder {
    project_id: ProjectId,
    entries: Vec<(String, String, NodeKind, Option<String>)>,
}

impl HierarchyBuilder {
    /// Creates a new builder.
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            entries: Vec::new(),
        }
    }

    /// Adds the goal (root).
    pub fn goal(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.entries
            .push((id.into(), name.into(), NodeKind::Goal, None));
        self
    }

    /// Adds a criterion under `parent`.
    pub fn criterion(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        parent: impl Into<String>,
    ) -> Self {
        self.entries
            .push((id.into(), name.into(), NodeKind::Criterion, Some(parent.into())));
        self
    }

    /// Adds a sub-criterion under `parent`.
    pub fn sub_criterion(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        parent: impl Into<String>,
    ) -> Self {
        self.entries.push((
            id.into(),
            name.into(),
            NodeKind::SubCriterion,
            Some(parent.into()),
        ));
        self
    }

    /// Adds an alternative; alternatives hang off the goal.
    pub fn alternative(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.entries
            .push((id.into(), name.into(), NodeKind::Alternative, None));
        self
    }

    /// Derives child lists and levels, then validates.
    pub fn build(self) -> Result<Hierarchy, AhpError> {
        let goal_id = self
            .entries
            .iter()
            .find(|(_, _, kind, _)| *kind == NodeKind::Goal)
            .map(|(id, _, _, _)| id.clone());

        let mut nodes = Vec::with_capacity(self.entries.len());
        for (id, name, kind, parent) in self.entries {
            let parent = match (kind, parent) {
                (NodeKind::Alternative, None) => Some(goal_id.clone().ok_or_else(|| {
                    AhpError::invalid_hierarchy("alternatives require a goal")
                })?),
                (_, parent) => parent,
            };
            let id = NodeId::new(id).map_err(|e| AhpError::invalid_hierarchy(e.to_string()))?;
            let parent_id = parent
                .map(NodeId::new)
                .transpose()
                .map_err(|e| AhpError::invalid_hierarchy(e.to_string()))?;
            nodes.push(HierarchyNode::new(id, name, kind, parent_id, Vec::new(), 0));
        }

        let positions: HashMap<NodeId, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();

        for i in 0..nodes.len() {
            let child_id = nodes[i].id.clone();
            let parent = nodes[i]
                .parent_id
                .as_ref()
                .and_then(|p| positions.get(p))
                .copied();
            if let Some(parent) = parent {
                nodes[parent].child_ids.push(child_id);
            }
        }

        // Levels follow the parent chain; the hop bound stops cycles, which
        // validation then rejects.
        for i in 0..nodes.len() {
            let mut level = 0;
            let mut cursor = nodes[i].parent_id.clone();
            while let Some(parent_id) = cursor {
                level += 1;
                if level as usize > nodes.len() {
                    break;
                }
                cursor = positions
                    .get(&parent_id)
                    .and_then(|&p| nodes[p].parent_id.clone());
            }
            nodes[i].level = level;
        }

        Hierarchy::from_nodes(self.project_id, nodes)
    }
}
