//! Hierarchy Model - the goal/criteria/alternative tree.
//!
//! The hierarchy arrives once per session from the project collaborator and
//! is immutable afterwards. Validation happens at construction so every
//! downstream stage can assume a well-formed tree.

mod arena;
mod node;

pub use arena::{Hierarchy, HierarchyBuilder};
pub use node::{HierarchyNode, NodeKind};
