//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the engine to its collaborators:
//! - `memory` - In-process hierarchy and judgment readers

pub mod memory;

pub use memory::{InMemoryHierarchyReader, InMemoryJudgmentReader};
