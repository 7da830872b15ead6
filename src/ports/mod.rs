//! Ports - Interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the engine and the outside world. Adapters implement these ports.
//!
//! ## Input Ports
//!
//! - `HierarchyReader` - Supplies a project's decision hierarchy
//! - `JudgmentReader` - Supplies recorded pairwise judgments

mod hierarchy_reader;
mod judgment_reader;

pub use hierarchy_reader::HierarchyReader;
pub use judgment_reader::JudgmentReader;
