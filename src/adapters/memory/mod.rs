//! In-memory adapters for tests and in-process embedding.

mod hierarchy_reader;
mod judgment_reader;

pub use hierarchy_reader::InMemoryHierarchyReader;
pub use judgment_reader::InMemoryJudgmentReader;
