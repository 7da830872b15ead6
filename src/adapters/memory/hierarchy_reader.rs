//! In-memory hierarchy reader.
//!
//! Holds validated hierarchies keyed by project. Suitable for tests and for
//! embedding the engine where hierarchies are already in process.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ProjectId};
use crate::domain::hierarchy::Hierarchy;
use crate::ports::HierarchyReader;

/// In-memory hierarchy store.
///
/// # Example
///
/// ```ignore
/// let reader = InMemoryHierarchyReader::new();
/// reader.insert(hierarchy).await;
///
/// let loaded = reader.get_hierarchy(&project_id).await?;
/// ```
pub struct InMemoryHierarchyReader {
    hierarchies: RwLock<HashMap<ProjectId, Hierarchy>>,
}

impl InMemoryHierarchyReader {
    /// Creates an empty reader.
    pub fn new() -> Self {
        Self {
            hierarchies: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a reader pre-populated with hierarchies.
    pub fn with_hierarchies(hierarchies: impl IntoIterator<Item = Hierarchy>) -> Self {
        Self {
            hierarchies: RwLock::new(
                hierarchies
                    .into_iter()
                    .map(|h| (h.project_id(), h))
                    .collect(),
            ),
        }
    }

    /// Stores a hierarchy, replacing any previous one for the project.
    pub async fn insert(&self, hierarchy: Hierarchy) {
        self.hierarchies
            .write()
            .await
            .insert(hierarchy.project_id(), hierarchy);
    }

    /// Number of stored hierarchies.
    pub async fn len(&self) -> usize {
        self.hierarchies.read().await.len()
    }
}

impl Default for InMemoryHierarchyReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HierarchyReader for InMemoryHierarchyReader {
    async fn get_hierarchy(&self, project_id: &ProjectId) -> Result<Option<Hierarchy>, DomainError> {
        Ok(self.hierarchies.read().await.get(project_id).cloned())
    }
}
