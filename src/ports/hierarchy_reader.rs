//! Hierarchy reader port.
//!
//! The engine never builds hierarchies itself; a project/criteria
//! collaborator supplies a validated, immutable one per project.

use crate::domain::foundation::{DomainError, ProjectId};
use crate::domain::hierarchy::Hierarchy;
use async_trait::async_trait;

/// Reader port for decision hierarchies.
#[async_trait]
pub trait HierarchyReader: Send + Sync {
    /// Get the hierarchy for a project.
    ///
    /// Returns `None` if the project has no hierarchy.
    async fn get_hierarchy(&self, project_id: &ProjectId) -> Result<Option<Hierarchy>, DomainError>;
}
