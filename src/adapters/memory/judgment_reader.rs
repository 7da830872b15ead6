//! In-memory judgment reader.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::analysis::{Judgment, JudgmentSet};
use crate::domain::foundation::{DomainError, EvaluatorId, ProjectId};
use crate::ports::JudgmentReader;

/// In-memory judgment log, keyed by project, in recording order.
pub struct InMemoryJudgmentReader {
    judgments: RwLock<HashMap<ProjectId, Vec<Judgment>>>,
}

impl InMemoryJudgmentReader {
    /// Creates an empty reader.
    pub fn new() -> Self {
        Self {
            judgments: RwLock::new(HashMap::new()),
        }
    }

    /// Appends one judgment to a project's log.
    pub async fn record(&self, project_id: ProjectId, judgment: Judgment) {
        self.judgments
            .write()
            .await
            .entry(project_id)
            .or_default()
            .push(judgment);
    }

    /// Appends many judgments to a project's log.
    pub async fn record_all(
        &self,
        project_id: ProjectId,
        judgments: impl IntoIterator<Item = Judgment>,
    ) {
        self.judgments
            .write()
            .await
            .entry(project_id)
            .or_default()
            .extend(judgments);
    }
}

impl Default for InMemoryJudgmentReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JudgmentReader for InMemoryJudgmentReader {
    async fn list_for_project(&self, project_id: &ProjectId) -> Result<JudgmentSet, DomainError> {
        let store = self.judgments.read().await;
        Ok(store
            .get(project_id)
            .map(|list| JudgmentSet::new(list.clone()))
            .unwrap_or_default())
    }

    async fn list_for_evaluator(
        &self,
        project_id: &ProjectId,
        evaluator_id: &EvaluatorId,
    ) -> Result<JudgmentSet, DomainError> {
        let store = self.judgments.read().await;
        Ok(store
            .get(project_id)
            .map(|list| {
                list.iter()
                    .filter(|j| &j.evaluator_id == evaluator_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
