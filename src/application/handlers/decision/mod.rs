//! Decision handlers.
//!
//! Load a project's hierarchy and judgments through the reader ports and run
//! the engine on them.

mod analyze_sensitivity;
mod compute_group_result;
mod compute_individual_result;

pub use analyze_sensitivity::{
    AnalyzeSensitivityCommand, AnalyzeSensitivityHandler, AnalyzeSensitivityResult,
};
pub use compute_group_result::{
    ComputeGroupResultCommand, ComputeGroupResultHandler, ComputeGroupResultOutput,
};
pub use compute_individual_result::{
    ComputeIndividualResultCommand, ComputeIndividualResultHandler, ComputeIndividualResultOutput,
};

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::analysis::{AhpResult, JudgmentSet, ResultAssembler};
use crate::domain::foundation::{DomainError, ErrorCode, EvaluatorId, ProjectId};
use crate::domain::hierarchy::Hierarchy;
use crate::ports::HierarchyReader;

/// Default cap on concurrently running evaluator assemblies.
const DEFAULT_MAX_PARALLEL_EVALUATORS: usize = 8;

/// Loads a project's hierarchy, failing with `ProjectNotFound` when absent.
async fn load_hierarchy(
    reader: &dyn HierarchyReader,
    project_id: &ProjectId,
) -> Result<Hierarchy, DomainError> {
    reader.get_hierarchy(project_id).await?.ok_or_else(|| {
        DomainError::new(
            ErrorCode::ProjectNotFound,
            format!("No hierarchy for project {}", project_id),
        )
        .with_detail("project_id", project_id.to_string())
    })
}

/// Assembles every evaluator's result on its own blocking task.
///
/// At most `max_parallel` assemblies run at once. Results come back in
/// `evaluators` order; the first failure fails the whole batch.
async fn assemble_all(
    hierarchy: Arc<Hierarchy>,
    judgments: Arc<JudgmentSet>,
    evaluators: Vec<EvaluatorId>,
    max_parallel: usize,
) -> Result<Vec<AhpResult>, DomainError> {
    let permits = Arc::new(Semaphore::new(max_parallel.max(1)));

    let tasks = evaluators.into_iter().map(|evaluator_id| {
        let permits = Arc::clone(&permits);
        let hierarchy = Arc::clone(&hierarchy);
        let judgments = Arc::clone(&judgments);

        async move {
            let _permit = permits.acquire_owned().await.map_err(|e| {
                DomainError::new(ErrorCode::InternalError, format!("Semaphore closed: {}", e))
            })?;

            debug!(evaluator_id = %evaluator_id, "Assembling evaluator result");
            let joined = tokio::task::spawn_blocking(move || {
                ResultAssembler::compute_individual(&hierarchy, &judgments, &evaluator_id)
            })
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Evaluator assembly task failed: {}", e),
                )
            })?;

            joined.map_err(DomainError::from)
        }
    });

    join_all(tasks).await.into_iter().collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Shared test data: a laptop purchase judged by three evaluators.

    use crate::domain::analysis::Judgment;
    use crate::domain::foundation::{EvaluatorId, NodeId, ProjectId};
    use crate::domain::hierarchy::Hierarchy;

    pub fn evaluator(id: &str) -> EvaluatorId {
        EvaluatorId::new(id).unwrap()
    }

    pub fn node(id: &str) -> NodeId {
        NodeId::new(id).unwrap()
    }

    pub fn hierarchy(project_id: ProjectId) -> Hierarchy {
        Hierarchy::builder(project_id)
            .goal("goal", "Choose a laptop")
            .criterion("price", "Price", "goal")
            .criterion("battery", "Battery", "goal")
            .alternative("x", "X")
            .alternative("y", "Y")
            .alternative("z", "Z")
            .build()
            .unwrap()
    }

    fn judgment(e: &str, a: &str, b: &str, context: &str, value: f64) -> Judgment {
        Judgment::new(evaluator(e), node(a), node(b), node(context), value)
    }

    /// Complete, consistent judgments for one evaluator.
    ///
    /// `price_weight` is how much more price matters than battery.
    pub fn judgments_for(e: &str, price_weight: f64) -> Vec<Judgment> {
        vec![
            judgment(e, "price", "battery", "goal", price_weight),
            judgment(e, "x", "y", "price", 2.0),
            judgment(e, "x", "z", "price", 4.0),
            judgment(e, "y", "z", "price", 2.0),
            judgment(e, "z", "x", "battery", 4.0),
            judgment(e, "z", "y", "battery", 2.0),
            judgment(e, "y", "x", "battery", 2.0),
        ]
    }
}
