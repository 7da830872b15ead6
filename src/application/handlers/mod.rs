//! Application handlers.
//!
//! Query handlers that load inputs through ports and run the engine.

pub mod decision;

pub use decision::{
    AnalyzeSensitivityCommand, AnalyzeSensitivityHandler, AnalyzeSensitivityResult,
    ComputeGroupResultCommand, ComputeGroupResultHandler, ComputeGroupResultOutput,
    ComputeIndividualResultCommand, ComputeIndividualResultHandler, ComputeIndividualResultOutput,
};
