//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates engine computations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    AnalyzeSensitivityCommand, AnalyzeSensitivityHandler, AnalyzeSensitivityResult,
    ComputeGroupResultCommand, ComputeGroupResultHandler, ComputeGroupResultOutput,
    ComputeIndividualResultCommand, ComputeIndividualResultHandler, ComputeIndividualResultOutput,
};
