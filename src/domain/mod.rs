//! Domain layer containing the AHP engine and its types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `hierarchy` - Validated decision hierarchy (goal, criteria, alternatives)
//! - `analysis` - Pure AHP computation (weights, consistency, aggregation, sensitivity)

pub mod analysis;
pub mod foundation;
pub mod hierarchy;
