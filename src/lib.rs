//! AHP Engine - Analytic Hierarchy Process for multi-criteria decisions
//!
//! This crate turns pairwise judgments over a goal/criteria/alternatives
//! hierarchy into weights, consistency ratios and a ranking, aggregates
//! several evaluators into a group decision, and measures how stable the
//! ranking is under perturbed judgments.
//!
//! # Example
//!
//! ```
//! use ahp_engine::domain::analysis::{Judgment, JudgmentSet};
//! use ahp_engine::domain::foundation::{EvaluatorId, NodeId, ProjectId};
//! use ahp_engine::domain::hierarchy::Hierarchy;
//!
//! let hierarchy = Hierarchy::builder(ProjectId::new())
//!     .goal("goal", "Pick a vendor")
//!     .criterion("cost", "Cost", "goal")
//!     .alternative("a", "Vendor A")
//!     .alternative("b", "Vendor B")
//!     .build()
//!     .unwrap();
//!
//! let alice = EvaluatorId::new("alice").unwrap();
//! let judgments = JudgmentSet::new(vec![Judgment::new(
//!     alice.clone(),
//!     NodeId::new("a").unwrap(),
//!     NodeId::new("b").unwrap(),
//!     NodeId::new("cost").unwrap(),
//!     3.0,
//! )]);
//!
//! let result = ahp_engine::compute_individual(&hierarchy, &judgments, &alice).unwrap();
//! assert_eq!(result.best().unwrap().name, "Vendor A");
//! assert!(ahp_engine::validate(&result).is_valid);
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use domain::analysis::{
    aggregate_group, analyze_sensitivity, analyze_sensitivity_with_rng, compute_individual,
    validate,
};
