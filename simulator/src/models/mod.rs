//! Domain types
//!
//! - **discretization**: named per-variable bin edges defining the joint
//!   discrete state space
//! - **transition**: validated row-stochastic transition matrix
//! - **belief**: probability mass vector over the joint state space
//! - **component**: a structural component with its deterioration model and
//!   append-only result history
//! - **snapshot**: (year, phase) tagged system failure-probability records
//!
//! All construction-time validation failures surface as [`ConfigError`];
//! they are fatal and not recoverable.

pub mod belief;
pub mod component;
pub mod discretization;
pub mod snapshot;
pub mod transition;

pub use belief::BeliefState;
pub use component::{
    Component, ComponentSeries, HistoryRecord, InspectionOutcome, MaintenanceAction,
};
pub use discretization::DiscretizationScheme;
pub use snapshot::{SnapshotPhase, SystemSnapshot};
pub use transition::TransitionMatrix;

use thiserror::Error;

/// Construction-time configuration errors
///
/// Everything in this enum is fatal at model construction: a simulation is
/// never started with a partially valid configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown inspection quality label: {0}")]
    UnknownQuality(String),

    #[error("discretization scheme needs at least one variable")]
    EmptyScheme,

    #[error("variable {name} needs at least two bin edges, got {found}")]
    TooFewEdges { name: String, found: usize },

    #[error("variable {name} has non-increasing bin edges at position {position}")]
    UnorderedEdges { name: String, position: usize },

    #[error("deterioration size variable {name} not found in scheme")]
    MissingSizeVariable { name: String },

    #[error("deterioration size variable {name} must be the last (fastest-varying) axis")]
    SizeVariableNotInnermost { name: String },

    #[error("transition matrix must have at least one row")]
    EmptyTransitionMatrix,

    #[error("transition matrix row {row} has {found} entries, expected {expected}")]
    NonSquareMatrix { row: usize, expected: usize, found: usize },

    #[error("transition matrix entry ({row}, {column}) is negative: {value}")]
    NegativeTransitionEntry { row: usize, column: usize, value: f64 },

    #[error("transition matrix row {row} sums to {sum}, expected 1")]
    NonStochasticRow { row: usize, sum: f64 },

    #[error("belief state must have at least one entry")]
    EmptyBelief,

    #[error("belief entry {index} is not a valid probability mass: {value}")]
    InvalidBeliefMass { index: usize, value: f64 },

    #[error("belief mass sums to {sum}, expected 1")]
    UnnormalizedBelief { sum: f64 },

    #[error("state space mismatch: scheme has {scheme_states} states, transition matrix is {matrix_dim}x{matrix_dim}")]
    StateSpaceMismatch { scheme_states: usize, matrix_dim: usize },

    #[error("belief length mismatch: scheme has {scheme_states} states, belief has {belief_len} entries")]
    BeliefLengthMismatch { scheme_states: usize, belief_len: usize },

    #[error("ensemble needs at least one sample")]
    EmptyEnsemble,

    #[error("ensemble critical crack size must be positive and finite, got {0}")]
    InvalidCriticalSize(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
