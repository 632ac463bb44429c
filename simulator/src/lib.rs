//! Structural Reliability Simulator Core - Rust Engine
//!
//! Life-cycle simulation of deteriorating structural systems under
//! inspection/repair policies, with deterministic execution.
//!
//! # Architecture
//!
//! - **models**: Domain types (DiscretizationScheme, TransitionMatrix,
//!   BeliefState, Component, SystemSnapshot)
//! - **observation**: Probability-of-detection curves per inspection quality
//! - **inference**: Deterioration models (Markov belief filter, sample
//!   ensemble) behind one contract
//! - **reliability**: k-out-of-n combination and series zone composition
//! - **policy**: Maintenance policies (heuristic, scheduled, do-nothing)
//! - **costs**: Discounted cost breakdown from recorded episode history
//! - **orchestrator**: Main episode loop
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. Belief states carry unit probability mass at every observable instant
//! 2. All randomness is deterministic (seeded RNG owned by the orchestrator)
//! 3. Episodes are independent: state is built fresh from a cloned config

// Module declarations
pub mod costs;
pub mod inference;
pub mod models;
pub mod observation;
pub mod orchestrator;
pub mod policy;
pub mod reliability;
pub mod rng;

// Re-exports for convenience
pub use costs::{CostAccountant, CostError, CostLedger, CostRates, RiskAttribution};
pub use inference::{
    CrackPropagation, DetectionOverride, DeteriorationModel, EnsembleDeteriorationModel,
    InferenceError, MarkovDeteriorationFilter,
};
pub use models::{
    BeliefState, Component, ComponentSeries, ConfigError, DiscretizationScheme, HistoryRecord,
    InspectionOutcome, MaintenanceAction, SnapshotPhase, SystemSnapshot, TransitionMatrix,
};
pub use observation::{InspectionQuality, PodCurve};
pub use orchestrator::{
    ComponentConfig, EpisodeConfig, EpisodeReport, ModelConfig, Orchestrator, PolicyConfig,
    SimulationError,
};
pub use policy::{DoNothingPolicy, HeuristicPolicy, MaintenancePolicy, PolicyContext, ScheduledPolicy};
pub use reliability::{k_out_of_n, ReliabilityError, SeriesSystem, ZoneAssignment};
pub use rng::RngManager;
