//! Orchestrator - episode simulation loop
//!
//! Owns simulation time and drives every component through
//! predict → inspect → repair each year, re-aggregating the system
//! failure probability after each phase.
//!
//! See `engine.rs` for the full implementation.

pub mod engine;

// Re-export main types for convenience
pub use engine::{
    ComponentConfig, EpisodeConfig, EpisodeReport, ModelConfig, Orchestrator, PolicyConfig,
    SimulationError,
};
