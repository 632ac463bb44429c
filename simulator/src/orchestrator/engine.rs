//! Orchestrator engine
//!
//! Main episode loop integrating all components:
//! - Per-component deterioration prediction (belief filter or ensemble)
//! - System-level aggregation (series system of k-out-of-n zones)
//! - Policy evaluation (inspection and repair decisions)
//! - Cost accounting (discounted per-year breakdown, at episode end)
//!
//! # Yearly protocol
//!
//! The per-year step order is strict; every policy decision reads the
//! freshly recomputed system failure probability and repairs depend on
//! the same year's inspection outcomes:
//!
//! ```text
//! For each year t:
//! 1. Advance time (t += 1)
//! 2. Predict every component, record per-component results
//! 3. Recompute and append the system failure probability
//! 4. Ask the policy what to inspect; inspect, record, re-append
//! 5. Ask the policy what to repair; repair, record, re-append
//! ```
//!
//! Steps 4 and 5 are skipped entirely (no snapshot) when the policy
//! selects nothing, so the snapshot series carries no spurious duplicate
//! entries.
//!
//! # Determinism
//!
//! All randomness flows through the seeded RNG owned by the orchestrator.
//! Same seed + same config = identical episode report.
//!
//! # Example
//!
//! ```rust,ignore
//! use reliability_simulator_core_rs::orchestrator::{EpisodeConfig, Orchestrator};
//!
//! let config = EpisodeConfig { /* components, zones, policy, rates */ };
//! let mut orchestrator = Orchestrator::new(config)?;
//! let report = orchestrator.run(20)?;
//! println!("lifetime cost: {}", report.costs.total());
//! ```

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::costs::{CostAccountant, CostError, CostLedger, CostRates, RiskAttribution};
use crate::inference::{
    CrackPropagation, DetectionOverride, DeteriorationModel, EnsembleDeteriorationModel,
    InferenceError, MarkovDeteriorationFilter,
};
use crate::models::{
    BeliefState, Component, ComponentSeries, ConfigError, DiscretizationScheme,
    InspectionOutcome, SnapshotPhase, SystemSnapshot, TransitionMatrix,
};
use crate::observation::InspectionQuality;
use crate::policy::{
    DoNothingPolicy, HeuristicPolicy, MaintenancePolicy, PolicyContext, ScheduledPolicy,
};
use crate::reliability::{ReliabilityError, SeriesSystem, ZoneAssignment};
use crate::rng::RngManager;

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete episode configuration
///
/// Contains everything needed to build one independent episode. Parallel
/// sweeps clone this tree and construct a fresh [`Orchestrator`] per
/// episode; no mutable state is ever shared between episodes.
#[derive(Debug, Clone)]
pub struct EpisodeConfig {
    /// RNG seed for deterministic inspection outcomes
    pub rng_seed: u64,

    /// Per-component configuration
    pub components: Vec<ComponentConfig>,

    /// Zone label per component (parallel to `components`)
    pub zone_assignments: Vec<String>,

    /// Required surviving-component count per zone
    pub zone_requirements: BTreeMap<String, usize>,

    /// Maintenance policy selection
    pub policy: PolicyConfig,

    /// Cost calculation rates
    pub cost_rates: CostRates,

    /// How mid-year snapshots fold into the yearly risk charge
    pub risk_attribution: RiskAttribution,
}

/// Per-component configuration
#[derive(Debug, Clone)]
pub struct ComponentConfig {
    /// Unique component identifier
    pub id: String,

    /// Deterioration inference backend
    pub model: ModelConfig,

    /// Inspection technique quality (None = component cannot be inspected)
    pub inspection_quality: Option<InspectionQuality>,
}

/// Deterioration model selection for a component
///
/// Raw numeric inputs are validated when the model is built; a partially
/// valid configuration never starts an episode.
#[derive(Debug, Clone)]
pub enum ModelConfig {
    /// Discrete belief filter over a precomputed transition matrix
    Markov {
        /// (variable name, bin edges) in joint-layout order
        variables: Vec<(String, Vec<f64>)>,
        /// Name of the deterioration-size variable (must be the last axis)
        size_variable: String,
        /// Row-stochastic transition matrix over the joint space
        transition: Vec<Vec<f64>>,
        /// As-new belief over the joint space
        initial_belief: Vec<f64>,
        /// Detection-outcome override for deterministic runs
        detection_override: DetectionOverride,
    },

    /// Sample ensemble advanced by an external propagation model
    Ensemble {
        /// As-new crack size per sample
        initial_sizes: Vec<f64>,
        /// Crack size beyond which a sample counts as failed
        critical_size: f64,
        /// Opaque crack-growth physics
        propagator: Box<dyn CrackPropagation>,
        /// Detection-outcome override for deterministic runs
        detection_override: DetectionOverride,
    },
}

impl ModelConfig {
    /// Build the configured inference backend
    fn build(&self) -> Result<Box<dyn DeteriorationModel>, ConfigError> {
        match self {
            ModelConfig::Markov {
                variables,
                size_variable,
                transition,
                initial_belief,
                detection_override,
            } => {
                let scheme = DiscretizationScheme::new(variables.clone(), size_variable)?;
                let matrix = TransitionMatrix::new(transition.clone())?;
                let belief = BeliefState::new(initial_belief.clone())?;
                let filter = MarkovDeteriorationFilter::with_override(
                    scheme,
                    matrix,
                    belief,
                    *detection_override,
                )?;
                Ok(Box::new(filter))
            }
            ModelConfig::Ensemble {
                initial_sizes,
                critical_size,
                propagator,
                detection_override,
            } => {
                let model = EnsembleDeteriorationModel::with_override(
                    initial_sizes.clone(),
                    *critical_size,
                    propagator.clone(),
                    *detection_override,
                )?;
                Ok(Box::new(model))
            }
        }
    }
}

/// Policy selection for an episode
#[derive(Debug, Clone)]
pub enum PolicyConfig {
    /// Never inspect, never repair (baseline)
    DoNothing,

    /// Periodically inspect the highest-risk components
    Heuristic {
        /// Years between inspection campaigns
        delta_t: usize,
        /// Components inspected per campaign
        n_inspections: usize,
        /// Component indices never inspected
        ignore: Vec<usize>,
        /// Whether a campaign may fall on the final simulated year
        allow_final_year: bool,
    },

    /// Explicit year → component-indices inspection plan
    Scheduled { plan: BTreeMap<usize, Vec<usize>> },
}

impl PolicyConfig {
    fn build(&self) -> Box<dyn MaintenancePolicy> {
        match self {
            PolicyConfig::DoNothing => Box::new(DoNothingPolicy),
            PolicyConfig::Heuristic {
                delta_t,
                n_inspections,
                ignore,
                allow_final_year,
            } => Box::new(
                HeuristicPolicy::new(*delta_t, *n_inspections)
                    .with_ignored(ignore.clone())
                    .with_final_year_allowed(*allow_final_year),
            ),
            PolicyConfig::Scheduled { plan } => Box::new(ScheduledPolicy::new(plan.clone())),
        }
    }
}

// ============================================================================
// Errors and Report
// ============================================================================

/// Episode-level simulation errors
///
/// Every variant is reported to the sweep-level caller; a failing episode
/// never corrupts or blocks sibling episodes.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// Configuration validation failed at construction
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Zone layout or combination failed
    #[error("reliability combination failed: {0}")]
    Reliability(#[from] ReliabilityError),

    /// The policy selected a component index that does not exist
    #[error("policy selected component index {index}, but only {len} components exist")]
    DecisionOutOfRange { index: usize, len: usize },

    /// The policy selected a component with no inspection technique
    #[error("policy selected uninspectable component {id}")]
    UninspectableSelected { id: String },

    /// A component's inference aborted the episode
    #[error("inference failed for component {id}: {source}")]
    Inference { id: String, source: InferenceError },

    /// The recorded series could not be folded into a cost ledger
    #[error("cost accounting failed: {0}")]
    Cost(#[from] CostError),

    /// `run` was called on an orchestrator that already ran
    #[error("episode has already been run")]
    AlreadyRun,
}

/// Immutable result of one completed episode
///
/// The only output surface of the core: per-component series, the system
/// snapshot series, and the cost ledger, tagged with a fresh episode id so
/// sweep drivers can correlate reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    /// Unique id of this episode
    pub episode_id: Uuid,

    /// Episode length in years
    pub lifetime: usize,

    /// Per-component time series
    pub components: Vec<ComponentSeries>,

    /// System failure-probability series, (year, phase) keyed
    pub system: Vec<SystemSnapshot>,

    /// Discounted per-year cost breakdown
    pub costs: CostLedger,
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Episode orchestrator
///
/// Owns simulation time, the component collection, the policy, the
/// reliability combinator, the RNG, and the running snapshot series.
/// Strictly sequential: each step's decision depends on the previous
/// step's freshly aggregated state.
pub struct Orchestrator {
    components: Vec<Component>,
    policy: Box<dyn MaintenancePolicy>,
    system: SeriesSystem,
    accountant: CostAccountant,
    rng: RngManager,
    year: usize,
    snapshots: Vec<SystemSnapshot>,
}

impl Orchestrator {
    /// Build an orchestrator from a validated configuration
    ///
    /// Also records the year-0 baseline: every component's as-built
    /// failure probability and the initial system value.
    ///
    /// # Errors
    ///
    /// * [`SimulationError::Config`] - invalid component, model, or policy
    ///   parameters
    /// * [`SimulationError::Reliability`] - invalid zone layout (missing or
    ///   out-of-range required counts)
    pub fn new(config: EpisodeConfig) -> Result<Self, SimulationError> {
        let policy = config.policy.build();
        Self::with_policy(config, policy)
    }

    /// Build an orchestrator with a caller-supplied policy
    ///
    /// For policies outside the bundled [`PolicyConfig`] set; the config's
    /// own policy selection is validated but otherwise ignored. Indices
    /// returned by a custom policy are checked every step and fail fast
    /// when out of range or uninspectable.
    pub fn with_policy(
        config: EpisodeConfig,
        policy: Box<dyn MaintenancePolicy>,
    ) -> Result<Self, SimulationError> {
        Self::validate_config(&config)?;

        let assignment =
            ZoneAssignment::new(config.zone_assignments.clone(), config.zone_requirements.clone())?;
        let system = SeriesSystem::new(assignment);

        let mut components = Vec::with_capacity(config.components.len());
        for component_config in &config.components {
            let model = component_config.model.build()?;
            components.push(Component::new(
                component_config.id.clone(),
                model,
                component_config.inspection_quality,
            ));
        }

        let accountant = CostAccountant::new(config.cost_rates.clone(), config.risk_attribution);
        let rng = RngManager::new(config.rng_seed);

        let initial_pfs: Vec<f64> = components.iter().map(Component::failure_probability).collect();
        let initial_system_pf = system.system_failure_probability(&initial_pfs)?;
        let snapshots = vec![SystemSnapshot::new(0, SnapshotPhase::Initial, initial_system_pf)];

        Ok(Self {
            components,
            policy,
            system,
            accountant,
            rng,
            year: 0,
            snapshots,
        })
    }

    /// Validate configuration
    fn validate_config(config: &EpisodeConfig) -> Result<(), SimulationError> {
        if config.components.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "must have at least one component".to_string(),
            )
            .into());
        }

        let mut ids = HashSet::new();
        for component in &config.components {
            if !ids.insert(&component.id) {
                return Err(ConfigError::InvalidConfig(format!(
                    "duplicate component id: {}",
                    component.id
                ))
                .into());
            }
        }

        if config.zone_assignments.len() != config.components.len() {
            return Err(ConfigError::InvalidConfig(format!(
                "zone assignment covers {} components, expected {}",
                config.zone_assignments.len(),
                config.components.len()
            ))
            .into());
        }

        if !(0.0..1.0).contains(&config.cost_rates.discount_rate) {
            return Err(ConfigError::InvalidConfig(format!(
                "discount rate must be in [0, 1), got {}",
                config.cost_rates.discount_rate
            ))
            .into());
        }

        let len = config.components.len();
        match &config.policy {
            PolicyConfig::DoNothing => {}
            PolicyConfig::Heuristic { delta_t, n_inspections, ignore, .. } => {
                if *delta_t == 0 {
                    return Err(ConfigError::InvalidConfig(
                        "inspection interval delta_t must be > 0".to_string(),
                    )
                    .into());
                }
                if *n_inspections == 0 {
                    return Err(ConfigError::InvalidConfig(
                        "n_inspections must be > 0".to_string(),
                    )
                    .into());
                }
                if let Some(&index) = ignore.iter().find(|&&index| index >= len) {
                    return Err(ConfigError::InvalidConfig(format!(
                        "ignored component index {index} out of range ({len} components)"
                    ))
                    .into());
                }
            }
            PolicyConfig::Scheduled { plan } => {
                for (year, indices) in plan {
                    if let Some(&index) = indices.iter().find(|&&index| index >= len) {
                        return Err(ConfigError::InvalidConfig(format!(
                            "inspection plan for year {year} names component index {index} \
                             out of range ({len} components)"
                        ))
                        .into());
                    }
                }
            }
        }

        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current simulation year
    pub fn year(&self) -> usize {
        self.year
    }

    /// Component collection
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// System snapshot series recorded so far
    pub fn snapshots(&self) -> &[SystemSnapshot] {
        &self.snapshots
    }

    /// Current failure probability of every component
    pub fn failure_probabilities(&self) -> Vec<f64> {
        self.components.iter().map(Component::failure_probability).collect()
    }

    // ========================================================================
    // Episode Loop
    // ========================================================================

    /// Run one complete episode of `lifetime` years
    ///
    /// Repeats the yearly protocol `lifetime` times, then folds the
    /// recorded history into the cost ledger once.
    ///
    /// # Errors
    ///
    /// * [`SimulationError::AlreadyRun`] - this orchestrator already ran;
    ///   build a fresh one from the config for another episode
    /// * [`SimulationError::Inference`] - a belief degenerated; the episode
    ///   is aborted and reported, sibling episodes are unaffected
    /// * [`SimulationError::DecisionOutOfRange`] /
    ///   [`SimulationError::UninspectableSelected`] - the policy returned an
    ///   illegal index (failed fast, never clamped)
    pub fn run(&mut self, lifetime: usize) -> Result<EpisodeReport, SimulationError> {
        if self.year != 0 {
            return Err(SimulationError::AlreadyRun);
        }

        for _ in 0..lifetime {
            self.advance_one_year(lifetime)?;
        }

        let components: Vec<ComponentSeries> =
            self.components.iter().map(Component::series).collect();
        let costs = self.accountant.compute(&components, &self.snapshots, lifetime)?;

        Ok(EpisodeReport {
            episode_id: Uuid::new_v4(),
            lifetime,
            components,
            system: self.snapshots.clone(),
            costs,
        })
    }

    /// One year of the simulation protocol
    fn advance_one_year(&mut self, lifetime: usize) -> Result<(), SimulationError> {
        // STEP 1: ADVANCE TIME
        self.year += 1;

        // STEP 2: PREDICT
        for component in &mut self.components {
            component.predict();
        }

        // STEP 3: AGGREGATE
        self.append_snapshot(SnapshotPhase::Prediction)?;

        let mut outcomes: Vec<Option<InspectionOutcome>> = vec![None; self.components.len()];

        // STEP 4: INSPECT
        let to_observe = self.observe_decision(lifetime, &outcomes);
        if !to_observe.is_empty() {
            for index in to_observe {
                let len = self.components.len();
                let component = self
                    .components
                    .get_mut(index)
                    .ok_or(SimulationError::DecisionOutOfRange { index, len })?;
                if !component.is_inspectable() {
                    return Err(SimulationError::UninspectableSelected {
                        id: component.id().to_string(),
                    });
                }
                let id = component.id().to_string();
                let outcome = component
                    .inspect(&mut self.rng)
                    .map_err(|source| SimulationError::Inference { id, source })?;
                outcomes[index] = Some(outcome);
            }
            self.append_snapshot(SnapshotPhase::Inspection)?;
        }

        // STEP 5: REPAIR
        let to_repair = self.repair_decision(lifetime, &outcomes);
        if !to_repair.is_empty() {
            for index in to_repair {
                let len = self.components.len();
                let component = self
                    .components
                    .get_mut(index)
                    .ok_or(SimulationError::DecisionOutOfRange { index, len })?;
                component.repair();
            }
            self.append_snapshot(SnapshotPhase::Repair)?;
        }

        Ok(())
    }

    /// Ask the policy what to inspect, against freshly aggregated state
    fn observe_decision(
        &mut self,
        lifetime: usize,
        outcomes: &[Option<InspectionOutcome>],
    ) -> Vec<usize> {
        let pfs = self.failure_probabilities();
        let inspectable: Vec<bool> =
            self.components.iter().map(Component::is_inspectable).collect();
        let ctx = PolicyContext {
            year: self.year,
            lifetime,
            failure_probabilities: &pfs,
            current_outcomes: outcomes,
            inspectable: &inspectable,
        };
        self.policy.to_observe(&ctx)
    }

    /// Ask the policy what to repair, with this year's inspection outcomes
    fn repair_decision(
        &mut self,
        lifetime: usize,
        outcomes: &[Option<InspectionOutcome>],
    ) -> Vec<usize> {
        let pfs = self.failure_probabilities();
        let inspectable: Vec<bool> =
            self.components.iter().map(Component::is_inspectable).collect();
        let ctx = PolicyContext {
            year: self.year,
            lifetime,
            failure_probabilities: &pfs,
            current_outcomes: outcomes,
            inspectable: &inspectable,
        };
        self.policy.to_repair(&ctx)
    }

    /// Recompute the system failure probability and append a snapshot
    fn append_snapshot(&mut self, phase: SnapshotPhase) -> Result<(), SimulationError> {
        let pfs = self.failure_probabilities();
        let system_pf = self.system.system_failure_probability(&pfs)?;
        self.snapshots.push(SystemSnapshot::new(self.year, phase, system_pf));
        Ok(())
    }
}
