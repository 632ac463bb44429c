//! Discrete belief-state deterioration filter
//!
//! Propagates a probability mass vector over the joint discretized state
//! space through a precomputed transition matrix (prediction) and
//! conditions it on noisy inspection outcomes (update). The filter is a
//! plain discrete-time Bayes filter; all physics lives in the matrix.
//!
//! # State machine
//!
//! Initialized → Predicted (repeatable) → Updated → Repaired; a repaired
//! filter behaves as freshly initialized for subsequent predictions. There
//! is no terminal state — the orchestrator decides when to stop.

use crate::models::{
    BeliefState, ConfigError, DiscretizationScheme, InspectionOutcome, TransitionMatrix,
};
use crate::observation::{InspectionQuality, PodCurve};
use crate::rng::RngManager;

use super::{DetectionOverride, DeteriorationModel, InferenceError, DEGENERACY_EPSILON};

/// Belief-vector deterioration filter
///
/// # Example
/// ```
/// use reliability_simulator_core_rs::inference::{
///     DeteriorationModel, MarkovDeteriorationFilter,
/// };
/// use reliability_simulator_core_rs::models::{
///     BeliefState, DiscretizationScheme, TransitionMatrix,
/// };
///
/// let scheme = DiscretizationScheme::crack_only(vec![0.0, 1.0, 2.0]).unwrap();
/// let transition = TransitionMatrix::new(vec![vec![0.9, 0.1], vec![0.0, 1.0]]).unwrap();
/// let initial = BeliefState::new(vec![1.0, 0.0]).unwrap();
///
/// let mut filter = MarkovDeteriorationFilter::new(scheme, transition, initial).unwrap();
/// filter.predict();
/// assert!((filter.failure_probability() - 0.1).abs() < 1e-12);
/// ```
pub struct MarkovDeteriorationFilter {
    scheme: DiscretizationScheme,
    transition: TransitionMatrix,
    initial_belief: BeliefState,
    belief: BeliefState,
    /// Crack-bin midpoints, cached at construction
    crack_midpoints: Vec<f64>,
    t: usize,
    detection_override: DetectionOverride,
    /// Whether the last update reported a detection
    crack_detected: bool,
}

impl Clone for MarkovDeteriorationFilter {
    fn clone(&self) -> Self {
        Self {
            scheme: self.scheme.clone(),
            transition: self.transition.clone(),
            initial_belief: self.initial_belief.clone(),
            belief: self.belief.clone(),
            crack_midpoints: self.crack_midpoints.clone(),
            t: self.t,
            detection_override: self.detection_override,
            crack_detected: self.crack_detected,
        }
    }
}

impl std::fmt::Debug for MarkovDeteriorationFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkovDeteriorationFilter")
            .field("states", &self.belief.len())
            .field("t", &self.t)
            .field("crack_detected", &self.crack_detected)
            .finish()
    }
}

impl MarkovDeteriorationFilter {
    /// Build a filter over a validated scheme, matrix, and initial belief
    ///
    /// # Errors
    ///
    /// * [`ConfigError::StateSpaceMismatch`] - matrix dimension differs from
    ///   the scheme's joint state count
    /// * [`ConfigError::BeliefLengthMismatch`] - initial belief length
    ///   differs from the scheme's joint state count
    pub fn new(
        scheme: DiscretizationScheme,
        transition: TransitionMatrix,
        initial_belief: BeliefState,
    ) -> Result<Self, ConfigError> {
        Self::with_override(scheme, transition, initial_belief, DetectionOverride::Sample)
    }

    /// Same as [`new`](Self::new) with an explicit detection override
    pub fn with_override(
        scheme: DiscretizationScheme,
        transition: TransitionMatrix,
        initial_belief: BeliefState,
        detection_override: DetectionOverride,
    ) -> Result<Self, ConfigError> {
        let states = scheme.joint_size();
        if transition.dimension() != states {
            return Err(ConfigError::StateSpaceMismatch {
                scheme_states: states,
                matrix_dim: transition.dimension(),
            });
        }
        if initial_belief.len() != states {
            return Err(ConfigError::BeliefLengthMismatch {
                scheme_states: states,
                belief_len: initial_belief.len(),
            });
        }

        let crack_midpoints = scheme.crack_midpoints();
        let belief = initial_belief.clone();
        Ok(Self {
            scheme,
            transition,
            initial_belief,
            belief,
            crack_midpoints,
            t: 0,
            detection_override,
            crack_detected: false,
        })
    }

    /// Current belief state
    pub fn belief(&self) -> &BeliefState {
        &self.belief
    }

    /// Detection likelihood per joint state for a given quality
    ///
    /// The PoD curve is evaluated at the crack-bin midpoints and tiled
    /// across the auxiliary axes; with the crack axis innermost, state `i`
    /// maps to crack bin `i % n_crack`.
    fn detection_likelihood(&self, quality: InspectionQuality) -> Vec<f64> {
        let curve = PodCurve::for_quality(quality);
        let per_bin: Vec<f64> = self
            .crack_midpoints
            .iter()
            .map(|&a| curve.detection_probability(a))
            .collect();

        let n_crack = per_bin.len();
        (0..self.belief.len()).map(|i| per_bin[i % n_crack]).collect()
    }
}

impl DeteriorationModel for MarkovDeteriorationFilter {
    /// One year of deterioration: belief × transition matrix
    ///
    /// Deterministic given the matrix; total mass is preserved.
    fn predict(&mut self) {
        self.t += 1;
        let next = self.transition.propagate(self.belief.as_slice());
        self.belief.replace_mass(next);
    }

    /// Condition the belief on one inspection
    ///
    /// The detection outcome is drawn with probability equal to the prior
    /// predictive detection mass, unless an override fixes it. The belief
    /// becomes the normalized detected (or not-detected) branch.
    fn update(
        &mut self,
        quality: InspectionQuality,
        rng: &mut RngManager,
    ) -> Result<InspectionOutcome, InferenceError> {
        let likelihood = self.detection_likelihood(quality);
        let belief = self.belief.as_slice();

        let detection_mass: f64 = belief
            .iter()
            .zip(likelihood.iter())
            .map(|(&m, &l)| m * l)
            .sum();

        let outcome = match self.detection_override {
            DetectionOverride::ForceDetection => InspectionOutcome::Detected,
            DetectionOverride::ForceNoDetection => InspectionOutcome::NotDetected,
            DetectionOverride::Sample => {
                if rng.bernoulli(detection_mass.clamp(0.0, 1.0)) {
                    InspectionOutcome::Detected
                } else {
                    InspectionOutcome::NotDetected
                }
            }
        };

        let mut branch: Vec<f64> = match outcome {
            InspectionOutcome::Detected => belief
                .iter()
                .zip(likelihood.iter())
                .map(|(&m, &l)| m * l)
                .collect(),
            InspectionOutcome::NotDetected => belief
                .iter()
                .zip(likelihood.iter())
                .map(|(&m, &l)| m * (1.0 - l))
                .collect(),
        };

        let total: f64 = branch.iter().sum();
        if !(total > DEGENERACY_EPSILON) {
            return Err(InferenceError::NumericalDegeneracy { residual_mass: total });
        }

        for value in &mut branch {
            *value /= total;
        }
        self.belief.replace_mass(branch);
        self.crack_detected = outcome == InspectionOutcome::Detected;
        Ok(outcome)
    }

    /// Perfect repair: restore the as-new belief after a detection
    fn perform_action(&mut self) -> bool {
        if !self.crack_detected {
            return false;
        }
        self.belief = self.initial_belief.clone();
        self.crack_detected = false;
        true
    }

    /// Mass of the terminal crack bin, auxiliary axes marginalized
    fn failure_probability(&self) -> f64 {
        let n_crack = self.scheme.crack_bin_count();
        self.belief
            .as_slice()
            .iter()
            .enumerate()
            .filter(|(i, _)| i % n_crack == n_crack - 1)
            .map(|(_, &m)| m)
            .sum()
    }

    fn time(&self) -> usize {
        self.t
    }

    fn clone_model(&self) -> Box<dyn DeteriorationModel> {
        Box::new(self.clone())
    }
}
