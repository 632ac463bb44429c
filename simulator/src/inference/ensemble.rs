//! Sample-ensemble deterioration model
//!
//! Represents a component's condition as a fixed-size ensemble of
//! continuous crack sizes plus a per-sample detection weight. Prediction
//! advances every sample through an externally supplied propagation model
//! (the fracture-mechanics physics stays behind that trait); an update
//! draws a detection threshold per sample from the inverse PoD curve and
//! keeps the weight of samples consistent with the inspection outcome.
//!
//! Cross-validates the belief filter: under the same dynamics both produce
//! statistically indistinguishable failure-probability trajectories.

use crate::models::{ConfigError, InspectionOutcome};
use crate::observation::{InspectionQuality, PodCurve};
use crate::rng::RngManager;

use super::{DetectionOverride, DeteriorationModel, InferenceError, DEGENERACY_EPSILON};

/// Opaque crack-propagation model
///
/// One call advances the physics one year and returns the new crack size
/// of every sample. Implementations carry their own sampled parameters
/// (growth-law constants, stress ranges, geometry factors).
pub trait CrackPropagation: std::fmt::Debug + Send {
    /// Propagate all samples one year
    fn propagate(&mut self, sizes: &[f64]) -> Vec<f64>;

    /// Deep copy for per-episode state cloning
    fn clone_propagator(&self) -> Box<dyn CrackPropagation>;
}

impl Clone for Box<dyn CrackPropagation> {
    fn clone(&self) -> Self {
        self.clone_propagator()
    }
}

/// Ensemble deterioration model
pub struct EnsembleDeteriorationModel {
    /// As-new sample sizes, kept for perfect repair
    initial_sizes: Vec<f64>,
    sizes: Vec<f64>,
    /// Per-sample detection weight, 1.0 at construction
    weights: Vec<f64>,
    critical_size: f64,
    propagator: Box<dyn CrackPropagation>,
    t: usize,
    detection_override: DetectionOverride,
    crack_detected: bool,
}

impl Clone for EnsembleDeteriorationModel {
    fn clone(&self) -> Self {
        Self {
            initial_sizes: self.initial_sizes.clone(),
            sizes: self.sizes.clone(),
            weights: self.weights.clone(),
            critical_size: self.critical_size,
            propagator: self.propagator.clone(),
            t: self.t,
            detection_override: self.detection_override,
            crack_detected: self.crack_detected,
        }
    }
}

impl std::fmt::Debug for EnsembleDeteriorationModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnsembleDeteriorationModel")
            .field("samples", &self.sizes.len())
            .field("critical_size", &self.critical_size)
            .field("t", &self.t)
            .finish()
    }
}

impl EnsembleDeteriorationModel {
    /// Build an ensemble from initial sample sizes
    ///
    /// # Errors
    ///
    /// * [`ConfigError::EmptyEnsemble`] - no samples
    /// * [`ConfigError::InvalidCriticalSize`] - non-positive or non-finite
    ///   critical crack size
    pub fn new(
        initial_sizes: Vec<f64>,
        critical_size: f64,
        propagator: Box<dyn CrackPropagation>,
    ) -> Result<Self, ConfigError> {
        Self::with_override(initial_sizes, critical_size, propagator, DetectionOverride::Sample)
    }

    /// Same as [`new`](Self::new) with an explicit detection override
    pub fn with_override(
        initial_sizes: Vec<f64>,
        critical_size: f64,
        propagator: Box<dyn CrackPropagation>,
        detection_override: DetectionOverride,
    ) -> Result<Self, ConfigError> {
        if initial_sizes.is_empty() {
            return Err(ConfigError::EmptyEnsemble);
        }
        if !(critical_size > 0.0) || !critical_size.is_finite() {
            return Err(ConfigError::InvalidCriticalSize(critical_size));
        }

        let weights = vec![1.0; initial_sizes.len()];
        let sizes = initial_sizes.clone();
        Ok(Self {
            initial_sizes,
            sizes,
            weights,
            critical_size,
            propagator,
            t: 0,
            detection_override,
            crack_detected: false,
        })
    }

    /// Number of samples in the ensemble
    pub fn sample_count(&self) -> usize {
        self.sizes.len()
    }

    /// Total detection weight currently carried by the ensemble
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }
}

impl DeteriorationModel for EnsembleDeteriorationModel {
    /// Advance every sample one year through the propagation model
    fn predict(&mut self) {
        self.sizes = self.propagator.propagate(&self.sizes);
        self.t += 1;
    }

    /// Condition the ensemble on one inspection
    ///
    /// A detection threshold is drawn per sample from the inverse PoD
    /// curve; a sample counts as detected when its size exceeds its
    /// threshold. The outcome is drawn with probability equal to the
    /// detected sample fraction (unless overridden), and the weights of
    /// samples inconsistent with the outcome drop to zero.
    fn update(
        &mut self,
        quality: InspectionQuality,
        rng: &mut RngManager,
    ) -> Result<InspectionOutcome, InferenceError> {
        let curve = PodCurve::for_quality(quality);

        // Thresholds are drawn even under an override: only the outcome
        // draw is bypassed, not the measurement noise.
        let detected: Vec<bool> = self
            .sizes
            .iter()
            .map(|&a| a > curve.detection_threshold(rng.uniform()))
            .collect();

        let detected_fraction =
            detected.iter().filter(|&&d| d).count() as f64 / self.sizes.len() as f64;

        let outcome = match self.detection_override {
            DetectionOverride::ForceDetection => InspectionOutcome::Detected,
            DetectionOverride::ForceNoDetection => InspectionOutcome::NotDetected,
            DetectionOverride::Sample => {
                if rng.bernoulli(detected_fraction) {
                    InspectionOutcome::Detected
                } else {
                    InspectionOutcome::NotDetected
                }
            }
        };

        for (weight, &sample_detected) in self.weights.iter_mut().zip(detected.iter()) {
            let consistent = match outcome {
                InspectionOutcome::Detected => sample_detected,
                InspectionOutcome::NotDetected => !sample_detected,
            };
            if !consistent {
                *weight = 0.0;
            }
        }

        let total = self.total_weight();
        if !(total > DEGENERACY_EPSILON) {
            return Err(InferenceError::NumericalDegeneracy { residual_mass: total });
        }

        self.crack_detected = outcome == InspectionOutcome::Detected;
        Ok(outcome)
    }

    /// Perfect repair: restore as-new samples and unit weights
    fn perform_action(&mut self) -> bool {
        if !self.crack_detected {
            return false;
        }
        self.sizes = self.initial_sizes.clone();
        self.weights = vec![1.0; self.initial_sizes.len()];
        self.crack_detected = false;
        true
    }

    /// Weighted fraction of samples beyond the critical crack size
    fn failure_probability(&self) -> f64 {
        let total = self.total_weight();
        let failed: f64 = self
            .sizes
            .iter()
            .zip(self.weights.iter())
            .filter(|(&a, _)| a > self.critical_size)
            .map(|(_, &w)| w)
            .sum();
        failed / total
    }

    fn time(&self) -> usize {
        self.t
    }

    fn clone_model(&self) -> Box<dyn DeteriorationModel> {
        Box::new(self.clone())
    }
}
