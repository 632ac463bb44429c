//! Deterioration inference models
//!
//! Two interchangeable backends estimate a component's condition:
//!
//! - [`MarkovDeteriorationFilter`]: discrete belief vector propagated
//!   through a precomputed transition matrix and updated by Bayes' rule
//!   against the inspection detection likelihood
//! - [`EnsembleDeteriorationModel`]: a finite sample ensemble of continuous
//!   crack sizes with per-sample detection weights
//!
//! Both implement [`DeteriorationModel`]; a component owns exactly one,
//! chosen at construction. The two backends cross-validate each other:
//! under the same dynamics and inspection schedule their failure
//! probability trajectories agree to within a small RMS difference.

pub mod ensemble;
pub mod markov;

pub use ensemble::{CrackPropagation, EnsembleDeteriorationModel};
pub use markov::MarkovDeteriorationFilter;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::InspectionOutcome;
use crate::observation::InspectionQuality;
use crate::rng::RngManager;

/// Un-normalizable mass threshold
///
/// An update whose selected branch carries no more mass than this cannot
/// be renormalized and aborts the episode.
pub const DEGENERACY_EPSILON: f64 = 1e-12;

/// Inference errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InferenceError {
    /// The belief (or ensemble weight) mass collapsed below
    /// [`DEGENERACY_EPSILON`] and cannot be normalized. Fatal to the
    /// current episode only; sibling episodes in a sweep are unaffected.
    #[error("belief mass degenerated during update: residual mass {residual_mass:e}")]
    NumericalDegeneracy { residual_mass: f64 },

    /// `update` was called on a model whose component has no inspection
    /// technique assigned.
    #[error("component has no inspection technique assigned")]
    NoInspectionTechnique,
}

/// Detection-outcome override for deterministic tests
///
/// Fixed at model construction; `Sample` draws the outcome from the
/// injected RNG, the force variants bypass the draw entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DetectionOverride {
    /// Draw the outcome with the Bayes-predicted detection probability
    #[default]
    Sample,
    /// Every inspection reports a detection
    ForceDetection,
    /// Every inspection reports no detection
    ForceNoDetection,
}

/// Shared contract of the two inference backends
pub trait DeteriorationModel: Send {
    /// Advance the model one year
    fn predict(&mut self);

    /// Condition on one inspection of the given quality
    fn update(
        &mut self,
        quality: InspectionQuality,
        rng: &mut RngManager,
    ) -> Result<InspectionOutcome, InferenceError>;

    /// Perfect repair: reset to the as-new state iff the last update
    /// detected a crack. Returns whether a repair happened; a second call
    /// without an intervening detection is a no-op.
    fn perform_action(&mut self) -> bool;

    /// Probability that the component has failed
    fn failure_probability(&self) -> f64;

    /// Model year (number of predictions since construction)
    fn time(&self) -> usize;

    /// Deep copy for per-episode state cloning
    fn clone_model(&self) -> Box<dyn DeteriorationModel>;
}

impl Clone for Box<dyn DeteriorationModel> {
    fn clone(&self) -> Self {
        self.clone_model()
    }
}

/// Root-mean-square difference between two failure-probability series
///
/// Cross-validation metric between the filter and the ensemble. Series
/// must have equal length.
pub fn pf_rmse(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "series length mismatch");
    if a.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum();
    (sum_sq / a.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pf_rmse_identical_series_is_zero() {
        let series = vec![0.0, 0.1, 0.19];
        assert_eq!(pf_rmse(&series, &series), 0.0);
    }

    #[test]
    fn test_pf_rmse_constant_offset() {
        let a = vec![0.1, 0.1, 0.1];
        let b = vec![0.2, 0.2, 0.2];
        assert!((pf_rmse(&a, &b) - 0.1).abs() < 1e-12);
    }
}
