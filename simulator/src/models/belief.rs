//! Belief state: probability mass over the joint discrete state space
//!
//! Invariant: entries are non-negative and sum to 1 within
//! [`MASS_TOLERANCE`] at every observable instant. A belief is owned by
//! exactly one filter; repair replaces the mass vector rather than
//! aliasing the as-new distribution.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Tolerance on the belief's deviation from unit mass
pub const MASS_TOLERANCE: f64 = 1e-9;

/// Validated probability mass vector
///
/// # Example
/// ```
/// use reliability_simulator_core_rs::models::BeliefState;
///
/// let belief = BeliefState::new(vec![1.0, 0.0]).unwrap();
/// assert_eq!(belief.len(), 2);
/// assert!((belief.total_mass() - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefState {
    mass: Vec<f64>,
}

impl BeliefState {
    /// Build and validate a belief state
    ///
    /// # Errors
    ///
    /// * [`ConfigError::EmptyBelief`] - no entries
    /// * [`ConfigError::InvalidBeliefMass`] - a negative or non-finite entry
    /// * [`ConfigError::UnnormalizedBelief`] - total mass off by more than
    ///   [`MASS_TOLERANCE`]
    pub fn new(mass: Vec<f64>) -> Result<Self, ConfigError> {
        if mass.is_empty() {
            return Err(ConfigError::EmptyBelief);
        }

        let mut sum = 0.0;
        for (index, &value) in mass.iter().enumerate() {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(ConfigError::InvalidBeliefMass { index, value });
            }
            sum += value;
        }

        if (sum - 1.0).abs() > MASS_TOLERANCE {
            return Err(ConfigError::UnnormalizedBelief { sum });
        }

        Ok(Self { mass })
    }

    /// Number of joint states
    pub fn len(&self) -> usize {
        self.mass.len()
    }

    /// True for a zero-length mass vector (never constructible via `new`)
    pub fn is_empty(&self) -> bool {
        self.mass.is_empty()
    }

    /// Mass vector view
    pub fn as_slice(&self) -> &[f64] {
        &self.mass
    }

    /// Total probability mass (1 within tolerance)
    pub fn total_mass(&self) -> f64 {
        self.mass.iter().sum()
    }

    /// Replace the mass vector
    ///
    /// Caller (the filter) upholds the normalization invariant; prediction
    /// and normalized update branches preserve it by construction.
    pub(crate) fn replace_mass(&mut self, mass: Vec<f64>) {
        debug_assert_eq!(mass.len(), self.mass.len());
        self.mass = mass;
    }
}
