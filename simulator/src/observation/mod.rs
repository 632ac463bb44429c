//! Probability-of-detection model
//!
//! Maps an inspection quality label to a two-parameter detection curve
//!
//! ```text
//! P(detect | a) = 1 - 1 / (1 + (a / x0)^b)
//! ```
//!
//! where `a` is the crack size. Curve parameters follow DNVGL-RP-C210
//! Section 11, Table 11-1 (PoD curves for EC, MPI, ACFM). The inverse
//! curve is used by the ensemble model to sample per-sample detection
//! thresholds.
//!
//! The model is stateless: a [`PodCurve`] is a pure value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::ConfigError;

/// Inspection technique quality
///
/// External component configurations carry quality as a string label;
/// parsing an unknown label fails with [`ConfigError::UnknownQuality`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InspectionQuality {
    /// High-accuracy technique (e.g. close visual with MPI)
    Good,
    /// Standard technique
    Normal,
    /// Low-accuracy technique (e.g. general visual)
    Bad,
}

impl FromStr for InspectionQuality {
    type Err = ConfigError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label {
            "good" => Ok(InspectionQuality::Good),
            "normal" => Ok(InspectionQuality::Normal),
            "bad" => Ok(InspectionQuality::Bad),
            other => Err(ConfigError::UnknownQuality(other.to_string())),
        }
    }
}

impl fmt::Display for InspectionQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InspectionQuality::Good => write!(f, "good"),
            InspectionQuality::Normal => write!(f, "normal"),
            InspectionQuality::Bad => write!(f, "bad"),
        }
    }
}

/// Two-parameter probability-of-detection curve
///
/// # Example
/// ```
/// use reliability_simulator_core_rs::observation::{InspectionQuality, PodCurve};
///
/// let curve = PodCurve::for_quality(InspectionQuality::Normal);
/// let p = curve.detection_probability(1.0);
/// assert!(p > 0.0 && p < 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PodCurve {
    /// Crack size at which detection probability is 0.5
    x0: f64,
    /// Curve steepness exponent
    b: f64,
}

impl PodCurve {
    /// Curve parameters for a given inspection quality
    ///
    /// DNVGL-RP-C210 Table 11-1.
    pub fn for_quality(quality: InspectionQuality) -> Self {
        match quality {
            InspectionQuality::Good => Self { x0: 0.40, b: 1.43 },
            InspectionQuality::Normal => Self { x0: 0.45, b: 0.90 },
            InspectionQuality::Bad => Self { x0: 1.16, b: 0.90 },
        }
    }

    /// Probability that an inspection detects a crack of size `a`
    ///
    /// Zero for non-positive sizes: a crack of no extent cannot be seen.
    pub fn detection_probability(&self, a: f64) -> f64 {
        if a <= 0.0 {
            return 0.0;
        }
        1.0 - 1.0 / (1.0 + (a / self.x0).powf(self.b))
    }

    /// Inverse curve: the crack size detected with probability `p`
    ///
    /// Used to sample detection thresholds: for `u ~ U[0, 1)`, a sample of
    /// size `a` is detected iff `a > detection_threshold(u)`.
    /// Returns infinity as `p` approaches 1 (no finite crack is certain to
    /// be missed).
    pub fn detection_threshold(&self, p: f64) -> f64 {
        if p <= 0.0 {
            return 0.0;
        }
        if p >= 1.0 {
            return f64::INFINITY;
        }
        self.x0 * (1.0 / (1.0 - p) - 1.0).powf(1.0 / self.b)
    }
}
