//! System reliability combination
//!
//! Aggregates per-component failure probabilities into a system failure
//! probability under k-out-of-n redundancy rules: a subsystem survives iff
//! at least k of its n components survive. Components are statistically
//! independent and 2-state.
//!
//! The core is the Barlow–Heidtmann forward recursion (IEEE Transactions
//! on Reliability R-33(4), 1984, p. 321): a dynamic program over
//! cumulative success counts that avoids enumerating the 2^n outcome
//! combinations and stays numerically stable for n in the tens.
//!
//! Zones compose hierarchically: each zone is its own k-out-of-n
//! subsystem, and the zone-level failure probabilities combine through the
//! same recursion with k equal to the number of zones (a series
//! requirement: every zone must remain functional).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reliability combination errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReliabilityError {
    /// The required count is outside `1..=n` for its zone. Fatal at
    /// construction.
    #[error("required count k={k} invalid for a group of {n} components")]
    InvalidRequirement { k: usize, n: usize },

    #[error("zone {zone} has no required-count entry")]
    MissingRequirement { zone: String },

    #[error("required count given for zone {zone}, which has no components")]
    UnknownZone { zone: String },

    #[error("failure-probability list has {found} entries, expected {expected}")]
    LengthMismatch { expected: usize, found: usize },
}

/// System failure probability of a k-out-of-n group
///
/// Barlow–Heidtmann recursion over cumulative success counts. An empty
/// group has no defined failure probability and yields `NaN` (a sentinel,
/// not a crash).
///
/// # Errors
///
/// [`ReliabilityError::InvalidRequirement`] when `k` is outside `1..=n`.
///
/// # Example
/// ```
/// use reliability_simulator_core_rs::reliability::k_out_of_n;
///
/// // 2-out-of-3 with pf = 0.1 each
/// let pf_sys = k_out_of_n(&[0.1, 0.1, 0.1], 2).unwrap();
/// assert!((pf_sys - 0.028).abs() < 1e-12);
/// ```
pub fn k_out_of_n(pf: &[f64], k: usize) -> Result<f64, ReliabilityError> {
    let n = pf.len();
    if n == 0 {
        return Ok(f64::NAN);
    }
    if k == 0 || k > n {
        return Err(ReliabilityError::InvalidRequirement { k, n });
    }

    let nk = n - k;
    let m = k + 1;
    let mut a = vec![0.0; m + 1];
    a[1] = 1.0;
    let mut lower = 1usize;

    for j in 1..=n {
        let mut h = j + 1;
        let rel = 1.0 - pf[j - 1];
        if nk < j {
            lower = h - nk;
        }
        if k < j {
            a[m] += a[k] * rel;
            h = k;
        }
        for i in (lower..=h).rev() {
            a[i] += (a[i - 1] - a[i]) * rel;
        }
    }

    Ok(1.0 - a[m])
}

/// Mapping from component index to zone, with a required count per zone
///
/// Invariant (validated at construction): every zone's required count k
/// satisfies `1 <= k <= |zone members|`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneAssignment {
    /// Zone label per component index
    assignments: Vec<String>,
    /// Required surviving-component count per zone
    required: BTreeMap<String, usize>,
    /// Distinct zone labels, sorted
    zones: Vec<String>,
}

impl ZoneAssignment {
    /// Build and validate a zone assignment
    pub fn new(
        assignments: Vec<String>,
        required: BTreeMap<String, usize>,
    ) -> Result<Self, ReliabilityError> {
        let mut member_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for zone in &assignments {
            *member_counts.entry(zone.as_str()).or_insert(0) += 1;
        }

        for zone in required.keys() {
            if !member_counts.contains_key(zone.as_str()) {
                return Err(ReliabilityError::UnknownZone { zone: zone.clone() });
            }
        }

        for (&zone, &n) in &member_counts {
            let k = *required
                .get(zone)
                .ok_or_else(|| ReliabilityError::MissingRequirement {
                    zone: zone.to_string(),
                })?;
            if k == 0 || k > n {
                return Err(ReliabilityError::InvalidRequirement { k, n });
            }
        }

        let zones = member_counts.keys().map(|z| z.to_string()).collect();
        Ok(Self { assignments, required, zones })
    }

    /// Number of components covered by the assignment
    pub fn component_count(&self) -> usize {
        self.assignments.len()
    }

    /// Distinct zone labels, sorted
    pub fn zones(&self) -> &[String] {
        &self.zones
    }

    /// Required count for a zone (zones are validated at construction)
    fn required_for(&self, zone: &str) -> usize {
        self.required[zone]
    }
}

/// Series system of k-out-of-n zones
///
/// # Example
/// ```
/// use std::collections::BTreeMap;
/// use reliability_simulator_core_rs::reliability::{SeriesSystem, ZoneAssignment};
///
/// let assignment = ZoneAssignment::new(
///     vec!["atm".into(), "atm".into(), "sub".into()],
///     BTreeMap::from([("atm".to_string(), 1), ("sub".to_string(), 1)]),
/// )
/// .unwrap();
/// let system = SeriesSystem::new(assignment);
/// let pf_sys = system.system_failure_probability(&[0.1, 0.2, 0.3]).unwrap();
/// assert!(pf_sys > 0.0 && pf_sys < 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSystem {
    assignment: ZoneAssignment,
}

impl SeriesSystem {
    pub fn new(assignment: ZoneAssignment) -> Self {
        Self { assignment }
    }

    pub fn assignment(&self) -> &ZoneAssignment {
        &self.assignment
    }

    /// System failure probability from per-component failure probabilities
    ///
    /// Per-zone k-out-of-n first, then the zone values in series (every
    /// zone required). An assignment with no components yields `NaN`.
    ///
    /// # Errors
    ///
    /// [`ReliabilityError::LengthMismatch`] when `pf` does not match the
    /// assignment's component count.
    pub fn system_failure_probability(&self, pf: &[f64]) -> Result<f64, ReliabilityError> {
        if pf.len() != self.assignment.component_count() {
            return Err(ReliabilityError::LengthMismatch {
                expected: self.assignment.component_count(),
                found: pf.len(),
            });
        }

        let mut zone_pfs = Vec::with_capacity(self.assignment.zones().len());
        for zone in self.assignment.zones() {
            let members: Vec<f64> = self
                .assignment
                .assignments
                .iter()
                .zip(pf.iter())
                .filter(|(assigned, _)| *assigned == zone)
                .map(|(_, &value)| value)
                .collect();
            zone_pfs.push(k_out_of_n(&members, self.assignment.required_for(zone))?);
        }

        k_out_of_n(&zone_pfs, zone_pfs.len())
    }
}
