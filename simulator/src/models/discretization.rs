//! Discretization scheme for the joint deterioration state space
//!
//! A scheme is a named, ordered sequence of bin-edge vectors, one per
//! physical variable. The joint state space is the product of the
//! per-variable bin counts, laid out with the last variable varying
//! fastest. The deterioration-size variable (crack depth) must be that
//! last axis: the detection likelihood is computed over crack-bin
//! midpoints and tiled across the auxiliary axes, and the failure
//! probability is the marginal mass of the terminal crack bin.
//!
//! Immutable after construction.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Named ordered bin edges per physical variable
///
/// # Example
/// ```
/// use reliability_simulator_core_rs::models::DiscretizationScheme;
///
/// // 21 cycle bins x 2 crack bins = 42 joint states
/// let edges: Vec<f64> = (0..=21).map(f64::from).collect();
/// let scheme = DiscretizationScheme::new(
///     vec![
///         ("t".to_string(), edges),
///         ("a".to_string(), vec![0.0, 1.0, 2.0]),
///     ],
///     "a",
/// )
/// .unwrap();
/// assert_eq!(scheme.joint_size(), 42);
/// assert_eq!(scheme.crack_bin_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscretizationScheme {
    /// (variable name, bin edges), in joint-layout order
    variables: Vec<(String, Vec<f64>)>,
    /// Index of the deterioration-size variable (always the last)
    size_axis: usize,
}

impl DiscretizationScheme {
    /// Build and validate a scheme
    ///
    /// # Errors
    ///
    /// * [`ConfigError::EmptyScheme`] - no variables
    /// * [`ConfigError::TooFewEdges`] - a variable with fewer than two edges
    /// * [`ConfigError::UnorderedEdges`] - edges not strictly increasing
    /// * [`ConfigError::MissingSizeVariable`] - `size_variable` not present
    /// * [`ConfigError::SizeVariableNotInnermost`] - the size variable is not
    ///   the last axis of the joint layout
    pub fn new(
        variables: Vec<(String, Vec<f64>)>,
        size_variable: &str,
    ) -> Result<Self, ConfigError> {
        if variables.is_empty() {
            return Err(ConfigError::EmptyScheme);
        }

        for (name, edges) in &variables {
            if edges.len() < 2 {
                return Err(ConfigError::TooFewEdges {
                    name: name.clone(),
                    found: edges.len(),
                });
            }
            for (position, pair) in edges.windows(2).enumerate() {
                if pair[1] <= pair[0] {
                    return Err(ConfigError::UnorderedEdges {
                        name: name.clone(),
                        position,
                    });
                }
            }
        }

        let size_axis = variables
            .iter()
            .position(|(name, _)| name == size_variable)
            .ok_or_else(|| ConfigError::MissingSizeVariable {
                name: size_variable.to_string(),
            })?;

        if size_axis != variables.len() - 1 {
            return Err(ConfigError::SizeVariableNotInnermost {
                name: size_variable.to_string(),
            });
        }

        Ok(Self { variables, size_axis })
    }

    /// Shortcut for a scheme over the crack-size variable alone
    pub fn crack_only(edges: Vec<f64>) -> Result<Self, ConfigError> {
        Self::new(vec![("a".to_string(), edges)], "a")
    }

    /// Bin count per variable, in joint-layout order
    pub fn bin_counts(&self) -> Vec<usize> {
        self.variables
            .iter()
            .map(|(_, edges)| edges.len() - 1)
            .collect()
    }

    /// Total number of joint states (product of per-variable bin counts)
    pub fn joint_size(&self) -> usize {
        self.variables
            .iter()
            .map(|(_, edges)| edges.len() - 1)
            .product()
    }

    /// Number of crack-size bins
    pub fn crack_bin_count(&self) -> usize {
        self.variables[self.size_axis].1.len() - 1
    }

    /// Midpoint crack size of each crack bin
    ///
    /// These are the sizes at which the detection curve is evaluated.
    pub fn crack_midpoints(&self) -> Vec<f64> {
        let edges = &self.variables[self.size_axis].1;
        edges
            .windows(2)
            .map(|pair| pair[0] + (pair[1] - pair[0]) / 2.0)
            .collect()
    }
}
