//! Row-stochastic transition matrix over the joint state space
//!
//! Supplied externally (the discretized crack-growth model is computed
//! offline) and validated once at load time. Read-only for the lifetime of
//! an episode.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Tolerance on a row's deviation from unit mass
pub const ROW_SUM_TOLERANCE: f64 = 1e-9;

/// Validated square row-stochastic matrix
///
/// # Example
/// ```
/// use reliability_simulator_core_rs::models::TransitionMatrix;
///
/// let t = TransitionMatrix::new(vec![
///     vec![0.9, 0.1],
///     vec![0.0, 1.0],
/// ])
/// .unwrap();
/// assert_eq!(t.dimension(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionMatrix {
    rows: Vec<Vec<f64>>,
}

impl TransitionMatrix {
    /// Build and validate a transition matrix
    ///
    /// # Errors
    ///
    /// * [`ConfigError::EmptyTransitionMatrix`] - no rows
    /// * [`ConfigError::NonSquareMatrix`] - a row of the wrong length
    /// * [`ConfigError::NegativeTransitionEntry`] - a negative probability
    /// * [`ConfigError::NonStochasticRow`] - a row not summing to 1 within
    ///   [`ROW_SUM_TOLERANCE`]
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, ConfigError> {
        if rows.is_empty() {
            return Err(ConfigError::EmptyTransitionMatrix);
        }

        let expected = rows.len();
        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(ConfigError::NonSquareMatrix {
                    row: row_index,
                    expected,
                    found: row.len(),
                });
            }

            let mut sum = 0.0;
            for (column, &value) in row.iter().enumerate() {
                if !(value >= 0.0) || !value.is_finite() {
                    return Err(ConfigError::NegativeTransitionEntry {
                        row: row_index,
                        column,
                        value,
                    });
                }
                sum += value;
            }

            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(ConfigError::NonStochasticRow { row: row_index, sum });
            }
        }

        Ok(Self { rows })
    }

    /// Number of states (matrix is `dimension x dimension`)
    pub fn dimension(&self) -> usize {
        self.rows.len()
    }

    /// One prediction step: row-vector times matrix
    ///
    /// `out[j] = sum_i mass[i] * T[i][j]`. Total mass is preserved because
    /// every row sums to 1.
    ///
    /// Caller guarantees `mass.len() == self.dimension()`; this is enforced
    /// once at filter construction.
    pub fn propagate(&self, mass: &[f64]) -> Vec<f64> {
        debug_assert_eq!(mass.len(), self.dimension());

        let mut out = vec![0.0; self.dimension()];
        for (i, &m) in mass.iter().enumerate() {
            if m == 0.0 {
                continue;
            }
            for (j, &p) in self.rows[i].iter().enumerate() {
                out[j] += m * p;
            }
        }
        out
    }
}
