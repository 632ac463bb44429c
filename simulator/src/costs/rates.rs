//! Cost rates
//!
//! Unit costs of inspection and maintenance plus the discount rate.
//! Default values follow Luque & Straub (2019), "Risk-based optimal
//! inspection strategies for structural systems using dynamic Bayesian
//! networks", Table 4, case 1.

use serde::{Deserialize, Serialize};

/// Unit costs and discount rate for the cost breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRates {
    /// Mobilization cost, charged once per year with at least one inspection
    pub campaign_cost: f64,

    /// Cost per inspected component
    pub inspection_cost: f64,

    /// Cost per repaired component
    pub repair_cost: f64,

    /// Cost of a system failure; the yearly risk charge is this times the
    /// year-over-year increase in system failure probability
    pub failure_cost: f64,

    /// Annual discount rate r; a year-t cost is weighted by (1 - r)^t
    pub discount_rate: f64,
}

impl Default for CostRates {
    fn default() -> Self {
        Self {
            campaign_cost: 5.0,
            inspection_cost: 1.0,
            repair_cost: 10.0,
            failure_cost: 10_000.0,
            discount_rate: 0.02,
        }
    }
}

impl CostRates {
    /// Discount factor for a cost incurred in year `t`
    pub fn discount_factor(&self, year: usize) -> f64 {
        (1.0 - self.discount_rate).powi(year as i32)
    }
}

/// How mid-year system snapshots fold into the yearly failure-risk charge
///
/// A year can carry up to three snapshots (prediction, post-inspection,
/// post-repair). The risk charge needs one increment per year, and the
/// two defensible readings differ once repairs move the curve mid-year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RiskAttribution {
    /// Compare each year's final snapshot with the previous year's final
    /// snapshot. A mid-year rise erased by a same-year repair is not
    /// charged.
    #[default]
    FinalSnapshot,

    /// Sum the positive increments between consecutive snapshots,
    /// attributed to the year of the later snapshot. A mid-year rise is
    /// charged even when a repair follows.
    SumIncrements,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rates_follow_reference_case() {
        let rates = CostRates::default();
        assert_eq!(rates.campaign_cost, 5.0);
        assert_eq!(rates.inspection_cost, 1.0);
        assert_eq!(rates.repair_cost, 10.0);
        assert_eq!(rates.failure_cost, 10_000.0);
        assert_eq!(rates.discount_rate, 0.02);
    }

    #[test]
    fn test_discount_compounds_per_year() {
        let rates = CostRates { discount_rate: 0.05, ..CostRates::default() };
        assert!((rates.discount_factor(0) - 1.0).abs() < 1e-12);
        assert!((rates.discount_factor(1) - 0.95).abs() < 1e-12);
        assert!((rates.discount_factor(3) - 0.95f64.powi(3)).abs() < 1e-12);
    }
}
