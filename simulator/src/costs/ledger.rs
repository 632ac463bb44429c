//! Discounted cost ledger
//!
//! Per-year cost arrays by category, built once from the episode history
//! after `run()` completes. Never mutated incrementally.

use serde::{Deserialize, Serialize};

/// Per-year discounted cost breakdown
///
/// Index i holds year i + 1; year 0 carries no costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLedger {
    /// Campaign (mobilization) cost per year
    pub campaign: Vec<f64>,
    /// Inspection cost per year
    pub inspection: Vec<f64>,
    /// Repair cost per year
    pub repair: Vec<f64>,
    /// Failure-risk cost per year
    pub failure_risk: Vec<f64>,
}

impl CostLedger {
    pub(crate) fn with_lifetime(lifetime: usize) -> Self {
        Self {
            campaign: vec![0.0; lifetime],
            inspection: vec![0.0; lifetime],
            repair: vec![0.0; lifetime],
            failure_risk: vec![0.0; lifetime],
        }
    }

    /// Number of accounted years
    pub fn lifetime(&self) -> usize {
        self.campaign.len()
    }

    /// Total cost of a single year (1-based)
    pub fn year_total(&self, year: usize) -> f64 {
        let i = year - 1;
        self.campaign[i] + self.inspection[i] + self.repair[i] + self.failure_risk[i]
    }

    pub fn total_campaign(&self) -> f64 {
        self.campaign.iter().sum()
    }

    pub fn total_inspection(&self) -> f64 {
        self.inspection.iter().sum()
    }

    pub fn total_repair(&self) -> f64 {
        self.repair.iter().sum()
    }

    pub fn total_failure_risk(&self) -> f64 {
        self.failure_risk.iter().sum()
    }

    /// Lifetime total across all categories
    pub fn total(&self) -> f64 {
        self.total_campaign() + self.total_inspection() + self.total_repair()
            + self.total_failure_risk()
    }
}
