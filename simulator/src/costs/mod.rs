//! Cost accounting
//!
//! Derives a discounted per-year cost breakdown (campaign, inspection,
//! repair, failure risk) from a completed episode's component histories
//! and system snapshot series. Accounting is a pure fold over recorded
//! data: nothing here mutates the episode.
//!
//! The failure-risk charge is proportional to the *increase* in system
//! failure probability realized in a year, not the absolute probability;
//! repairs can lower the curve, and a negative year-over-year change
//! contributes zero (never a credit).

pub mod ledger;
pub mod rates;

pub use ledger::CostLedger;
pub use rates::{CostRates, RiskAttribution};

use thiserror::Error;

use crate::models::{ComponentSeries, MaintenanceAction, SnapshotPhase, SystemSnapshot};

/// Invalid episode state detected while folding the snapshot series
///
/// The accountant refuses to guess: a series it cannot attribute to years
/// deterministically is an error, not a best-effort number.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CostError {
    #[error("snapshot series must start with the year-0 baseline")]
    MissingBaseline,

    #[error("snapshot ({year}, {phase:?}) out of order or duplicated")]
    NonChronological { year: usize, phase: SnapshotPhase },

    #[error("snapshot year {year} beyond episode lifetime {lifetime}")]
    BeyondLifetime { year: usize, lifetime: usize },

    #[error("no snapshot recorded for year {year}")]
    MissingYear { year: usize },
}

/// Builds the cost ledger from a completed episode
#[derive(Debug, Clone)]
pub struct CostAccountant {
    rates: CostRates,
    attribution: RiskAttribution,
}

impl CostAccountant {
    pub fn new(rates: CostRates, attribution: RiskAttribution) -> Self {
        Self { rates, attribution }
    }

    pub fn rates(&self) -> &CostRates {
        &self.rates
    }

    /// Fold an episode into a per-year discounted cost ledger
    ///
    /// # Arguments
    ///
    /// * `components` - per-component result series (inspection and repair
    ///   counts come from their recorded actions)
    /// * `snapshots` - system failure-probability series with (year, phase)
    ///   keys
    /// * `lifetime` - episode length in years
    ///
    /// # Errors
    ///
    /// [`CostError`] when the snapshot series is missing its baseline, is
    /// not strictly ordered by (year, phase), skips a year, or runs past
    /// the lifetime.
    pub fn compute(
        &self,
        components: &[ComponentSeries],
        snapshots: &[SystemSnapshot],
        lifetime: usize,
    ) -> Result<CostLedger, CostError> {
        self.validate_series(snapshots, lifetime)?;

        let mut inspections = vec![0usize; lifetime + 1];
        let mut repairs = vec![0usize; lifetime + 1];
        for series in components {
            for record in &series.records {
                if record.year == 0 || record.year > lifetime {
                    continue;
                }
                match record.action {
                    Some(MaintenanceAction::Inspection) => inspections[record.year] += 1,
                    Some(MaintenanceAction::PerfectRepair) => repairs[record.year] += 1,
                    None => {}
                }
            }
        }

        let risk_increments = self.yearly_risk_increments(snapshots, lifetime);

        let mut ledger = CostLedger::with_lifetime(lifetime);
        for year in 1..=lifetime {
            let discount = self.rates.discount_factor(year);
            let i = year - 1;

            if inspections[year] > 0 {
                ledger.campaign[i] = self.rates.campaign_cost * discount;
            }
            ledger.inspection[i] =
                self.rates.inspection_cost * inspections[year] as f64 * discount;
            ledger.repair[i] = self.rates.repair_cost * repairs[year] as f64 * discount;
            ledger.failure_risk[i] =
                self.rates.failure_cost * risk_increments[year] * discount;
        }

        Ok(ledger)
    }

    /// Reject series that cannot be attributed to years deterministically
    fn validate_series(
        &self,
        snapshots: &[SystemSnapshot],
        lifetime: usize,
    ) -> Result<(), CostError> {
        let first = snapshots.first().ok_or(CostError::MissingBaseline)?;
        if first.year != 0 || first.phase != SnapshotPhase::Initial {
            return Err(CostError::MissingBaseline);
        }

        let mut previous = (first.year, first.phase);
        let mut latest_year = 0usize;
        for snapshot in &snapshots[1..] {
            if snapshot.year > lifetime {
                return Err(CostError::BeyondLifetime { year: snapshot.year, lifetime });
            }
            let key = (snapshot.year, snapshot.phase);
            if key <= previous {
                return Err(CostError::NonChronological {
                    year: snapshot.year,
                    phase: snapshot.phase,
                });
            }
            // A skipped year means a whole prediction step went unrecorded.
            if snapshot.year > latest_year + 1 {
                return Err(CostError::MissingYear { year: latest_year + 1 });
            }
            latest_year = snapshot.year;
            previous = key;
        }

        if latest_year < lifetime {
            return Err(CostError::MissingYear { year: latest_year + 1 });
        }

        Ok(())
    }

    /// Positive system-pf increment attributed to each year (index = year)
    fn yearly_risk_increments(
        &self,
        snapshots: &[SystemSnapshot],
        lifetime: usize,
    ) -> Vec<f64> {
        let mut increments = vec![0.0; lifetime + 1];

        match self.attribution {
            RiskAttribution::FinalSnapshot => {
                let mut final_pf = vec![f64::NAN; lifetime + 1];
                for snapshot in snapshots {
                    final_pf[snapshot.year] = snapshot.failure_probability;
                }
                for year in 1..=lifetime {
                    let delta = final_pf[year] - final_pf[year - 1];
                    increments[year] = delta.max(0.0);
                }
            }
            RiskAttribution::SumIncrements => {
                for pair in snapshots.windows(2) {
                    let delta = pair[1].failure_probability - pair[0].failure_probability;
                    increments[pair[1].year] += delta.max(0.0);
                }
            }
        }

        increments
    }
}
