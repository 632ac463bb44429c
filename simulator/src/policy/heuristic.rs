//! Heuristic inspection rule
//!
//! Every `delta_t` years, inspect the `n_inspections` components with the
//! highest current failure probability. Components in the ignore set and
//! components without an inspection technique are never selected. By
//! default no inspection is issued on the final simulated year (there is
//! nothing left to protect); `allow_final_year` overrides that.
//!
//! Tie-break is deterministic: equal failure probabilities rank by lower
//! component index first.

use super::{detected_this_year, MaintenancePolicy, PolicyContext};

/// Highest-risk-first periodic inspection policy
///
/// # Example
/// ```
/// use reliability_simulator_core_rs::policy::{HeuristicPolicy, MaintenancePolicy, PolicyContext};
///
/// let mut policy = HeuristicPolicy::new(5, 1);
/// let pfs = [0.02, 0.30, 0.10];
/// let outcomes = [None, None, None];
/// let inspectable = [true, true, true];
/// let ctx = PolicyContext {
///     year: 5,
///     lifetime: 20,
///     failure_probabilities: &pfs,
///     current_outcomes: &outcomes,
///     inspectable: &inspectable,
/// };
/// assert_eq!(policy.to_observe(&ctx), vec![1]);
/// ```
#[derive(Debug, Clone)]
pub struct HeuristicPolicy {
    /// Years between inspection campaigns
    delta_t: usize,
    /// Components inspected per campaign
    n_inspections: usize,
    /// Component indices never inspected
    ignore: Vec<usize>,
    /// Whether a campaign may fall on the final simulated year
    allow_final_year: bool,
}

impl HeuristicPolicy {
    /// Inspect the top `n_inspections` components every `delta_t` years
    pub fn new(delta_t: usize, n_inspections: usize) -> Self {
        Self {
            delta_t,
            n_inspections,
            ignore: Vec::new(),
            allow_final_year: false,
        }
    }

    /// Exclude the given component indices from inspection
    pub fn with_ignored(mut self, ignore: Vec<usize>) -> Self {
        self.ignore = ignore;
        self
    }

    /// Allow a campaign on the final simulated year
    pub fn with_final_year_allowed(mut self, allow: bool) -> Self {
        self.allow_final_year = allow;
        self
    }

    pub fn delta_t(&self) -> usize {
        self.delta_t
    }

    pub fn n_inspections(&self) -> usize {
        self.n_inspections
    }
}

impl MaintenancePolicy for HeuristicPolicy {
    fn to_observe(&mut self, ctx: &PolicyContext<'_>) -> Vec<usize> {
        if ctx.year == 0 || ctx.year % self.delta_t != 0 {
            return Vec::new();
        }
        if !self.allow_final_year && ctx.year == ctx.lifetime {
            return Vec::new();
        }

        let mut candidates: Vec<usize> = (0..ctx.failure_probabilities.len())
            .filter(|index| ctx.inspectable[*index] && !self.ignore.contains(index))
            .collect();

        candidates.sort_by(|&a, &b| {
            ctx.failure_probabilities[b]
                .total_cmp(&ctx.failure_probabilities[a])
                .then(a.cmp(&b))
        });
        candidates.truncate(self.n_inspections);
        candidates
    }

    fn to_repair(&mut self, ctx: &PolicyContext<'_>) -> Vec<usize> {
        detected_this_year(ctx.current_outcomes)
    }
}
