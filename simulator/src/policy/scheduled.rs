//! Explicit inspection plan
//!
//! A fixed year → component-indices map, for externally optimized or
//! hand-written campaigns. Years absent from the plan get no inspection.
//! Repairs follow the same detected-this-year rule as the heuristic.

use std::collections::BTreeMap;

use super::{detected_this_year, MaintenancePolicy, PolicyContext};

/// Year-by-year inspection plan
#[derive(Debug, Clone, Default)]
pub struct ScheduledPolicy {
    plan: BTreeMap<usize, Vec<usize>>,
}

impl ScheduledPolicy {
    pub fn new(plan: BTreeMap<usize, Vec<usize>>) -> Self {
        Self { plan }
    }

    pub fn plan(&self) -> &BTreeMap<usize, Vec<usize>> {
        &self.plan
    }
}

impl MaintenancePolicy for ScheduledPolicy {
    fn to_observe(&mut self, ctx: &PolicyContext<'_>) -> Vec<usize> {
        self.plan.get(&ctx.year).cloned().unwrap_or_default()
    }

    fn to_repair(&mut self, ctx: &PolicyContext<'_>) -> Vec<usize> {
        detected_this_year(ctx.current_outcomes)
    }
}
