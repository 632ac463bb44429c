//! Structural component
//!
//! A component couples an identity with exactly one deterioration model
//! (belief filter or sample ensemble), the inspection technique available
//! for it (or none — some components, e.g. buried ones, cannot be
//! inspected), and an append-only history of per-year results. The
//! component exclusively owns and mutates its model and history.

use serde::{Deserialize, Serialize};

use crate::inference::{DeteriorationModel, InferenceError};
use crate::observation::InspectionQuality;
use crate::rng::RngManager;

/// Outcome of a single inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InspectionOutcome {
    /// A crack was found
    Detected,
    /// No crack was found
    NotDetected,
}

/// Maintenance action recorded in a component's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaintenanceAction {
    /// The component was inspected this year
    Inspection,
    /// The component was repaired to as-new condition this year
    PerfectRepair,
}

/// One row of a component's result history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Model year the record was taken at
    pub year: usize,
    /// Component failure probability at that instant
    pub failure_probability: f64,
    /// Action performed, if any
    pub action: Option<MaintenanceAction>,
    /// Inspection outcome, if the action was an inspection
    pub output: Option<InspectionOutcome>,
}

/// A component's full per-episode time series, as exported in reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSeries {
    /// Component identity
    pub id: String,
    /// Ordered history records
    pub records: Vec<HistoryRecord>,
}

/// A structural component and its deterioration model
pub struct Component {
    id: String,
    model: Box<dyn DeteriorationModel>,
    inspection_quality: Option<InspectionQuality>,
    history: Vec<HistoryRecord>,
}

impl Clone for Component {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            model: self.model.clone_model(),
            inspection_quality: self.inspection_quality,
            history: self.history.clone(),
        }
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("inspection_quality", &self.inspection_quality)
            .field("history_len", &self.history.len())
            .finish()
    }
}

impl Component {
    /// Create a component and record its as-built baseline (year 0)
    pub fn new(
        id: String,
        model: Box<dyn DeteriorationModel>,
        inspection_quality: Option<InspectionQuality>,
    ) -> Self {
        let baseline = HistoryRecord {
            year: model.time(),
            failure_probability: model.failure_probability(),
            action: None,
            output: None,
        };
        Self {
            id,
            model,
            inspection_quality,
            history: vec![baseline],
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Inspection technique assigned to this component, if any
    pub fn inspection_quality(&self) -> Option<InspectionQuality> {
        self.inspection_quality
    }

    /// False for components that cannot be inspected (no technique)
    pub fn is_inspectable(&self) -> bool {
        self.inspection_quality.is_some()
    }

    /// Current failure probability from the model
    pub fn failure_probability(&self) -> f64 {
        self.model.failure_probability()
    }

    /// Current model year
    pub fn time(&self) -> usize {
        self.model.time()
    }

    /// Full result history, oldest first
    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    /// History packaged for an episode report
    pub fn series(&self) -> ComponentSeries {
        ComponentSeries {
            id: self.id.clone(),
            records: self.history.clone(),
        }
    }

    /// Advance the deterioration model one year and record the result
    pub fn predict(&mut self) {
        self.model.predict();
        self.record(None, None);
    }

    /// Inspect with the component's assigned technique and record the result
    ///
    /// # Errors
    ///
    /// * [`InferenceError::NoInspectionTechnique`] - component has no quality
    ///   assigned (the orchestrator screens these out beforehand)
    /// * [`InferenceError::NumericalDegeneracy`] - belief mass collapsed
    pub fn inspect(&mut self, rng: &mut RngManager) -> Result<InspectionOutcome, InferenceError> {
        let quality = self
            .inspection_quality
            .ok_or(InferenceError::NoInspectionTechnique)?;
        let outcome = self.model.update(quality, rng)?;
        self.record(Some(MaintenanceAction::Inspection), Some(outcome));
        Ok(outcome)
    }

    /// Repair to as-new condition if the last inspection detected a crack
    ///
    /// Returns whether a repair actually happened. A no-op leaves the
    /// history untouched.
    pub fn repair(&mut self) -> bool {
        let repaired = self.model.perform_action();
        if repaired {
            self.record(Some(MaintenanceAction::PerfectRepair), None);
        }
        repaired
    }

    fn record(&mut self, action: Option<MaintenanceAction>, output: Option<InspectionOutcome>) {
        self.history.push(HistoryRecord {
            year: self.model.time(),
            failure_probability: self.model.failure_probability(),
            action,
            output,
        });
    }
}
