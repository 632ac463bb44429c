//! Tests for the sample-ensemble deterioration model

use reliability_simulator_core_rs::{
    ConfigError, CrackPropagation, DetectionOverride, DeteriorationModel,
    EnsembleDeteriorationModel, InferenceError, InspectionOutcome, InspectionQuality, RngManager,
};

/// Deterministic growth: every sample multiplied by a fixed factor per year
#[derive(Debug, Clone)]
struct GeometricGrowth {
    factor: f64,
}

impl CrackPropagation for GeometricGrowth {
    fn propagate(&mut self, sizes: &[f64]) -> Vec<f64> {
        sizes.iter().map(|a| a * self.factor).collect()
    }

    fn clone_propagator(&self) -> Box<dyn CrackPropagation> {
        Box::new(self.clone())
    }
}

fn ensemble(
    initial_sizes: Vec<f64>,
    critical_size: f64,
    factor: f64,
    detection_override: DetectionOverride,
) -> EnsembleDeteriorationModel {
    EnsembleDeteriorationModel::with_override(
        initial_sizes,
        critical_size,
        Box::new(GeometricGrowth { factor }),
        detection_override,
    )
    .unwrap()
}

#[test]
fn test_empty_ensemble_rejected() {
    let err = EnsembleDeteriorationModel::new(
        vec![],
        1.0,
        Box::new(GeometricGrowth { factor: 1.0 }),
    )
    .unwrap_err();
    assert_eq!(err, ConfigError::EmptyEnsemble);
}

#[test]
fn test_invalid_critical_size_rejected() {
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = EnsembleDeteriorationModel::new(
            vec![1.0],
            bad,
            Box::new(GeometricGrowth { factor: 1.0 }),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCriticalSize(_)));
    }
}

#[test]
fn test_failure_probability_is_fraction_beyond_critical() {
    let model = ensemble(vec![1.0, 2.0, 6.0, 7.0], 5.0, 1.0, DetectionOverride::Sample);
    assert!((model.failure_probability() - 0.5).abs() < 1e-12);
}

#[test]
fn test_predict_advances_samples_through_propagator() {
    let mut model = ensemble(vec![1.0, 2.0], 5.0, 2.0, DetectionOverride::Sample);

    assert_eq!(model.time(), 0);
    assert_eq!(model.failure_probability(), 0.0);

    model.predict();
    assert_eq!(model.time(), 1);
    // Sizes are now [2, 4], still below critical
    assert_eq!(model.failure_probability(), 0.0);

    model.predict();
    // Sizes are now [4, 8]
    assert_eq!(model.time(), 2);
    assert!((model.failure_probability() - 0.5).abs() < 1e-12);
}

#[test]
fn test_forced_detection_keeps_only_detected_samples() {
    // Half the ensemble has zero-size cracks (never detectable), half has
    // size 10 (detected with high probability). A forced detection zeroes
    // the weight of every undetected sample, so the surviving mass is all
    // above critical regardless of which size-10 samples were flagged.
    let mut sizes = vec![0.0; 100];
    sizes.extend(vec![10.0; 100]);
    let mut model = ensemble(sizes, 5.0, 1.0, DetectionOverride::ForceDetection);
    let mut rng = RngManager::new(33);

    assert!((model.failure_probability() - 0.5).abs() < 1e-12);

    let outcome = model.update(InspectionQuality::Normal, &mut rng).unwrap();
    assert_eq!(outcome, InspectionOutcome::Detected);
    assert!((model.failure_probability() - 1.0).abs() < 1e-12);
}

#[test]
fn test_perfect_repair_restores_as_new_ensemble() {
    let mut model = ensemble(vec![1.0; 200], 5.0, 10.0, DetectionOverride::ForceDetection);
    let mut rng = RngManager::new(7);

    model.predict();
    // All samples at 10, beyond critical
    assert!((model.failure_probability() - 1.0).abs() < 1e-12);

    model.update(InspectionQuality::Normal, &mut rng).unwrap();
    assert!(model.perform_action(), "detection must trigger a repair");

    // As-new: sizes back to 1.0, full weight restored
    assert_eq!(model.failure_probability(), 0.0);
    assert!((model.total_weight() - 200.0).abs() < 1e-12);
    assert_eq!(model.time(), 1);
}

#[test]
fn test_repair_without_detection_is_noop() {
    let mut model = ensemble(vec![0.0; 50], 1.0, 1.0, DetectionOverride::ForceNoDetection);
    let mut rng = RngManager::new(13);

    assert!(!model.perform_action());

    // Zero-size cracks are never detected, so the whole ensemble is
    // consistent with the miss and keeps full weight.
    let outcome = model.update(InspectionQuality::Bad, &mut rng).unwrap();
    assert_eq!(outcome, InspectionOutcome::NotDetected);
    assert!((model.total_weight() - 50.0).abs() < 1e-12);
    assert!(!model.perform_action(), "a missed inspection must not repair");
}

#[test]
fn test_degenerate_ensemble_update_is_reported() {
    // No zero-size crack can exceed its detection threshold, so a forced
    // detection leaves no consistent sample.
    let mut model = ensemble(vec![0.0; 50], 1.0, 1.0, DetectionOverride::ForceDetection);
    let mut rng = RngManager::new(29);

    let err = model.update(InspectionQuality::Good, &mut rng).unwrap_err();
    assert!(matches!(err, InferenceError::NumericalDegeneracy { .. }));
}

#[test]
fn test_clone_is_a_deep_copy() {
    let mut original = ensemble(vec![1.0, 2.0], 5.0, 2.0, DetectionOverride::Sample);
    let clone = original.clone_model();

    original.predict();
    assert_eq!(original.time(), 1);
    assert_eq!(clone.time(), 0, "cloned model must not share state");
}
