//! Cross-validation of the two inference backends
//!
//! The belief filter and the sample ensemble are given equivalent
//! deterioration dynamics and the same (empty) inspection schedule; their
//! failure-probability trajectories must agree to within a small RMS
//! difference over a 20-year horizon.
//!
//! The dynamics are matched analytically: the filter's two-bin chain
//! moves 10% of the surviving mass into the absorbing failure bin each
//! year (pf(t) = 1 - 0.9^t), while the ensemble starts from an evenly
//! spaced size grid on (0, 1) and grows every sample by 1/0.9 per year
//! against a critical size of 1, so the failed fraction tracks the same
//! curve to within half a grid step.

use reliability_simulator_core_rs::{
    inference::pf_rmse, BeliefState, CrackPropagation, DeteriorationModel,
    DiscretizationScheme, EnsembleDeteriorationModel, MarkovDeteriorationFilter,
    TransitionMatrix,
};

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

const LIFETIME: usize = 20;
const SAMPLES: usize = 4000;

#[test]
fn test_filter_and_ensemble_trajectories_agree() {
    let scheme = DiscretizationScheme::crack_only(vec![0.0, 1.0, 2.0]).unwrap();
    let transition = TransitionMatrix::new(vec![vec![0.9, 0.1], vec![0.0, 1.0]]).unwrap();
    let initial = BeliefState::new(vec![1.0, 0.0]).unwrap();
    let mut filter = MarkovDeteriorationFilter::new(scheme, transition, initial).unwrap();

    // Evenly spaced grid on (0, 1): the fraction above any threshold q is
    // 1 - q to within 1/(2 * SAMPLES)
    let grid: Vec<f64> = (0..SAMPLES)
        .map(|i| (i as f64 + 0.5) / SAMPLES as f64)
        .collect();
    let mut ensemble = EnsembleDeteriorationModel::new(
        grid,
        1.0,
        Box::new(GeometricGrowth { factor: 1.0 / 0.9 }),
    )
    .unwrap();

    let mut filter_pfs = vec![filter.failure_probability()];
    let mut ensemble_pfs = vec![ensemble.failure_probability()];
    for _ in 0..LIFETIME {
        filter.predict();
        ensemble.predict();
        filter_pfs.push(filter.failure_probability());
        ensemble_pfs.push(ensemble.failure_probability());
    }

    // Exact check on the filter side: pf(t) = 1 - 0.9^t
    for (t, &pf) in filter_pfs.iter().enumerate() {
        let expected = 1.0 - 0.9f64.powi(t as i32);
        assert!(
            (pf - expected).abs() < 1e-9,
            "filter pf at year {t}: {pf} vs {expected}"
        );
    }

    let rmse = pf_rmse(&filter_pfs, &ensemble_pfs);
    assert!(rmse < 1e-3, "trajectories diverged: rmse = {rmse}");
}

#[test]
fn test_ensemble_resolution_tightens_agreement() {
    // Quadrupling the ensemble halves the worst-case grid error twice over
    let rmse_at = |samples: usize| {
        let scheme = DiscretizationScheme::crack_only(vec![0.0, 1.0, 2.0]).unwrap();
        let transition =
            TransitionMatrix::new(vec![vec![0.9, 0.1], vec![0.0, 1.0]]).unwrap();
        let initial = BeliefState::new(vec![1.0, 0.0]).unwrap();
        let mut filter = MarkovDeteriorationFilter::new(scheme, transition, initial).unwrap();

        let grid: Vec<f64> = (0..samples)
            .map(|i| (i as f64 + 0.5) / samples as f64)
            .collect();
        let mut ensemble = EnsembleDeteriorationModel::new(
            grid,
            1.0,
            Box::new(GeometricGrowth { factor: 1.0 / 0.9 }),
        )
        .unwrap();

        let mut filter_pfs = vec![filter.failure_probability()];
        let mut ensemble_pfs = vec![ensemble.failure_probability()];
        for _ in 0..LIFETIME {
            filter.predict();
            ensemble.predict();
            filter_pfs.push(filter.failure_probability());
            ensemble_pfs.push(ensemble.failure_probability());
        }
        pf_rmse(&filter_pfs, &ensemble_pfs)
    };

    let coarse = rmse_at(100);
    let fine = rmse_at(4000);
    assert!(fine <= coarse, "finer ensemble must not agree worse");
    assert!(coarse < 1e-2);
    assert!(fine < 1e-3);
}
