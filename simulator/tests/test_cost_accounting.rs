//! Tests for the discounted cost breakdown
//!
//! Ledgers are folded from hand-built component series and snapshot
//! series so every charge can be checked against a closed-form value.

use reliability_simulator_core_rs::{
    ComponentSeries, CostAccountant, CostError, CostLedger, CostRates, HistoryRecord,
    MaintenanceAction, RiskAttribution, SnapshotPhase, SystemSnapshot,
};

fn record(
    year: usize,
    pf: f64,
    action: Option<MaintenanceAction>,
) -> HistoryRecord {
    HistoryRecord {
        year,
        failure_probability: pf,
        action,
        output: None,
    }
}

fn series(id: &str, records: Vec<HistoryRecord>) -> ComponentSeries {
    ComponentSeries { id: id.to_string(), records }
}

fn snapshot(year: usize, phase: SnapshotPhase, pf: f64) -> SystemSnapshot {
    SystemSnapshot::new(year, phase, pf)
}

fn accountant(attribution: RiskAttribution) -> CostAccountant {
    CostAccountant::new(CostRates::default(), attribution)
}

#[test]
fn test_no_actions_charges_only_failure_risk() {
    let snapshots = vec![
        snapshot(0, SnapshotPhase::Initial, 0.0),
        snapshot(1, SnapshotPhase::Prediction, 0.1),
        snapshot(2, SnapshotPhase::Prediction, 0.19),
    ];
    let components = vec![series("c1", vec![record(0, 0.0, None)])];

    let ledger = accountant(RiskAttribution::FinalSnapshot)
        .compute(&components, &snapshots, 2)
        .unwrap();

    assert_eq!(ledger.total_campaign(), 0.0);
    assert_eq!(ledger.total_inspection(), 0.0);
    assert_eq!(ledger.total_repair(), 0.0);

    // Year 1: 10000 * 0.1 * 0.98; year 2: 10000 * 0.09 * 0.98^2
    assert!((ledger.failure_risk[0] - 10_000.0 * 0.1 * 0.98).abs() < 1e-9);
    assert!((ledger.failure_risk[1] - 10_000.0 * 0.09 * 0.98f64.powi(2)).abs() < 1e-9);
    assert!((ledger.total() - ledger.total_failure_risk()).abs() < 1e-12);
}

#[test]
fn test_campaign_charged_once_per_inspection_year() {
    // Two components inspected the same year share one mobilization
    let snapshots = vec![
        snapshot(0, SnapshotPhase::Initial, 0.0),
        snapshot(1, SnapshotPhase::Prediction, 0.1),
        snapshot(1, SnapshotPhase::Inspection, 0.1),
    ];
    let components = vec![
        series("c1", vec![record(1, 0.1, Some(MaintenanceAction::Inspection))]),
        series("c2", vec![record(1, 0.1, Some(MaintenanceAction::Inspection))]),
    ];

    let ledger = accountant(RiskAttribution::FinalSnapshot)
        .compute(&components, &snapshots, 1)
        .unwrap();

    let discount = 0.98;
    assert!((ledger.campaign[0] - 5.0 * discount).abs() < 1e-12);
    assert!((ledger.inspection[0] - 2.0 * discount).abs() < 1e-12);
}

#[test]
fn test_repairs_charged_per_component() {
    let snapshots = vec![
        snapshot(0, SnapshotPhase::Initial, 0.0),
        snapshot(1, SnapshotPhase::Prediction, 0.2),
        snapshot(1, SnapshotPhase::Inspection, 0.25),
        snapshot(1, SnapshotPhase::Repair, 0.05),
    ];
    let components = vec![
        series(
            "c1",
            vec![
                record(1, 0.25, Some(MaintenanceAction::Inspection)),
                record(1, 0.0, Some(MaintenanceAction::PerfectRepair)),
            ],
        ),
        series(
            "c2",
            vec![
                record(1, 0.25, Some(MaintenanceAction::Inspection)),
                record(1, 0.0, Some(MaintenanceAction::PerfectRepair)),
            ],
        ),
    ];

    let ledger = accountant(RiskAttribution::FinalSnapshot)
        .compute(&components, &snapshots, 1)
        .unwrap();

    assert!((ledger.repair[0] - 2.0 * 10.0 * 0.98).abs() < 1e-12);
    assert!((ledger.campaign[0] - 5.0 * 0.98).abs() < 1e-12);
}

#[test]
fn test_attribution_modes_differ_on_mid_year_repairs() {
    // The belief rises to 0.3 mid-year, then a repair drops it to 0.05.
    let snapshots = vec![
        snapshot(0, SnapshotPhase::Initial, 0.0),
        snapshot(1, SnapshotPhase::Prediction, 0.2),
        snapshot(1, SnapshotPhase::Inspection, 0.3),
        snapshot(1, SnapshotPhase::Repair, 0.05),
        snapshot(2, SnapshotPhase::Prediction, 0.15),
    ];
    let components = vec![series("c1", vec![record(0, 0.0, None)])];

    // Final-snapshot reading: year 1 contributes 0.05 - 0.0
    let last = accountant(RiskAttribution::FinalSnapshot)
        .compute(&components, &snapshots, 2)
        .unwrap();
    assert!((last.failure_risk[0] - 10_000.0 * 0.05 * 0.98).abs() < 1e-9);
    assert!((last.failure_risk[1] - 10_000.0 * 0.10 * 0.98f64.powi(2)).abs() < 1e-9);

    // Summed increments: year 1 contributes (0.2 - 0) + (0.3 - 0.2),
    // the repair drop is clamped to zero
    let summed = accountant(RiskAttribution::SumIncrements)
        .compute(&components, &snapshots, 2)
        .unwrap();
    assert!((summed.failure_risk[0] - 10_000.0 * 0.3 * 0.98).abs() < 1e-9);
    assert!((summed.failure_risk[1] - 10_000.0 * 0.10 * 0.98f64.powi(2)).abs() < 1e-9);
}

#[test]
fn test_risk_decrease_is_never_a_credit() {
    // A repair pulls the year-end value below the previous year
    let snapshots = vec![
        snapshot(0, SnapshotPhase::Initial, 0.5),
        snapshot(1, SnapshotPhase::Prediction, 0.6),
        snapshot(1, SnapshotPhase::Repair, 0.3),
    ];
    let components = vec![series("c1", vec![record(0, 0.5, None)])];

    let ledger = accountant(RiskAttribution::FinalSnapshot)
        .compute(&components, &snapshots, 1)
        .unwrap();
    assert_eq!(ledger.failure_risk[0], 0.0);
}

#[test]
fn test_discounting_compounds_with_years() {
    let rates = CostRates { discount_rate: 0.10, ..CostRates::default() };
    let snapshots = vec![
        snapshot(0, SnapshotPhase::Initial, 0.0),
        snapshot(1, SnapshotPhase::Prediction, 0.0),
        snapshot(2, SnapshotPhase::Prediction, 0.0),
        snapshot(2, SnapshotPhase::Inspection, 0.0),
        snapshot(3, SnapshotPhase::Prediction, 0.0),
        snapshot(3, SnapshotPhase::Inspection, 0.0),
    ];
    let components = vec![series(
        "c1",
        vec![
            record(2, 0.0, Some(MaintenanceAction::Inspection)),
            record(3, 0.0, Some(MaintenanceAction::Inspection)),
        ],
    )];

    let ledger = CostAccountant::new(rates, RiskAttribution::FinalSnapshot)
        .compute(&components, &snapshots, 3)
        .unwrap();

    assert!((ledger.inspection[1] - 0.9f64.powi(2)).abs() < 1e-12);
    assert!((ledger.inspection[2] - 0.9f64.powi(3)).abs() < 1e-12);
}

#[test]
fn test_missing_baseline_rejected() {
    let snapshots = vec![snapshot(1, SnapshotPhase::Prediction, 0.1)];
    let err = accountant(RiskAttribution::FinalSnapshot)
        .compute(&[], &snapshots, 1)
        .unwrap_err();
    assert_eq!(err, CostError::MissingBaseline);
}

#[test]
fn test_duplicate_snapshot_key_rejected() {
    let snapshots = vec![
        snapshot(0, SnapshotPhase::Initial, 0.0),
        snapshot(1, SnapshotPhase::Prediction, 0.1),
        snapshot(1, SnapshotPhase::Prediction, 0.2),
    ];
    let err = accountant(RiskAttribution::FinalSnapshot)
        .compute(&[], &snapshots, 1)
        .unwrap_err();
    assert_eq!(
        err,
        CostError::NonChronological { year: 1, phase: SnapshotPhase::Prediction }
    );
}

#[test]
fn test_backwards_year_rejected() {
    let snapshots = vec![
        snapshot(0, SnapshotPhase::Initial, 0.0),
        snapshot(1, SnapshotPhase::Prediction, 0.1),
        snapshot(2, SnapshotPhase::Prediction, 0.2),
        snapshot(1, SnapshotPhase::Repair, 0.1),
    ];
    let err = accountant(RiskAttribution::FinalSnapshot)
        .compute(&[], &snapshots, 2)
        .unwrap_err();
    assert_eq!(err, CostError::NonChronological { year: 1, phase: SnapshotPhase::Repair });
}

#[test]
fn test_phase_order_within_year_enforced() {
    // Repair recorded before the same year's inspection
    let snapshots = vec![
        snapshot(0, SnapshotPhase::Initial, 0.0),
        snapshot(1, SnapshotPhase::Prediction, 0.1),
        snapshot(1, SnapshotPhase::Repair, 0.05),
        snapshot(1, SnapshotPhase::Inspection, 0.1),
    ];
    let err = accountant(RiskAttribution::FinalSnapshot)
        .compute(&[], &snapshots, 1)
        .unwrap_err();
    assert_eq!(
        err,
        CostError::NonChronological { year: 1, phase: SnapshotPhase::Inspection }
    );
}

#[test]
fn test_year_beyond_lifetime_rejected() {
    let snapshots = vec![
        snapshot(0, SnapshotPhase::Initial, 0.0),
        snapshot(1, SnapshotPhase::Prediction, 0.1),
        snapshot(2, SnapshotPhase::Prediction, 0.2),
    ];
    let err = accountant(RiskAttribution::FinalSnapshot)
        .compute(&[], &snapshots, 1)
        .unwrap_err();
    assert_eq!(err, CostError::BeyondLifetime { year: 2, lifetime: 1 });
}

#[test]
fn test_ledger_serialization_round_trip() {
    let ledger = CostLedger {
        campaign: vec![4.9, 0.0],
        inspection: vec![1.96, 0.0],
        repair: vec![0.0, 9.6],
        failure_risk: vec![98.0, 86.4],
    };

    let json = serde_json::to_string(&ledger).unwrap();
    let back: CostLedger = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ledger);
}
