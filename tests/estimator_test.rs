mod test_signals;

use approx::assert_relative_eq;

use vortexshed::analysis::{DetectionPolicy, PeakPeriodEstimator};
use vortexshed::io::{ColumnSpec, load_signal};

#[test]
fn test_frequency_recovery_through_csv_roundtrip() {
    let dir = test_signals::scratch_dir("csv_roundtrip");
    let path = dir.join("Max_V_sur_Y_Re200_D1.csv");

    let signal = test_signals::shedding_signal(60.0, 50.0, 0.2, 10.0);
    test_signals::write_monitor_csv(&path, &signal);

    let loaded = load_signal(&path, &ColumnSpec::default()).unwrap();
    assert_eq!(loaded.len(), signal.len());

    let estimator = PeakPeriodEstimator::new(DetectionPolicy::default(), 4).unwrap();
    let estimate = estimator.estimate(&loaded);

    assert!(estimate.sufficient());
    assert_relative_eq!(estimate.frequency.unwrap(), 0.2, max_relative = 0.02);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_trailing_window_rejects_startup_transient() {
    // 0.1 Hz startup for 20 s, then settled 0.4 Hz shedding
    let signal = test_signals::two_stage_signal(80.0, 100.0, 0.1, 0.4, 20.0);

    let estimator = PeakPeriodEstimator::new(DetectionPolicy::default(), 4).unwrap();
    let estimate = estimator.estimate(&signal);

    assert!(estimate.sufficient());
    assert_relative_eq!(estimate.frequency.unwrap(), 0.4, max_relative = 0.02);
}

#[test]
fn test_height_policy_matches_prominence_on_clean_signal() {
    let signal = test_signals::shedding_signal(60.0, 50.0, 0.3, 5.0);

    let by_prominence = PeakPeriodEstimator::new(DetectionPolicy::MinProminence(1e-12), 4)
        .unwrap()
        .estimate(&signal);
    // Crests sit near 1.4; a floor above the mean selects the same peaks
    let by_height = PeakPeriodEstimator::new(DetectionPolicy::MinHeight(1.1), 4)
        .unwrap()
        .estimate(&signal);

    assert_relative_eq!(
        by_prominence.period.unwrap(),
        by_height.period.unwrap(),
        max_relative = 1e-12
    );
}

#[test]
fn test_short_signal_reports_insufficient() {
    // A single shedding cycle cannot fill a window of 4
    let signal = test_signals::shedding_signal(5.0, 100.0, 0.2, 0.1);

    let estimator = PeakPeriodEstimator::new(DetectionPolicy::default(), 4).unwrap();
    let estimate = estimator.estimate(&signal);

    assert!(!estimate.sufficient());
    assert_eq!(estimate.period, None);
    assert_eq!(estimate.frequency, None);
    assert!(estimate.peak_count < 4);
}
