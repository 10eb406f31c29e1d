//! Integration tests for the battery estimation pipeline

use mousetail_core::{Band, BandTable, BatteryEstimator, ChargeRates, StateStore, CHARGING_ICON};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test environment holding a throwaway state file
struct EstimatorTestEnv {
    #[allow(dead_code)]
    temp_dir: TempDir,
    state_path: PathBuf,
}

impl EstimatorTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let state_path = temp_dir.path().join("settings.json");

        Self {
            temp_dir,
            state_path,
        }
    }

    fn estimator(&self) -> BatteryEstimator {
        BatteryEstimator::new(StateStore::new(&self.state_path))
    }

    fn stored_percentage(&self) -> f32 {
        StateStore::new(&self.state_path)
            .load()
            .expect("state file should parse")
    }
}

#[test]
fn test_first_run_assumes_full_charge() {
    let env = EstimatorTestEnv::new();
    let mut estimator = env.estimator();

    estimator.initialize().unwrap();

    assert_eq!(estimator.percentage(), 100.0);
    assert_eq!(env.stored_percentage(), 100.0);
}

#[test]
fn test_full_session_drain_then_recover() {
    let env = EstimatorTestEnv::new();
    StateStore::new(&env.state_path).save(50.0).unwrap();

    let mut estimator = env.estimator();
    estimator.initialize().unwrap();
    assert_eq!(estimator.percentage(), 50.0);

    // Unplugged: the estimate drains and every tick lands on disk
    for _ in 0..10 {
        estimator.tick(false).unwrap();
    }
    let drained = estimator.percentage();
    assert!(drained < 50.0);
    assert_eq!(env.stored_percentage(), drained);

    // Plugged in: the estimate recovers and caps at full
    for _ in 0..60 {
        estimator.tick(true).unwrap();
    }
    assert_eq!(estimator.percentage(), 100.0);
    assert_eq!(env.stored_percentage(), 100.0);
    assert_eq!(estimator.display_band(), "100");
}

#[test]
fn test_restart_resumes_persisted_estimate() {
    let env = EstimatorTestEnv::new();

    let mut first = env.estimator();
    first.initialize().unwrap();
    for _ in 0..5 {
        first.tick(false).unwrap();
    }
    let left_off = first.percentage();
    drop(first);

    let mut second = env.estimator();
    second.initialize().unwrap();
    assert_eq!(second.percentage(), left_off);
}

#[test]
fn test_state_file_format_is_stable() {
    let env = EstimatorTestEnv::new();
    fs::write(&env.state_path, r#"{ "BatteryPercentage": 37.5 }"#).unwrap();

    let mut estimator = env.estimator();
    estimator.initialize().unwrap();
    assert_eq!(estimator.percentage(), 37.5);

    estimator.tick(true).unwrap();
    let raw = fs::read_to_string(&env.state_path).unwrap();
    assert!(raw.contains("\"BatteryPercentage\""));
}

#[test]
fn test_display_walks_down_through_bands() {
    let env = EstimatorTestEnv::new();
    StateStore::new(&env.state_path).save(100.0).unwrap();

    // One band per tick: drain a quarter charge each time
    let rates = ChargeRates {
        increase: 1.1,
        decrease: 25.0,
    };
    let mut estimator = BatteryEstimator::with_settings(
        StateStore::new(&env.state_path),
        rates,
        BandTable::coarse(),
    );
    estimator.initialize().unwrap();

    let mut seen = Vec::new();
    for _ in 0..4 {
        estimator.tick(false).unwrap();
        seen.push(estimator.display_band().to_string());
    }
    assert_eq!(seen, ["100", "75", "50", "warning"]);
}

#[test]
fn test_plugging_in_flips_display_immediately() {
    let env = EstimatorTestEnv::new();
    StateStore::new(&env.state_path).save(30.0).unwrap();

    let mut estimator = env.estimator();
    estimator.initialize().unwrap();
    assert_eq!(estimator.display_band(), "50");

    // A presence change refreshes the display without waiting for a tick
    estimator.set_charging(true);
    assert_eq!(estimator.display_band(), CHARGING_ICON);
    assert_eq!(estimator.status_text(), "Charging");

    estimator.set_charging(false);
    assert_eq!(estimator.display_band(), "50");
    assert_eq!(estimator.status_text(), "Battery level 30%");
}

#[test]
fn test_custom_band_table_drives_display() {
    let env = EstimatorTestEnv::new();
    StateStore::new(&env.state_path).save(60.0).unwrap();

    let bands = BandTable::new(vec![
        Band::new(50.0, "ok"),
        Band::new(0.0, "low"),
    ])
    .unwrap();
    let mut estimator = BatteryEstimator::with_settings(
        StateStore::new(&env.state_path),
        ChargeRates::default(),
        bands,
    );
    estimator.initialize().unwrap();

    assert_eq!(estimator.display_band(), "ok");
}
