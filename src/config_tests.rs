use crate::config::{Config, RunFile, SourceKind};
use crate::domain::split::{SplitPoint, SplitPolicy};
use std::env;
use std::sync::Mutex;
use std::sync::OnceLock;

// Global lock to prevent race conditions when modifying environment variables in tests
static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn get_env_lock() -> &'static Mutex<()> {
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

const VARS: [&str; 11] = [
    "PRICE_SOURCE",
    "DATABASE_URL",
    "DATASET",
    "CSV_PATH",
    "SYNTHETIC_DAYS",
    "SYNTHETIC_SEED",
    "SPLIT_INDEX",
    "TRAIN_FRACTION",
    "SPLIT_POLICY",
    "SERIES_OUTPUT",
    "REPORT_OUTPUT",
];

fn clear_env() {
    for var in VARS {
        // SAFETY: callers hold ENV_LOCK
        unsafe { env::remove_var(var) };
    }
}

#[test]
fn test_config_defaults() {
    let _guard = get_env_lock().lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let config = Config::from_env().unwrap();
    assert_eq!(config.source, SourceKind::Synthetic);
    assert_eq!(config.dataset, "SPY");
    assert_eq!(config.synthetic_days, 500);
    assert_eq!(config.split_point, SplitPoint::Fraction(0.8));
    assert_eq!(config.split_policy, SplitPolicy::Exclusive);
    assert!(config.series_output.is_none());
}

#[test]
fn test_split_index_overrides_fraction() {
    let _guard = get_env_lock().lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    unsafe {
        env::set_var("SPLIT_INDEX", "120");
        env::set_var("TRAIN_FRACTION", "0.5");
        env::set_var("SPLIT_POLICY", "inclusive");
        env::set_var("PRICE_SOURCE", "sqlite");
    }

    let config = Config::from_env().unwrap();
    assert_eq!(config.split_point, SplitPoint::Index(120));
    assert_eq!(config.split_policy, SplitPolicy::Inclusive);
    assert_eq!(config.source, SourceKind::Sqlite);

    clear_env();
}

#[test]
fn test_invalid_values_are_reported() {
    let _guard = get_env_lock().lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    unsafe { env::set_var("SYNTHETIC_DAYS", "lots") };
    assert!(Config::from_env().is_err());

    clear_env();
    unsafe { env::set_var("SPLIT_POLICY", "overlap") };
    assert!(Config::from_env().is_err());

    clear_env();
}

#[test]
fn test_run_file_overrides_env() {
    let _guard = get_env_lock().lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let mut config = Config::from_env().unwrap();
    let file: RunFile = toml::from_str(
        r#"
        source = "csv"
        csv_path = "prices/aapl.csv"
        split_index = 200
        split_policy = "inclusive"
        "#,
    )
    .unwrap();
    config.apply(file).unwrap();

    assert_eq!(config.source, SourceKind::Csv);
    assert_eq!(config.csv_path, std::path::PathBuf::from("prices/aapl.csv"));
    assert_eq!(config.split_point, SplitPoint::Index(200));
    assert_eq!(config.split_policy, SplitPolicy::Inclusive);
}

#[test]
fn test_run_file_rejects_conflicting_split() {
    let _guard = get_env_lock().lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let mut config = Config::from_env().unwrap();
    let file = RunFile {
        split_index: Some(10),
        train_fraction: Some(0.7),
        ..Default::default()
    };
    assert!(config.apply(file).is_err());
    assert!(toml::from_str::<RunFile>("unknown_key = 1").is_err());
}
