use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;
use vax_projection::config::ImageFormat;
use vax_projection::{Config, ProjectionError};

#[test]
fn partial_json_overrides_only_given_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vaxproj.json");
    fs::write(
        &path,
        r#"{
            "country_code": "DEU",
            "population_threshold": 83000000,
            "image_format": "svg",
            "columns": { "daily_vaccinations": 6 }
        }"#,
    )
    .unwrap();

    let cfg = Config::from_json_file(&path).unwrap();
    assert_eq!(cfg.country_code, "DEU");
    assert_eq!(cfg.population_threshold, 83e6);
    assert_eq!(cfg.image_format, ImageFormat::Svg);
    assert_eq!(cfg.columns.daily_vaccinations, 6);
    // untouched fields keep their defaults
    assert_eq!(cfg.columns.country_code, 1);
    assert_eq!(cfg.samples, 1000);
    assert_eq!(cfg.log_path, PathBuf::from("projections.csv"));
    assert!(cfg.validate().is_ok());
}

#[test]
fn config_round_trips_through_json() {
    let cfg = Config::default();
    let s = serde_json::to_string(&cfg).unwrap();
    let back: Config = serde_json::from_str(&s).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn malformed_json_is_a_config_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ country_code: ").unwrap();
    let err = Config::from_json_file(&path).unwrap_err();
    assert!(matches!(err, ProjectionError::Config(_)));
}

#[test]
fn missing_config_file_is_an_io_error() {
    let err = Config::from_json_file("no/such/config.json").unwrap_err();
    assert!(matches!(err, ProjectionError::Io { .. }));
}
