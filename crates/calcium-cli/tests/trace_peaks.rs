use assert_cmd::cargo::cargo_bin_cmd;
use calcium_lib::signal::{Peak, Sample};
use serde_json::Value;
use std::{error::Error, path::PathBuf};

#[test]
fn trace_outputs_time_scaled_series() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("calcium");
    cmd.args([
        "trace",
        "--input",
        &sample_path("test_data/slice_sample.csv"),
        "--config",
        &sample_path("test_data/session.toml"),
        "--cell",
        "soma",
        "--sampling-rate",
        "0.5",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let series: Vec<Sample> = serde_json::from_slice(&output)?;
    let times: Vec<f64> = series.iter().map(|s| s.time).collect();
    let values: Vec<f64> = series.iter().map(|s| s.value).collect();
    assert_eq!(times, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    assert_eq!(values, vec![1.0, 1.0, 3.0, 1.0, 1.0]);
    Ok(())
}

#[test]
fn peaks_use_cell_threshold_and_section() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("calcium");
    cmd.args([
        "peaks",
        "--input",
        &sample_path("test_data/slice_sample.csv"),
        "--config",
        &sample_path("test_data/session.toml"),
        "--cell",
        "dendrite",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let peaks: Vec<Peak> = serde_json::from_slice(&output)?;
    assert_eq!(peaks, vec![Peak::new(2.25, 3.75)]);

    let mut cmd = cargo_bin_cmd!("calcium");
    cmd.args([
        "peaks",
        "--input",
        &sample_path("test_data/slice_sample.csv"),
        "--config",
        &sample_path("test_data/session.toml"),
        "--cell",
        "2",
        "--section",
        "late:3:5",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let peaks: Vec<Peak> = serde_json::from_slice(&output)?;
    assert_eq!(peaks, vec![Peak::new(3.0, 3.75)]);
    Ok(())
}

#[test]
fn peaks_threshold_flag_overrides_cell() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("calcium");
    cmd.args([
        "peaks",
        "--input",
        &sample_path("test_data/slice_sample.csv"),
        "--no-baseline",
        "--sampling-rate",
        "1",
        "--cell",
        "soma",
        "--threshold",
        "1.5",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let peaks: Vec<Peak> = serde_json::from_slice(&output)?;
    assert_eq!(peaks, vec![Peak::new(1.25, 2.75)]);
    Ok(())
}

#[test]
fn unknown_cell_fails() {
    let mut cmd = cargo_bin_cmd!("calcium");
    cmd.args([
        "trace",
        "--input",
        &sample_path("test_data/slice_sample.csv"),
        "--cell",
        "axon",
    ]);
    cmd.assert().failure();
}

#[test]
fn check_section_reports_problems() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("calcium");
    cmd.args(["check-section", "--name", "aCSF", "--start", "5", "--end", "1"]);
    let output = cmd.assert().failure().get_output().stdout.clone();
    let errors: Value = serde_json::from_slice(&output)?;
    assert_eq!(errors, serde_json::json!(["start must be before end"]));

    let mut cmd = cargo_bin_cmd!("calcium");
    cmd.args(["check-section", "--start", "0"]);
    let output = cmd.assert().failure().get_output().stdout.clone();
    let errors: Value = serde_json::from_slice(&output)?;
    assert_eq!(errors, serde_json::json!(["end must be specified"]));

    let mut cmd = cargo_bin_cmd!("calcium");
    cmd.args(["check-section", "--name", "aCSF", "--start", "0", "--end", "60"]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let errors: Value = serde_json::from_slice(&output)?;
    assert_eq!(errors, serde_json::json!([]));
    Ok(())
}

fn sample_path(relative: &str) -> String {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .join(relative);
    root.to_string_lossy().to_string()
}
