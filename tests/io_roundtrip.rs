//! Full runs over CSV files in temporary directories.

use pace_outliers::config::{DatasetVariant, RunConfig};
use pace_outliers::detection::SpreadMode;
use pace_outliers::runner::run;
use pace_outliers::OutlierError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Four weeks of data for two hours per day starting Monday 2012-01-02,
/// written in a scrambled order.
fn write_inputs(dir: &Path, feature_file: &str, skip_global_for_last: bool) {
    let mut features = String::from("Date,Hour,Weekday,E-E,E-W,W-W\n");
    let mut global = String::from("Date,Hour,Weekday,Pace\n");

    let mut rows = Vec::new();
    for day in 0..28u32 {
        for hour in [8u32, 17] {
            rows.push((day, hour));
        }
    }
    rows.reverse();

    for (i, &(day, hour)) in rows.iter().enumerate() {
        let date = format!("2012-01-{:02}", day + 2);
        let weekday = WEEKDAYS[(day % 7) as usize];
        let base = if hour == 17 { 2.0 } else { 1.0 };
        let wobble = ((day * 7 + hour) % 5) as f64 * 0.1;
        features.push_str(&format!(
            "{date},{hour},{weekday},{},{},{}\n",
            base + wobble,
            base * 1.5 - wobble,
            base + 0.05 * day as f64
        ));
        if !(skip_global_for_last && i == rows.len() - 1) {
            global.push_str(&format!("{date},{hour},{weekday},{}\n", 10.0 + wobble));
        }
    }

    fs::write(dir.join(feature_file), features).unwrap();
    fs::write(dir.join("global_features.csv"), global).unwrap();
}

#[test]
fn run_writes_sorted_tables() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_inputs(input.path(), "pace_features.csv", false);

    let config = RunConfig::default()
        .input_dir(input.path())
        .output_dir(output.path())
        .workers(3);
    let summary = run(&config).unwrap();

    assert_eq!(summary.cohorts, 14);
    assert_eq!(summary.observations, 56);
    assert!(summary.paths.scores.ends_with("coarse_outlier_scores.csv"));

    let scores = fs::read_to_string(&summary.paths.scores).unwrap();
    let mut lines = scores.lines();
    assert_eq!(
        lines.next().unwrap(),
        "date,hour,weekday,distance,lof1,lof3,lof5,lof10,lof20,lof30,lof50,global_pace,expected_pace,sd_pace"
    );
    let body: Vec<&str> = lines.collect();
    assert_eq!(body.len(), 56);
    assert!(body[0].starts_with("2012-01-02,8,Monday,"));
    assert!(body[1].starts_with("2012-01-02,17,Monday,"));
    assert!(body[55].starts_with("2012-01-29,17,Sunday,"));

    let zscores = fs::read_to_string(&summary.paths.standardized).unwrap();
    let mut lines = zscores.lines();
    assert_eq!(lines.next().unwrap(), "date,hour,weekday,E-E,E-W,W-W");
    assert_eq!(lines.count(), 56);
}

#[test]
fn repeated_runs_are_byte_identical() {
    let input = TempDir::new().unwrap();
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write_inputs(input.path(), "pace_features.csv", false);

    let a = run(&RunConfig::default()
        .input_dir(input.path())
        .output_dir(first.path())
        .workers(1))
    .unwrap();
    let b = run(&RunConfig::default()
        .input_dir(input.path())
        .output_dir(second.path())
        .workers(8))
    .unwrap();

    assert_eq!(
        fs::read(&a.paths.scores).unwrap(),
        fs::read(&b.paths.scores).unwrap()
    );
    assert_eq!(
        fs::read(&a.paths.standardized).unwrap(),
        fs::read(&b.paths.standardized).unwrap()
    );
}

#[test]
fn link_variant_uses_its_own_files() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_inputs(input.path(), "link_pace_features.csv", false);

    let config = RunConfig::default()
        .input_dir(input.path())
        .output_dir(output.path())
        .variant(DatasetVariant::Link);
    assert_eq!(config.resolved_spread(), SpreadMode::Independent);

    let summary = run(&config).unwrap();
    assert!(summary.paths.scores.ends_with("link_outlier_scores.csv"));
    assert!(summary.paths.standardized.ends_with("link_zscore.csv"));
}

#[test]
fn missing_global_pace_writes_nothing() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_inputs(input.path(), "pace_features.csv", true);

    let config = RunConfig::default()
        .input_dir(input.path())
        .output_dir(output.path().join("out"));
    let err = run(&config).unwrap_err();
    assert!(matches!(err, OutlierError::MissingBaseline(_)));
    assert!(!output.path().join("out").exists());
}

#[test]
fn missing_input_file_is_io_error() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let config = RunConfig::default()
        .input_dir(input.path())
        .output_dir(output.path());
    assert!(matches!(run(&config).unwrap_err(), OutlierError::Io(_)));
}

#[test]
fn header_only_input_is_empty_data() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::write(input.path().join("pace_features.csv"), "Date,Hour,Weekday,E-E\n").unwrap();
    fs::write(input.path().join("global_features.csv"), "Date,Hour,Weekday,Pace\n").unwrap();

    let config = RunConfig::default()
        .input_dir(input.path())
        .output_dir(output.path().join("out"));
    assert_eq!(run(&config).unwrap_err(), OutlierError::EmptyData);
    assert!(!output.path().join("out").exists());
}
