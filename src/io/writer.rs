//! Writers for the score table and the standardized vector table.

use crate::core::weekday_name;
use crate::error::{OutlierError, Result};
use crate::report::{Report, ScoreRow, StandardizedRow};
use csv::WriterBuilder;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Header of the outlier score table.
pub const SCORE_HEADER: [&str; 14] = [
    "date",
    "hour",
    "weekday",
    "distance",
    "lof1",
    "lof3",
    "lof5",
    "lof10",
    "lof20",
    "lof30",
    "lof50",
    "global_pace",
    "expected_pace",
    "sd_pace",
];

/// Locations of the files written by [`write_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub scores: PathBuf,
    pub standardized: PathBuf,
}

/// Write score rows (header first, even when there are no rows).
pub fn write_scores<W: Write>(writer: W, rows: &[ScoreRow]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(SCORE_HEADER)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write standardized rows with one column per feature.
pub fn write_standardized<W: Write>(
    writer: W,
    feature_names: &[String],
    rows: &[StandardizedRow],
) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    let mut header = vec!["date".to_string(), "hour".to_string(), "weekday".to_string()];
    header.extend(feature_names.iter().cloned());
    wtr.write_record(&header)?;

    for row in rows {
        if row.values.len() != feature_names.len() {
            return Err(OutlierError::DimensionMismatch {
                expected: feature_names.len(),
                got: row.values.len(),
            });
        }
        wtr.serialize((
            row.key.date,
            row.key.hour,
            weekday_name(row.key.weekday),
            &row.values,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write both report tables into `dir` as `<prefix>outlier_scores.csv` and
/// `<prefix>zscore.csv`, creating the directory if needed.
pub fn write_report(dir: &Path, prefix: &str, report: &Report) -> Result<ReportPaths> {
    fs::create_dir_all(dir)
        .map_err(|e| OutlierError::Io(format!("{}: {e}", dir.display())))?;

    let paths = ReportPaths {
        scores: dir.join(format!("{prefix}outlier_scores.csv")),
        standardized: dir.join(format!("{prefix}zscore.csv")),
    };

    write_scores(create(&paths.scores)?, &report.scores)?;
    write_standardized(
        create(&paths.standardized)?,
        &report.feature_names,
        &report.standardized,
    )?;
    Ok(paths)
}

fn create(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| OutlierError::Io(format!("{}: {e}", path.display())))
}
