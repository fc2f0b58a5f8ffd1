//! Report assembly: joins merged scores with the global pace baseline.
//!
//! Rows come out in ascending (date, hour, weekday) order whatever order the
//! cohorts were scored in.

mod baseline;

pub use baseline::{BaselineValues, PaceBaseline};

use crate::core::serialize_weekday;
use crate::core::TimeSliceKey;
use crate::error::{OutlierError, Result};
use crate::pipeline::MergedScores;
use chrono::{NaiveDate, Weekday};
use serde::Serialize;

/// One row of the outlier score table.
///
/// Field names are the CSV header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    pub date: NaiveDate,
    pub hour: u8,
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    pub distance: f64,
    pub lof1: f64,
    pub lof3: f64,
    pub lof5: f64,
    pub lof10: f64,
    pub lof20: f64,
    pub lof30: f64,
    pub lof50: f64,
    pub global_pace: f64,
    pub expected_pace: f64,
    pub sd_pace: f64,
}

impl ScoreRow {
    pub fn key(&self) -> TimeSliceKey {
        TimeSliceKey::new(self.date, self.hour, self.weekday)
    }
}

/// One row of the standardized vector table.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardizedRow {
    pub key: TimeSliceKey,
    pub values: Vec<f64>,
}

/// Both output tables, sorted and ready to write.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub feature_names: Vec<String>,
    pub scores: Vec<ScoreRow>,
    pub standardized: Vec<StandardizedRow>,
}

impl Report {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Build the score and standardized tables from merged results.
///
/// Every scored time slice must have a global pace value.
pub fn assemble_report(
    merged: &MergedScores,
    baseline: &PaceBaseline,
    feature_names: &[String],
) -> Result<Report> {
    let mut scores = Vec::with_capacity(merged.len());
    for (key, record) in merged.scores() {
        let base = baseline
            .lookup(key)
            .ok_or(OutlierError::MissingBaseline(*key))?;
        let [lof1, lof3, lof5, lof10, lof20, lof30, lof50] = record.lof;
        scores.push(ScoreRow {
            date: key.date,
            hour: key.hour,
            weekday: key.weekday,
            distance: record.distance,
            lof1,
            lof3,
            lof5,
            lof10,
            lof20,
            lof30,
            lof50,
            global_pace: base.global_pace,
            expected_pace: base.expected_pace,
            sd_pace: base.sd_pace,
        });
    }

    let mut standardized = Vec::with_capacity(merged.len());
    for (key, values) in merged.standardized() {
        if values.len() != feature_names.len() {
            return Err(OutlierError::DimensionMismatch {
                expected: feature_names.len(),
                got: values.len(),
            });
        }
        standardized.push(StandardizedRow {
            key: *key,
            values: values.clone(),
        });
    }

    Ok(Report {
        feature_names: feature_names.to_vec(),
        scores,
        standardized,
    })
}
