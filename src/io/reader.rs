//! Readers for the pace feature table and the global pace table.

use crate::core::{parse_weekday, FeatureTable, Observation, TimeSliceKey};
use crate::error::{OutlierError, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Number of leading key columns (date, hour, weekday).
const KEY_COLUMNS: usize = 3;

/// Positions of the key columns in a header row.
struct KeyColumns {
    date: usize,
    hour: usize,
    weekday: usize,
}

impl KeyColumns {
    fn locate(headers: &StringRecord) -> Result<Self> {
        Ok(Self {
            date: find_column(headers, "Date")?,
            hour: find_column(headers, "Hour")?,
            weekday: find_column(headers, "Weekday")?,
        })
    }

    fn parse(&self, record: &StringRecord, line: usize) -> Result<TimeSliceKey> {
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let date = NaiveDate::parse_from_str(field(self.date), "%Y-%m-%d").map_err(|e| {
            OutlierError::Parse {
                line,
                message: format!("invalid date '{}': {e}", field(self.date)),
            }
        })?;
        let hour: u8 = field(self.hour)
            .parse()
            .ok()
            .filter(|h| *h < 24)
            .ok_or_else(|| OutlierError::Parse {
                line,
                message: format!("invalid hour '{}'", field(self.hour)),
            })?;
        let weekday = parse_weekday(field(self.weekday)).ok_or_else(|| OutlierError::Parse {
            line,
            message: format!("invalid weekday '{}'", field(self.weekday)),
        })?;

        Ok(TimeSliceKey::new(date, hour, weekday))
    }
}

fn find_column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| OutlierError::Parse {
            line: 1,
            message: format!("missing '{name}' column"),
        })
}

fn parse_value(s: &str, line: usize) -> Result<f64> {
    s.parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
        .ok_or_else(|| OutlierError::Parse {
            line,
            message: format!("invalid number '{s}'"),
        })
}

fn line_of(record: &StringRecord, fallback: usize) -> usize {
    record
        .position()
        .map_or(fallback, |p| p.line() as usize)
}

/// Read a pace feature table from a CSV file.
pub fn read_feature_table(path: &Path) -> Result<FeatureTable> {
    let file = File::open(path)
        .map_err(|e| OutlierError::Io(format!("{}: {e}", path.display())))?;
    read_feature_table_from(file)
}

/// Read a pace feature table from any reader.
///
/// Rows whose field count differs from the header are a
/// [`OutlierError::DimensionMismatch`]; non-finite values (`NaN`, `inf`) are a
/// parse error and a table without data rows is [`OutlierError::EmptyData`].
pub fn read_feature_table_from<R: Read>(reader: R) -> Result<FeatureTable> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let columns = KeyColumns::locate(&headers)?;
    if headers.len() <= KEY_COLUMNS {
        return Err(OutlierError::Parse {
            line: 1,
            message: "no feature columns after date, hour and weekday".into(),
        });
    }

    let feature_names = headers.iter().skip(KEY_COLUMNS).map(String::from).collect();
    let mut table = FeatureTable::new(feature_names);

    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let line = line_of(&record, i + 2);
        if record.len() != headers.len() {
            return Err(OutlierError::DimensionMismatch {
                expected: headers.len() - KEY_COLUMNS,
                got: record.len().saturating_sub(KEY_COLUMNS),
            });
        }

        let key = columns.parse(&record, line)?;
        let values = record
            .iter()
            .skip(KEY_COLUMNS)
            .map(|s| parse_value(s, line))
            .collect::<Result<Vec<_>>>()?;
        table.push(Observation::new(key, values))?;
    }

    if table.is_empty() {
        return Err(OutlierError::EmptyData);
    }
    Ok(table)
}

/// Read the global pace table from a CSV file.
pub fn read_global_pace(path: &Path) -> Result<BTreeMap<TimeSliceKey, f64>> {
    let file = File::open(path)
        .map_err(|e| OutlierError::Io(format!("{}: {e}", path.display())))?;
    read_global_pace_from(file)
}

/// Read the global pace table from any reader.
pub fn read_global_pace_from<R: Read>(reader: R) -> Result<BTreeMap<TimeSliceKey, f64>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let columns = KeyColumns::locate(&headers)?;
    let pace_col = find_column(&headers, "Pace")?;

    let mut global = BTreeMap::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let line = line_of(&record, i + 2);
        let key = columns.parse(&record, line)?;
        let pace = parse_value(record.get(pace_col).unwrap_or(""), line)?;
        if global.insert(key, pace).is_some() {
            return Err(OutlierError::DuplicateKey(key));
        }
    }
    Ok(global)
}
