//! Cohort builder: groups observations by (weekday, hour).
//!
//! A cohort holds two parallel sequences, the feature vectors and the dates
//! they came from. Both are appended together and never reordered, so index
//! `i` of one always describes index `i` of the other.

use super::key::{weekday_name, TimeSliceKey};
use super::observation::{FeatureTable, Observation};
use crate::error::{OutlierError, Result};
use chrono::{NaiveDate, Weekday};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Identifies a cohort: every observation on this weekday at this hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CohortKey {
    pub weekday: Weekday,
    pub hour: u8,
}

impl CohortKey {
    pub fn new(weekday: Weekday, hour: u8) -> Self {
        Self { weekday, hour }
    }

    /// Full key of the observation at `date` within this cohort.
    pub fn slice_key(&self, date: NaiveDate) -> TimeSliceKey {
        TimeSliceKey::new(date, self.hour, self.weekday)
    }
}

impl From<&TimeSliceKey> for CohortKey {
    fn from(key: &TimeSliceKey) -> Self {
        Self::new(key.weekday, key.hour)
    }
}

impl Ord for CohortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weekday
            .num_days_from_monday()
            .cmp(&other.weekday.num_days_from_monday())
            .then(self.hour.cmp(&other.hour))
    }
}

impl PartialOrd for CohortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CohortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", weekday_name(self.weekday), self.hour)
    }
}

/// All observations sharing one weekday and hour, in input read order.
#[derive(Debug, Clone, PartialEq)]
pub struct Cohort {
    key: CohortKey,
    vectors: Vec<Vec<f64>>,
    dates: Vec<NaiveDate>,
}

impl Cohort {
    pub fn new(key: CohortKey) -> Self {
        Self {
            key,
            vectors: Vec::new(),
            dates: Vec::new(),
        }
    }

    /// Build a cohort from already-aligned vectors and dates.
    pub fn from_parts(key: CohortKey, vectors: Vec<Vec<f64>>, dates: Vec<NaiveDate>) -> Result<Self> {
        if vectors.len() != dates.len() {
            return Err(OutlierError::DimensionMismatch {
                expected: vectors.len(),
                got: dates.len(),
            });
        }
        Ok(Self {
            key,
            vectors,
            dates,
        })
    }

    fn push(&mut self, date: NaiveDate, vector: Vec<f64>) {
        self.vectors.push(vector);
        self.dates.push(date);
    }

    pub fn key(&self) -> CohortKey {
        self.key
    }

    pub fn vectors(&self) -> &[Vec<f64>] {
        &self.vectors
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Full time-slice keys, positionally aligned with `vectors()`.
    pub fn slice_keys(&self) -> impl Iterator<Item = TimeSliceKey> + '_ {
        self.dates.iter().map(move |&date| self.key.slice_key(date))
    }
}

/// The partition of a feature table into weekday/hour cohorts.
#[derive(Debug, Clone, Default)]
pub struct CohortSet {
    dimension: usize,
    cohorts: BTreeMap<CohortKey, Cohort>,
}

impl CohortSet {
    /// Group a loaded feature table.
    pub fn from_table(table: &FeatureTable) -> Result<Self> {
        Self::from_observations(table.dimension(), table.observations().iter().cloned())
    }

    /// Group observations, preserving their order within each cohort.
    pub fn from_observations<I>(dimension: usize, observations: I) -> Result<Self>
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut cohorts: BTreeMap<CohortKey, Cohort> = BTreeMap::new();
        for obs in observations {
            if obs.dimension() != dimension {
                return Err(OutlierError::DimensionMismatch {
                    expected: dimension,
                    got: obs.dimension(),
                });
            }
            let cohort_key = CohortKey::from(&obs.key);
            cohorts
                .entry(cohort_key)
                .or_insert_with(|| Cohort::new(cohort_key))
                .push(obs.key.date, obs.values);
        }
        Ok(Self { dimension, cohorts })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn get(&self, key: &CohortKey) -> Option<&Cohort> {
        self.cohorts.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cohort> {
        self.cohorts.values()
    }

    /// Number of cohorts (at most 7 * 24).
    pub fn len(&self) -> usize {
        self.cohorts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty()
    }

    /// Total number of observations across all cohorts.
    pub fn observation_count(&self) -> usize {
        self.cohorts.values().map(Cohort::len).sum()
    }

    pub fn into_cohorts(self) -> Vec<Cohort> {
        self.cohorts.into_values().collect()
    }
}
