//! Global pace baseline.
//!
//! The expected pace of a time slice is the mean global pace over every date
//! with the same weekday and hour; `sd_pace` is the sample standard deviation
//! of that group (0 when the group has a single date).

use crate::core::{CohortKey, TimeSliceKey};
use crate::utils::stats::{mean, std_dev};
use std::collections::{BTreeMap, HashMap};

/// Observed, expected and spread of the global pace for one time slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineValues {
    pub global_pace: f64,
    pub expected_pace: f64,
    pub sd_pace: f64,
}

/// Global pace per time slice plus per-weekday/hour expectations.
#[derive(Debug, Clone, Default)]
pub struct PaceBaseline {
    global: BTreeMap<TimeSliceKey, f64>,
    expected: HashMap<CohortKey, (f64, f64)>,
}

impl PaceBaseline {
    pub fn from_global_pace(global: BTreeMap<TimeSliceKey, f64>) -> Self {
        let mut grouped: HashMap<CohortKey, Vec<f64>> = HashMap::new();
        for (key, &pace) in &global {
            grouped.entry(CohortKey::from(key)).or_default().push(pace);
        }

        let expected = grouped
            .into_iter()
            .map(|(cohort, paces)| {
                let sd = if paces.len() < 2 { 0.0 } else { std_dev(&paces) };
                (cohort, (mean(&paces), sd))
            })
            .collect();

        Self { global, expected }
    }

    pub fn lookup(&self, key: &TimeSliceKey) -> Option<BaselineValues> {
        let global_pace = *self.global.get(key)?;
        let &(expected_pace, sd_pace) = self.expected.get(&CohortKey::from(key))?;
        Some(BaselineValues {
            global_pace,
            expected_pace,
            sd_pace,
        })
    }

    pub fn len(&self) -> usize {
        self.global.len()
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty()
    }
}
