//! Result merger: folds per-cohort outputs into two run-wide maps.

use super::worker::{CohortScores, ScoreRecord};
use crate::core::TimeSliceKey;
use crate::error::{OutlierError, Result};
use std::collections::BTreeMap;

/// Run-wide scores and standardized vectors keyed by time slice.
///
/// Both maps hold exactly the same keys. Iteration is in (date, hour, weekday)
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedScores {
    scores: BTreeMap<TimeSliceKey, ScoreRecord>,
    standardized: BTreeMap<TimeSliceKey, Vec<f64>>,
}

impl MergedScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one cohort's output. A key already present is a
    /// [`OutlierError::DuplicateKey`]; nothing from `part` is inserted then.
    pub fn absorb(&mut self, part: CohortScores) -> Result<()> {
        let CohortScores {
            scores,
            standardized,
            ..
        } = part;

        if scores.len() != standardized.len() {
            return Err(OutlierError::DimensionMismatch {
                expected: scores.len(),
                got: standardized.len(),
            });
        }
        if let Some(key) = scores
            .keys()
            .chain(standardized.keys())
            .find(|&k| self.scores.contains_key(k) || self.standardized.contains_key(k))
        {
            return Err(OutlierError::DuplicateKey(*key));
        }

        self.scores.extend(scores);
        self.standardized.extend(standardized);
        Ok(())
    }

    pub fn scores(&self) -> &BTreeMap<TimeSliceKey, ScoreRecord> {
        &self.scores
    }

    pub fn standardized(&self) -> &BTreeMap<TimeSliceKey, Vec<f64>> {
        &self.standardized
    }

    pub fn get(&self, key: &TimeSliceKey) -> Option<(&ScoreRecord, &[f64])> {
        let record = self.scores.get(key)?;
        let z = self.standardized.get(key)?;
        Some((record, z.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Merge per-cohort outputs in any order.
pub fn merge_results<I>(parts: I) -> Result<MergedScores>
where
    I: IntoIterator<Item = CohortScores>,
{
    let mut merged = MergedScores::new();
    for part in parts {
        merged.absorb(part)?;
    }
    Ok(merged)
}
