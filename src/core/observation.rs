//! Parsed per-time-slice feature vectors.

use super::key::TimeSliceKey;
use crate::error::{OutlierError, Result};

/// One feature vector (one component per trip type) for one time slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub key: TimeSliceKey,
    pub values: Vec<f64>,
}

impl Observation {
    pub fn new(key: TimeSliceKey, values: Vec<f64>) -> Self {
        Self { key, values }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }
}

/// A loaded feature table: named feature columns plus observations in read order.
///
/// Every observation is checked against the number of feature columns when it
/// is pushed, so downstream stages can rely on a single fixed dimension.
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    feature_names: Vec<String>,
    observations: Vec<Observation>,
}

impl FeatureTable {
    pub fn new(feature_names: Vec<String>) -> Self {
        Self {
            feature_names,
            observations: Vec::new(),
        }
    }

    /// Append an observation, rejecting vectors of the wrong dimension.
    pub fn push(&mut self, observation: Observation) -> Result<()> {
        if observation.dimension() != self.dimension() {
            return Err(OutlierError::DimensionMismatch {
                expected: self.dimension(),
                got: observation.dimension(),
            });
        }
        self.observations.push(observation);
        Ok(())
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn dimension(&self) -> usize {
        self.feature_names.len()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
