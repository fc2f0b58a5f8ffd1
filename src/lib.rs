//! # pace-outliers
//!
//! Outlier scoring for repeating time-sliced measurements.
//!
//! Observations (one feature vector per date and hour) are grouped into
//! weekday/hour cohorts, so every Wednesday at 5pm is compared against all
//! other Wednesdays at 5pm. Each cohort gets a parametric distance score
//! (Mahalanobis, full or diagonal spread) and density-ratio scores (LOF at
//! k = 1, 3, 5, 10, 20, 30, 50). Cohorts are scored in parallel and merged into
//! a single table keyed by (date, hour, weekday).

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::needless_range_loop)]

pub mod config;
pub mod core;
pub mod detection;
pub mod error;
pub mod io;
pub mod linalg;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod utils;

pub use error::{OutlierError, Result};

pub mod prelude {
    pub use crate::config::{DatasetVariant, RunConfig};
    pub use crate::core::{Cohort, CohortKey, CohortSet, FeatureTable, Observation, TimeSliceKey};
    pub use crate::detection::{MahalanobisConfig, SpreadMode, LOF_K_VALUES};
    pub use crate::error::{OutlierError, Result};
    pub use crate::pipeline::{score_cohorts, MergedScores, ScoreRecord};
    pub use crate::runner::{run, RunSummary};
}
