//! Core data structures: time-slice keys, observations and weekday/hour cohorts.

mod cohort;
mod key;
mod observation;

pub use cohort::{Cohort, CohortKey, CohortSet};
pub(crate) use key::serialize_weekday;
pub use key::{parse_weekday, weekday_name, TimeSliceKey};
pub use observation::{FeatureTable, Observation};
