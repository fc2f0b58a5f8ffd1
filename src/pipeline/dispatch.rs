//! Parallel dispatch of cohort workers over a fixed-size thread pool.

use super::worker::{score_cohort, CohortScores};
use crate::core::Cohort;
use crate::detection::MahalanobisConfig;
use crate::error::{OutlierError, Result};
use rayon::prelude::*;

/// Score each cohort exactly once on a dedicated pool of `workers` threads.
///
/// Returns one [`CohortScores`] per input cohort. The first cohort failure
/// aborts the whole dispatch.
pub fn dispatch(
    cohorts: &[Cohort],
    config: &MahalanobisConfig,
    workers: usize,
) -> Result<Vec<CohortScores>> {
    if workers == 0 {
        return Err(OutlierError::InvalidParameter(
            "worker count must be at least 1".into(),
        ));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("cohort-worker-{i}"))
        .build()
        .map_err(|e| OutlierError::ComputationError(format!("failed to build worker pool: {e}")))?;

    let outputs: Vec<CohortScores> = pool.install(|| {
        cohorts
            .par_iter()
            .map(|cohort| score_cohort(cohort, config))
            .collect::<Result<Vec<_>>>()
    })?;

    if outputs.len() != cohorts.len() {
        return Err(OutlierError::ComputationError(format!(
            "collected {} cohort results for {} cohorts",
            outputs.len(),
            cohorts.len()
        )));
    }
    Ok(outputs)
}
