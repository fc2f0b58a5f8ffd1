//! End-to-end batch run: read, group, score, merge, report, write.

use crate::config::RunConfig;
use crate::core::CohortSet;
use crate::error::Result;
use crate::io::{read_feature_table, read_global_pace, write_report, ReportPaths};
use crate::pipeline::score_cohorts;
use crate::report::{assemble_report, PaceBaseline};
use tracing::info;

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub cohorts: usize,
    pub observations: usize,
    pub paths: ReportPaths,
}

/// Execute one run. Nothing is written unless every cohort scores cleanly.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    config.validate()?;

    info!(dir = %config.input_dir.display(), variant = ?config.variant, "reading files");
    let table = read_feature_table(&config.feature_path())?;
    let global = read_global_pace(&config.global_pace_path())?;
    let baseline = PaceBaseline::from_global_pace(global);
    info!(
        observations = table.len(),
        features = table.dimension(),
        global_slices = baseline.len(),
        "loaded input"
    );

    let cohorts = CohortSet::from_table(&table)?;
    let merged = score_cohorts(&cohorts, &config.mahalanobis_config(), config.workers)?;
    let report = assemble_report(&merged, &baseline, table.feature_names())?;

    info!(dir = %config.output_dir.display(), rows = report.len(), "writing files");
    let paths = write_report(&config.output_dir, config.variant.output_prefix(), &report)?;
    info!("done");

    Ok(RunSummary {
        cohorts: cohorts.len(),
        observations: cohorts.observation_count(),
        paths,
    })
}
