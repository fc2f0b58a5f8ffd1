//! Run configuration.

use crate::detection::{MahalanobisConfig, SpreadMode};
use crate::error::{OutlierError, Result};
use std::path::{Path, PathBuf};

/// Which feature table to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatasetVariant {
    /// Region-pair (coarse) pace features.
    #[default]
    Coarse,
    /// Link-level pace features.
    Link,
}

impl DatasetVariant {
    /// Feature file name inside the input directory.
    pub fn feature_file(&self) -> &'static str {
        match self {
            DatasetVariant::Coarse => "pace_features.csv",
            DatasetVariant::Link => "link_pace_features.csv",
        }
    }

    /// Prefix for output file names.
    pub fn output_prefix(&self) -> &'static str {
        match self {
            DatasetVariant::Coarse => "coarse_",
            DatasetVariant::Link => "link_",
        }
    }

    /// Spread mode used when none is configured. Link-level tables have many
    /// more dimensions than a cohort has dates, so they default to diagonal
    /// spread.
    pub fn default_spread(&self) -> SpreadMode {
        match self {
            DatasetVariant::Coarse => SpreadMode::Full,
            DatasetVariant::Link => SpreadMode::Independent,
        }
    }
}

/// Global pace file name inside the input directory.
pub const GLOBAL_PACE_FILE: &str = "global_features.csv";

/// Configuration for one batch run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory holding the feature and global pace tables.
    pub input_dir: PathBuf,
    /// Directory receiving the output tables.
    pub output_dir: PathBuf,
    /// Feature table variant.
    pub variant: DatasetVariant,
    /// Spread mode override; `None` uses the variant default.
    pub spread_mode: Option<SpreadMode>,
    /// Worker pool size.
    pub workers: usize,
    /// Correlation eigenvalue floor for the distance scorer.
    pub eigen_floor: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("4year_features"),
            output_dir: PathBuf::from("results"),
            variant: DatasetVariant::Coarse,
            spread_mode: None,
            workers: 8,
            eigen_floor: MahalanobisConfig::default().eigen_floor,
        }
    }
}

impl RunConfig {
    /// Set input directory.
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    /// Set output directory.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set dataset variant.
    pub fn variant(mut self, variant: DatasetVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Override the spread mode.
    pub fn spread_mode(mut self, mode: SpreadMode) -> Self {
        self.spread_mode = Some(mode);
        self
    }

    /// Set worker pool size.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the correlation eigenvalue floor.
    pub fn eigen_floor(mut self, floor: f64) -> Self {
        self.eigen_floor = floor;
        self
    }

    /// Spread mode after applying the variant default.
    pub fn resolved_spread(&self) -> SpreadMode {
        self.spread_mode
            .unwrap_or_else(|| self.variant.default_spread())
    }

    pub fn mahalanobis_config(&self) -> MahalanobisConfig {
        MahalanobisConfig::default()
            .mode(self.resolved_spread())
            .eigen_floor(self.eigen_floor)
    }

    pub fn feature_path(&self) -> PathBuf {
        self.input_dir.join(self.variant.feature_file())
    }

    pub fn global_pace_path(&self) -> PathBuf {
        self.input_dir.join(GLOBAL_PACE_FILE)
    }

    pub fn output_path(&self) -> &Path {
        &self.output_dir
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(OutlierError::InvalidParameter(
                "worker count must be at least 1".into(),
            ));
        }
        if !(self.eigen_floor > 0.0 && self.eigen_floor.is_finite()) {
            return Err(OutlierError::InvalidParameter(format!(
                "eigen_floor must be positive and finite, got {}",
                self.eigen_floor
            )));
        }
        Ok(())
    }
}
