use clap::{Parser, ValueEnum};
use pace_outliers::config::{DatasetVariant, RunConfig};
use pace_outliers::detection::SpreadMode;
use pace_outliers::runner::run;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    Coarse,
    Link,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SpreadArg {
    Full,
    Independent,
}

/// Score weekday/hour outliers in time-sliced pace features.
#[derive(Debug, Parser)]
#[command(name = "pace-outliers", version)]
struct Cli {
    /// Directory with pace_features.csv (or link_pace_features.csv) and global_features.csv
    #[arg(short, long, default_value = "4year_features")]
    input: PathBuf,

    /// Directory for the score and z-score tables
    #[arg(short, long, default_value = "results")]
    output: PathBuf,

    /// Feature table to score
    #[arg(long, value_enum, default_value_t = VariantArg::Coarse)]
    variant: VariantArg,

    /// Spread estimate for the distance score (defaults per variant)
    #[arg(long, value_enum)]
    spread: Option<SpreadArg>,

    /// Worker threads
    #[arg(short, long, default_value_t = 8)]
    workers: usize,

    /// Eigenvalue floor for a singular feature correlation matrix
    #[arg(long, default_value_t = 1e-6)]
    eigen_floor: f64,
}

impl Cli {
    fn into_config(self) -> RunConfig {
        let variant = match self.variant {
            VariantArg::Coarse => DatasetVariant::Coarse,
            VariantArg::Link => DatasetVariant::Link,
        };
        let mut config = RunConfig::default()
            .input_dir(self.input)
            .output_dir(self.output)
            .variant(variant)
            .workers(self.workers)
            .eigen_floor(self.eigen_floor);
        if let Some(spread) = self.spread {
            config = config.spread_mode(match spread {
                SpreadArg::Full => SpreadMode::Full,
                SpreadArg::Independent => SpreadMode::Independent,
            });
        }
        config
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pace_outliers=info".into()),
        )
        .init();

    let config = Cli::parse().into_config();
    match run(&config) {
        Ok(summary) => {
            tracing::info!(
                cohorts = summary.cohorts,
                observations = summary.observations,
                scores = %summary.paths.scores.display(),
                zscores = %summary.paths.standardized.display(),
                "run complete"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
