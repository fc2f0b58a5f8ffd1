//! Utility functions shared by the scorers and the report assembler.

pub mod stats;

pub use stats::{column_means, column_variances, covariance_matrix, mean, std_dev, variance};
