//! CSV input and output.
//!
//! Inputs are header-driven: `Date`, `Hour` and `Weekday` columns are located
//! by name, feature columns are every column after the first three, and the
//! global file carries a `Pace` column. Outputs are written with fixed
//! lowercase headers in report order.

mod reader;
mod writer;

pub use reader::{read_feature_table, read_feature_table_from, read_global_pace, read_global_pace_from};
pub use writer::{
    write_report, write_scores, write_standardized, ReportPaths, SCORE_HEADER,
};
