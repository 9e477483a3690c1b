//! Trims, edits and splits a table extracted from a PDF, and exports the results as CSV files and
//! a combined SurveyJS survey definition.

pub mod config;
pub mod edit;
pub mod export;
pub mod extraction;
pub mod sink;
pub mod split;
pub mod survey;
pub mod table;
#[cfg(test)]
mod testutil;
pub mod trim;
pub mod upload;

pub use edit::CellEdit;
pub use split::{SplitError, SplitPoints};
pub use survey::{Survey, SurveyOptions};
pub use table::{Row, Table, TableError};
pub use trim::TrimRange;
pub use upload::{Upload, UploadError};
