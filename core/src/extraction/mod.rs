//! Table extraction from uploaded PDFs.
//!
//! No real extraction engine exists; [MockExtractor] stands in for one and returns a fixed
//! table after a delay.

pub mod session;

use std::{thread, time::Duration};

use anyhow::Result;

use crate::{
    table::{Table, TableError},
    upload::Upload,
};

/// Returned when an extractor finds nothing to work with.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error("no tables found in the PDF")]
    NoTables,
}

/// Reads tables from an uploaded PDF.
pub trait TableExtractor: Send {
    /// Returns every table found in `upload`, in document order.
    fn extract(&self, upload: &Upload) -> Result<Vec<Table>>;
}

/// Returns the first table that `extractor` finds in `upload`.
pub fn extract_first(extractor: &dyn TableExtractor, upload: &Upload) -> Result<Table> {
    let tables = extractor.extract(upload)?;
    log::debug!("Found {} tables in {:?}.", tables.len(), upload.name());
    tables
        .into_iter()
        .next()
        .ok_or_else(|| ExtractError::NoTables.into())
}

/// Pretends to extract a table, returning [mock_table] after sleeping for `delay`.
#[derive(Clone, Copy, Debug)]
pub struct MockExtractor {
    delay: Duration,
}

impl MockExtractor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl TableExtractor for MockExtractor {
    fn extract(&self, upload: &Upload) -> Result<Vec<Table>> {
        log::info!(
            "Extracting tables from {:?} ({} bytes).",
            upload.name(),
            upload.bytes().len()
        );
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        Ok(vec![mock_table()?])
    }
}

/// The fixed table returned by [MockExtractor].
pub fn mock_table() -> Result<Table, TableError> {
    Table::new(
        ["Item", "Quantity", "Price"],
        [
            ["Laptop", "2", "1200"],
            ["Mouse", "10", "25"],
            ["Keyboard", "5", "45"],
            ["Monitor", "3", "300"],
            ["Printer", "1", "150"],
        ],
    )
}
