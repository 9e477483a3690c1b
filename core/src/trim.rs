//! Restricting a [Table] to a contiguous, inclusive range of rows.

use crate::table::Table;

/// Inclusive range of row indices within a table of known length.
///
/// Always satisfies `start <= end < table_len`, so a trimmed table has at least one row.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TrimRange {
    start: usize,
    end: usize,
}

impl TrimRange {
    /// Creates a range covering every row of a table with `len` rows. Returns [None] for an
    /// empty table.
    pub fn full(len: usize) -> Option<Self> {
        Self::clamped(0, usize::MAX, len)
    }

    /// Creates a range from `start` and `end` clamped into `0..=len-1`. If `start` lands after
    /// `end`, the range is narrowed to the single row at `start`. Returns [None] for an empty
    /// table.
    pub fn clamped(start: usize, end: usize, len: usize) -> Option<Self> {
        let last = len.checked_sub(1)?;
        let start = start.min(last);
        let end = end.min(last).max(start);
        Some(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of rows in the range, which is at least 1.
    pub fn row_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Returns the rows of `table` within the inclusive range `start..=end`, after clamping both
/// indices to the table. Trimming an empty table returns an empty table.
pub fn trim(table: &Table, start: usize, end: usize) -> Table {
    match TrimRange::clamped(start, end, table.len()) {
        Some(range) => trim_to(table, range),
        None => table.with_rows(&[]),
    }
}

/// Returns the rows of `table` within `range`. The range is re-clamped if it was built for a
/// longer table.
pub fn trim_to(table: &Table, range: TrimRange) -> Table {
    match TrimRange::clamped(range.start, range.end, table.len()) {
        Some(range) => {
            log::debug!(
                "Trimming {} rows to rows {}..={}.",
                table.len(),
                range.start,
                range.end
            );
            table.with_rows(&table.rows()[range.start..=range.end])
        }
        None => table.with_rows(&[]),
    }
}
