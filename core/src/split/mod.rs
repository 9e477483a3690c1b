//! Partitioning a table into contiguous sub-tables at split points.


use std::ops::Range;

use crate::table::Table;

/// Reasons that split points cannot be created, edited or applied.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SplitError {
    #[error("cannot split a table into zero parts")]
    ZeroParts,
    #[error("split point {index} is not editable; only points 1 to {last_interior} may be edited")]
    NotInterior { index: usize, last_interior: usize },
    #[error("split point value {value} is outside the table rows 0 to {table_len}")]
    OutOfRange { value: usize, table_len: usize },
    #[error("split point {index} with value {value} is before the previous split point {previous}")]
    BeforePrevious {
        index: usize,
        value: usize,
        previous: usize,
    },
    #[error("split point {index} with value {value} is after the next split point {next}")]
    AfterNext {
        index: usize,
        value: usize,
        next: usize,
    },
    #[error("split points were made for a table of {expected} rows, but the table has {actual}")]
    TableLengthMismatch { expected: usize, actual: usize },
}

/// Boundaries between consecutive sub-tables of a table with `table_len` rows.
///
/// The first point is always 0 and the last is always `table_len`. Points never decrease, so
/// each adjacent pair describes one sub-table (possibly empty) and together they cover every row
/// exactly once.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SplitPoints {
    points: Vec<usize>,
}

impl SplitPoints {
    /// Evenly spaced split points dividing `table_len` rows into `parts` sub-tables. Interior
    /// point `i` is `floor(i * table_len / parts)`.
    pub fn even(table_len: usize, parts: usize) -> Result<Self, SplitError> {
        if parts == 0 {
            return Err(SplitError::ZeroParts);
        }

        let mut points = Vec::with_capacity(parts + 1);
        points.push(0);
        points.extend((1..parts).map(|i| i * table_len / parts));
        points.push(table_len);

        Ok(Self { points })
    }

    /// Split points built from explicitly chosen interior points. The interior points must be
    /// non-decreasing and within `0..=table_len`.
    pub fn from_interior(table_len: usize, interior: &[usize]) -> Result<Self, SplitError> {
        let mut points = Vec::with_capacity(interior.len() + 2);
        points.push(0);

        for (offset, &value) in interior.iter().enumerate() {
            let index = offset + 1;
            if value > table_len {
                return Err(SplitError::OutOfRange { value, table_len });
            }
            let previous = points[index - 1];
            if value < previous {
                return Err(SplitError::BeforePrevious {
                    index,
                    value,
                    previous,
                });
            }
            points.push(value);
        }

        points.push(table_len);
        Ok(Self { points })
    }

    /// Edits the interior point at `index` (counting the leading 0 as index 0). On error the
    /// points are left unchanged.
    pub fn set(&mut self, index: usize, value: usize) -> Result<(), SplitError> {
        let last_interior = self.points.len() - 2;
        if index == 0 || index > last_interior {
            return Err(SplitError::NotInterior {
                index,
                last_interior,
            });
        }

        let table_len = self.table_len();
        if value > table_len {
            return Err(SplitError::OutOfRange { value, table_len });
        }

        let previous = self.points[index - 1];
        if value < previous {
            return Err(SplitError::BeforePrevious {
                index,
                value,
                previous,
            });
        }

        let next = self.points[index + 1];
        if value > next {
            return Err(SplitError::AfterNext { index, value, next });
        }

        self.points[index] = value;
        Ok(())
    }

    /// All points, including the leading 0 and trailing table length.
    pub fn points(&self) -> &[usize] {
        &self.points
    }

    /// Only the editable points between the first and last.
    pub fn interior(&self) -> &[usize] {
        &self.points[1..self.points.len() - 1]
    }

    /// Number of rows in the table these points were made for.
    pub fn table_len(&self) -> usize {
        self.points[self.points.len() - 1]
    }

    /// Number of sub-tables the points describe.
    pub fn parts(&self) -> usize {
        self.points.len() - 1
    }

    /// Row index ranges of each sub-table, in order.
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.points.windows(2).map(|pair| pair[0]..pair[1])
    }
}

/// Splits `table` into one sub-table per range of `points`.
pub fn split(table: &Table, points: &SplitPoints) -> Result<Vec<Table>, SplitError> {
    if points.table_len() != table.len() {
        return Err(SplitError::TableLengthMismatch {
            expected: points.table_len(),
            actual: table.len(),
        });
    }

    log::debug!(
        "Splitting {} rows at points {:?}.",
        table.len(),
        points.points()
    );

    Ok(points
        .ranges()
        .map(|range| table.with_rows(&table.rows()[range]))
        .collect())
}
