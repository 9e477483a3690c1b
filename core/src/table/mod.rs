
use std::{collections::HashMap, ops::Deref};

/// Returned when constructing or editing a [Table] would break its shape.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("row {row_index} has {actual} cells but the table has {expected} columns")]
    RowWidthMismatch {
        row_index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("column {index} is named {name:?}, the same as column {first_index}")]
    DuplicateColumn {
        name: String,
        first_index: usize,
        index: usize,
    },
    #[error("row {row} is out of range for a table with {len} rows")]
    RowOutOfRange { row: usize, len: usize },
    #[error("column {column} is out of range for a table with {width} columns")]
    ColumnOutOfRange { column: usize, width: usize },
    #[error("the table has no column named {name:?}")]
    UnknownColumn { name: String },
}

/// A table of string cells with named columns.
///
/// Column names are unique, and every row has exactly as many cells as there are columns.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Creates a table, checking that column names are unique and that every row has one cell
    /// per column.
    pub fn new<C, S, R>(columns: C, rows: R) -> Result<Self, TableError>
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
        R: IntoIterator,
        R::Item: Into<Row>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let rows: Vec<Row> = rows.into_iter().map(Into::into).collect();

        let mut seen: HashMap<&str, usize> = HashMap::with_capacity(columns.len());
        for (index, name) in columns.iter().enumerate() {
            if let Some(&first_index) = seen.get(name.as_str()) {
                return Err(TableError::DuplicateColumn {
                    name: name.clone(),
                    first_index,
                    index,
                });
            }
            seen.insert(name, index);
        }

        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TableError::RowWidthMismatch {
                    row_index,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }

        Ok(Self { columns, rows })
    }

    /// Creates a table sharing this table's columns with a subset of its rows.
    pub(crate) fn with_rows(&self, rows: &[Row]) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: rows.to_vec(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column called `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Replaces the cell at `row` and `column` (both 0-based).
    pub fn set_cell(
        &mut self,
        row: usize,
        column: usize,
        value: impl Into<String>,
    ) -> Result<(), TableError> {
        let len = self.rows.len();
        let width = self.columns.len();
        let cells = &mut self
            .rows
            .get_mut(row)
            .ok_or(TableError::RowOutOfRange { row, len })?
            .0;
        let cell = cells
            .get_mut(column)
            .ok_or(TableError::ColumnOutOfRange { column, width })?;
        *cell = value.into();
        Ok(())
    }
}

/// A single row of cells within a [Table].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Row(pub Vec<String>);

impl Deref for Row {
    type Target = Vec<String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<C, S> From<C> for Row
where
    C: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from(value: C) -> Self {
        Row(value.into_iter().map(Into::into).collect())
    }
}
