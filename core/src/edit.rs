//! Manual corrections to individual cells of a [Table], such as fixing values that extraction
//! misread.

use std::str::FromStr;

use crate::table::{Table, TableError};

/// Replacement of the cell in one row and named column.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CellEdit {
    /// 0-based index of the row within the table being edited.
    pub row: usize,
    pub column: String,
    pub value: String,
}

/// Returned when text does not have the form `ROW,COLUMN=VALUE`.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum CellEditParseError {
    #[error("expected ROW,COLUMN=VALUE but found no '='")]
    MissingValue,
    #[error("expected ROW,COLUMN=VALUE but found no ',' before '='")]
    MissingColumn,
    #[error("row {0:?} is not a row index")]
    InvalidRow(String),
    #[error("column name is empty")]
    EmptyColumn,
}

impl CellEdit {
    pub fn new(row: usize, column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            row,
            column: column.into(),
            value: value.into(),
        }
    }

    /// Applies the edit to `table` in place.
    pub fn apply(&self, table: &mut Table) -> Result<(), TableError> {
        let column = table
            .column_index(&self.column)
            .ok_or_else(|| TableError::UnknownColumn {
                name: self.column.clone(),
            })?;
        table.set_cell(self.row, column, self.value.as_str())
    }
}

/// Parses `ROW,COLUMN=VALUE`. The value is everything after the first `=`, so it may itself
/// contain `,` or `=`.
impl FromStr for CellEdit {
    type Err = CellEditParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (target, value) = s.split_once('=').ok_or(CellEditParseError::MissingValue)?;
        let (row, column) = target
            .split_once(',')
            .ok_or(CellEditParseError::MissingColumn)?;

        let row = row
            .trim()
            .parse()
            .map_err(|_| CellEditParseError::InvalidRow(row.to_string()))?;
        if column.is_empty() {
            return Err(CellEditParseError::EmptyColumn);
        }

        Ok(Self::new(row, column, value))
    }
}

/// Returns a copy of `table` with every edit applied in order. If any edit fails, no edits are
/// kept.
pub fn apply_edits(table: &Table, edits: &[CellEdit]) -> Result<Table, TableError> {
    let mut edited = table.clone();
    for edit in edits {
        log::debug!(
            "Setting row {} column {:?} to {:?}.",
            edit.row,
            edit.column,
            edit.value
        );
        edit.apply(&mut edited)?;
    }
    Ok(edited)
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use test_casing::{TestCases, cases, test_casing};

    use super::*;
    use crate::{
        testutil::{first_cells, mock_table},
        trim::trim,
    };

    type ParseResult = std::result::Result<CellEdit, CellEditParseError>;

    const PARSE_CASES: TestCases<(&str, ParseResult)> = cases! {
        [
            ("0,Price=30", Ok(CellEdit::new(0, "Price", "30"))),
            ("12,Item=", Ok(CellEdit::new(12, "Item", ""))),
            ("1,Item=a,b=c", Ok(CellEdit::new(1, "Item", "a,b=c"))),
            (" 2,Item=x", Ok(CellEdit::new(2, "Item", "x"))),
            ("0,Price", Err(CellEditParseError::MissingValue)),
            ("0=30", Err(CellEditParseError::MissingColumn)),
            ("-1,Price=30", Err(CellEditParseError::InvalidRow("-1".to_string()))),
            ("0,=30", Err(CellEditParseError::EmptyColumn)),
        ]
    };

    #[test_casing(8, PARSE_CASES)]
    #[gtest]
    fn test_parse(text: &str, expected: ParseResult) {
        expect_eq!(text.parse::<CellEdit>(), expected);
    }

    #[gtest]
    fn test_apply_edits_to_trimmed_table() -> anyhow::Result<()> {
        let trimmed = trim(&mock_table(), 1, 3);
        let edited = apply_edits(
            &trimmed,
            &[
                CellEdit::new(0, "Price", "30"),
                CellEdit::new(2, "Item", "Display"),
            ],
        )?;

        expect_eq!(
            first_cells(&edited),
            vec!["Mouse".to_string(), "Keyboard".into(), "Display".into()]
        );
        expect_eq!(edited.rows()[0][2], "30");
        expect_eq!(edited.columns(), trimmed.columns());
        Ok(())
    }

    #[gtest]
    fn test_apply_edits_unknown_column() {
        let table = mock_table();

        expect_eq!(
            apply_edits(&table, &[CellEdit::new(0, "Colour", "red")]),
            Err(TableError::UnknownColumn {
                name: "Colour".to_string(),
            })
        );
    }

    #[gtest]
    fn test_apply_edits_row_out_of_range() {
        let table = trim(&mock_table(), 1, 3);

        expect_eq!(
            apply_edits(
                &table,
                &[CellEdit::new(0, "Price", "30"), CellEdit::new(3, "Price", "1")]
            ),
            Err(TableError::RowOutOfRange { row: 3, len: 3 })
        );
    }
}
