use crate::{extraction, table::Table};

/// Builds a [Table] for tests, panicking if the rows do not match the columns.
pub fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
    Table::new(
        columns.iter().copied(),
        rows.iter().map(|row| row.iter().copied()),
    )
    .expect("test table rows should match columns")
}

/// Returns the first cell of each row, which identifies rows in most test tables.
pub fn first_cells(table: &Table) -> Vec<String> {
    table.rows().iter().map(|row| row[0].clone()).collect()
}

/// Builds a single column table with `n` rows named "r0", "r1", ...
pub fn numbered_table(n: usize) -> Table {
    Table::new(["id"], (0..n).map(|i| [format!("r{i}")])).expect("single column rows are valid")
}

/// The table returned by the mock extractor.
pub fn mock_table() -> Table {
    extraction::mock_table().expect("mock table rows should match columns")
}
