//! Serialising tables to CSV and surveys to JSON, and writing them out as files.


use std::{
    collections::{HashMap, HashSet},
    io::{Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::{sink::Sink, survey::Survey, table::Table};

/// File name of the combined survey JSON.
pub const COMBINED_JSON_FILENAME: &str = "combined_tables.json";

/// File name of the CSV export of the sub-table at `index` (0-based). File names count from 1.
pub fn split_table_filename(index: usize) -> PathBuf {
    PathBuf::from(format!("split_table_{}.csv", index + 1))
}

/// Writes `table` as CSV: a header line of column names then one line per row. Fields that
/// contain commas, quotes or line breaks are quoted.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut output = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    output
        .write_record(table.columns())
        .context("writing CSV header")?;
    for (row_index, row) in table.rows().iter().enumerate() {
        output
            .write_record(row.iter())
            .with_context(|| format!("writing row index {row_index}"))?;
    }

    output.flush().context("flushing CSV output")?;
    Ok(())
}

/// Returns `table` as CSV text.
pub fn table_to_csv(table: &Table) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    String::from_utf8(buf).context("CSV output is not UTF-8")
}

/// Reads a table from CSV with a header line, as written by [write_csv]. Repeated column names
/// are renamed to `name.1`, `name.2` and so on.
pub fn read_csv<R: Read>(reader: R) -> Result<Table> {
    let mut input = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let columns = unique_column_names(
        input
            .headers()
            .context("reading CSV header")?
            .iter()
            .map(str::to_string),
    );

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (row_index, record) in input.records().enumerate() {
        let record = record.with_context(|| format!("reading row index {row_index}"))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::new(columns, rows)?)
}

fn unique_column_names(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    names
        .map(|name| {
            let mut unique = name.clone();
            while used.contains(&unique) {
                let count = counts.entry(name.clone()).or_insert(0);
                *count += 1;
                unique = format!("{name}.{count}");
            }
            if unique != name {
                log::warn!("Renamed repeated CSV column {name:?} to {unique:?}.");
            }
            used.insert(unique.clone());
            unique
        })
        .collect()
}

/// Returns `survey` as pretty printed JSON with 2 space indentation.
pub fn survey_to_json(survey: &Survey) -> Result<String> {
    serde_json::to_string_pretty(survey).context("serialising survey to JSON")
}

/// Writes each of `tables` as `split_table_<n>.csv` and `survey` as [COMBINED_JSON_FILENAME]
/// into `sink`. Returns the paths written, in order.
pub fn export_all(tables: &[Table], survey: &Survey, sink: &mut dyn Sink) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(tables.len() + 1);

    for (index, table) in tables.iter().enumerate() {
        let path = split_table_filename(index);
        let csv = table_to_csv(table).with_context(|| format!("converting table {path:?}"))?;
        write_file(sink, &path, csv.as_bytes())?;
        written.push(path);
    }

    let path = PathBuf::from(COMBINED_JSON_FILENAME);
    let json = survey_to_json(survey)?;
    write_file(sink, &path, json.as_bytes())?;
    written.push(path);

    Ok(written)
}

fn write_file(sink: &mut dyn Sink, path: &Path, contents: &[u8]) -> Result<()> {
    log::info!("Writing {} bytes to {:?}.", contents.len(), path);
    sink.write_file(path, contents)
        .with_context(|| format!("writing {path:?}"))
}
