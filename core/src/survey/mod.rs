//! Projection of tables into a SurveyJS survey definition, with one matrix question per table.


use serde::{
    Deserialize, Serialize, Serializer,
    ser::{SerializeMap, SerializeStruct},
};

use crate::table::Table;

/// Names and types used when projecting tables into a survey.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurveyOptions {
    /// Name of the single page holding all elements.
    pub page_name: String,
    /// SurveyJS question type of each element.
    pub element_type: String,
    /// Element names are this prefix followed by the 1-based table number.
    pub table_name_prefix: String,
    /// Row names are this prefix followed by the 1-based row number.
    pub row_name_prefix: String,
    /// SurveyJS cell type for every column.
    pub cell_type: String,
}

impl Default for SurveyOptions {
    fn default() -> Self {
        Self {
            page_name: "page1".to_string(),
            element_type: "matrixdropdown".to_string(),
            table_name_prefix: "Table".to_string(),
            row_name_prefix: "Row".to_string(),
            cell_type: "text".to_string(),
        }
    }
}

/// Top level of a survey definition.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Survey {
    pub pages: Vec<Page>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Page {
    pub name: String,
    pub elements: Vec<Element>,
}

/// A matrix question prefilled with the contents of one table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Element {
    pub element_type: String,
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<String>,
    /// Cell values, indexed by row then by column, in the same order as `rows` and `columns`.
    pub cells: Vec<Vec<String>>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    pub title: String,
    pub cell_type: String,
}

/// Projects `tables` into a single page survey with one element per table.
pub fn project(tables: &[Table], options: &SurveyOptions) -> Survey {
    let elements = tables
        .iter()
        .enumerate()
        .map(|(index, table)| project_table(index, table, options))
        .collect();

    Survey {
        pages: vec![Page {
            name: options.page_name.clone(),
            elements,
        }],
    }
}

fn project_table(index: usize, table: &Table, options: &SurveyOptions) -> Element {
    let columns = table
        .columns()
        .iter()
        .map(|column| Column {
            name: column.clone(),
            title: column.clone(),
            cell_type: options.cell_type.clone(),
        })
        .collect();

    let rows = (1..=table.len())
        .map(|number| format!("{} {number}", options.row_name_prefix))
        .collect();

    let cells = table.rows().iter().map(|row| row.0.clone()).collect();

    Element {
        element_type: options.element_type.clone(),
        name: format!("{} {}", options.table_name_prefix, index + 1),
        columns,
        rows,
        cells,
    }
}

impl Element {
    /// Looks up the cell in the named row and column.
    pub fn default_value(&self, row_name: &str, column_name: &str) -> Option<&str> {
        let row_index = self.rows.iter().position(|name| name == row_name)?;
        let column_index = self
            .columns
            .iter()
            .position(|column| column.name == column_name)?;
        self.cells
            .get(row_index)?
            .get(column_index)
            .map(String::as_str)
    }
}

impl Serialize for Element {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Element", 5)?;
        state.serialize_field("type", &self.element_type)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("defaultValue", &DefaultValue(self))?;
        state.serialize_field("columns", &self.columns)?;
        state.serialize_field("rows", &self.rows)?;
        state.end()
    }
}

/// Serialises as a map from row name to a map from column name to cell, keeping row and column
/// order.
struct DefaultValue<'a>(&'a Element);

impl Serialize for DefaultValue<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let element = self.0;
        let mut map = serializer.serialize_map(Some(element.rows.len()))?;
        for (row_name, cells) in element.rows.iter().zip(&element.cells) {
            map.serialize_entry(row_name, &RowValues(&element.columns, cells))?;
        }
        map.end()
    }
}

struct RowValues<'a>(&'a [Column], &'a [String]);

impl Serialize for RowValues<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (column, cell) in self.0.iter().zip(self.1) {
            map.serialize_entry(&column.name, cell)?;
        }
        map.end()
    }
}
