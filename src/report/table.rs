use super::value::{DType, Value};
use crate::error::{ReportError, ReportResult};
use itertools::{iproduct, Itertools};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DATA_SET_NAME: &str = "Data Set";
pub const FIELD_LEVEL: &str = "Field";
pub const METHOD_LEVEL: &str = "Method";

/// Two-level column key of a [`ReportTable`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnKey {
    pub field: String,
    pub method: String,
}

impl ColumnKey {
    pub fn new(field: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            method: method.into(),
        }
    }
}

/// Dataset-indexed table whose columns are keyed by (field, method).
///
/// Cells are stored row-major. Both lookups are built once when the shape is
/// fixed, so writes never resolve labels dynamically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TableData", into = "TableData")]
pub struct ReportTable {
    index_name: String,
    index: Vec<String>,
    columns: Vec<ColumnKey>,
    cells: Vec<Vec<Value>>,
    row_lookup: HashMap<String, usize>,
    column_lookup: HashMap<ColumnKey, usize>,
}

/// On-disk shape of a [`ReportTable`].
#[derive(Serialize, Deserialize)]
struct TableData {
    index_name: String,
    index: Vec<String>,
    columns: Vec<ColumnKey>,
    data: Vec<Vec<Value>>,
}

impl From<TableData> for ReportTable {
    fn from(d: TableData) -> Self {
        let width = d.columns.len();
        let mut cells = d.data;
        cells.resize_with(d.index.len(), Vec::new);
        for row in &mut cells {
            row.resize(width, Value::Null);
        }
        let mut table = Self {
            index_name: d.index_name,
            index: d.index,
            columns: d.columns,
            cells,
            row_lookup: HashMap::new(),
            column_lookup: HashMap::new(),
        };
        table.rebuild_lookups();
        table
    }
}

impl From<ReportTable> for TableData {
    fn from(t: ReportTable) -> Self {
        Self {
            index_name: t.index_name,
            index: t.index,
            columns: t.columns,
            data: t.cells,
        }
    }
}

impl ReportTable {
    /// Empty table with one row per `index` entry and one column per
    /// (field, method) pair, field-major.
    pub fn new<S: AsRef<str>>(index: Vec<String>, fields: &[S], methods: &[S]) -> Self {
        let columns: Vec<ColumnKey> = iproduct!(fields, methods)
            .map(|(f, m)| ColumnKey::new(f.as_ref(), m.as_ref()))
            .collect();
        let cells = vec![vec![Value::Null; columns.len()]; index.len()];

        let mut table = Self {
            index_name: DATA_SET_NAME.to_string(),
            index,
            columns,
            cells,
            row_lookup: HashMap::new(),
            column_lookup: HashMap::new(),
        };
        table.rebuild_lookups();
        table
    }

    fn rebuild_lookups(&mut self) {
        self.row_lookup.clear();
        for (i, name) in self.index.iter().enumerate() {
            self.row_lookup.entry(name.clone()).or_insert(i);
        }
        self.column_lookup.clear();
        for (i, key) in self.columns.iter().enumerate() {
            self.column_lookup.entry(key.clone()).or_insert(i);
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    /// Distinct field names in column order.
    pub fn fields(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.field.as_str()).unique().collect()
    }

    /// Distinct method names in column order.
    pub fn methods(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.method.as_str()).unique().collect()
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty() || self.columns.is_empty()
    }

    pub fn column_position(&self, field: &str, method: &str) -> Option<usize> {
        self.column_lookup.get(&ColumnKey::new(field, method)).copied()
    }

    pub fn row_position(&self, dataset: &str) -> Option<usize> {
        self.row_lookup.get(dataset).copied()
    }

    pub fn get(&self, dataset: &str, field: &str, method: &str) -> Option<&Value> {
        let r = self.row_position(dataset)?;
        let c = self.column_position(field, method)?;
        Some(&self.cells[r][c])
    }

    pub fn row(&self, dataset: &str) -> Option<&[Value]> {
        self.row_position(dataset).map(|r| self.cells[r].as_slice())
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.index
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter().map(Vec::as_slice))
    }

    pub fn set(&mut self, dataset: &str, field: &str, method: &str, value: Value) -> ReportResult<()> {
        let r = self
            .row_position(dataset)
            .ok_or_else(|| ReportError::UnknownDataset(dataset.to_string()))?;
        let c = self
            .column_position(field, method)
            .ok_or_else(|| ReportError::ColumnNotFound {
                table: self.index_name.clone(),
                column: format!("{}/{}", field, method),
            })?;
        self.cells[r][c] = value;
        Ok(())
    }

    /// Removes rows where every cell is null. Returns the number removed.
    pub fn drop_empty_rows(&mut self) -> usize {
        let before = self.index.len();
        let (index, cells): (Vec<_>, Vec<_>) = std::mem::take(&mut self.index)
            .into_iter()
            .zip(std::mem::take(&mut self.cells))
            .filter(|(_, row)| row.iter().any(|v| !v.is_null()))
            .unzip();
        self.index = index;
        self.cells = cells;
        self.rebuild_lookups();
        before - self.index.len()
    }

    /// Casts every column of `field` (across all methods) to `dtype`,
    /// leaving unconvertible values untouched. Returns how many were left.
    pub fn coerce_field(&mut self, field: &str, dtype: DType) -> usize {
        let targets: Vec<usize> = self
            .columns
            .iter()
            .positions(|c| c.field == field)
            .collect();

        let mut failed = 0;
        for row in &mut self.cells {
            for &c in &targets {
                let value = std::mem::take(&mut row[c]);
                match dtype.cast(&value) {
                    Some(cast) => row[c] = cast,
                    None => {
                        failed += 1;
                        row[c] = value;
                    }
                }
            }
        }
        failed
    }
}
