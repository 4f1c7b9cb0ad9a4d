use super::value::{DType, ScoreOutput, Value};
use crate::error::{ReportError, ReportResult};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Single-level table with named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl FlatTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table from column-major data. Columns shorter than the
    /// longest one are padded with nulls.
    pub fn from_columns(data: Vec<Vec<Value>>, names: Vec<String>) -> Self {
        let height = data.iter().map(Vec::len).max().unwrap_or(0);
        let mut rows = vec![Vec::with_capacity(names.len()); height];
        for column in data.into_iter().take(names.len()) {
            let mut values = column.into_iter();
            for row in rows.iter_mut() {
                row.push(values.next().unwrap_or_default());
            }
        }
        for row in rows.iter_mut() {
            row.resize(names.len(), Value::Null);
        }
        Self {
            columns: names,
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> ReportResult<()> {
        if row.len() != self.columns.len() {
            return Err(ReportError::ScoreArity {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_position(&self, name: &str) -> ReportResult<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ReportError::ColumnNotFound {
                table: "table".to_string(),
                column: name.to_string(),
            })
    }

    pub fn column(&self, name: &str) -> ReportResult<impl Iterator<Item = &Value>> {
        let c = self.column_position(name)?;
        Ok(self.rows.iter().map(move |r| &r[c]))
    }

    /// Value of `get_col` in the first row whose `search_col` equals `search_val`.
    pub fn get_value(&self, search_col: &str, search_val: &Value, get_col: &str) -> ReportResult<&Value> {
        let s = self.column_position(search_col)?;
        let g = self.column_position(get_col)?;

        match self.rows.iter().find(|r| &r[s] == search_val) {
            Some(row) => Ok(&row[g]),
            None => {
                let err = ReportError::SearchValueNotFound {
                    column: search_col.to_string(),
                    value: search_val.to_string(),
                };
                error!("{}", err);
                Err(err)
            }
        }
    }

    pub fn coerce_column(&mut self, name: &str, dtype: DType) -> ReportResult<usize> {
        let c = self.column_position(name)?;
        let mut failed = 0;
        for row in &mut self.rows {
            let value = std::mem::take(&mut row[c]);
            match dtype.cast(&value) {
                Some(cast) => row[c] = cast,
                None => {
                    failed += 1;
                    row[c] = value;
                }
            }
        }
        Ok(failed)
    }
}

/// Table with one row per input: the first column holds the input itself,
/// the rest are filled from `func(input)` and cast leniently to `dtypes`.
pub fn index_centered_report<F>(
    index_name: &str,
    inputs: &[String],
    column_names: &[String],
    dtypes: &[DType],
    mut func: F,
) -> ReportResult<FlatTable>
where
    F: FnMut(&str) -> ReportResult<ScoreOutput>,
{
    let mut columns = Vec::with_capacity(column_names.len() + 1);
    columns.push(index_name.to_string());
    columns.extend(column_names.iter().cloned());
    let mut table = FlatTable::new(columns);

    for input in inputs {
        let values = func(input)?.into_row(column_names.len())?;
        let mut row = Vec::with_capacity(values.len() + 1);
        row.push(Value::Text(input.clone()));
        row.extend(values);
        table.push_row(row)?;
    }

    for (name, dtype) in column_names.iter().zip(dtypes) {
        table.coerce_column(name, *dtype)?;
    }
    Ok(table)
}
