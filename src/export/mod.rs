pub mod autofit;
pub mod json;
mod open;

pub use self::open::open_file;

use self::autofit::autofit;
use crate::error::{ReportError, ReportResult};
use crate::report::{ReportTable, Value, FIELD_LEVEL, METHOD_LEVEL};
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, TypedBuilder)]
pub struct ExportOptions {
    #[builder(default = String::from("Sheet1"), setter(into))]
    pub sheet_name: String,
    /// First row of the table. Appends default to the sheet's next free row.
    #[builder(default, setter(strip_option))]
    pub start_row: Option<u32>,
    #[builder(default, setter(strip_option))]
    pub start_col: Option<u16>,
    /// Clear the target sheet before appending.
    #[builder(default = false)]
    pub truncate_sheet: bool,
    #[builder(default = true)]
    pub resize_columns: bool,
    #[builder(default = false)]
    pub until_max_width: bool,
    /// Text written for null cells.
    #[builder(default, setter(into))]
    pub na_rep: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SheetCell {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl SheetCell {
    fn from_value(value: &Value, na_rep: &str) -> Option<Self> {
        match value {
            Value::Int(i) => Some(SheetCell::Number(*i as f64)),
            Value::Float(f) if !f.is_nan() => Some(SheetCell::Number(*f)),
            Value::Bool(b) => Some(SheetCell::Bool(*b)),
            Value::Text(s) => Some(SheetCell::Text(s.clone())),
            Value::Null | Value::Float(_) if !na_rep.is_empty() => {
                Some(SheetCell::Text(na_rep.to_string()))
            }
            _ => None,
        }
    }

    fn display(&self) -> String {
        match self {
            SheetCell::Number(n) => n.to_string(),
            SheetCell::Text(s) => s.clone(),
            SheetCell::Bool(b) => b.to_string().to_uppercase(),
        }
    }
}

#[derive(Debug, Clone)]
struct Merge {
    row: u32,
    first_col: u16,
    last_col: u16,
    text: String,
}

#[derive(Debug, Clone)]
struct Sheet {
    name: String,
    cells: BTreeMap<(u32, u16), SheetCell>,
    merges: Vec<Merge>,
}

impl Sheet {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cells: BTreeMap::new(),
            merges: Vec::new(),
        }
    }

    fn next_free_row(&self) -> u32 {
        self.cells.keys().map(|&(r, _)| r + 1).max().unwrap_or(0)
    }

    fn put(&mut self, row: u32, col: u16, cell: SheetCell) {
        self.cells.insert((row, col), cell);
    }

    /// Lays out `table` with its top-left corner at (`r0`, `c0`): a "Field"
    /// header row (merged across each field's methods), a "Method" row, the
    /// index name row, then one row per data set.
    ///
    /// Fails without touching the sheet when the table would not fit in
    /// `u32` rows or `u16` columns from that corner.
    fn place_table(&mut self, table: &ReportTable, na_rep: &str, r0: u32, c0: u16) -> ReportResult<()> {
        let last_row = u32::try_from(table.n_rows())
            .ok()
            .and_then(|n| r0.checked_add(2)?.checked_add(n));
        let last_col = u16::try_from(table.n_cols())
            .ok()
            .and_then(|n| c0.checked_add(n));
        if last_row.is_none() || last_col.is_none() {
            return Err(ReportError::Config(format!(
                "A {}x{} table does not fit at row {}, column {}",
                table.n_rows(),
                table.n_cols(),
                r0,
                c0
            )));
        }

        self.put(r0, c0, SheetCell::Text(FIELD_LEVEL.to_string()));
        self.put(r0 + 1, c0, SheetCell::Text(METHOD_LEVEL.to_string()));
        self.put(r0 + 2, c0, SheetCell::Text(table.index_name().to_string()));

        let cols = table.columns();
        let mut j = 0;
        while j < cols.len() {
            let field = &cols[j].field;
            let end = cols[j..]
                .iter()
                .position(|c| &c.field != field)
                .map_or(cols.len(), |k| j + k);
            let first = c0 + 1 + j as u16;
            self.put(r0, first, SheetCell::Text(field.clone()));
            if end - j > 1 {
                self.merges.push(Merge {
                    row: r0,
                    first_col: first,
                    last_col: c0 + end as u16,
                    text: field.clone(),
                });
            }
            j = end;
        }

        for (j, c) in cols.iter().enumerate() {
            self.put(r0 + 1, c0 + 1 + j as u16, SheetCell::Text(c.method.clone()));
        }

        for (i, (name, values)) in table.rows().enumerate() {
            let r = r0 + 3 + i as u32;
            self.put(r, c0, SheetCell::Text(name.to_string()));
            for (j, v) in values.iter().enumerate() {
                if let Some(cell) = SheetCell::from_value(v, na_rep) {
                    self.put(r, c0 + 1 + j as u16, cell);
                }
            }
        }
        Ok(())
    }

    fn display_grid(&self) -> BTreeMap<(u32, u16), String> {
        self.cells.iter().map(|(k, c)| (*k, c.display())).collect()
    }
}

fn read_sheets(path: &Path) -> ReportResult<Vec<Sheet>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let mut sheets = Vec::new();

    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        let (r0, c0) = range.start().unwrap_or((0, 0));
        let mut sheet = Sheet::new(&name);

        for (i, row) in range.rows().enumerate() {
            for (j, data) in row.iter().enumerate() {
                let cell = match data {
                    Data::Empty => continue,
                    Data::String(s) => SheetCell::Text(s.clone()),
                    Data::Float(f) => SheetCell::Number(*f),
                    Data::Int(i) => SheetCell::Number(*i as f64),
                    Data::Bool(b) => SheetCell::Bool(*b),
                    Data::DateTime(dt) => SheetCell::Number(dt.as_f64()),
                    other => SheetCell::Text(other.to_string()),
                };
                sheet.put(r0 + i as u32, (c0 + j as u32) as u16, cell);
            }
        }
        sheets.push(sheet);
    }

    Ok(sheets)
}

/// Writes every sheet to a fresh workbook at `path`. The sheet named in
/// `fit` (with its `until_max_width` flag) gets autofit sizing.
fn save_sheets(sheets: &[Sheet], path: &Path, fit: Option<(&str, bool)>) -> ReportResult<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold().set_align(FormatAlign::Center);
    let wrap = Format::new().set_text_wrap();

    for sheet in sheets {
        let ws = workbook.add_worksheet();
        ws.set_name(&sheet.name)?;

        let sizing = match fit {
            Some((name, until_max_width)) if name == sheet.name => {
                Some(autofit(&sheet.display_grid(), until_max_width))
            }
            _ => None,
        };
        let merged: HashSet<(u32, u16)> =
            sheet.merges.iter().map(|m| (m.row, m.first_col)).collect();

        for (&(row, col), cell) in &sheet.cells {
            if merged.contains(&(row, col)) {
                continue;
            }
            let wrapped = sizing
                .as_ref()
                .is_some_and(|f| f.wrapped.contains(&(row, col)));
            match (cell, wrapped) {
                (SheetCell::Text(s), true) => ws.write_string_with_format(row, col, s, &wrap)?,
                (SheetCell::Text(s), false) => ws.write_string(row, col, s)?,
                (SheetCell::Number(n), _) => ws.write_number(row, col, *n)?,
                (SheetCell::Bool(b), _) => ws.write_boolean(row, col, *b)?,
            };
        }

        for m in &sheet.merges {
            ws.merge_range(m.row, m.first_col, m.row, m.last_col, &m.text, &header)?;
        }

        if let Some(fit) = sizing {
            for (col, width) in fit.column_widths {
                ws.set_column_width(col, width)?;
            }
            for (row, height) in fit.row_heights {
                ws.set_row_height(row, height)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn fit_target(opts: &ExportOptions) -> Option<(&str, bool)> {
    opts.resize_columns
        .then_some((opts.sheet_name.as_str(), opts.until_max_width))
}

/// Writes `table` to a new workbook at `path`, replacing any existing file.
pub fn write_xlsx<P: AsRef<Path>>(table: &ReportTable, path: P, opts: &ExportOptions) -> ReportResult<()> {
    let path = path.as_ref();
    let mut sheet = Sheet::new(&opts.sheet_name);
    sheet.place_table(
        table,
        &opts.na_rep,
        opts.start_row.unwrap_or(0),
        opts.start_col.unwrap_or(0),
    )?;

    save_sheets(&[sheet], path, fit_target(opts))?;
    info!("💾 Report written to {}", path.display());
    Ok(())
}

/// Appends `table` to `opts.sheet_name` in the workbook at `path`, keeping
/// every other sheet. The file and sheet are created when missing.
pub fn append_xlsx<P: AsRef<Path>>(table: &ReportTable, path: P, opts: &ExportOptions) -> ReportResult<()> {
    let path = path.as_ref();
    let mut sheets = if path.exists() {
        read_sheets(path)?
    } else {
        Vec::new()
    };

    let pos = match sheets.iter().position(|s| s.name == opts.sheet_name) {
        Some(i) => i,
        None => {
            sheets.push(Sheet::new(&opts.sheet_name));
            sheets.len() - 1
        }
    };

    let sheet = &mut sheets[pos];
    if opts.truncate_sheet {
        sheet.cells.clear();
        sheet.merges.clear();
    }
    let start_row = opts.start_row.unwrap_or_else(|| sheet.next_free_row());
    debug!(
        "Appending {} rows to '{}' at row {}",
        table.n_rows(),
        opts.sheet_name,
        start_row
    );
    sheet.place_table(table, &opts.na_rep, start_row, opts.start_col.unwrap_or(0))?;

    save_sheets(&sheets, path, fit_target(opts))?;
    info!("💾 Report appended to {}", path.display());
    Ok(())
}

/// Writes `table` to a new, persisted temporary `.xlsx` file.
pub fn write_temp_xlsx(table: &ReportTable, opts: &ExportOptions) -> ReportResult<PathBuf> {
    let path = tempfile::Builder::new()
        .prefix("report-")
        .suffix(".xlsx")
        .tempfile()?
        .into_temp_path()
        .keep()
        .map_err(|e| e.error)?;

    write_xlsx(table, &path, opts)?;
    Ok(path)
}

/// Writes `table` to a temporary workbook and opens it.
pub fn to_temp_xlsx(table: &ReportTable, opts: &ExportOptions) -> ReportResult<PathBuf> {
    let path = write_temp_xlsx(table, opts)?;
    open_file(&path)?;
    Ok(path)
}
