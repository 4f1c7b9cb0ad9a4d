use crate::error::ReportResult;
use crate::report::ReportTable;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Saves a sheet-name → table map as one JSON document.
pub fn write_json_sheets<P: AsRef<Path>>(sheets: &BTreeMap<String, ReportTable>, path: P) -> ReportResult<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(writer, sheets)?;
    Ok(())
}

pub fn read_json_sheets<P: AsRef<Path>>(path: P) -> ReportResult<BTreeMap<String, ReportTable>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
