use crate::error::{ReportError, ReportResult};
use crate::store::Dataset;
use std::cell::OnceCell;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parsed contents of a data set file: a header row plus string records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl RunTable {
    pub fn new(headers: &[&str], records: &[&[&str]]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            records: records
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

fn load_run_table(path: &Path) -> ReportResult<RunTable> {
    let file = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = rdr.headers()?.iter().map(str::to_string).collect();
    let mut records = Vec::new();
    for result in rdr.records() {
        let rec = result?;
        records.push(rec.iter().map(str::to_string).collect());
    }

    debug!("   Loaded {} records from {}", records.len(), path.display());
    Ok(RunTable { headers, records })
}

/// Content handle for one data set. The file is read on first use and
/// cached for the lifetime of the handle.
#[derive(Debug)]
pub struct DatasetContents {
    name: String,
    path: Option<PathBuf>,
    table: OnceCell<RunTable>,
}

impl DatasetContents {
    pub fn open(dataset: &Dataset) -> Self {
        Self {
            name: dataset.name.clone(),
            path: Some(dataset.path.clone()),
            table: OnceCell::new(),
        }
    }

    pub fn in_memory(name: &str, table: RunTable) -> Self {
        Self {
            name: name.to_string(),
            path: None,
            table: OnceCell::from(table),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn table(&self) -> ReportResult<&RunTable> {
        if let Some(t) = self.table.get() {
            return Ok(t);
        }
        let loaded = match &self.path {
            Some(p) => load_run_table(p)?,
            None => RunTable::default(),
        };
        Ok(self.table.get_or_init(|| loaded))
    }
}

/// What a scoring function gets to look at for one (data set, method) run.
#[derive(Debug, Clone, Copy)]
pub struct RunQuery<'a> {
    contents: &'a DatasetContents,
    method: &'a str,
}

impl<'a> RunQuery<'a> {
    pub fn new(contents: &'a DatasetContents, method: &'a str) -> Self {
        Self { contents, method }
    }

    pub fn dataset_name(&self) -> &'a str {
        self.contents.name()
    }

    pub fn method_name(&self) -> &'a str {
        self.method
    }

    pub fn contents(&self) -> ReportResult<&'a RunTable> {
        self.contents.table()
    }

    pub fn column(&self, name: &str) -> ReportResult<Vec<&'a str>> {
        let table = self.contents()?;
        let c = table
            .column_index(name)
            .ok_or_else(|| ReportError::ColumnNotFound {
                table: self.dataset_name().to_string(),
                column: name.to_string(),
            })?;
        Ok(table
            .records
            .iter()
            .map(|r| r.get(c).map_or("", String::as_str))
            .collect())
    }

    /// The column holding this method's outputs (named after the method).
    pub fn method_column(&self) -> ReportResult<Vec<&'a str>> {
        self.column(self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn handle_loads_csv_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("iris.csv");
        let dataset = Dataset {
            name: "iris".to_string(),
            path: path.clone(),
        };

        // Opening never touches the disk.
        let handle = DatasetContents::open(&dataset);

        let mut f = File::create(&path).unwrap();
        writeln!(f, "truth, knn").unwrap();
        writeln!(f, "a, a").unwrap();
        writeln!(f, "b,").unwrap();
        drop(f);

        let q = RunQuery::new(&handle, "knn");
        assert_eq!(q.dataset_name(), "iris");
        assert_eq!(q.method_column().unwrap(), vec!["a", ""]);
        assert_eq!(q.column("truth").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn missing_column_names_the_dataset() {
        let handle = DatasetContents::in_memory("A", RunTable::new(&["truth"], &[&["x"]]));
        let err = RunQuery::new(&handle, "ghost").method_column().unwrap_err();
        assert!(matches!(
            err,
            ReportError::ColumnNotFound { ref table, ref column } if table == "A" && column == "ghost"
        ));
    }

    #[test]
    fn missing_file_surfaces_on_first_read() {
        let dataset = Dataset {
            name: "gone".to_string(),
            path: PathBuf::from("/definitely/not/here.csv"),
        };
        let handle = DatasetContents::open(&dataset);
        assert!(matches!(handle.table(), Err(ReportError::Io(_))));
    }
}
