#![allow(dead_code)]

use evalreport::content::RunQuery;
use evalreport::error::ReportResult;
use evalreport::report::{ScoreOutput, Value};
use evalreport::store::CatalogStore;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Data sets `{A, B, C}`; `M1` ran on `{A, B}`, `M2` on `{B, C}`.
pub fn abc_store() -> CatalogStore {
    CatalogStore::new()
        .with_dataset("A", "a.csv")
        .with_dataset("B", "b.csv")
        .with_dataset("C", "c.csv")
        .with_method("M1", &["A", "B"])
        .with_method("M2", &["B", "C"])
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Scores a run by the length of its data set name.
pub fn name_length(query: &RunQuery<'_>) -> ReportResult<ScoreOutput> {
    Ok(ScoreOutput::scalar(query.dataset_name().len()))
}

pub fn value(i: i64) -> Value {
    Value::Int(i)
}

/// A catalogue on disk with two CSV data sets, each holding a `truth`
/// column plus one output column per method.
pub struct Workspace {
    pub dir: TempDir,
    pub catalog: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        write_csv(
            &dir.path().join("iris.csv"),
            &[
                "truth,knn,svm",
                "setosa,setosa,setosa",
                "virginica,setosa,virginica",
                "versicolor,versicolor,",
                "setosa,setosa,setosa",
            ],
        );
        write_csv(
            &dir.path().join("wine.csv"),
            &["truth,knn", "red,red", "white,red"],
        );

        let store = CatalogStore::new()
            .with_dataset("iris", "iris.csv")
            .with_dataset("wine", "wine.csv")
            .with_method("knn", &["iris", "wine"])
            .with_method("svm", &["iris"]);
        let catalog = dir.path().join("catalog.json");
        store.save_to_file(&catalog).expect("Failed to save catalogue");

        Self { dir, catalog }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn write_csv(path: &Path, lines: &[&str]) {
    let mut f = File::create(path).unwrap();
    for line in lines {
        writeln!(f, "{}", line).unwrap();
    }
}
