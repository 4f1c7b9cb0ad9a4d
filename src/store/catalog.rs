use super::{Dataset, Method, StoreGateway};
use crate::error::{ReportError, ReportResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// In-memory catalogue of methods and data sets, persisted as JSON.
///
/// ```json
/// {
///   "datasets": [{ "name": "iris", "path": "data/iris.csv" }],
///   "methods":  [{ "name": "knn", "datasets": ["iris"] }]
/// }
/// ```
///
/// Relative data set paths are resolved against the catalogue file's directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogStore {
    pub datasets: Vec<Dataset>,
    pub methods: Vec<Method>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ReportResult<Self> {
        let path = path.as_ref();
        info!("📂 Loading catalogue: {}", path.display());

        let content = fs::read_to_string(path)?;
        let mut store: CatalogStore = serde_json::from_str(&content)?;

        if let Some(root) = path.parent() {
            for d in &mut store.datasets {
                if d.path.is_relative() {
                    d.path = root.join(&d.path);
                }
            }
        }

        debug!(
            "Catalogue has {} methods and {} data sets",
            store.methods.len(),
            store.datasets.len()
        );
        Ok(store)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ReportResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn with_dataset(mut self, name: &str, path: impl AsRef<Path>) -> Self {
        self.datasets.push(Dataset {
            name: name.to_string(),
            path: path.as_ref().to_path_buf(),
        });
        self
    }

    pub fn with_method(mut self, name: &str, datasets: &[&str]) -> Self {
        self.methods.push(Method {
            name: name.to_string(),
            datasets: datasets.iter().map(|d| d.to_string()).collect(),
        });
        self
    }
}

impl StoreGateway for CatalogStore {
    fn all_methods(&self) -> ReportResult<Vec<String>> {
        Ok(self.methods.iter().map(|m| m.name.clone()).collect())
    }

    fn all_datasets(&self) -> ReportResult<Vec<String>> {
        Ok(self.datasets.iter().map(|d| d.name.clone()).collect())
    }

    fn method(&self, name: &str) -> ReportResult<Method> {
        self.methods
            .iter()
            .find(|m| m.name == name)
            .cloned()
            .ok_or_else(|| ReportError::UnknownMethod(name.to_string()))
    }

    fn dataset(&self, name: &str) -> ReportResult<Dataset> {
        self.datasets
            .iter()
            .find(|d| d.name == name)
            .cloned()
            .ok_or_else(|| ReportError::UnknownDataset(name.to_string()))
    }
}
