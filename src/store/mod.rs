mod catalog;

pub use self::catalog::CatalogStore;

use crate::error::ReportResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A scoring approach and the data sets it has been run on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub datasets: Vec<String>,
}

/// A file-backed input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub path: PathBuf,
}

/// Read access to the method/data set catalogue a report is built from.
pub trait StoreGateway {
    fn all_methods(&self) -> ReportResult<Vec<String>>;
    fn all_datasets(&self) -> ReportResult<Vec<String>>;
    fn method(&self, name: &str) -> ReportResult<Method>;
    fn dataset(&self, name: &str) -> ReportResult<Dataset>;
}

impl<T: StoreGateway + ?Sized> StoreGateway for &T {
    fn all_methods(&self) -> ReportResult<Vec<String>> {
        (**self).all_methods()
    }

    fn all_datasets(&self) -> ReportResult<Vec<String>> {
        (**self).all_datasets()
    }

    fn method(&self, name: &str) -> ReportResult<Method> {
        (**self).method(name)
    }

    fn dataset(&self, name: &str) -> ReportResult<Dataset> {
        (**self).dataset(name)
    }
}
