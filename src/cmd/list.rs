use crate::reports;
use clap::Args;
use evalreport::config::ReportConfig;
use evalreport::error::{ReportError, ReportResult};
use evalreport::report::{index_centered_report, DType, ScoreOutput, Value, DATA_SET_NAME};
use evalreport::store::{CatalogStore, StoreGateway};
use evalreport::util::{format_counts, item_counts};
use std::collections::HashMap;
use tracing::debug;

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub config: ReportConfig,
}

pub fn run_methods(store: &CatalogStore) {
    reports::print_methods(&store.methods);
}

/// One row per data set: its path, whether the file exists and how many
/// methods ran on it.
pub fn run_datasets(store: &CatalogStore) -> ReportResult<()> {
    let counts = item_counts(
        store
            .methods
            .iter()
            .flat_map(|m| m.datasets.iter().map(String::as_str)),
    );
    debug!("Runs per data set:\n{}", format_counts(&counts));
    let runs: HashMap<&str, usize> = counts.into_iter().collect();

    let names = store.all_datasets()?;
    let columns = vec!["Path".to_string(), "Exists".to_string(), "Methods".to_string()];
    let table = index_centered_report(
        DATA_SET_NAME,
        &names,
        &columns,
        &[DType::Str, DType::Bool, DType::Int],
        |name| {
            let dataset = store.dataset(name)?;
            Ok(ScoreOutput::tuple([
                Value::from(dataset.path.display().to_string()),
                Value::from(dataset.path.exists()),
                Value::from(runs.get(name).copied().unwrap_or(0)),
            ]))
        },
    )?;

    reports::print_flat_table(&table);

    let orphans: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|n| !runs.contains_key(n))
        .collect();
    if !orphans.is_empty() {
        debug!("Data sets without runs: {}", orphans.join(", "));
    }

    // Methods naming a data set the catalogue does not define.
    for m in &store.methods {
        if let Some(missing) = m.datasets.iter().find(|d| !names.contains(d)) {
            return Err(ReportError::DatasetHandleMissing {
                method: m.name.clone(),
                dataset: missing.clone(),
            });
        }
    }
    Ok(())
}
