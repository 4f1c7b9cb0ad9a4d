use super::collector::collect_scores_with_progress;
use super::table::ReportTable;
use super::value::{DType, ScoreOutput};
use crate::content::{DatasetContents, RunQuery};
use crate::error::{ReportError, ReportResult};
use crate::store::StoreGateway;
use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Fails with [`ReportError::MethodNotFound`] when any requested method is
/// unknown to the store. Missing names are listed in request order.
pub fn validate_methods<S>(store: &S, methods: &[String]) -> ReportResult<()>
where
    S: StoreGateway + ?Sized,
{
    let known: HashSet<String> = store.all_methods()?.into_iter().collect();
    let missing: Vec<&str> = methods
        .iter()
        .filter(|m| !known.contains(*m))
        .map(String::as_str)
        .unique()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        warn!("Requested methods not in store: {}", missing.join(", "));
        Err(ReportError::MethodNotFound(missing.join(", ")))
    }
}

/// Rejects field lists naming the same field twice; both values would land
/// in one column.
pub fn validate_fields(field_names: &[String]) -> ReportResult<()> {
    let duplicates: Vec<&str> = field_names
        .iter()
        .duplicates()
        .map(String::as_str)
        .collect();

    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(ReportError::DuplicateField(duplicates.join(", ")))
    }
}

/// Builds a [`ReportTable`] of `score_fn` results for each requested method.
pub struct ReportAssembler<'s, S: StoreGateway + ?Sized> {
    store: &'s S,
    progress: Option<ProgressStyle>,
}

impl<'s, S: StoreGateway + ?Sized> ReportAssembler<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            progress: None,
        }
    }

    /// Draws one progress bar per method on stderr (hidden when stderr is
    /// not a terminal).
    pub fn with_progress(mut self, style: ProgressStyle) -> Self {
        self.progress = Some(style);
        self
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        match &self.progress {
            Some(style) => ProgressBar::new(total as u64).with_style(style.clone()),
            None => ProgressBar::hidden(),
        }
    }

    /// One content handle per data set known to the store.
    fn open_handles(&self, datasets: &[String]) -> ReportResult<HashMap<String, DatasetContents>> {
        datasets
            .iter()
            .map(|name| {
                let record = self.store.dataset(name)?;
                Ok((name.clone(), DatasetContents::open(&record)))
            })
            .collect()
    }

    /// Rows are data sets with at least one score; columns are
    /// `field_names × methods`, field-major. Each field is cast to the
    /// matching entry of `dtypes`, leaving unconvertible values as they are.
    pub fn assemble<F>(
        &self,
        methods: &[String],
        field_names: &[String],
        dtypes: &[DType],
        mut score_fn: F,
    ) -> ReportResult<ReportTable>
    where
        F: FnMut(&RunQuery<'_>) -> ReportResult<ScoreOutput>,
    {
        validate_methods(self.store, methods)?;
        validate_fields(field_names)?;
        let methods: Vec<String> = methods.iter().unique().cloned().collect();

        let all_datasets = self.store.all_datasets()?;
        let mut report = ReportTable::new(all_datasets.clone(), field_names, methods.as_slice());
        let handles = self.open_handles(&all_datasets)?;

        for method in &methods {
            let record = self.store.method(method)?;
            info!(
                "📊 Scoring '{}' on {} data sets",
                record.name,
                record.datasets.len()
            );

            let bar = self.progress_bar(record.datasets.len());
            let rows =
                collect_scores_with_progress(&record, &handles, &mut score_fn, field_names, &bar)?;

            for row in rows {
                for (field, value) in field_names.iter().zip(row.values) {
                    report.set(&row.dataset, field, method, value)?;
                }
            }
        }

        let dropped = report.drop_empty_rows();
        if dropped > 0 {
            debug!("Dropped {} data sets without results", dropped);
        }

        for (field, dtype) in field_names.iter().zip(dtypes) {
            let failed = report.coerce_field(field, *dtype);
            if failed > 0 {
                warn!(
                    "⚠️  {} values of '{}' could not be cast to {}; kept as-is",
                    failed, field, dtype
                );
            }
        }

        Ok(report)
    }
}

/// Convenience wrapper around [`ReportAssembler::assemble`] without progress output.
pub fn assemble_report<S, F>(
    methods: &[String],
    field_names: &[String],
    dtypes: &[DType],
    score_fn: F,
    store: &S,
) -> ReportResult<ReportTable>
where
    S: StoreGateway + ?Sized,
    F: FnMut(&RunQuery<'_>) -> ReportResult<ScoreOutput>,
{
    ReportAssembler::new(store).assemble(methods, field_names, dtypes, score_fn)
}
