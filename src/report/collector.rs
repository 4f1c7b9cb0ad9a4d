use super::value::{ScoreOutput, Value};
use crate::content::{DatasetContents, RunQuery};
use crate::error::{ReportError, ReportResult};
use crate::logging::ProgressScope;
use crate::store::Method;
use indicatif::ProgressBar;
use std::collections::HashMap;
use tracing::debug;

/// Scores of one method on one data set, in declared field order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    pub dataset: String,
    pub values: Vec<Value>,
}

/// Runs `score_fn` on every data set `method` was evaluated on.
///
/// Every data set in `method.datasets` must have a handle in `handles`.
/// A failing score aborts the whole collection.
pub fn collect_scores<F>(
    method: &Method,
    handles: &HashMap<String, DatasetContents>,
    score_fn: &mut F,
    field_names: &[String],
) -> ReportResult<Vec<ScoreRow>>
where
    F: FnMut(&RunQuery<'_>) -> ReportResult<ScoreOutput>,
{
    collect_scores_with_progress(method, handles, score_fn, field_names, &ProgressBar::hidden())
}

/// Same as [`collect_scores`], advancing `progress` once per data set.
/// The bar is finished on success and abandoned on failure.
pub fn collect_scores_with_progress<F>(
    method: &Method,
    handles: &HashMap<String, DatasetContents>,
    score_fn: &mut F,
    field_names: &[String],
    progress: &ProgressBar,
) -> ReportResult<Vec<ScoreRow>>
where
    F: FnMut(&RunQuery<'_>) -> ReportResult<ScoreOutput>,
{
    let total = method.datasets.len();
    let mut rows = Vec::with_capacity(total);
    let scope = ProgressScope::enter(progress, &method.name, total);

    for dataset in &method.datasets {
        let handle = handles
            .get(dataset)
            .ok_or_else(|| ReportError::DatasetHandleMissing {
                method: method.name.clone(),
                dataset: dataset.clone(),
            })?;

        let query = RunQuery::new(handle, &method.name);
        let values = score_fn(&query)?.into_row(field_names.len())?;
        scope.suspend(|| debug!("   {} on {}: {:?}", method.name, dataset, values));

        rows.push(ScoreRow {
            dataset: dataset.clone(),
            values,
        });
        scope.inc(1);
    }
    scope.complete();

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::RunTable;

    fn handles(names: &[&str]) -> HashMap<String, DatasetContents> {
        names
            .iter()
            .map(|n| (n.to_string(), DatasetContents::in_memory(n, RunTable::default())))
            .collect()
    }

    fn method(name: &str, datasets: &[&str]) -> Method {
        Method {
            name: name.to_string(),
            datasets: datasets.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[test]
    fn rows_follow_method_dataset_order() {
        let h = handles(&["A", "BB", "CCC"]);
        let m = method("m1", &["CCC", "A"]);
        let fields = vec!["len".to_string(), "method".to_string()];

        let mut score = |q: &RunQuery<'_>| {
            Ok(ScoreOutput::tuple([
                Value::Int(q.dataset_name().len() as i64),
                q.method_name().into(),
            ]))
        };
        let rows = collect_scores(&m, &h, &mut score, &fields).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].dataset, "CCC");
        assert_eq!(rows[0].values, vec![Value::Int(3), "m1".into()]);
        assert_eq!(rows[1].dataset, "A");
    }

    #[test]
    fn missing_handle_is_fatal() {
        let h = handles(&["A"]);
        let m = method("m1", &["A", "Z"]);
        let mut score = |_: &RunQuery<'_>| Ok(ScoreOutput::scalar(1));
        let err = collect_scores(&m, &h, &mut score, &["s".to_string()]).unwrap_err();
        assert!(matches!(
            err,
            ReportError::DatasetHandleMissing { ref dataset, .. } if dataset == "Z"
        ));
    }

    #[test]
    fn score_failure_propagates_unchanged() {
        let h = handles(&["A", "B"]);
        let m = method("m1", &["A", "B"]);
        let mut calls = 0;
        let mut score = |_: &RunQuery<'_>| {
            calls += 1;
            Err(ReportError::Scoring("boom".to_string()))
        };
        let err = collect_scores(&m, &h, &mut score, &["s".to_string()]).unwrap_err();
        assert!(matches!(err, ReportError::Scoring(ref msg) if msg == "boom"));
        assert_eq!(calls, 1);
    }

    #[test]
    fn progress_advances_per_dataset() {
        let h = handles(&["A", "B"]);
        let m = method("m1", &["A", "B"]);
        let mut score = |_: &RunQuery<'_>| Ok(ScoreOutput::scalar(0.5));
        let bar = ProgressBar::hidden();
        collect_scores_with_progress(&m, &h, &mut score, &["s".to_string()], &bar).unwrap();

        assert!(bar.is_finished());
        assert_eq!(bar.position(), 2);
        assert_eq!(bar.length(), Some(2));
        assert_eq!(bar.message(), "m1");
    }

    #[test]
    fn failed_collection_leaves_bar_where_it_stopped() {
        let h = handles(&["A", "B", "C"]);
        let m = method("m1", &["A", "B", "C"]);
        let mut score = |q: &RunQuery<'_>| match q.dataset_name() {
            "B" => Err(ReportError::Scoring("nan loss".to_string())),
            _ => Ok(ScoreOutput::scalar(1)),
        };
        let bar = ProgressBar::hidden();
        assert!(collect_scores_with_progress(&m, &h, &mut score, &["s".to_string()], &bar).is_err());

        assert!(bar.is_finished());
        assert_eq!(bar.position(), 1);
    }
}
