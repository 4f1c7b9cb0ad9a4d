use crate::content::RunQuery;
use crate::error::ReportResult;
use crate::report::{DType, ScoreOutput, Value};
use strum_macros::{Display, EnumIter, EnumString};

/// Built-in scores computed from a run's outputs.
///
/// A data set file holds one column per method (named after it) and,
/// optionally, a ground-truth column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Metric {
    /// Number of records in the data set.
    Rows,
    /// Fraction of records the method produced an output for.
    Coverage,
    /// Fraction of labelled records where the output matches the truth.
    Accuracy,
}

impl Metric {
    pub fn field_name(&self) -> String {
        self.to_string()
    }

    pub fn dtype(&self) -> DType {
        match self {
            Metric::Rows => DType::Int,
            Metric::Coverage | Metric::Accuracy => DType::Float,
        }
    }

    pub fn evaluate(&self, query: &RunQuery<'_>, truth_column: &str) -> ReportResult<Value> {
        match self {
            Metric::Rows => Ok(Value::from(query.contents()?.len())),
            Metric::Coverage => {
                let outputs = query.method_column()?;
                let produced = outputs.iter().filter(|v| !v.is_empty()).count();
                Ok(ratio(produced, outputs.len()))
            }
            Metric::Accuracy => {
                let outputs = query.method_column()?;
                let truth = query.column(truth_column)?;
                let (hits, labelled) = outputs
                    .iter()
                    .zip(&truth)
                    .filter(|(_, t)| !t.is_empty())
                    .fold((0, 0), |(h, n), (o, t)| (h + usize::from(o == t), n + 1));
                Ok(ratio(hits, labelled))
            }
        }
    }
}

fn ratio(num: usize, den: usize) -> Value {
    if den == 0 {
        Value::Null
    } else {
        Value::Float(num as f64 / den as f64)
    }
}

/// Scoring function evaluating `metrics` in order. A single metric yields a
/// scalar, several yield a tuple.
pub fn metric_scorer(
    metrics: Vec<Metric>,
    truth_column: String,
) -> impl FnMut(&RunQuery<'_>) -> ReportResult<ScoreOutput> {
    move |query| {
        let values = metrics
            .iter()
            .map(|m| m.evaluate(query, &truth_column))
            .collect::<ReportResult<Vec<Value>>>()?;
        Ok(match <[Value; 1]>::try_from(values) {
            Ok([v]) => ScoreOutput::Scalar(v),
            Err(values) => ScoreOutput::Tuple(values),
        })
    }
}
