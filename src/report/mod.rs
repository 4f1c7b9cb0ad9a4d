pub mod assembler;
pub mod collector;
pub mod flat;
pub mod table;
pub mod value;

pub use self::assembler::{assemble_report, validate_fields, validate_methods, ReportAssembler};
pub use self::collector::{collect_scores, ScoreRow};
pub use self::flat::{index_centered_report, FlatTable};
pub use self::table::{ColumnKey, ReportTable, DATA_SET_NAME, FIELD_LEVEL, METHOD_LEVEL};
pub use self::value::{DType, ScoreOutput, Value};

use crate::content::RunQuery;
use crate::error::ReportResult;
use crate::export::{self, ExportOptions};
use crate::store::StoreGateway;
use tracing::error;

/// Assembles a report, writes it to a temporary spreadsheet and opens it.
///
/// Returns an empty string on success and the error message otherwise;
/// this function never fails.
pub fn create_report<S, F>(
    methods: &[String],
    field_names: &[String],
    dtypes: &[DType],
    score_fn: F,
    sheet_name: &str,
    store: &S,
) -> String
where
    S: StoreGateway + ?Sized,
    F: FnMut(&RunQuery<'_>) -> ReportResult<ScoreOutput>,
{
    let outcome = assemble_report(methods, field_names, dtypes, score_fn, store)
        .and_then(|table| {
            let opts = ExportOptions::builder().sheet_name(sheet_name).build();
            export::to_temp_xlsx(&table, &opts)
        });

    match outcome {
        Ok(_) => String::new(),
        Err(e) => {
            error!("❌ Report failed: {}", e);
            e.to_string()
        }
    }
}
