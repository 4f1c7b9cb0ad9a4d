use crate::reports;
use clap::Args;
use evalreport::config::ReportConfig;
use evalreport::error::ReportResult;
use evalreport::export::{self, json::write_json_sheets};
use evalreport::logging;
use evalreport::metrics::{metric_scorer, Metric};
use evalreport::report::{DType, ReportAssembler};
use evalreport::store::{CatalogStore, StoreGateway};
use itertools::Itertools;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub config: ReportConfig,

    /// Method to include (repeatable).
    #[arg(short, long = "method")]
    pub methods: Vec<String>,

    /// Include every method in the catalogue.
    #[arg(long, default_value_t = false, conflicts_with = "methods")]
    pub all_methods: bool,

    /// Scores to compute, comma separated.
    #[arg(long = "metric", value_delimiter = ',', default_value = "accuracy")]
    pub metrics: Vec<Metric>,

    /// Spreadsheet to write. A temporary file is used when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Append below the existing contents of the sheet instead of replacing the file.
    #[arg(long, default_value_t = false, requires = "output")]
    pub append: bool,

    #[arg(long, requires = "append")]
    pub start_row: Option<u32>,

    #[arg(long, default_value_t = false, requires = "append")]
    pub truncate_sheet: bool,

    /// Also save the table as JSON.
    #[arg(long)]
    pub json: Option<PathBuf>,
}

pub fn run(args: ReportArgs, config: &ReportConfig, store: &CatalogStore) -> ReportResult<()> {
    let methods = if args.all_methods {
        store.all_methods()?
    } else {
        args.methods.clone()
    };
    // `--metric accuracy,accuracy` asks for one column, not two.
    let metrics: Vec<Metric> = args.metrics.iter().copied().unique().collect();
    let field_names: Vec<String> = metrics.iter().map(Metric::field_name).collect();
    let dtypes: Vec<DType> = metrics.iter().map(Metric::dtype).collect();

    info!(
        "🔎 Building report for {} methods: {}",
        methods.len(),
        field_names.join(", ")
    );

    let scorer = metric_scorer(metrics, config.truth_column.clone());
    let table = ReportAssembler::new(store)
        .with_progress(logging::progress_style())
        .assemble(&methods, &field_names, &dtypes, scorer)?;

    reports::print_report_table(&table);

    if let Some(path) = &args.json {
        let sheets = BTreeMap::from([(config.sheet_name.clone(), table.clone())]);
        write_json_sheets(&sheets, path)?;
        info!("💾 JSON written to {}", path.display());
    }

    let mut opts = config.export_options();
    opts.truncate_sheet = args.truncate_sheet;
    opts.start_row = args.start_row;

    let path = match &args.output {
        Some(path) if args.append => {
            export::append_xlsx(&table, path, &opts)?;
            path.clone()
        }
        Some(path) => {
            export::write_xlsx(&table, path, &opts)?;
            path.clone()
        }
        None => export::write_temp_xlsx(&table, &opts)?,
    };

    if config.open {
        export::open_file(&path)?;
    }
    Ok(())
}
