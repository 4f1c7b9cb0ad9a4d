use crate::error::{ReportError, ReportResult};
use crate::export::ExportOptions;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Catalogue of methods and data sets (JSON).
    #[arg(long, default_value = "data/catalog.json")]
    pub store: String,

    #[arg(long, default_value = "Report")]
    pub sheet_name: String,

    /// Column holding ground-truth labels in each data set file.
    #[arg(long, default_value = "truth")]
    pub truth_column: String,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub resize_columns: bool,

    #[arg(long, default_value_t = false)]
    pub until_max_width: bool,

    /// Text written for empty cells.
    #[arg(long, default_value = "")]
    pub na_rep: String,

    /// Open the spreadsheet once written.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub open: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            store: "data/catalog.json".to_string(),
            sheet_name: "Report".to_string(),
            truth_column: "truth".to_string(),
            resize_columns: true,
            until_max_width: false,
            na_rep: String::new(),
            open: true,
        }
    }
}

impl ReportConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ReportResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ReportError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            ReportError::Config(format!("Failed to parse '{}': {}", path.display(), e))
        })
    }

    /// Copies every value given explicitly on the command line over `self`.
    pub fn merge_from_cli(&mut self, cli: &ReportConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(store);
        update_if_present!(sheet_name);
        update_if_present!(truth_column);
        update_if_present!(resize_columns);
        update_if_present!(until_max_width);
        update_if_present!(na_rep);
        update_if_present!(open);
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions::builder()
            .sheet_name(self.sheet_name.clone())
            .resize_columns(self.resize_columns)
            .until_max_width(self.until_max_width)
            .na_rep(self.na_rep.clone())
            .build()
    }
}
