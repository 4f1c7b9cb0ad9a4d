use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Methods not found: {0}")]
    MethodNotFound(String),

    #[error("Duplicate field names: {0}")]
    DuplicateField(String),

    #[error("Value '{value}' not found in column '{column}'")]
    SearchValueNotFound { column: String, value: String },

    #[error("Method '{method}' references data set '{dataset}', which has no content handle")]
    DatasetHandleMissing { method: String, dataset: String },

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Unknown data set: {0}")]
    UnknownDataset(String),

    #[error("Score function returned {got} values, expected {expected}")]
    ScoreArity { expected: usize, got: usize },

    #[error("Scoring Error: {0}")]
    Scoring(String),

    #[error("Column '{column}' not found in '{table}'")]
    ColumnNotFound { table: String, column: String },

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XLSX Write Error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("XLSX Read Error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[error("Configuration Error: {0}")]
    Config(String),
}

pub type ReportResult<T> = Result<T, ReportError>;
