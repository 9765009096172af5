use thiserror::Error;

/// A batch row that could not be turned into a job
#[derive(Debug, Clone, PartialEq, Error)]
#[error("row {row}: invalid {column} value '{value}': {reason}")]
pub struct RowError {
    /// 1-based index of the data row (the header is not counted)
    pub row: usize,
    pub column: String,
    pub value: String,
    pub reason: String,
}

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Batch file lacks required columns
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    /// Batch file names the same column more than once
    #[error("Duplicate columns: {}", .0.join(", "))]
    DuplicateColumns(Vec<String>),
    /// A batch row failed to parse while halting on errors
    #[error("Invalid batch row: {0}")]
    InvalidRow(#[from] RowError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Short machine-readable name, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "config_error",
            Self::MissingColumns(_) => "missing_columns",
            Self::DuplicateColumns(_) => "duplicate_columns",
            Self::InvalidRow(_) => "invalid_row",
            Self::Csv(_) => "csv_error",
            Self::Io(_) => "io_error",
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
