/// Errors that can occur while reading or querying a scan-position table
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// I/O error reading or writing a table file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// One or more required columns are absent from the header
    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A query named a column the table does not have
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}
