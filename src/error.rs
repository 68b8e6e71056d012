use std::path::PathBuf;

use thiserror::Error;

/// Terminal failures for a single tabulation attempt. Nothing here is
/// retried; the CLI reports the message and exits.
#[derive(Debug, Error)]
pub enum TallyError {
    #[error("unsupported file type {path:?} (expected .xlsx, .xls, or .csv)")]
    UnsupportedExtension { path: PathBuf },

    #[error("dataset contains no rows")]
    EmptyDataset,

    #[error("column '{0}' not found in dataset")]
    UnknownColumn(String),

    #[error("unknown encoding '{0}'")]
    UnknownEncoding(String),

    #[error("failed to decode text with encoding {0}")]
    Decode(&'static str),

    #[error("workbook contains no worksheets")]
    NoWorksheet,

    #[error(transparent)]
    Workbook(#[from] calamine::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
