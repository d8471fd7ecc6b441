use thiserror::Error;

/// Errors that can occur while reading, checking, patching, or writing a flash dump.
#[derive(Error, Debug)]
pub enum Error {
    #[error("nvram error: {0}")]
    Nvram(#[from] sfu_nvram::Error),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to write CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("invalid value: {0}")]
    InvalidValue(String),
}
