use thiserror::Error;

/// Main error type for rankeval
#[derive(Error, Debug)]
pub enum RankevalError {
    /// Malformed input: bad qrels lines, bad prediction records, bad metric specifiers
    #[error("Format error: {0}")]
    Format(String),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenient Result type using RankevalError
pub type Result<T> = std::result::Result<T, RankevalError>;

/// Shorthand for building a `RankevalError::Format`.
pub(crate) fn format_err(message: impl Into<String>) -> RankevalError {
    RankevalError::Format(message.into())
}

/// Unwrap one item of `BufRead::lines`. Undecodable bytes are malformed input,
/// so they become a `Format` error carrying the 1-based line number.
pub(crate) fn read_line(line: std::io::Result<String>, line_num: usize) -> Result<String> {
    line.map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidData => {
            format_err(format!("Line {}: invalid UTF-8", line_num))
        }
        _ => RankevalError::Io(e),
    })
}
