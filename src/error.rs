use thiserror::Error;

// ---------------------------------------------------------------------------
// Pipeline errors – every halt the render pass can surface to the user
// ---------------------------------------------------------------------------

/// How a halt is presented: informational, a warning, or an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Open a CSV file to get started (File → Open CSV…).")]
    NoFileProvided,

    #[error("The file is neither valid UTF-8 nor CP949/EUC-KR text.")]
    DecodeFailure,

    #[error("CSV line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("Select at least 2 columns in the side panel (currently {selected}).")]
    InsufficientColumns { selected: usize },

    #[error("At least 2 numeric columns are required, but the selection contains {found}.")]
    InsufficientNumericColumns { found: usize },

    #[error("No rows remain after dropping rows that are empty in every selected numeric column.")]
    EmptyAfterFiltering,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn severity(&self) -> Severity {
        match self {
            PipelineError::NoFileProvided => Severity::Info,
            PipelineError::InsufficientColumns { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}
