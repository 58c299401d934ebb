#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// A declared but unimplemented output format was requested.
    #[error("unsupported output format: {0}")]
    Unsupported(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
