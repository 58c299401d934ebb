#[derive(Debug, thiserror::Error)]
pub enum IoOpenError {
    #[error("input not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
