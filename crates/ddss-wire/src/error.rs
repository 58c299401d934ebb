#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// A varint's continuation bit stayed set past the 10-byte limit for a u64.
    #[error("varint too long: exceeded 10-byte limit")]
    VarintTooLong,

    /// Input ended before a varint's terminating byte was found.
    #[error("truncated varint at offset {offset}")]
    TruncatedVarint { offset: u64 },

    /// Input ended before the requested number of bytes could be read.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
