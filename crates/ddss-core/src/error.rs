use ddss_wire::WireError;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Opcode byte outside the accepted set.
    #[error("unknown opcode: {0:#04x}")]
    UnknownOpcode(u8),

    /// A string field failed strict UTF-8 validation. Unreachable under the
    /// default lossy-replacement policy; reserved for a future strict-mode
    /// caller that rejects ill-formed bytes instead of substituting U+FFFD.
    #[error("invalid UTF-8 in string field at offset {offset}")]
    InvalidString { offset: u64 },

    /// An active host/source/sourcetype index (or other table reference that
    /// must resolve) exceeds the table's current length.
    #[error("index {index} out of range for table of length {len}")]
    IndexOutOfRange { index: u64, len: usize },

    /// Caller-imposed symbol table size cap was exceeded.
    #[error("symbol table overflow: exceeded cap of {cap}")]
    SymbolTableOverflow { cap: usize },

    #[error(transparent)]
    Wire(#[from] WireError),
}
