use crate::error::DecodeError;

/// An append-only, 1-based-indexed string table. Index 0 always means
/// "unset".
#[derive(Debug, Default)]
pub struct SymbolTable {
    strings: Vec<String>,
    cap: Option<usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cap(cap: usize) -> Self {
        Self {
            strings: Vec::new(),
            cap: Some(cap),
        }
    }

    pub fn push(&mut self, value: String) -> Result<(), DecodeError> {
        if let Some(cap) = self.cap {
            if self.strings.len() >= cap {
                return Err(DecodeError::SymbolTableOverflow { cap });
            }
        }
        self.strings.push(value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Resolve a 1-based index. 0 or out-of-range yields `None` rather than
    /// an error — callers decide whether that's fatal.
    pub fn get(&self, index: u64) -> Option<&str> {
        if index == 0 {
            return None;
        }
        self.strings.get((index - 1) as usize).map(String::as_str)
    }
}

/// The four scalar state variables that select among the symbol tables and
/// carry the event-time base. Mutated by state-update opcodes, read by the
/// event decoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct ActiveState {
    pub active_host: u64,
    pub active_source: u64,
    pub active_sourcetype: u64,
    pub base_event_time: i32,
    pub base_index_time: i32,
}

/// The four append-only symbol tables, keyed by opcode family.
#[derive(Debug, Default)]
pub struct SymbolTables {
    pub hosts: SymbolTable,
    pub sources: SymbolTable,
    pub sourcetypes: SymbolTable,
    pub strings: SymbolTable,
}

impl SymbolTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cap(cap: usize) -> Self {
        Self {
            hosts: SymbolTable::with_cap(cap),
            sources: SymbolTable::with_cap(cap),
            sourcetypes: SymbolTable::with_cap(cap),
            strings: SymbolTable::with_cap(cap),
        }
    }
}
