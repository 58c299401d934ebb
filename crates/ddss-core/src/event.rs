use std::collections::HashMap;

/// A metadata field's value: a lone scalar until a repeated key is seen,
/// at which point it's promoted to an ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataValue {
    Scalar(String),
    List(Vec<String>),
}

impl MetadataValue {
    /// Insert `value` for a field that already holds `self`, applying the
    /// scalar → list promotion rule.
    fn push(&mut self, value: String) {
        match self {
            MetadataValue::Scalar(existing) => {
                *self = MetadataValue::List(vec![existing.clone(), value]);
            }
            MetadataValue::List(values) => values.push(value),
        }
    }
}

/// A single decoded journal event. Reused across calls to `scan()` — the
/// decoder resets it at the start of each event opcode rather than
/// allocating a fresh one.
#[derive(Debug, Clone, Default)]
pub struct Event {
    pub index_time: i64,
    pub event_time: i64,
    pub host: String,
    pub source: String,
    pub sourcetype: String,
    pub stream_id: u64,
    pub stream_offset: u64,
    pub stream_sub_offset: u64,
    pub hash: Option<[u8; 20]>,
    pub extended_storage: Option<Vec<u8>>,
    pub message: Vec<u8>,
    pub include_punctuation: bool,
    pub metadata_fields: HashMap<String, MetadataValue>,
}

impl Event {
    pub(crate) fn reset(&mut self) {
        self.index_time = 0;
        self.event_time = 0;
        self.host.clear();
        self.source.clear();
        self.sourcetype.clear();
        self.stream_id = 0;
        self.stream_offset = 0;
        self.stream_sub_offset = 0;
        self.hash = None;
        self.extended_storage = None;
        self.message.clear();
        self.include_punctuation = false;
        self.metadata_fields.clear();
    }

    /// Insert a decoded `(field, value)` pair, applying scalar→list
    /// promotion on repeated keys.
    pub(crate) fn insert_metadata(&mut self, field: String, value: String) {
        self.metadata_fields
            .entry(field)
            .and_modify(|existing| existing.push(value.clone()))
            .or_insert_with(|| MetadataValue::Scalar(value));
    }

    /// The raw message decoded as UTF-8, with ill-formed sequences replaced
    /// by U+FFFD.
    pub fn message_string(&self) -> String {
        String::from_utf8_lossy(&self.message).into_owned()
    }
}
