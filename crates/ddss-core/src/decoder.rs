use std::io::Read;

use crate::error::DecodeError;
use crate::event::Event;
use crate::metadata::{read_metadata_entry, resolve_pair};
use crate::stream::ByteStream;
use crate::symtab::{ActiveState, SymbolTable, SymbolTables};

const HASH_SIZE: usize = 20;

fn is_event_opcode(opcode: u8) -> bool {
    opcode == 0x01 || opcode == 0x02 || (0x20..=0x2B).contains(&opcode)
}

/// Resolve an active index against its table. Index 0 means "none" and
/// resolves to an empty string; any other out-of-range index is fatal.
fn resolve_active(table: &SymbolTable, index: u64) -> Result<String, DecodeError> {
    if index == 0 {
        return Ok(String::new());
    }
    table
        .get(index)
        .map(str::to_string)
        .ok_or(DecodeError::IndexOutOfRange {
            index,
            len: table.len(),
        })
}

/// Streaming decoder for a Splunk DDSS journal. Consumes an opaque byte
/// source and an opcode at a time; see [`JournalDecoder::scan`].
pub struct JournalDecoder<R> {
    stream: ByteStream<R>,
    tables: SymbolTables,
    state: ActiveState,
    event: Event,
    error: Option<DecodeError>,
}

impl<R: Read> JournalDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            stream: ByteStream::new(reader),
            tables: SymbolTables::new(),
            state: ActiveState::default(),
            event: Event::default(),
            error: None,
        }
    }

    /// Same as [`Self::new`] but caps each symbol table at `cap` entries,
    /// failing with `SymbolTableOverflow` once exceeded.
    pub fn with_symbol_table_cap(reader: R, cap: usize) -> Self {
        Self {
            stream: ByteStream::new(reader),
            tables: SymbolTables::with_cap(cap),
            state: ActiveState::default(),
            event: Event::default(),
            error: None,
        }
    }

    /// Advance to the next event. Returns `true` with the event available
    /// via [`Self::get_event`]; returns `false` at a clean end of stream
    /// (with `err()` returning `None`) or after a decode error (with
    /// `err()` populated).
    pub fn scan(&mut self) -> bool {
        loop {
            let opcode = match self.stream.read_byte() {
                Ok(b) => b,
                Err(_) => {
                    // EOF between opcodes is not an error; any other I/O
                    // failure here is equally terminal, so either way we
                    // stop cleanly rather than surfacing a spurious error.
                    self.error = None;
                    return false;
                }
            };

            if is_event_opcode(opcode) {
                self.event.reset();
            }

            if let Err(e) = self.dispatch(opcode) {
                self.error = Some(e);
                return false;
            }

            if is_event_opcode(opcode) {
                self.error = None;
                return true;
            }
        }
    }

    pub fn get_event(&self) -> &Event {
        &self.event
    }

    pub fn err(&self) -> Option<&DecodeError> {
        self.error.as_ref()
    }

    fn dispatch(&mut self, opcode: u8) -> Result<(), DecodeError> {
        match opcode {
            0x00 => Ok(()),
            0x01 | 0x02 => self.decode_event(opcode),
            0x03 => self.decode_new_string(Table::Host),
            0x04 => self.decode_new_string(Table::Source),
            0x05 => self.decode_new_string(Table::SourceType),
            0x06 => self.decode_new_string(Table::String),
            0x09 => self.decode_skip_block(),
            0x0A => self.decode_header(),
            0x11..=0x1F => self.decode_state_update(opcode),
            0x20..=0x2B => self.decode_event(opcode),
            other => Err(DecodeError::UnknownOpcode(other)),
        }
    }

    fn decode_header(&mut self) -> Result<(), DecodeError> {
        let _version = self.stream.read_byte()?;
        let _align_bits = self.stream.read_byte()?;
        self.state.base_index_time = self.stream.read_i32_le()?;
        log::debug!(
            "journal header: version={_version}, base_index_time={}",
            self.state.base_index_time
        );
        Ok(())
    }

    fn decode_skip_block(&mut self) -> Result<(), DecodeError> {
        let len = self.stream.read_uvarint()?;
        self.stream.skip(len as usize)?;
        Ok(())
    }

    fn decode_new_string(&mut self, table: Table) -> Result<(), DecodeError> {
        let len = self.stream.read_uvarint()?;
        let bytes = self.stream.read(len as usize)?;
        let s = String::from_utf8_lossy(&bytes).into_owned();
        match table {
            Table::Host => self.tables.hosts.push(s),
            Table::Source => self.tables.sources.push(s),
            Table::SourceType => self.tables.sourcetypes.push(s),
            Table::String => self.tables.strings.push(s),
        }
    }

    fn decode_state_update(&mut self, opcode: u8) -> Result<(), DecodeError> {
        let flags = opcode & 0xF;
        if flags & 0x8 != 0 {
            self.state.active_host = self.stream.read_uvarint()?;
        }
        if flags & 0x4 != 0 {
            self.state.active_source = self.stream.read_uvarint()?;
        }
        if flags & 0x2 != 0 {
            self.state.active_sourcetype = self.stream.read_uvarint()?;
        }
        if flags & 0x1 != 0 {
            self.state.base_event_time = self.stream.read_i32_le()?;
        }
        Ok(())
    }

    fn decode_event(&mut self, opcode: u8) -> Result<(), DecodeError> {
        let message_length = self.stream.read_uvarint()?;
        let target_pos = self.stream.tell() + message_length;

        let has_extended_storage = opcode & 0x4 != 0;
        let extended_storage_len = if has_extended_storage {
            self.stream.read_uvarint()? as usize
        } else {
            0
        };

        let has_hash = opcode & 0x1 == 0;
        self.event.hash = if has_hash {
            let bytes = self.stream.read(HASH_SIZE)?;
            let mut hash = [0u8; HASH_SIZE];
            hash.copy_from_slice(&bytes);
            Some(hash)
        } else {
            None
        };

        self.event.stream_id = self.stream.read_u64_le()?;
        self.event.stream_offset = self.stream.read_uvarint()?;
        self.event.stream_sub_offset = self.stream.read_uvarint()?;

        let index_time_diff = self.stream.read_uvarint()?;
        let time_sub_seconds = self.stream.read_varint_shifted()?;
        let metadata_count = self.stream.read_uvarint()?;

        for _ in 0..metadata_count {
            let pairs = read_metadata_entry(&mut self.stream, opcode)?;
            for (field_index, value_index) in pairs {
                let (field, value) = resolve_pair(&self.tables.strings, field_index, value_index);
                self.event.insert_metadata(field, value);
            }
        }

        if has_extended_storage {
            self.event.extended_storage = Some(self.stream.read(extended_storage_len)?);
        }

        let message_len = target_pos.saturating_sub(self.stream.tell());
        self.event.message = self.stream.read(message_len as usize)?;

        self.event.index_time = i64::from(self.state.base_index_time) + index_time_diff as i64;
        self.event.event_time = i64::from(self.state.base_event_time) * 1000 + time_sub_seconds as i64;
        self.event.host = resolve_active(&self.tables.hosts, self.state.active_host)?;
        self.event.source = resolve_active(&self.tables.sources, self.state.active_source)?;
        self.event.sourcetype = resolve_active(&self.tables.sourcetypes, self.state.active_sourcetype)?;
        self.event.include_punctuation = (opcode & 0x22) == 0x22;

        Ok(())
    }
}

enum Table {
    Host,
    Source,
    SourceType,
    String,
}

#[cfg(test)]
mod builder {
    //! Minimal opcode-stream assembler for tests. Not a general-purpose
    //! encoder: it only knows how to produce the handful of shapes this
    //! crate's test scenarios need.

    pub struct JournalBuilder {
        bytes: Vec<u8>,
    }

    impl JournalBuilder {
        pub fn new() -> Self {
            Self { bytes: Vec::new() }
        }

        pub fn push_byte(mut self, b: u8) -> Self {
            self.bytes.push(b);
            self
        }

        pub fn push_bytes(mut self, b: &[u8]) -> Self {
            self.bytes.extend_from_slice(b);
            self
        }

        pub fn push_uvarint(mut self, mut value: u64) -> Self {
            loop {
                let mut byte = (value & 0x7F) as u8;
                value >>= 7;
                if value > 0 {
                    byte |= 0x80;
                }
                self.bytes.push(byte);
                if value == 0 {
                    break;
                }
            }
            self
        }

        pub fn push_varint_shifted(self, value: u64) -> Self {
            self.push_uvarint(value << 1)
        }

        pub fn push_i32_le(mut self, value: i32) -> Self {
            self.bytes.extend_from_slice(&value.to_le_bytes());
            self
        }

        pub fn push_u64_le(mut self, value: u64) -> Self {
            self.bytes.extend_from_slice(&value.to_le_bytes());
            self
        }

        pub fn header(self, base_index_time: i32) -> Self {
            self.push_byte(0x0A)
                .push_byte(1) // version
                .push_byte(0) // align_bits
                .push_i32_le(base_index_time)
        }

        pub fn new_string(self, opcode: u8, s: &str) -> Self {
            self.push_byte(opcode)
                .push_uvarint(s.len() as u64)
                .push_bytes(s.as_bytes())
        }

        pub fn state_update(self, flags: u8, host: u64, source: u64, sourcetype: u64, base_event_time: i32) -> Self {
            let mut b = self.push_byte(0x10 | flags);
            if flags & 0x8 != 0 {
                b = b.push_uvarint(host);
            }
            if flags & 0x4 != 0 {
                b = b.push_uvarint(source);
            }
            if flags & 0x2 != 0 {
                b = b.push_uvarint(sourcetype);
            }
            if flags & 0x1 != 0 {
                b = b.push_i32_le(base_event_time);
            }
            b
        }

        /// Build an event for `opcode`, with hash/extended-storage presence
        /// implied by the opcode's own bits, and the given metadata entries
        /// (already shaped as `(field_index, value_index)` pairs).
        #[allow(clippy::too_many_arguments)]
        pub fn event(
            self,
            opcode: u8,
            stream_id: u64,
            stream_offset: u64,
            stream_sub_offset: u64,
            index_time_diff: u64,
            time_sub_seconds: u64,
            metadata: &[(u64, u64)],
            message: &[u8],
        ) -> Self {
            let mut body = Self::new();

            if opcode & 0x4 != 0 {
                body = body.push_uvarint(message.len() as u64); // extended_storage_len
            }
            if opcode & 0x1 == 0 {
                body = body.push_bytes(&[0xABu8; 20]); // hash
            }
            body = body
                .push_u64_le(stream_id)
                .push_uvarint(stream_offset)
                .push_uvarint(stream_sub_offset)
                .push_uvarint(index_time_diff)
                .push_varint_shifted(time_sub_seconds)
                .push_uvarint(metadata.len() as u64);

            for &(field_index, value_index) in metadata {
                // Shape meta_key so that, after the decoder's own shift for
                // opcode < 36 (or <<3 for legacy opcodes), the field index
                // survives and, for non-legacy opcodes, representation 0
                // (String, 1 extra int) is selected.
                let meta_key = if opcode <= 2 {
                    field_index << 1
                } else if opcode < 36 {
                    field_index << 2
                } else {
                    field_index << 4
                };
                body = body.push_uvarint(meta_key).push_uvarint(value_index);
            }

            if opcode & 0x4 != 0 {
                body = body.push_bytes(message); // extended storage payload
            }
            body = body.push_bytes(message);

            let message_length = body.bytes.len() as u64;
            self.push_byte(opcode).push_uvarint(message_length).push_bytes(&body.bytes)
        }

        pub fn build(self) -> Vec<u8> {
            self.bytes
        }
    }
}
