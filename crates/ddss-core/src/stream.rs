use std::collections::VecDeque;
use std::io::Read;

use ddss_wire::WireError;

/// Minimum number of bytes pulled from the source on each refill.
const MIN_CHUNK: usize = 64 * 1024;

/// Maximum bytes a base-128 varint may occupy before it's rejected.
const MAX_VARINT_BYTES: usize = 10;

/// A re-fillable byte buffer over an arbitrary [`Read`] source.
///
/// Tracks an absolute position that only advances on consuming reads
/// (`read`, `read_byte`, `skip`) — never on `peek`.
pub struct ByteStream<R> {
    reader: R,
    buf: VecDeque<u8>,
    eof: bool,
    pos: u64,
}

impl<R: Read> ByteStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: VecDeque::new(),
            eof: false,
            pos: 0,
        }
    }

    pub fn tell(&self) -> u64 {
        self.pos
    }

    /// Pull from the source until the buffer holds at least `want` bytes or
    /// the source is exhausted.
    fn fill(&mut self, want: usize) -> Result<(), WireError> {
        while self.buf.len() < want && !self.eof {
            let chunk_size = MIN_CHUNK.max(want - self.buf.len());
            let mut chunk = vec![0u8; chunk_size];
            let n = self.reader.read(&mut chunk)?;
            if n == 0 {
                self.eof = true;
                break;
            }
            self.buf.extend(&chunk[..n]);
        }
        Ok(())
    }

    /// Read exactly `n` bytes, advancing position by `n`.
    pub fn read(&mut self, n: usize) -> Result<Vec<u8>, WireError> {
        self.fill(n)?;
        if self.buf.len() < n {
            return Err(WireError::UnexpectedEof { offset: self.pos });
        }
        let out: Vec<u8> = self.buf.drain(..n).collect();
        self.pos += n as u64;
        Ok(out)
    }

    pub fn read_byte(&mut self) -> Result<u8, WireError> {
        Ok(self.read(1)?[0])
    }

    /// Return up to `n` bytes without consuming them. Tolerates EOF: may
    /// return fewer than `n` bytes rather than erroring.
    pub fn peek(&mut self, n: usize) -> Result<Vec<u8>, WireError> {
        self.fill(n)?;
        let take = n.min(self.buf.len());
        Ok(self.buf.iter().take(take).copied().collect())
    }

    /// Advance position by `n`, discarding the bytes.
    pub fn skip(&mut self, n: usize) -> Result<(), WireError> {
        self.read(n)?;
        Ok(())
    }

    /// Read an unsigned base-128 LSB-first varint.
    pub fn read_uvarint(&mut self) -> Result<u64, WireError> {
        let start = self.pos;
        let mut result: u64 = 0;
        let mut shift: u32 = 0;

        for _ in 0..MAX_VARINT_BYTES {
            let byte = self.read_byte().map_err(|e| match e {
                WireError::UnexpectedEof { .. } => WireError::TruncatedVarint { offset: start },
                other => other,
            })?;
            result |= u64::from(byte & 0x7F) << shift;
            shift += 7;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }
        Err(WireError::VarintTooLong)
    }

    /// Read a zigzag-encoded signed varint.
    pub fn read_varint(&mut self) -> Result<i64, WireError> {
        let raw = self.read_uvarint()?;
        Ok(((raw >> 1) as i64) ^ -((raw & 1) as i64))
    }

    /// Read a "shifted" varint (reserved low bit discarded).
    pub fn read_varint_shifted(&mut self) -> Result<u64, WireError> {
        let raw = self.read_uvarint()?;
        Ok(raw >> 1)
    }

    /// Read a 4-byte little-endian signed integer.
    pub fn read_i32_le(&mut self) -> Result<i32, WireError> {
        let bytes = self.read(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read an 8-byte little-endian unsigned integer.
    pub fn read_u64_le(&mut self) -> Result<u64, WireError> {
        let bytes = self.read(8)?;
        Ok(u64::from_le_bytes(bytes.try_into().unwrap()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn stream(bytes: &[u8]) -> ByteStream<Cursor<Vec<u8>>> {
        ByteStream::new(Cursor::new(bytes.to_vec()))
    }

    #[test]
    fn read_advances_position() {
        let mut s = stream(&[1, 2, 3, 4]);
        assert_eq!(s.read(2).unwrap(), vec![1, 2]);
        assert_eq!(s.tell(), 2);
        assert_eq!(s.read(2).unwrap(), vec![3, 4]);
        assert_eq!(s.tell(), 4);
    }

    #[test]
    fn read_past_end_is_eof() {
        let mut s = stream(&[1, 2]);
        assert!(matches!(
            s.read(3),
            Err(WireError::UnexpectedEof { offset: 0 })
        ));
    }

    #[test]
    fn peek_does_not_advance_position() {
        let mut s = stream(&[9, 8, 7]);
        assert_eq!(s.peek(2).unwrap(), vec![9, 8]);
        assert_eq!(s.tell(), 0);
        assert_eq!(s.read(1).unwrap(), vec![9]);
    }

    #[test]
    fn peek_past_end_returns_short_slice() {
        let mut s = stream(&[1]);
        assert_eq!(s.peek(5).unwrap(), vec![1]);
        assert_eq!(s.tell(), 0);
    }

    #[test]
    fn skip_advances_without_returning_bytes() {
        let mut s = stream(&[1, 2, 3, 4]);
        s.skip(2).unwrap();
        assert_eq!(s.tell(), 2);
        assert_eq!(s.read(2).unwrap(), vec![3, 4]);
    }

    #[test]
    fn read_uvarint_multi_byte() {
        let mut s = stream(&[0xAC, 0x02, 0xFF]);
        assert_eq!(s.read_uvarint().unwrap(), 300);
        assert_eq!(s.tell(), 2);
    }

    #[test]
    fn read_uvarint_truncated() {
        let mut s = stream(&[0x80]);
        assert!(matches!(
            s.read_uvarint(),
            Err(WireError::TruncatedVarint { .. })
        ));
    }

    #[test]
    fn read_varint_shifted_discards_low_bit() {
        let mut s = stream(&[0x64]); // 0b1100100 >> 1 = 50
        assert_eq!(s.read_varint_shifted().unwrap(), 50);
    }

    #[test]
    fn fill_crosses_chunk_boundary() {
        // Force multiple internal refills by requesting more than one
        // minimum chunk's worth of data.
        let data = vec![0x2A; MIN_CHUNK + 10];
        let mut s = stream(&data);
        let out = s.read(MIN_CHUNK + 10).unwrap();
        assert_eq!(out.len(), MIN_CHUNK + 10);
        assert!(out.iter().all(|&b| b == 0x2A));
    }
}
