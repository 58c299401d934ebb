use std::io::Write;

use crate::error::FormatError;
use crate::record::EventRecord;

/// One JSON object per line — the default output format.
pub struct NdjsonWriter<W> {
    writer: W,
}

impl<W: Write> NdjsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_record(&mut self, record: &EventRecord) -> Result<(), FormatError> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), FormatError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Fixed-column CSV: `index_time,time,host,source,sourcetype,event`.
/// `fields` has no dedicated column and is dropped, matching the lossy
/// behavior of a plain CSV export.
pub struct CsvWriter<W: Write> {
    inner: csv::Writer<W>,
    header_written: bool,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: csv::WriterBuilder::new().from_writer(writer),
            header_written: false,
        }
    }

    pub fn write_record(&mut self, record: &EventRecord) -> Result<(), FormatError> {
        if !self.header_written {
            self.inner
                .write_record(["index_time", "time", "host", "source", "sourcetype", "event"])?;
            self.header_written = true;
        }
        self.inner.write_record([
            record.index_time.to_string(),
            record.time.to_string(),
            record.host.clone(),
            record.source.clone(),
            record.sourcetype.clone(),
            record.event.clone(),
        ])?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), FormatError> {
        self.inner.flush()?;
        Ok(())
    }
}

/// Declared in the `--format` enum but not implemented — columnar output
/// needs a schema-evolution story for `fields` that hasn't been designed.
pub struct ParquetWriter;

impl ParquetWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_record(&mut self, _record: &EventRecord) -> Result<(), FormatError> {
        Err(FormatError::Unsupported("parquet".to_string()))
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn sample_record() -> EventRecord {
        let mut fields = Map::new();
        fields.insert("k".to_string(), serde_json::Value::String("v".to_string()));
        EventRecord {
            index_time: 1,
            time: 2,
            event: "hello".to_string(),
            host: "h".to_string(),
            sourcetype: "t".to_string(),
            source: "s".to_string(),
            fields,
        }
    }

    #[test]
    fn ndjson_writes_one_line_per_record() {
        let mut buf = Vec::new();
        {
            let mut w = NdjsonWriter::new(&mut buf);
            w.write_record(&sample_record()).unwrap();
            w.write_record(&sample_record()).unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().next().unwrap().contains("\"host\":\"h\""));
    }

    #[test]
    fn csv_writes_header_once() {
        let mut buf = Vec::new();
        {
            let mut w = CsvWriter::new(&mut buf);
            w.write_record(&sample_record()).unwrap();
            w.write_record(&sample_record()).unwrap();
            w.flush().unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "index_time,time,host,source,sourcetype,event");
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn parquet_is_explicitly_unsupported() {
        let mut w = ParquetWriter::new();
        let err = w.write_record(&sample_record()).unwrap_err();
        assert!(matches!(err, FormatError::Unsupported(fmt) if fmt == "parquet"));
    }
}
