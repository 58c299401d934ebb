use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{anyhow, Context, Result};
use clap::Args;
use ddss_core::JournalDecoder;
use ddss_format::{CsvWriter, EventRecord, NdjsonWriter, ParquetWriter};
use ddss_io::{open_input, CompressionHint};

/// `ddss decode` — read a journal and write its events to a file or stdout.
///
/// ```text
/// ddss decode -i <INPUT> [-o <OUTPUT>] [-f ndjson|csv|parquet] [-c zstd|gzip|none]
/// ```
#[derive(Args)]
pub struct DecodeArgs {
    /// Input journal path, or `-` for stdin.
    #[arg(short = 'i', long = "input-file", visible_alias = "input")]
    input: String,

    /// Output path, or stdout if omitted.
    #[arg(short = 'o', long = "output-file", visible_alias = "output")]
    output: Option<String>,

    /// Output format.
    #[arg(short = 'f', long = "format", visible_alias = "output-format", default_value = "ndjson")]
    format: String,

    /// Force a compression scheme instead of detecting it from the input's suffix.
    #[arg(short = 'c', long)]
    compression: Option<String>,
}

enum Format {
    Ndjson,
    Csv,
    Parquet,
}

fn parse_format(raw: &str) -> Result<Format> {
    match raw {
        "ndjson" => Ok(Format::Ndjson),
        "csv" => Ok(Format::Csv),
        "parquet" => Ok(Format::Parquet),
        other => Err(anyhow!("unsupported output format: {other} (expected ndjson, csv, or parquet)")),
    }
}

/// Parse a `-c/--compression` flag value, shared with `ddss inspect`.
pub(crate) fn parse_compression_flag(raw: &Option<String>) -> Result<Option<CompressionHint>> {
    match raw {
        None => Ok(None),
        Some(s) => Ok(Some(CompressionHint::parse(s).with_context(|| format!("invalid --compression value {s:?}"))?)),
    }
}

pub fn run(args: &DecodeArgs) -> Result<()> {
    let format = parse_format(&args.format)?;
    let compression = parse_compression_flag(&args.compression)?;

    let reader = open_input(&args.input, compression).with_context(|| format!("opening input {:?}", args.input))?;

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating output {path:?}"))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let mut decoder = JournalDecoder::new(reader);
    let mut count = 0u64;

    match format {
        Format::Ndjson => {
            let mut writer = NdjsonWriter::new(out);
            while decoder.scan() {
                let record = EventRecord::from(decoder.get_event());
                writer.write_record(&record)?;
                count += 1;
            }
            writer.flush()?;
        }
        Format::Csv => {
            let mut writer = CsvWriter::new(out);
            while decoder.scan() {
                let record = EventRecord::from(decoder.get_event());
                writer.write_record(&record)?;
                count += 1;
            }
            writer.flush()?;
        }
        Format::Parquet => {
            let mut writer = ParquetWriter::new();
            while decoder.scan() {
                let record = EventRecord::from(decoder.get_event());
                writer.write_record(&record).context("parquet output")?;
                count += 1;
            }
        }
    }

    if let Some(e) = decoder.err() {
        return Err(anyhow!("decode failed after {count} events: {e}"));
    }

    log::info!("decoded {count} events from {}", args.input);
    Ok(())
}
