/// Implementation of `ddss inspect`.
///
/// Decodes a journal and prints a one-line human-readable summary per
/// event to stdout, instead of writing a structured output file.
///
/// # Output format
///
/// ```text
/// Event 0: host=web01 source=/var/log/app.log sourcetype=app_log index_time=1718000000 time=1718000000000
///          message: "first line of the event"
/// Event 1: host=web01 source=/var/log/app.log sourcetype=app_log index_time=1718000001 time=1718000001000
///          fields: env=prod, tag=[a, b]
/// ---
/// 2 events, 0 decode errors
/// ```
use anyhow::{anyhow, Context, Result};
use clap::Args;
use ddss_core::{Event, JournalDecoder, MetadataValue};
use ddss_io::{open_input, CompressionHint};

use crate::cmd_decode::parse_compression_flag;

/// `ddss inspect` — print a per-event summary for manual inspection.
///
/// ```text
/// ddss inspect -i <INPUT> [-c zstd|gzip|none] [--max N]
/// ```
#[derive(Args)]
pub struct InspectArgs {
    /// Input journal path, or `-` for stdin.
    #[arg(short = 'i', long = "input-file", visible_alias = "input")]
    input: String,

    /// Force a compression scheme instead of detecting it from the input's suffix.
    #[arg(short = 'c', long)]
    compression: Option<String>,

    /// Stop after printing this many events.
    #[arg(long)]
    max: Option<u64>,
}

pub fn run(args: &InspectArgs) -> Result<()> {
    let compression = parse_compression_flag(&args.compression)?;
    let reader = open_input(&args.input, compression).with_context(|| format!("opening input {:?}", args.input))?;

    let mut decoder = JournalDecoder::new(reader);
    let mut count = 0u64;

    while decoder.scan() {
        if let Some(max) = args.max {
            if count >= max {
                break;
            }
        }
        print_event(count, decoder.get_event());
        count += 1;
    }

    let errors = if decoder.err().is_some() { 1 } else { 0 };
    println!("---");
    println!("{count} event{}, {errors} decode error{}", plural(count), plural(errors));

    if let Some(e) = decoder.err() {
        return Err(anyhow!("decode failed after {count} events: {e}"));
    }
    Ok(())
}

fn plural(n: u64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn print_event(idx: u64, event: &Event) {
    println!(
        "Event {idx}: host={} source={} sourcetype={} index_time={} time={}",
        event.host, event.source, event.sourcetype, event.index_time, event.event_time
    );

    let message = event.message_string();
    let truncated: String = message.chars().take(80).collect();
    let ellipsis = if message.chars().count() > 80 { "…" } else { "" };
    println!("         message: {truncated:?}{ellipsis}");

    if !event.metadata_fields.is_empty() {
        let mut keys: Vec<&String> = event.metadata_fields.keys().collect();
        keys.sort();
        let rendered: Vec<String> = keys
            .into_iter()
            .map(|k| format!("{k}={}", render_metadata_value(&event.metadata_fields[k])))
            .collect();
        println!("         fields: {}", rendered.join(", "));
    }
}

fn render_metadata_value(value: &MetadataValue) -> String {
    match value {
        MetadataValue::Scalar(s) => s.clone(),
        MetadataValue::List(items) => format!("[{}]", items.join(", ")),
    }
}
