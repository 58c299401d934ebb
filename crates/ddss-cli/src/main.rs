/// Splunk DDSS journal extraction CLI — decode a journal and write its
/// events as NDJSON, CSV, or (declared but unsupported) Parquet.
///
/// ```text
/// ddss <COMMAND> [OPTIONS]
///
/// Commands:
///   decode    Decode a journal and write its events
///   inspect   Print a human-readable per-event summary
///   help      Print help information
/// ```
///
/// # Exit codes
///
/// | Code | Meaning              |
/// |------|----------------------|
/// | 0    | Success              |
/// | 1    | Other error          |
/// | 2    | Input file not found |
/// | 130  | Interrupted          |
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod cmd_decode;
mod cmd_inspect;

pub use cmd_decode::DecodeArgs;
pub use cmd_inspect::InspectArgs;

#[derive(Parser)]
#[command(name = "ddss", version, about = "Splunk DDSS journal extractor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Logging level (overridden by --verbose/--quiet).
    #[arg(short = 'l', long, global = true, default_value = "info")]
    log_level: String,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress informational logging (warning level and above only).
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a journal and write its events in the requested format.
    Decode(DecodeArgs),
    /// Print a human-readable per-event summary.
    Inspect(InspectArgs),
}

fn determine_log_level(cli: &Cli) -> &'static str {
    if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        match cli.log_level.to_lowercase().as_str() {
            "debug" => "debug",
            "warn" | "warning" => "warn",
            "error" => "error",
            _ => "info",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(determine_log_level(&cli))).init();

    let result = match &cli.command {
        Commands::Decode(args) => cmd_decode::run(args),
        Commands::Inspect(args) => cmd_inspect::run(args),
    };

    match result {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            let not_found = e
                .chain()
                .find_map(|cause| cause.downcast_ref::<ddss_io::IoOpenError>())
                .and_then(|err| match err {
                    ddss_io::IoOpenError::NotFound(path) => Some(path.clone()),
                    _ => None,
                });
            if let Some(path) = not_found {
                eprintln!("error: input not found: {path}");
                return ExitCode::from(2);
            }
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
