use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use fintrace::{ExportOptions, check, export, init_logging};
use jiff::Timestamp;

#[derive(Parser, Debug)]
#[command(name = "fintrace")]
#[command(about = "Monthly reconciliation and attribution traces for simulation runs")]
struct Args {
    /// Directory for fintrace.log (default: ~/.fintrace/)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the trace for a run file and write the export documents
    Export {
        /// Run file (.json, .yaml or .yml)
        input: PathBuf,

        /// Directory the documents are written to
        #[arg(short, long)]
        out_dir: PathBuf,

        /// Export timestamp recorded in the metadata (RFC 3339, default: now)
        #[arg(long)]
        timestamp: Option<Timestamp>,

        /// Also write the full trace as trace.json
        #[arg(long)]
        with_trace_json: bool,
    },
    /// Build the trace for a run file and print an audit summary
    Check {
        /// Run file (.json, .yaml or .yml)
        input: PathBuf,

        /// Exit with a failure status if any month is unreconciled
        #[arg(long)]
        strict: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".fintrace")
}

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;

    let args = Args::parse();
    let log_dir = args.log_dir.unwrap_or_else(default_log_dir);
    init_logging(&log_dir, &args.log_level)?;

    match args.command {
        Command::Export {
            input,
            out_dir,
            timestamp,
            with_trace_json,
        } => {
            let options = ExportOptions {
                out_dir,
                timestamp,
                with_trace_json,
            };
            for path in export(&input, &options)? {
                println!("{}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Check {
            input,
            strict,
            json,
        } => {
            let outcome = check(&input, json)?;
            print!("{}", outcome.rendered);
            if json {
                println!();
            }
            if strict && !outcome.clean {
                tracing::warn!(input = %input.display(), "Strict check failed");
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
