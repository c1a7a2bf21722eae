//! ldjuniq: Drop duplicate records from newline-delimited JSON
//!
//! Keeps the first record for every distinct value at a dot-notation key and
//! writes it back out as compact JSON, in input order.
//!
//! Usage:
//!   # Read from file, output to stdout
//!   ldjuniq --key user.id events.jsonl
//!
//!   # Read from stdin (the Go-style `-key` spelling also works)
//!   cat events.jsonl | ldjuniq -key user.id
//!
//!   # Keep going past malformed lines, print counters to stderr
//!   ldjuniq --key id --skip-invalid --stats dump.jsonl

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use ldjuniq::{dedup_ndjson, DedupConfig, InvalidLinePolicy, KeyPath, ParserBackend};
use std::ffi::OsString;
use std::fs::File;
use std::io::{stdin, stdout, BufRead, BufReader};
use std::path::PathBuf;
use tracing::{debug, Level};

/// Long flags that may also be spelled with a single dash
const LONG_FLAGS: &[&str] = &["key", "version", "skip-invalid", "simd", "stats", "verbose"];

#[derive(Parser, Debug)]
#[command(name = "ldjuniq")]
#[command(about = "Drop duplicate NDJSON records by a dot-notation key", long_about = None)]
#[command(disable_version_flag = true)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Key in dot notation, e.g. user.address.city
    #[arg(long, short = 'k', value_name = "PATH", required_unless_present = "version")]
    key: Option<String>,

    /// Show version and exit
    #[arg(long, short = 'v')]
    version: bool,

    /// Warn about and skip lines that fail to parse or have no usable key
    #[arg(long)]
    skip_invalid: bool,

    /// Decode lines with simd-json
    #[arg(long)]
    simd: bool,

    /// Print run counters as JSON to stderr when done
    #[arg(long)]
    stats: bool,

    /// Debug logging on stderr
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse_from(normalize_args(std::env::args_os()));

    if args.version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    let key = KeyPath::parse(args.key.as_deref().unwrap_or_default()).context("Invalid --key")?;

    let mut config = DedupConfig::new(key);
    if args.simd {
        config = config.with_parser(ParserBackend::Simd);
    }
    if args.skip_invalid {
        config = config.with_invalid_policy(InvalidLinePolicy::Skip);
    }
    debug!(?config, input = ?args.input, "Starting deduplication");

    // Create reader based on input source
    let reader: Box<dyn BufRead> = if let Some(file_path) = &args.input {
        let file = File::open(file_path)
            .with_context(|| format!("Failed to open {}", file_path.display()))?;
        Box::new(BufReader::new(file))
    } else {
        Box::new(BufReader::new(stdin()))
    };

    let stats = dedup_ndjson(reader, stdout().lock(), config)?;

    if args.stats {
        eprintln!("{}", serde_json::to_string(&stats)?);
    }

    Ok(())
}

/// Rewrite Go-style flags (`-key x`, `-key=x`) into their `--key` form.
///
/// Arguments after a bare `--` are left alone.
fn normalize_args<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    let mut past_separator = false;
    args.into_iter()
        .map(|arg| {
            if past_separator {
                return arg;
            }
            if arg == "--" {
                past_separator = true;
                return arg;
            }
            match arg.to_str() {
                Some(s) if is_single_dash_long_flag(s) => OsString::from(format!("-{}", s)),
                _ => arg,
            }
        })
        .collect()
}

fn is_single_dash_long_flag(arg: &str) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    if rest.starts_with('-') {
        return false;
    }
    let name = rest.split('=').next().unwrap_or(rest);
    LONG_FLAGS.contains(&name)
}
