//! Demo CLI: compiles the demo patterns and writes the network as GML and
//! JSON.
//!
//! # Usage
//!
//! ```bash
//! rete-demo [out_dir] [--config <matcher.json>] [--log-format pretty|compact|json]
//! ```
//!
//! `RUST_LOG=rete_network=trace` shows every node created or reused.

use std::path::PathBuf;
use std::process::ExitCode;

use rete_compiler::prelude::{Archetype, MatcherConfig};
use rete_demo::{DemoError, build_matcher, load_config, write_exports};
use rete_tracing::{TracingFormat, TracingSetup};

struct Args {
    out_dir: PathBuf,
    config: Option<PathBuf>,
    log_format: TracingFormat,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        out_dir: PathBuf::from("."),
        config: None,
        log_format: TracingFormat::Compact,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "--log-format" => {
                let format = iter.next().ok_or("--log-format needs a value")?;
                args.log_format = format.parse().map_err(|e| format!("{e}"))?;
            }
            _ if arg.starts_with("--") => return Err(format!("unknown flag '{arg}'")),
            _ => args.out_dir = PathBuf::from(arg),
        }
    }
    Ok(args)
}

fn run(args: &Args) -> Result<(), DemoError> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => MatcherConfig::default(),
    };
    let matcher = build_matcher(config)?;

    for archetype in [
        Archetype::Check,
        Archetype::Store,
        Archetype::Alias,
        Archetype::Merge,
    ] {
        tracing::info!(%archetype, count = matcher.count_archetype(archetype), "nodes");
    }

    let [gml, json] = write_exports(&matcher, &args.out_dir)?;
    tracing::info!(gml = %gml.display(), json = %json.display(), "network exported");
    Ok(())
}

#[expect(clippy::print_stderr, reason = "usage errors precede logging setup")]
fn print_usage(message: &str) {
    eprintln!("Error: {message}");
    eprintln!(
        "Usage: rete-demo [out_dir] [--config <matcher.json>] [--log-format pretty|compact|json]"
    );
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            print_usage(&message);
            return ExitCode::FAILURE;
        }
    };

    TracingSetup::new().with_format(args.log_format).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "demo failed");
            ExitCode::FAILURE
        }
    }
}
