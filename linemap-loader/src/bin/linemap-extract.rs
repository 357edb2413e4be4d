//! CLI tool to apply a line map to fixed-column record files.
//!
//! Usage:
//!   linemap-extract <record.txt>...
//!   linemap-extract --format csmip-v2 <record.txt>...
//!   linemap-extract --map custom.json --strict <record.txt>...
//!   linemap-extract --map custom.toml --check
//!
//! Each record is printed as pretty JSON on stdout. Per-field problems are
//! reported inside the JSON; with `--strict` they also make the exit code 2.

use std::io;
use std::process::ExitCode;

use clap::Parser;

use linemap_loader::cli::{Cli, exit_code, run};

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    let result = run(&cli, &mut io::stdout().lock());
    if let Err(e) = &result {
        eprintln!("Error: {e:#}");
    }
    ExitCode::from(exit_code(&result))
}
