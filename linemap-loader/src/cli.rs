//! Command-line front end for `linemap-extract`.
//!
//! Exit status: 0 when every record extracted cleanly (or `--strict` is off),
//! 2 under `--strict` when any record has field errors, 1 when the line map
//! or a record file could not be loaded.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;
use serde::Serialize;

use linemaps_rs::{ExtractedRecord, RawRecord, extract};

use crate::format::{FormatVersion, SchemaSource};

/// Extract typed fields from fixed-column records using a line map
#[derive(Parser, Debug)]
#[command(name = "linemap-extract")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Built-in format name, or a path to a line-map document
    #[arg(short, long, default_value = "csmip-v2", conflicts_with = "map")]
    pub format: FormatVersion,

    /// Line-map document (JSON, or TOML by extension)
    #[arg(short, long, value_name = "FILE")]
    pub map: Option<PathBuf>,

    /// Exit with status 2 when any record has field errors
    #[arg(long)]
    pub strict: bool,

    /// Only validate the line map and report its size
    #[arg(long)]
    pub check: bool,

    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Record files to extract
    #[arg(value_name = "RECORD")]
    pub records: Vec<PathBuf>,
}

impl Cli {
    /// `--map` wins over `--format`.
    pub fn source(&self) -> FormatVersion {
        match &self.map {
            Some(path) => FormatVersion::Custom(path.clone()),
            None => self.format.clone(),
        }
    }

    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub records: usize,
    /// Records with at least one field error.
    pub dirty: usize,
    pub strict: bool,
}

impl RunSummary {
    pub fn exit_code(&self) -> u8 {
        if self.strict && self.dirty > 0 { 2 } else { 0 }
    }
}

#[derive(Serialize)]
struct FileOutput<'a> {
    file: String,
    #[serde(flatten)]
    record: &'a ExtractedRecord,
}

/// Load the line map and extract every record file, writing pretty JSON to `out`.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<RunSummary> {
    let source = cli.source();
    let schema = source
        .load()
        .with_context(|| format!("loading line map '{source}'"))?;

    let mut summary = RunSummary {
        strict: cli.strict,
        ..RunSummary::default()
    };

    if cli.check {
        writeln!(
            out,
            "{}: {} fields over {} lines",
            schema.source_name(),
            schema.len(),
            schema.max_line()
        )?;
        return Ok(summary);
    }
    if cli.records.is_empty() {
        bail!("no record files given");
    }

    for path in &cli.records {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading record '{}'", path.display()))?;
        let extracted = extract(&schema, &RawRecord::from_text(&text));
        summary.records += 1;
        if !extracted.is_clean() {
            summary.dirty += 1;
        }

        let output = FileOutput {
            file: path.display().to_string(),
            record: &extracted,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    }

    info!(
        "extracted {} record(s), {} with field errors",
        summary.records, summary.dirty
    );
    Ok(summary)
}

/// Process exit status for the result of [`run`].
pub fn exit_code(result: &Result<RunSummary>) -> u8 {
    match result {
        Ok(summary) => summary.exit_code(),
        Err(_) => 1,
    }
}
