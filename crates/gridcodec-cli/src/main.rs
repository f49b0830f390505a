//! gridcodec CLI - write and read typed single-sheet XLSX documents

mod sample;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, Timelike};
use clap::{Parser, Subcommand};
use gridcodec::prelude::*;
use gridcodec::{build_document, open_document, open_document_with};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use sample::SampleStyles;

#[derive(Parser)]
#[command(name = "gridcodec")]
#[command(
    author,
    version,
    about = "Write and read typed single-sheet XLSX documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the sample sheet: a header block followed by data rows
    WriteSample {
        /// Output spreadsheet file
        path: PathBuf,

        /// Number of data rows
        #[arg(short, long, default_value = "2")]
        rows: usize,
    },

    /// Read a sample sheet back into data rows
    ReadSample {
        /// Input spreadsheet file
        path: PathBuf,
    },

    /// Print every decoded cell of a sheet
    Dump {
        /// Input spreadsheet file
        path: PathBuf,

        /// Sheet name (default: the first sheet)
        #[arg(short, long, conflicts_with = "index")]
        sheet: Option<String>,

        /// Sheet index (0-based)
        #[arg(short, long)]
        index: Option<usize>,

        /// Print the rows as JSON instead of one line per cell
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // library diagnostics go to stderr; RUST_LOG overrides the default
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::WriteSample { path, rows } => write_sample(&path, rows),
        Commands::ReadSample { path } => read_sample(&path),
        Commands::Dump {
            path,
            sheet,
            index,
            json,
        } => dump(&path, sheet, index, json),
    }
}

fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

fn write_sample(path: &Path, rows: usize) -> Result<()> {
    let now = now();
    let styles = SampleStyles::new();
    let grid = sample::build_grid(&styles, &sample::sample_rows(rows, now), now);

    build_document(
        path,
        &sample::sheet_name(now),
        &styles.stylesheet,
        &sample::column_widths(),
        &grid,
    )
    .with_context(|| format!("Failed to write '{}'", path.display()))?;

    tracing::debug!(rows = grid.len(), "sample sheet written");
    println!("Spreadsheet {} created", path.display());
    Ok(())
}

fn read_sample(path: &Path) -> Result<()> {
    let read =
        open_document(path).with_context(|| format!("Failed to open '{}'", path.display()))?;
    if !read.report.fallbacks.is_empty() {
        tracing::warn!("{}", read.report);
    }

    match sample::read_rows(&read.grid) {
        Some(rows) => {
            for row in &rows {
                println!("{}", row);
            }
            println!("{} rows read from spreadsheet", rows.len());
        }
        None => println!("Spreadsheet not in correct format"),
    }
    Ok(())
}

fn dump(path: &Path, sheet: Option<String>, index: Option<usize>, as_json: bool) -> Result<()> {
    let options = match (sheet, index) {
        (Some(name), _) => ReadOptions::new().with_sheet_name(name),
        (None, Some(i)) => ReadOptions::new().with_sheet_index(i),
        (None, None) => ReadOptions::default(),
    };
    let read = open_document_with(path, &options)
        .with_context(|| format!("Failed to open '{}'", path.display()))?;

    if as_json {
        let out = serde_json::to_string_pretty(&sheet_json(&read))
            .context("Failed to serialise sheet")?;
        println!("{}", out);
    } else {
        for line in cell_lines(&read.grid)? {
            println!("{}", line);
        }
        eprintln!("{}", read.report);
    }
    Ok(())
}

/// `A1<TAB>type<TAB>value` for every cell, `empty` for cells without a value
fn cell_lines(grid: &Grid) -> Result<Vec<String>> {
    let mut lines = Vec::with_capacity(grid.cell_count());
    for (r, row) in grid.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let address = CellAddress::from_position(r, c)?;
            let line = match &cell.value {
                Some(v) => format!("{}\t{}\t{}", address, v.type_name(), v),
                None => format!("{}\tempty\t", address),
            };
            lines.push(line);
        }
    }
    Ok(lines)
}

fn sheet_json(read: &SheetRead) -> Value {
    let rows: Vec<Value> = read
        .grid
        .iter()
        .map(|row| Value::Array(row.iter().map(cell_json).collect()))
        .collect();
    json!({
        "sheet": read.report.sheet_name,
        "rows": rows,
        "cells": read.report.cell_count,
        "fallbacks": read.report.fallbacks.total(),
    })
}

fn cell_json(cell: &GenericCell) -> Value {
    match &cell.value {
        None => Value::Null,
        Some(Scalar::Boolean(b)) => json!(b),
        Some(Scalar::Integer(i)) => json!(i),
        Some(Scalar::Float(f)) => json!(f),
        // exact decimals and dates keep their text form
        Some(other) => json!(other.to_string()),
    }
}
