//! smelt-flatten: flatten envelope-wrapped content-API responses
//!
//! Usage:
//!   # Read from file, output to stdout
//!   smelt-flatten response.json
//!
//!   # Read from stdin, output to stdout
//!   echo '{"data":{"id":1,"attributes":{"no":"TEST"}}}' | smelt-flatten
//!
//!   # Process NDJSON, one envelope response per line
//!   smelt-flatten --ndjson responses.jsonl
//!
//!   # Consolidate locales after flattening
//!   smelt-flatten --localize page.json --pretty

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use smelt::{flatten, localize_response, localize_responses};
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};

#[derive(Parser, Debug)]
#[command(name = "smelt-flatten")]
#[command(about = "Flatten envelope-wrapped content-API responses", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Process newline-delimited JSON (one envelope response per line)
    #[arg(long)]
    ndjson: bool,

    /// Consolidate per-locale sibling records into locale-keyed maps
    #[arg(long)]
    localize: bool,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,

    /// Output file (use stdout if omitted)
    #[arg(long, short = 'o')]
    output: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).context(format!("Failed to create output file: {}", path))?,
        ),
        None => Box::new(std::io::stdout()),
    };

    let reader: Box<dyn Read> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).context(format!("Failed to open input file: {}", path))?,
        )),
        None => Box::new(std::io::stdin()),
    };

    if args.ndjson {
        process_lines(reader, &mut writer, &args)?;
    } else {
        process_document(reader, &mut writer, &args)?;
    }

    writer.flush().context("Failed to flush output")?;
    Ok(())
}

/// Process one envelope response per input line
fn process_lines(reader: Box<dyn Read>, writer: &mut dyn Write, args: &Args) -> Result<()> {
    for line in BufReader::new(reader).lines() {
        let line = line.context("Failed to read line")?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line).context("Failed to parse JSON")?;
        let output = transform(value, args.localize)?;
        write_record(writer, &output, args.pretty)?;
    }
    Ok(())
}

/// Process a single JSON document read into memory
fn process_document(reader: Box<dyn Read>, writer: &mut dyn Write, args: &Args) -> Result<()> {
    let mut content = Vec::new();
    let mut buf_reader = BufReader::new(reader);
    buf_reader
        .read_to_end(&mut content)
        .context("Failed to read input")?;

    // Try SIMD parsing first (faster), fall back to serde_json
    let value: Value = match simd_json::to_owned_value(&mut content.clone()) {
        Ok(owned) => {
            let json_str = simd_json::to_string(&owned)?;
            serde_json::from_str(&json_str)?
        }
        Err(_) => serde_json::from_slice(&content).context("Failed to parse JSON")?,
    };

    let output = transform(value, args.localize)?;
    write_record(writer, &output, args.pretty)?;
    Ok(())
}

/// Flatten a response, consolidating locales when requested
fn transform(response: Value, localize: bool) -> Result<Value> {
    if !localize {
        return Ok(flatten(response)?);
    }

    if matches!(response.get("data"), Some(Value::Array(_))) {
        let maps = localize_responses(response)?;
        Ok(Value::Array(maps.into_iter().map(Value::Object).collect()))
    } else {
        Ok(Value::Object(localize_response(response)?))
    }
}

fn write_record(writer: &mut dyn Write, value: &Value, pretty: bool) -> Result<()> {
    let line = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writeln!(writer, "{}", line).context("Failed to write record")?;
    Ok(())
}
