//! Example: Dump the resolved timeline of a SUS chart as JSON
//!
//! The chart is decoded as UTF-8 first, and as Shift-JIS if it is not valid UTF-8.
//! Warnings are rendered to stderr, and the timeline is printed to stdout.

use std::path::{Path, PathBuf};

use clap::Parser;
use sus_rs::sus::{
    UnsupportedFamilyPolicy, command::Radix, default_config, parse_sus_with_config,
};

/// Configuration parameters
#[derive(Parser, Debug)]
#[command(name = "sus_to_json")]
#[command(about = "Resolves a SUS chart into a timeline and dumps it as JSON", long_about = None)]
struct Config {
    /// Chart file path
    #[arg(value_name = "FILE")]
    chart_path: PathBuf,

    /// Reads the measure field in base 36
    #[arg(long)]
    base36_measures: bool,

    /// Fails on hold, slide variant and flick notes instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Prints the JSON with indents
    #[arg(short, long)]
    pretty: bool,
}

/// Load chart text, falling back to Shift-JIS.
fn load_source(path: &Path) -> Result<String, String> {
    let bytes = std::fs::read(path).map_err(|e| format!("Failed to read file: {e}"))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => encoding_rs::SHIFT_JIS
            .decode(err.as_bytes())
            .0
            .into_owned(),
    })
}

fn main() -> Result<(), String> {
    let config = Config::parse();
    let name = config.chart_path.display().to_string();
    let source = load_source(&config.chart_path)?;

    let mut parse_config = default_config();
    if config.base36_measures {
        parse_config = parse_config.with_measure_radix(Radix::Base36);
    }
    if config.strict {
        parse_config = parse_config.with_unsupported_family(UnsupportedFamilyPolicy::Error);
    }

    let output = match parse_sus_with_config(&source, parse_config) {
        Ok(output) => output,
        Err(err) => {
            #[cfg(feature = "diagnostics")]
            sus_rs::diagnostics::emit_sus_error(&name, &source, &err);
            return Err(format!("Parse error: {err}"));
        }
    };
    #[cfg(feature = "diagnostics")]
    sus_rs::diagnostics::emit_sus_warnings(&name, &source, &output.warnings);
    eprintln!("{name}: {} warnings", output.warnings.len());

    let json = if config.pretty {
        serde_json::to_string_pretty(&output.timeline)
    } else {
        serde_json::to_string(&output.timeline)
    }
    .map_err(|e| format!("Failed to serialize: {e}"))?;
    println!("{json}");
    Ok(())
}
