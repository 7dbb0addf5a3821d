use anyhow::{Context, Result};
use std::path::PathBuf;

use mxa_analyzer::protocol::extract_protocol_bytes;
use mxa_analyzer::session::extract_session;

use super::output::print_record;
use super::OutputFormat;

/// Show an acquisition session descriptor
pub fn run_session(input: PathBuf, format: OutputFormat) -> Result<()> {
    let bytes = std::fs::read(&input)
        .with_context(|| format!("Failed to read file: {}", input.display()))?;
    let record = extract_session(&bytes)
        .with_context(|| format!("Failed to process session descriptor: {}", input.display()))?;
    print_record("Session Descriptor", &record, format)
}

/// Show a protocol descriptor
pub fn run_protocol(input: PathBuf, format: OutputFormat) -> Result<()> {
    let bytes = std::fs::read(&input)
        .with_context(|| format!("Failed to read file: {}", input.display()))?;
    let record = extract_protocol_bytes(&bytes)
        .with_context(|| format!("Failed to process protocol descriptor: {}", input.display()))?;
    print_record("Protocol Descriptor", &record, format)
}
