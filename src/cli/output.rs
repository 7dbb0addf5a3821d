//! Terminal rendering shared by the subcommands.

use anyhow::Result;
use serde::Serialize;
use serde_json::{Map, Value};

#[cfg(feature = "colorized_output")]
use console::style;

use mxa_analyzer::image::TagMetadata;
use mxa_analyzer::record::CategorizedRecord;
use mxa_analyzer::table::ScanTable;

use super::OutputFormat;

const MAX_CELL_WIDTH: usize = 40;

/// A section title, bold when colors are enabled.
pub fn heading(text: &str) -> String {
    #[cfg(feature = "colorized_output")]
    {
        style(text).bold().cyan().to_string()
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        text.to_string()
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_record(title: &str, record: &CategorizedRecord, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(record),
        OutputFormat::Text => {
            println!("{}", heading(title));
            println!();
            print!("{}", record);
            Ok(())
        }
    }
}

fn truncate(cell: &str) -> String {
    if cell.chars().count() > MAX_CELL_WIDTH {
        let head: String = cell.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{}...", head)
    } else {
        cell.to_string()
    }
}

fn shown_rows(table: &ScanTable, limit: Option<usize>) -> &[Vec<String>] {
    let shown = limit.unwrap_or(table.num_rows()).min(table.num_rows());
    &table.rows()[..shown]
}

/// Rows as JSON objects keyed by column name, in column order.
pub fn table_json(table: &ScanTable, limit: Option<usize>) -> Value {
    let records = shown_rows(table, limit)
        .iter()
        .map(|row| {
            let record: Map<String, Value> = table
                .headers()
                .iter()
                .zip(row)
                .map(|(h, c)| (h.clone(), Value::String(c.clone())))
                .collect();
            Value::Object(record)
        })
        .collect();
    Value::Array(records)
}

pub fn print_table(table: &ScanTable, limit: Option<usize>, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(&table_json(table, limit));
    }
    let rows = shown_rows(table, limit);
    let shown = rows.len();

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| r.iter().map(|c| truncate(c)).collect())
        .collect();
    let mut widths: Vec<usize> = table.headers().iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (w, c) in widths.iter_mut().zip(row) {
            *w = (*w).max(c.chars().count());
        }
    }

    let line = |values: &[String]| {
        values
            .iter()
            .zip(&widths)
            .map(|(v, &w)| format!("{:<width$}", v, width = w))
            .collect::<Vec<_>>()
            .join("  ")
    };
    println!("{}", heading(line(table.headers()).trim_end()));
    for row in &cells {
        println!("{}", line(row.as_slice()).trim_end());
    }
    if shown < table.num_rows() {
        println!("... {} more rows", table.num_rows() - shown);
    }
    println!("({} rows, {} columns)", table.num_rows(), table.headers().len());
    Ok(())
}

pub fn print_tag_metadata(metadata: &TagMetadata, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(metadata),
        OutputFormat::Text => {
            println!("{}", heading("Image Metadata"));
            if metadata.is_empty() {
                println!("  No metadata found or error extracting metadata.");
            }
            for (id, value) in metadata.iter() {
                println!("  {}: {}", id, value);
            }
            if !metadata.warnings.is_empty() {
                println!();
                println!("{} warning(s):", metadata.warnings.len());
                for warning in &metadata.warnings {
                    println!("  {}", warning);
                }
            }
            Ok(())
        }
    }
}
