use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::path::PathBuf;

use mxa_analyzer::table::{filtered_file_name, ScanTable};

use super::output::{heading, print_json, print_table};
use super::OutputFormat;

fn parse_filter(filter: &str) -> Result<(&str, &str)> {
    filter
        .split_once('=')
        .with_context(|| format!("Filter must look like COLUMN=VALUE, got '{}'", filter))
}

/// Show a scan-position table, optionally filtered and exported
pub fn run(
    input: PathBuf,
    filter: Option<String>,
    export: Option<PathBuf>,
    values: Option<String>,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let table = ScanTable::from_path(&input)
        .with_context(|| format!("Failed to process CSV data: {}", input.display()))?;
    info!("Loaded {} rows from {}", table.num_rows(), input.display());

    if let Some(column) = values {
        let distinct = table.unique_values(&column)?;
        return match format {
            OutputFormat::Json => print_json(&distinct),
            OutputFormat::Text => {
                println!("{}", heading(&format!("Values of {}", column)));
                for value in distinct {
                    println!("  {}", value);
                }
                Ok(())
            }
        };
    }

    let (view, default_name) = match filter.as_deref() {
        Some(f) => {
            let (column, value) = parse_filter(f)?;
            let filtered = table.filter_eq(column, value)?;
            info!(
                "Filter {} = {} kept {} of {} rows",
                column,
                value,
                filtered.num_rows(),
                table.num_rows()
            );
            (filtered, filtered_file_name(column, value))
        }
        None => (table, "scan_table.csv".to_string()),
    };

    print_table(&view, limit, format)?;

    if let Some(mut path) = export {
        if path.is_dir() {
            path.push(default_name);
        }
        let file = File::create(&path)
            .with_context(|| format!("Failed to create export file: {}", path.display()))?;
        view.write_csv(file)?;
        eprintln!("Exported {} rows to {}", view.num_rows(), path.display());
    }

    Ok(())
}
