use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod descriptor;
mod image;
mod inspect;
mod output;
mod table;

pub use config::{Config, OutputFormat};

/// mxa - Microscope acquisition artifact inspector
#[derive(Parser)]
#[command(name = "mxa")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a scan-position table with canonical column order
    Table {
        /// Input CSV file path
        #[arg(value_name = "CSV")]
        input: PathBuf,

        /// Keep only rows where COLUMN equals VALUE
        #[arg(short, long, value_name = "COLUMN=VALUE")]
        filter: Option<String>,

        /// Write the (filtered) table to a CSV file or directory
        #[arg(short, long, value_name = "PATH")]
        export: Option<PathBuf>,

        /// List the distinct values of a column instead of printing rows
        #[arg(long, value_name = "COLUMN", conflicts_with = "filter")]
        values: Option<String>,

        /// Print at most this many rows
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show an acquisition session descriptor (.jdce)
    Session {
        /// Input descriptor file path
        #[arg(value_name = "JDCE")]
        input: PathBuf,

        /// Output format (text, json)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show a protocol descriptor (.mxprotocol)
    Protocol {
        /// Input descriptor file path
        #[arg(value_name = "MXPROTOCOL")]
        input: PathBuf,

        /// Output format (text, json)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show page information and embedded metadata of an acquired TIFF image
    Image {
        /// Input TIFF file path
        #[arg(value_name = "TIFF")]
        input: PathBuf,

        /// Page to show (zero-based)
        #[arg(short, long, default_value_t = 0)]
        page: usize,

        /// Merge metadata of all pages instead of one
        #[arg(long)]
        all_pages: bool,

        /// Brightness factor (0.1-2.0)
        #[arg(long)]
        brightness: Option<f64>,

        /// Contrast factor (0.1-2.0)
        #[arg(long)]
        contrast: Option<f64>,

        /// Zoom level (0.1-5.0)
        #[arg(long)]
        zoom: Option<f64>,

        /// Save the adjusted, zoomed view as an image file (format from extension, e.g. .png)
        #[arg(long, value_name = "OUT")]
        preview: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Load several artifacts at once, each independently
    Inspect {
        /// Input files (.csv, .jdce, .mxprotocol, .tif)
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Output format (text, json)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Table {
            input,
            filter,
            export,
            values,
            limit,
            format,
        } => table::run(
            input,
            filter,
            export,
            values,
            limit,
            config.format(format),
        ),
        Commands::Session { input, format } => {
            descriptor::run_session(input, config.format(format))
        }
        Commands::Protocol { input, format } => {
            descriptor::run_protocol(input, config.format(format))
        }
        Commands::Image {
            input,
            page,
            all_pages,
            brightness,
            contrast,
            zoom,
            preview,
            format,
        } => image::run(
            input,
            page,
            all_pages,
            config.view_settings(brightness, contrast, zoom),
            preview,
            config.format(format),
        ),
        Commands::Inspect { files, format } => inspect::run(files, config.format(format)),
    }
}
