//! # mxa
//!
//! A command-line viewer for microscope acquisition artifacts.
//!
//! ## Usage
//!
//! ```bash
//! # Scan-position table, filtered and exported
//! mxa table scan.csv --filter Well=A01 --export out/
//!
//! # Session and protocol descriptors
//! mxa session run.jdce --format json
//! mxa protocol screen.mxprotocol
//!
//! # Image metadata and an adjusted preview
//! mxa image plate_A01_s1_w1.tif --brightness 1.4 --preview a01.png
//!
//! # Everything at once
//! mxa inspect scan.csv run.jdce screen.mxprotocol plate_A01_s1_w1.tif
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
