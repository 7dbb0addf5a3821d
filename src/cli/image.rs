use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mxa_analyzer::image::{AcquiredImage, ViewSettings};

use super::output::{heading, print_tag_metadata};
use super::OutputFormat;

/// Display information and embedded metadata of an acquired image
pub fn run(
    input: PathBuf,
    page: usize,
    all_pages: bool,
    settings: ViewSettings,
    preview: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let image = AcquiredImage::from_path(&input)
        .with_context(|| format!("Failed to open TIFF file: {}", input.display()))?;
    let info = image.file().page(page)?;

    let metadata = if all_pages {
        image.metadata()
    } else {
        image.page_metadata(page)?
    };

    if format == OutputFormat::Text {
        println!("{}", heading("Image Info"));
        println!("  File: {}", input.display());
        println!("  Size: {}x{}", info.width, info.height);
        println!("  Bits per sample: {}", info.bits_per_sample);
        println!("  Pages: {}", image.page_count());
        println!("  Page shown: {}", page);
        println!();
    }
    print_tag_metadata(&metadata, format)?;

    if let Some(path) = preview {
        let view = image.render(page, &settings)?;
        view.save(&path)
            .with_context(|| format!("Failed to save preview: {}", path.display()))?;
        info!(
            "Preview at brightness {:.2}, contrast {:.2}; display size {}x{} at zoom {:.2}",
            settings.brightness(),
            settings.contrast(),
            view.display_size.0,
            view.display_size.1,
            settings.zoom()
        );
        eprintln!("Saved view as: {}", path.display());
    }

    Ok(())
}
