use crate::error::Result;
use crate::processing::load_image_with_metadata;
use crate::utils::format_file_size;
use image::{ImageFormat, ImageReader};
use std::path::Path;

/// Prints basic properties of an image plus a rough suggestion for
/// compressing it with this tool.
pub fn print_image_info(input_path: &Path) -> Result<()> {
    let (img, file_size) = load_image_with_metadata(input_path)?;
    let format = ImageReader::open(input_path)?
        .with_guessed_format()?
        .format();

    crate::info!("📋 {}", input_path.display());
    crate::info!("  📏 Dimensions: {}x{} pixels", img.width(), img.height());
    crate::info!(
        "  🎨 Color type: {:?} (alpha: {})",
        img.color(),
        if img.color().has_alpha() { "yes" } else { "no" }
    );
    crate::info!(
        "  📦 File size: {} bytes ({})",
        file_size,
        format_file_size(file_size)
    );
    if let Some(format) = format {
        crate::info!("  🎭 Format: {:?}", format);
    }

    let aspect_ratio = img.width() as f64 / img.height() as f64;
    crate::info!("  📐 Aspect ratio: {:.2}:1", aspect_ratio);

    crate::info!("\n💡 Compression suggestions:");
    if file_size > 5 * 1024 * 1024 {
        crate::info!("  🎯 Large file (>5MB): try quality 60-80");
    } else if file_size > 1024 * 1024 {
        crate::info!("  🎯 Medium file (1-5MB): try quality 70-85");
    } else {
        crate::info!("  🎯 Small file (<1MB): try quality 85-95");
    }

    if img.width() > 1920 || img.height() > 1080 {
        crate::info!("  📏 Large dimensions: consider --max-width 1920 --max-height 1080");
    }

    match format {
        Some(ImageFormat::Png) => {
            crate::info!("  🎭 PNG input: output is lossless, the quality flag has no effect");
        }
        Some(ImageFormat::Jpeg) => {
            crate::info!("  🎭 JPEG input: adjust -q to trade size against artifacting");
        }
        _ => {}
    }

    Ok(())
}
