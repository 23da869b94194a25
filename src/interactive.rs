use crate::constants::{MAX_QUALITY, MIN_QUALITY, PICKER_EXTENSIONS};
use crate::error::{CompressionError, Result};
use crate::processing::{
    self, compress_image, load_image_with_metadata, CompressionOptions, CompressionReport,
};
use crate::utils::print_compression_summary;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Prompt-driven front end: ask for a file, ask for a quality, compress.
///
/// An empty line or EOF at either prompt cancels the run without writing
/// anything. The picker accepts a wider extension set than the pipeline;
/// TIFF and BMP picks are re-encoded in their own container.
pub fn run_interactive() -> Result<()> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    run_with_reader(&mut reader)
}

fn run_with_reader(reader: &mut impl BufRead) -> Result<()> {
    crate::info!(
        "Select an image file to compress ({})",
        PICKER_EXTENSIONS.join(", ")
    );

    let Some(line) = prompt(reader, "File path: ")? else {
        crate::info!("No file selected.");
        return Ok(());
    };
    let input_path = PathBuf::from(line);

    processing::validate_file_exists(&input_path)?;
    validate_picker_format(&input_path)?;

    let Some(quality) = prompt_quality(reader)? else {
        crate::info!("Compression cancelled by user.");
        return Ok(());
    };

    let options = CompressionOptions::new(Some(quality), None, None)?;
    let report = if processing::is_supported_input(&input_path) {
        compress_image(&input_path, None, &options)?
    } else {
        reencode_with_defaults(&input_path)?
    };

    print_compression_summary(&input_path, &report);
    Ok(())
}

fn prompt(reader: &mut impl BufRead, message: &str) -> Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    let read = reader.read_line(&mut line)?;
    let trimmed = line.trim();
    if read == 0 || trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(trimmed.to_string()))
}

/// Re-asks until the answer parses and lands in the accepted range, the way
/// a modal quality dialog would. `None` means the user cancelled.
fn prompt_quality(reader: &mut impl BufRead) -> Result<Option<u8>> {
    loop {
        let message = format!(
            "Enter quality ({} = lowest, {} = highest): ",
            MIN_QUALITY, MAX_QUALITY
        );
        match prompt(reader, &message)? {
            None => return Ok(None),
            Some(line) => match line.parse::<u8>() {
                Ok(q) if (MIN_QUALITY..=MAX_QUALITY).contains(&q) => return Ok(Some(q)),
                _ => crate::warn!(
                    "Quality must be an integer between {} and {}",
                    MIN_QUALITY,
                    MAX_QUALITY
                ),
            },
        }
    }
}

fn validate_picker_format(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    if !PICKER_EXTENSIONS.contains(&ext.as_str()) {
        return Err(CompressionError::UnsupportedFormat {
            extension: if ext.is_empty() {
                "(none)".to_string()
            } else {
                format!(".{}", ext)
            },
            supported: PICKER_EXTENSIONS.join(", "),
        });
    }
    Ok(())
}

/// TIFF and BMP picks keep their container; the codec's defaults are the
/// only knobs those encoders expose here.
fn reencode_with_defaults(input_path: &Path) -> Result<CompressionReport> {
    let (img, original_size) = load_image_with_metadata(input_path)?;
    let output_path = processing::derive_output_path(input_path);

    img.save(&output_path).map_err(CompressionError::Encode)?;
    let compressed_size = std::fs::metadata(&output_path)?.len();

    Ok(CompressionReport {
        output_path,
        original_size,
        compressed_size,
    })
}
