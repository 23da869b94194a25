use crate::constants::PROGRESS_SPINNER_TEMPLATE;
use crate::processing::CompressionReport;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Format a byte count in human-readable units ("1.5 KB", "3.2 MB").
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    const THRESHOLD: f64 = 1024.0;

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

pub fn size_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// Progress spinner with the shared styling; hidden in quiet mode.
pub fn create_progress_spinner(message: &str) -> ProgressBar {
    if crate::logger::is_quiet() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template(PROGRESS_SPINNER_TEMPLATE)
            .expect("invalid progress template"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Prints the end-of-run summary: input and output paths with sizes in MB
/// (two decimals) and the size reduction percentage (one decimal).
pub fn print_compression_summary(input_path: &Path, report: &CompressionReport) {
    let reduction = report.reduction_percent();

    crate::info!("✅ Image compressed successfully!");
    crate::info!(
        "  📥 Input:  {} ({:.2} MB)",
        input_path.display(),
        size_mb(report.original_size)
    );
    crate::info!(
        "  📤 Output: {} ({:.2} MB)",
        report.output_path.display(),
        size_mb(report.compressed_size)
    );
    crate::info!("  🎯 Size reduction: {:.1}%", reduction);

    if reduction < 0.0 {
        crate::warn!("File size increased by {:.1}%", reduction.abs());
    }
}
