pub const DEFAULT_QUALITY: u8 = 85;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// Input extensions the compression pipeline accepts (matched
/// case-insensitively).
pub const SUPPORTED_INPUT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Extensions offered by the interactive picker. Wider than the pipeline
/// set: TIFF and BMP picks are re-encoded in their own container instead of
/// going through the PNG/JPEG encoding policy.
pub const PICKER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "bmp"];

/// Suffix appended to the input stem when no output path is given.
pub const COMPRESSED_SUFFIX: &str = "_compressed";

/// oxipng preset for the PNG optimize pass. PNG output is lossless and the
/// quality setting does not apply to it, so the preset is fixed.
pub const OXIPNG_PRESET: u8 = 4;

pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
