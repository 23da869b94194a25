use crate::constants::{
    COMPRESSED_SUFFIX, DEFAULT_QUALITY, MAX_QUALITY, MIN_QUALITY, OXIPNG_PRESET,
    SUPPORTED_INPUT_EXTENSIONS,
};
use crate::error::{CompressionError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{imageops, DynamicImage, GenericImageView, ImageFormat, ImageReader, Rgba, RgbaImage};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CompressionOptions {
    pub quality: u8,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

impl CompressionOptions {
    pub fn new(
        quality: Option<u8>,
        max_width: Option<u32>,
        max_height: Option<u32>,
    ) -> Result<Self> {
        let quality = quality.unwrap_or(DEFAULT_QUALITY);
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(CompressionError::InvalidQuality(quality));
        }

        Ok(Self {
            quality,
            max_width,
            max_height,
        })
    }
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            max_width: None,
            max_height: None,
        }
    }
}

/// Outcome of one compression call. Computed once per invocation, never
/// persisted.
#[derive(Debug, Clone)]
pub struct CompressionReport {
    pub output_path: PathBuf,
    pub original_size: u64,
    pub compressed_size: u64,
}

impl CompressionReport {
    /// Size reduction as a percentage of the original size. Negative when
    /// the output ended up larger; 0 for an empty original.
    pub fn reduction_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (self.original_size as f64 - self.compressed_size as f64) / self.original_size as f64
            * 100.0
    }
}

pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CompressionError::FileNotFound(path.to_path_buf()));
    }
    Ok(())
}

fn extension_lowercase(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default()
}

/// True when the pipeline accepts this path's extension as input.
pub fn is_supported_input(path: &Path) -> bool {
    SUPPORTED_INPUT_EXTENSIONS.contains(&extension_lowercase(path).as_str())
}

pub fn validate_input_format(path: &Path) -> Result<()> {
    if !is_supported_input(path) {
        let ext = extension_lowercase(path);
        return Err(CompressionError::UnsupportedFormat {
            extension: if ext.is_empty() {
                "(none)".to_string()
            } else {
                format!(".{}", ext)
            },
            supported: SUPPORTED_INPUT_EXTENSIONS.join(", "),
        });
    }
    Ok(())
}

/// Loads an image and returns it along with its on-disk size in bytes.
pub fn load_image_with_metadata(input_path: &Path) -> Result<(DynamicImage, u64)> {
    validate_file_exists(input_path)?;

    let file_size = fs::metadata(input_path)?.len();
    let img = ImageReader::open(input_path)?
        .decode()
        .map_err(CompressionError::Decode)?;

    Ok((img, file_size))
}

/// Fits `(width, height)` inside the given bounds, preserving aspect ratio.
///
/// The width bound is applied first. The height bound is then checked
/// against the *width-adjusted* height and can shrink the image further, but
/// the width bound is never re-applied after that second pass. This ordering
/// is a compatibility quirk carried over from the original tool and must not
/// be reordered.
///
/// A bound of 0 is treated as absent.
pub fn target_dimensions(
    width: u32,
    height: u32,
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> (u32, u32) {
    let (mut new_width, mut new_height) = (width, height);

    if let Some(mw) = max_width.filter(|&w| w > 0) {
        if width > mw {
            let ratio = mw as f64 / width as f64;
            new_width = mw;
            new_height = (height as f64 * ratio).round() as u32;
        }
    }

    if let Some(mh) = max_height.filter(|&h| h > 0) {
        if new_height > mh {
            let ratio = mh as f64 / new_height as f64;
            new_height = mh;
            new_width = (new_width as f64 * ratio).round() as u32;
        }
    }

    (new_width, new_height)
}

/// Resizes in place when a bound demands it, using Lanczos3. No-op when the
/// target dimensions equal the current ones.
pub fn resize_image(img: &mut DynamicImage, options: &CompressionOptions) {
    if options.max_width.is_none() && options.max_height.is_none() {
        return;
    }

    let (width, height) = img.dimensions();
    let (new_width, new_height) =
        target_dimensions(width, height, options.max_width, options.max_height);

    if (new_width, new_height) != (width, height) {
        crate::verbose!("Resizing {}x{} -> {}x{}", width, height, new_width, new_height);
        *img = img.resize_exact(new_width, new_height, FilterType::Lanczos3);
    }
}

/// Composites an image that carries transparency over an opaque white
/// background, using the alpha channel as blend mask. JPEG has no alpha
/// channel, so transparent input has to be flattened before the encoder
/// sees it.
pub fn flatten_alpha(img: &DynamicImage) -> DynamicImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut canvas, &rgba, 0, 0);

    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
}

/// Default output path: `{parent}/{stem}_compressed{ext}`, next to the
/// input.
pub fn derive_output_path(input_path: &Path) -> PathBuf {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let ext = input_path
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();
    let file_name = format!("{}{}{}", stem, COMPRESSED_SUFFIX, ext);

    match input_path.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Picks the encoder from the output extension. Anything that is not `.png`
/// goes through the JPEG branch, matching the original tool's behavior.
pub fn determine_output_format(output_path: &Path) -> ImageFormat {
    match extension_lowercase(output_path).as_str() {
        "png" => ImageFormat::Png,
        _ => ImageFormat::Jpeg,
    }
}

/// Compresses a single image file.
///
/// Validates the input path and extension, decodes, applies the bounded
/// resize, flattens alpha when the target is JPEG, encodes to `output_path`
/// (or the derived `_compressed` sibling), and reports both file sizes. The
/// input file is never mutated. If encoding fails mid-write the state of the
/// output file is undefined; no cleanup is attempted.
pub fn compress_image(
    input_path: &Path,
    output_path: Option<PathBuf>,
    options: &CompressionOptions,
) -> Result<CompressionReport> {
    validate_file_exists(input_path)?;
    validate_input_format(input_path)?;

    let (mut img, original_size) = load_image_with_metadata(input_path)?;
    crate::verbose!(
        "Loaded {}x{} image, {} bytes",
        img.width(),
        img.height(),
        original_size
    );

    resize_image(&mut img, options);

    let output_path = output_path.unwrap_or_else(|| derive_output_path(input_path));
    let format = determine_output_format(&output_path);

    let img = if format == ImageFormat::Jpeg && img.color().has_alpha() {
        crate::verbose!("Flattening alpha channel onto white for JPEG output");
        flatten_alpha(&img)
    } else {
        img
    };

    save_image(&img, &output_path, format, options)?;
    let compressed_size = fs::metadata(&output_path)?.len();

    Ok(CompressionReport {
        output_path,
        original_size,
        compressed_size,
    })
}

pub fn save_image(
    img: &DynamicImage,
    output_path: &Path,
    format: ImageFormat,
    options: &CompressionOptions,
) -> Result<()> {
    match format {
        ImageFormat::Png => save_png_optimized(img, output_path),
        _ => save_jpeg(img, output_path, options.quality),
    }
}

fn save_jpeg(img: &DynamicImage, output_path: &Path, quality: u8) -> Result<()> {
    let file = fs::File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    img.write_with_encoder(encoder)
        .map_err(CompressionError::Encode)?;
    writer.flush()?;
    Ok(())
}

fn save_png_optimized(img: &DynamicImage, output_path: &Path) -> Result<()> {
    // Encode to a sibling temp file first; oxipng then writes the final
    // output, so the optimize pass never reads its own destination.
    let temp_path = output_path.with_extension("tmp.png");
    img.save_with_format(&temp_path, ImageFormat::Png)
        .map_err(CompressionError::Encode)?;

    struct TempFileGuard(PathBuf);
    impl Drop for TempFileGuard {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }
    let _guard = TempFileGuard(temp_path.clone());

    let mut oxipng_options = oxipng::Options::from_preset(OXIPNG_PRESET);
    oxipng_options.force = true;

    let input = oxipng::InFile::Path(temp_path);
    let out = oxipng::OutFile::Path {
        path: Some(output_path.to_path_buf()),
        preserve_attrs: false,
    };
    oxipng::optimize(&input, &out, &oxipng_options)
        .map_err(|e| CompressionError::PngOptimization(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn gradient_rgb(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        gradient_rgb(width, height).save(&path).unwrap();
        path
    }

    fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        let img = DynamicImage::ImageRgb8(gradient_rgb(width, height));
        save_jpeg(&img, &path, 95).unwrap();
        path
    }

    fn write_rgba_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let img = RgbaImage::from_pixel(200, 200, Rgba([255, 0, 0, 128]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn compression_options_default_quality() {
        let options = CompressionOptions::new(None, None, None).unwrap();
        assert_eq!(options.quality, 85);
        assert_eq!(options.max_width, None);
        assert_eq!(options.max_height, None);
    }

    #[test]
    fn compression_options_invalid_quality() {
        let result = CompressionOptions::new(Some(0), None, None);
        assert!(matches!(result, Err(CompressionError::InvalidQuality(0))));

        let result = CompressionOptions::new(Some(101), None, None);
        assert!(matches!(result, Err(CompressionError::InvalidQuality(101))));
    }

    #[test]
    fn target_dimensions_square_width_bound() {
        assert_eq!(target_dimensions(200, 200, Some(100), None), (100, 100));
    }

    #[test]
    fn target_dimensions_width_then_height() {
        // Width pass: 1000x800 -> 500x400. Height pass runs against the
        // adjusted 400: -> 250x200.
        assert_eq!(
            target_dimensions(1000, 800, Some(500), Some(200)),
            (250, 200)
        );
    }

    #[test]
    fn target_dimensions_height_pass_uses_adjusted_height() {
        // 400x200 fits under the width bound after the first pass (200x100),
        // the height bound then halves it again.
        assert_eq!(target_dimensions(400, 200, Some(200), Some(50)), (100, 50));
    }

    #[test]
    fn target_dimensions_never_enlarges() {
        assert_eq!(target_dimensions(100, 100, Some(200), None), (100, 100));
        assert_eq!(target_dimensions(100, 100, None, Some(400)), (100, 100));
    }

    #[test]
    fn target_dimensions_zero_bound_is_absent() {
        assert_eq!(target_dimensions(200, 200, Some(0), Some(0)), (200, 200));
    }

    #[test]
    fn resize_image_applies_width_bound() {
        let mut img = DynamicImage::ImageRgb8(gradient_rgb(200, 200));
        let options = CompressionOptions::new(Some(85), Some(100), None).unwrap();

        resize_image(&mut img, &options);

        assert_eq!(img.dimensions(), (100, 100));
    }

    #[test]
    fn resize_image_noop_without_bounds() {
        let mut img = DynamicImage::ImageRgb8(gradient_rgb(200, 150));
        let options = CompressionOptions::new(Some(85), None, None).unwrap();

        resize_image(&mut img, &options);

        assert_eq!(img.dimensions(), (200, 150));
    }

    #[test]
    fn flatten_alpha_produces_opaque_rgb() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 128])));

        let flat = flatten_alpha(&img);

        assert!(!flat.color().has_alpha());
        let pixel = flat.to_rgb8().get_pixel(0, 0).0;
        // Half-transparent red over white: red stays saturated, the white
        // background shows through in green and blue.
        assert_eq!(pixel[0], 255);
        assert!(pixel[1] > 100 && pixel[2] > 100);
    }

    #[test]
    fn derive_output_path_suffixes_stem() {
        assert_eq!(
            derive_output_path(Path::new("/tmp/photo.png")),
            PathBuf::from("/tmp/photo_compressed.png")
        );
        assert_eq!(
            derive_output_path(Path::new("photo.jpg")),
            PathBuf::from("photo_compressed.jpg")
        );
    }

    #[test]
    fn determine_output_format_by_extension() {
        assert_eq!(determine_output_format(Path::new("a.png")), ImageFormat::Png);
        assert_eq!(determine_output_format(Path::new("a.PNG")), ImageFormat::Png);
        assert_eq!(determine_output_format(Path::new("a.jpg")), ImageFormat::Jpeg);
        assert_eq!(determine_output_format(Path::new("a.jpeg")), ImageFormat::Jpeg);
        // Non-png extensions fall through to the JPEG branch.
        assert_eq!(determine_output_format(Path::new("a.out")), ImageFormat::Jpeg);
    }

    #[test]
    fn validate_input_format_rejects_bmp() {
        let err = validate_input_format(Path::new("test.bmp")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file format"));
        assert!(err.to_string().contains(".bmp"));
    }

    #[test]
    fn compress_nonexistent_file() {
        let options = CompressionOptions::default();
        let result = compress_image(Path::new("/tmp/nonexistent_image_12345.png"), None, &options);
        assert!(matches!(result, Err(CompressionError::FileNotFound(_))));
    }

    #[test]
    fn compress_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let bmp_path = temp_dir.path().join("test.bmp");
        std::fs::write(&bmp_path, b"not really a bmp").unwrap();

        let options = CompressionOptions::default();
        let err = compress_image(&bmp_path, None, &options).unwrap_err();
        assert!(err.to_string().contains("Unsupported file format"));
    }

    #[test]
    fn compress_corrupt_file_is_decode_error() {
        let temp_dir = TempDir::new().unwrap();
        let png_path = temp_dir.path().join("broken.png");
        std::fs::write(&png_path, b"this is not a png").unwrap();

        let options = CompressionOptions::default();
        let result = compress_image(&png_path, None, &options);
        assert!(matches!(result, Err(CompressionError::Decode(_))));
    }

    #[test]
    fn compress_png_never_enlarges() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_png(temp_dir.path(), "test.png", 200, 200);

        let options = CompressionOptions::default();
        let report = compress_image(&input, None, &options).unwrap();

        assert!(report.output_path.exists());
        assert_eq!(
            report.output_path,
            temp_dir.path().join("test_compressed.png")
        );
        assert!(report.compressed_size <= report.original_size);
    }

    #[test]
    fn compress_jpeg_quality_70_shrinks() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_jpeg(temp_dir.path(), "test.jpg", 300, 300);

        let options = CompressionOptions::new(Some(70), None, None).unwrap();
        let report = compress_image(&input, None, &options).unwrap();

        assert!(report.output_path.exists());
        assert!(report.compressed_size < report.original_size);
        assert!(report.reduction_percent() > 0.0);
    }

    #[test]
    fn compress_custom_output_path() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_png(temp_dir.path(), "test.png", 100, 100);
        let custom = temp_dir.path().join("custom_output.png");

        let options = CompressionOptions::default();
        let report = compress_image(&input, Some(custom.clone()), &options).unwrap();

        assert_eq!(report.output_path, custom);
        assert!(custom.exists());
    }

    #[test]
    fn compress_with_max_width_preserves_aspect() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_png(temp_dir.path(), "test.png", 200, 200);
        let output = temp_dir.path().join("resized.png");

        let options = CompressionOptions::new(Some(85), Some(100), None).unwrap();
        compress_image(&input, Some(output.clone()), &options).unwrap();

        let resized = image::open(&output).unwrap();
        assert_eq!(resized.dimensions(), (100, 100));
    }

    #[test]
    fn compress_rgba_png_to_jpeg_flattens() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_rgba_png(temp_dir.path(), "test_rgba.png");
        let output = temp_dir.path().join("flattened.jpg");

        let options = CompressionOptions::default();
        compress_image(&input, Some(output.clone()), &options).unwrap();

        let decoded = image::open(&output).unwrap();
        assert!(!decoded.color().has_alpha());
    }

    #[test]
    fn compress_does_not_touch_input() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_png(temp_dir.path(), "test.png", 64, 64);
        let before = std::fs::read(&input).unwrap();

        let options = CompressionOptions::default();
        compress_image(&input, None, &options).unwrap();

        assert_eq!(std::fs::read(&input).unwrap(), before);
    }

    #[test]
    fn reduction_percent_handles_zero_original() {
        let report = CompressionReport {
            output_path: PathBuf::from("out.png"),
            original_size: 0,
            compressed_size: 10,
        };
        assert_eq!(report.reduction_percent(), 0.0);
    }
}
