use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Gradient fill so the encoders have real data to work on.
pub fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

pub fn create_test_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    gradient_rgb(width, height).save(&path).unwrap();
    path
}

/// Writes a JPEG at quality 95, the synthetic "barely compressed" input the
/// quality-70 comparisons rely on.
pub fn create_test_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, 95);
    DynamicImage::ImageRgb8(gradient_rgb(width, height))
        .write_with_encoder(encoder)
        .unwrap();
    writer.flush().unwrap();
    path
}

pub fn create_test_rgba_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(200, 200, Rgba([255, 0, 0, 128]))
        .save(&path)
        .unwrap();
    path
}
