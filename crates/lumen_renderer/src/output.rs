//! Float image buffer and file output.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::hdr::HdrEncoder;
use image::{ColorType, Rgb};
use lumen_math::Vec4;
use thiserror::Error;

use crate::renderer::color_to_rgba;

/// Errors that can occur while writing images.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Linear RGBA image, row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Vec4>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Vec4::ZERO)
    }

    /// Create a new image buffer filled with one color.
    pub fn filled(width: u32, height: u32, color: Vec4) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Vec4 {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Vec4) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Copy a `width`-wide block of row-major pixels with its top-left corner at (x, y).
    pub fn blit(&mut self, x: u32, y: u32, width: u32, pixels: &[Vec4]) {
        for (row, colors) in pixels.chunks(width as usize).enumerate() {
            let start = self.index(x, y + row as u32);
            self.pixels[start..start + colors.len()].copy_from_slice(colors);
        }
    }

    /// Convert to gamma-corrected 8-bit RGBA.
    pub fn to_rgba8(&self) -> Vec<[u8; 4]> {
        self.pixels.iter().map(|&color| color_to_rgba(color)).collect()
    }

    /// Write an 8-bit PNG.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> OutputResult<()> {
        let rgba = self.to_rgba8();
        image::save_buffer(
            path.as_ref(),
            bytemuck::cast_slice(&rgba),
            self.width,
            self.height,
            ColorType::Rgba8,
        )?;
        log::info!("Saved {}", path.as_ref().display());
        Ok(())
    }

    /// Write a linear Radiance HDR image. Alpha is dropped.
    pub fn save_hdr<P: AsRef<Path>>(&self, path: P) -> OutputResult<()> {
        let writer = BufWriter::new(File::create(path.as_ref())?);
        let rgb: Vec<Rgb<f32>> = self
            .pixels
            .iter()
            .map(|color| Rgb([color.x, color.y, color.z]))
            .collect();

        HdrEncoder::new(writer).encode(&rgb, self.width as usize, self.height as usize)?;
        log::info!("Saved {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("lumen_output_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_image_buffer_get_set() {
        let mut image = ImageBuffer::new(4, 3);
        assert_eq!(image.pixels.len(), 12);

        let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
        image.set(3, 2, red);
        assert_eq!(image.get(3, 2), red);
        assert_eq!(image.pixels[11], red);
        assert_eq!(image.get(0, 0), Vec4::ZERO);
    }

    #[test]
    fn test_blit() {
        let mut image = ImageBuffer::new(4, 4);
        let block = vec![Vec4::ONE; 4];
        image.blit(1, 2, 2, &block);

        assert_eq!(image.get(1, 2), Vec4::ONE);
        assert_eq!(image.get(2, 3), Vec4::ONE);
        assert_eq!(image.get(3, 2), Vec4::ZERO);
        assert_eq!(image.get(1, 1), Vec4::ZERO);
    }

    #[test]
    fn test_to_rgba8() {
        let image = ImageBuffer::filled(2, 1, Vec4::new(0.25, 1.0, 4.0, 1.0));
        // Gamma 2: sqrt(0.25) = 0.5
        assert_eq!(image.to_rgba8(), vec![[127, 255, 255, 255]; 2]);
    }

    #[test]
    fn test_save_png() {
        let path = temp_path("test.png");
        let mut image = ImageBuffer::filled(8, 4, Vec4::new(0.0, 0.0, 0.0, 1.0));
        image.set(2, 1, Vec4::ONE);

        image.save_png(&path).expect("png written");

        let loaded = image::open(&path).expect("png readable").to_rgba8();
        assert_eq!(loaded.dimensions(), (8, 4));
        assert_eq!(loaded.get_pixel(2, 1).0, [255, 255, 255, 255]);
        assert_eq!(loaded.get_pixel(0, 0).0, [0, 0, 0, 255]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_save_hdr() {
        let path = temp_path("test.hdr");
        let image = ImageBuffer::filled(5, 3, Vec4::new(2.0, 0.5, 0.0, 1.0));

        image.save_hdr(&path).expect("hdr written");

        let loaded = image::open(&path).expect("hdr readable").to_rgb32f();
        assert_eq!(loaded.dimensions(), (5, 3));
        let pixel = loaded.get_pixel(4, 2).0;
        assert!((pixel[0] - 2.0).abs() < 0.02);
        assert!((pixel[1] - 0.5).abs() < 0.01);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_save_png_to_missing_directory_fails() {
        let image = ImageBuffer::new(1, 1);
        let result = image.save_png(temp_path("missing_dir").join("out.png"));
        assert!(result.is_err());
    }
}
