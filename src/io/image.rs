//! Image decoding, fixed-size resizing and PNG export

use crate::io::error::{Result, ScoreError};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, RgbImage};
use ndarray::Array3;
use std::path::Path;

/// Channel layout of prepared samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
pub enum ColorMode {
    /// Single luminance channel
    Gray,
    /// Three RGB channels
    Color,
}

impl ColorMode {
    /// Number of channels per pixel
    pub const fn channels(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Color => 3,
        }
    }
}

/// Decode an image, keeping read failures apart from decode failures
///
/// # Errors
///
/// Returns `ImageRead` if the file cannot be opened or its format sniffed, and
/// `ImageDecode` if the bytes are not a decodable image
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let reader = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|e| ScoreError::ImageRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    reader.decode().map_err(|e| ScoreError::ImageDecode {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Decode an image as 8-bit RGB
///
/// # Errors
///
/// Returns an error if the image cannot be read or decoded
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    Ok(load_image(path)?.to_rgb8())
}

/// Resize to `size x size` and lay the pixels out as a height x width x channel array
pub fn to_array(img: &DynamicImage, size: u32, mode: ColorMode) -> Array3<u8> {
    let resized = img.resize_exact(size, size, FilterType::Triangle);
    let side = size as usize;

    match mode {
        ColorMode::Gray => {
            let gray = resized.to_luma8();
            Array3::from_shape_fn((side, side, 1), |(row, col, _)| {
                gray.get_pixel(col as u32, row as u32).0[0]
            })
        }
        ColorMode::Color => {
            let rgb = resized.to_rgb8();
            Array3::from_shape_fn((side, side, 3), |(row, col, channel)| {
                rgb.get_pixel(col as u32, row as u32)
                    .0
                    .get(channel)
                    .copied()
                    .unwrap_or(0)
            })
        }
    }
}

/// Load an image and convert it with [`to_array`]
///
/// # Errors
///
/// Returns an error if the image cannot be read or decoded
pub fn load_resized(path: &Path, size: u32, mode: ColorMode) -> Result<Array3<u8>> {
    let img = load_image(path)?;
    Ok(to_array(&img, size, mode))
}

/// Save an RGB image as PNG, creating parent directories as needed
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or written
pub fn export_png(img: &RgbImage, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ScoreError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save_with_format(output_path, image::ImageFormat::Png)
        .map_err(|e| ScoreError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}
