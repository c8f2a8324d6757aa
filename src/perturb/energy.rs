use crate::io::configuration::EDGE_ENERGY;
use image::{Rgb, RgbImage};
use ndarray::Array2;

// Squared euclidean distance between two colours
fn delta(a: Rgb<u8>, b: Rgb<u8>) -> u32 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(&x, &y)| {
            let d = u32::from(x.abs_diff(y));
            d * d
        })
        .sum()
}

/// Energy of the pixel at column `x`, row `y`
///
/// Border pixels get [`EDGE_ENERGY`]; interior pixels the sum of the squared
/// colour differences between their horizontal and vertical neighbours.
pub fn pixel_energy(img: &RgbImage, x: u32, y: u32) -> u32 {
    let (width, height) = img.dimensions();
    if x == 0 || y == 0 || x + 1 >= width || y + 1 >= height {
        return EDGE_ENERGY;
    }

    let dx = delta(*img.get_pixel(x - 1, y), *img.get_pixel(x + 1, y));
    let dy = delta(*img.get_pixel(x, y - 1), *img.get_pixel(x, y + 1));
    dx + dy
}

/// Energy of every pixel as a height x width matrix
pub fn energy_map(img: &RgbImage) -> Array2<u32> {
    let (width, height) = img.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(row, col)| {
        pixel_energy(img, col as u32, row as u32)
    })
}
