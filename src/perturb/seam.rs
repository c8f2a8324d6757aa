//! Greedy least-energy seams and their in-place replacement
//!
//! A seam is found by starting at every column of the first row and walking
//! down, at each step moving to whichever of the three lower neighbours is
//! strictly lowest (staying put on ties). The start with the lowest summed
//! energy wins. Horizontal seams run the same walk over the transposed energy.

use crate::io::configuration::SEAM_MASK;
use crate::io::error::{Result, invalid_parameter};
use crate::perturb::energy::energy_map;
use image::{Rgb, RgbImage};
use ndarray::ArrayView2;

/// Direction a seam runs across the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Top to bottom, one column index per row
    Vertical,
    /// Left to right, one row index per column
    Horizontal,
}

/// Walk down from `start`, returning one column index per row
pub fn greedy_path(energy: ArrayView2<'_, u32>, start: usize) -> Vec<usize> {
    let (rows, cols) = energy.dim();
    let mut path = Vec::with_capacity(rows);
    let mut col = start;

    for row in 0..rows {
        path.push(col);
        let next = row + 1;
        if next == rows {
            break;
        }

        let at = |c: usize| energy.get([next, c]).copied().unwrap_or(u32::MAX);
        let south = at(col);
        let south_west = if col > 0 { at(col - 1) } else { u32::MAX };
        let south_east = if col + 1 < cols { at(col + 1) } else { u32::MAX };

        if south_west < south && south_west < south_east {
            col -= 1;
        } else if south_east < south_west && south_east < south {
            col += 1;
        }
    }

    path
}

/// Summed energy along a path produced by [`greedy_path`]
pub fn path_energy(energy: ArrayView2<'_, u32>, path: &[usize]) -> u64 {
    path.iter()
        .enumerate()
        .map(|(row, &col)| u64::from(energy.get([row, col]).copied().unwrap_or(0)))
        .sum()
}

/// Lowest-energy greedy path over all start columns; the first start wins ties
pub fn find_seam(energy: ArrayView2<'_, u32>) -> Option<Vec<usize>> {
    let mut best: Option<(u64, Vec<usize>)> = None;
    for start in 0..energy.ncols() {
        let path = greedy_path(energy, start);
        let total = path_energy(energy, &path);
        if best.as_ref().is_none_or(|(lowest, _)| total < *lowest) {
            best = Some((total, path));
        }
    }
    best.filter(|(_, path)| !path.is_empty())
        .map(|(_, path)| path)
}

/// Replaces low-energy seams with neighbour-derived noise, keeping the image size
pub struct SeamDoppelganger {
    image: RgbImage,
}

impl SeamDoppelganger {
    /// Work on a copy of `image`
    pub fn new(image: &RgbImage) -> Self {
        Self {
            image: image.clone(),
        }
    }

    /// Current picture
    pub const fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Take the resulting picture
    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Lowest-energy seam of the current picture
    pub fn find_seam(&self, orientation: Orientation) -> Option<Vec<usize>> {
        let energy = energy_map(&self.image);
        match orientation {
            Orientation::Vertical => find_seam(energy.view()),
            Orientation::Horizontal => find_seam(energy.t()),
        }
    }

    fn channels(&self, x: u32, y: u32, present: bool) -> [u32; 3] {
        if present {
            self.image.get_pixel(x, y).0.map(u32::from)
        } else {
            [0, 0, 0]
        }
    }

    fn validate(&self, seam: &[usize], orientation: Orientation) -> Result<()> {
        let (width, height) = self.image.dimensions();
        let (across, along, name) = match orientation {
            Orientation::Vertical => (width, height, "vertical seam"),
            Orientation::Horizontal => (height, width, "horizontal seam"),
        };

        if across <= 1 {
            return Err(invalid_parameter(
                name,
                &across,
                &"image too small to replace a seam",
            ));
        }
        if seam.len() != along as usize {
            return Err(invalid_parameter(
                name,
                &seam.len(),
                &format!("seam must have {along} entries"),
            ));
        }
        if let Some(bad) = seam.iter().find(|&&i| i >= across as usize) {
            return Err(invalid_parameter(
                name,
                bad,
                &format!("seam index must be below {across}"),
            ));
        }
        Ok(())
    }

    /// Overwrite a vertical seam (one column per row) from its west/east neighbours
    ///
    /// # Errors
    ///
    /// Returns an error if the image is one pixel wide or the seam does not fit
    pub fn replace_vertical_seam(&mut self, seam: &[usize]) -> Result<()> {
        self.validate(seam, Orientation::Vertical)?;
        let width = self.image.width();

        for (y, &col) in seam.iter().enumerate() {
            let (x, y) = (col as u32, y as u32);
            let [rw, gw, bw] = self.channels(x.wrapping_sub(1), y, x > 0);
            let [re, ge, be] = self.channels(x + 1, y, x + 1 < width);

            let pixel = Rgb([
                ((bw + ge + y) & SEAM_MASK) as u8,
                ((rw + be + y) & SEAM_MASK) as u8,
                ((gw + re + y) & SEAM_MASK) as u8,
            ]);
            self.image.put_pixel(x, y, pixel);
        }
        Ok(())
    }

    /// Overwrite a horizontal seam (one row per column) from its north/south neighbours
    ///
    /// # Errors
    ///
    /// Returns an error if the image is one pixel tall or the seam does not fit
    pub fn replace_horizontal_seam(&mut self, seam: &[usize]) -> Result<()> {
        self.validate(seam, Orientation::Horizontal)?;
        let height = self.image.height();

        for (x, &row) in seam.iter().enumerate() {
            let (x, y) = (x as u32, row as u32);
            let [rn, gn, bn] = self.channels(x, y.wrapping_sub(1), y > 0);
            let [rs, gs, bs] = self.channels(x, y + 1, y + 1 < height);

            let pixel = Rgb([
                ((bn + gs + x) & SEAM_MASK) as u8,
                ((rn + bs + x) & SEAM_MASK) as u8,
                ((gn + rs + x) & SEAM_MASK) as u8,
            ]);
            self.image.put_pixel(x, y, pixel);
        }
        Ok(())
    }

    /// Replace `rows` horizontal seams, then `cols` vertical seams
    ///
    /// Energy is recomputed before every seam.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is too small for the requested direction
    pub fn process(&mut self, rows: u32, cols: u32) -> Result<()> {
        for _ in 0..rows {
            if let Some(seam) = self.find_seam(Orientation::Horizontal) {
                self.replace_horizontal_seam(&seam)?;
            }
        }
        for _ in 0..cols {
            if let Some(seam) = self.find_seam(Orientation::Vertical) {
                self.replace_vertical_seam(&seam)?;
            }
        }
        Ok(())
    }
}
