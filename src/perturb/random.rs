//! Random pixel replacement, the unstructured counterpart of the seam pass

use bitvec::bitvec;
use image::{Rgb, RgbImage};
use rand::Rng;

/// Copy `img` with `pixel_count` distinct, uniformly chosen pixels set to random colours
///
/// Counts larger than the image are clamped to every pixel.
pub fn replace_random<R: Rng>(img: &RgbImage, pixel_count: usize, rng: &mut R) -> RgbImage {
    let total = img.width() as usize * img.height() as usize;
    let amount = pixel_count.min(total);

    let mut chosen = bitvec![0; total];
    for index in rand::seq::index::sample(rng, total, amount) {
        chosen.set(index, true);
    }

    let mut output = img.clone();
    for (index, pixel) in output.pixels_mut().enumerate() {
        if chosen.get(index).is_some_and(|bit| *bit) {
            *pixel = Rgb([rng.random(), rng.random(), rng.random()]);
        }
    }
    output
}
