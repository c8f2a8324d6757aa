//! Tests for random pixel replacement

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use seamscore::perturb::random::replace_random;

    fn changed(a: &RgbImage, b: &RgbImage) -> usize {
        a.pixels().zip(b.pixels()).filter(|(x, y)| x != y).count()
    }

    // Tests exactly the requested number of distinct pixels change
    // Verified by sampling indices with replacement
    #[test]
    fn test_replaces_requested_count() {
        let img = RgbImage::from_pixel(20, 20, Rgb([1, 2, 3]));
        let mut rng = StdRng::seed_from_u64(42);

        let out = replace_random(&img, 100, &mut rng);
        assert_eq!(out.dimensions(), (20, 20));
        assert_eq!(changed(&img, &out), 100);
    }

    // Tests pixels are chosen over the whole image, not only its first rows
    // Verified by indexing with x * y
    #[test]
    fn test_covers_whole_image() {
        let img = RgbImage::from_pixel(10, 10, Rgb([1, 2, 3]));
        let mut rng = StdRng::seed_from_u64(3);

        let out = replace_random(&img, 100, &mut rng);
        assert_eq!(changed(&img, &out), 100);
    }

    // Tests zero and oversized counts
    // Verified by panicking on counts above the pixel total
    #[test]
    fn test_count_bounds() {
        let img = RgbImage::from_pixel(3, 2, Rgb([9, 9, 9]));
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(replace_random(&img, 0, &mut rng), img);
        let out = replace_random(&img, 1000, &mut rng);
        assert_eq!(out.dimensions(), (3, 2));
    }

    // Tests the same seed gives the same picture
    // Verified by drawing colours from thread_rng
    #[test]
    fn test_seeded_reproducible() {
        let img = RgbImage::from_fn(8, 8, |x, y| Rgb([x as u8, y as u8, 0]));

        let a = replace_random(&img, 10, &mut StdRng::seed_from_u64(5));
        let b = replace_random(&img, 10, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }
}
