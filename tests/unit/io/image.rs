//! Tests for image decoding, array layout and PNG export

#[cfg(test)]
mod tests {
    use ::image::{DynamicImage, Rgb, RgbImage};
    use seamscore::ScoreError;
    use seamscore::io::image::{ColorMode, export_png, load_image, load_resized, load_rgb, to_array};

    // Tests channel counts per mode
    // Verified by giving gray three channels
    #[test]
    fn test_color_mode_channels() {
        assert_eq!(ColorMode::Gray.channels(), 1);
        assert_eq!(ColorMode::Color.channels(), 3);
    }

    // Tests arrays are laid out as row, column, channel
    // Verified by swapping row and column in the conversion
    #[test]
    fn test_to_array_layout() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(1, 0, Rgb([255, 0, 0]));
        img.put_pixel(0, 1, Rgb([0, 0, 255]));

        let arr = to_array(&DynamicImage::ImageRgb8(img), 2, ColorMode::Color);

        assert_eq!(arr.dim(), (2, 2, 3));
        assert_eq!(arr[[0, 1, 0]], 255);
        assert_eq!(arr[[1, 0, 2]], 255);
        assert_eq!(arr[[0, 0, 0]], 0);
        assert_eq!(arr[[1, 1, 2]], 0);
    }

    // Tests resizing to a square and gray conversion
    // Verified by ignoring the requested size
    #[test]
    fn test_to_array_resizes() {
        let img = RgbImage::from_pixel(8, 6, Rgb([200, 200, 200]));
        let dynamic = DynamicImage::ImageRgb8(img);

        let color = to_array(&dynamic, 4, ColorMode::Color);
        assert_eq!(color.dim(), (4, 4, 3));
        assert!(color.iter().all(|&v| v.abs_diff(200) <= 1));

        let gray = to_array(&dynamic, 3, ColorMode::Gray);
        assert_eq!(gray.dim(), (3, 3, 1));
        assert!(gray.iter().all(|&v| v.abs_diff(200) <= 1));
    }

    // Tests missing files are read errors, garbage files are decode errors
    // Verified by reporting both as read errors
    #[test]
    fn test_load_errors_are_classified() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let missing = load_image(&dir.path().join("absent.jpg"));
        assert!(matches!(missing, Err(ScoreError::ImageRead { .. })));

        let garbage = dir.path().join("garbage.jpg");
        std::fs::write(&garbage, b"definitely not an image").expect("Failed to write file");
        let corrupt = load_image(&garbage);
        assert!(matches!(corrupt, Err(ScoreError::ImageDecode { .. })));
    }

    // Tests exported PNGs decode to the same pixels, even under a misleading extension
    // Verified by trusting the extension instead of sniffing the format
    #[test]
    fn test_export_and_reload() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut img = RgbImage::from_pixel(5, 3, Rgb([10, 20, 30]));
        img.put_pixel(4, 2, Rgb([250, 1, 2]));

        let nested = dir.path().join("out/level/variant.png");
        export_png(&img, &nested).expect("Failed to export image");
        assert_eq!(load_rgb(&nested).expect("Failed to reload image"), img);

        let disguised = dir.path().join("photo.jpg");
        std::fs::copy(&nested, &disguised).expect("Failed to copy image");
        let arr = load_resized(&disguised, 5, ColorMode::Color).expect("Failed to load image");
        assert_eq!(arr.dim(), (5, 5, 3));
    }
}
