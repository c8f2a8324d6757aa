//! Tests for variant filename derivation

#[cfg(test)]
mod tests {
    use seamscore::io::configuration::{SEAM_VARIANT_SUFFIX, SOURCE_SUFFIX};
    use seamscore::ScoreError;
    use seamscore::scoring::variant::FilenameTransform;
    use std::fs;

    // Tests the default rule targets the random variant
    // Verified by appending the suffix after the extension
    #[test]
    fn test_default_rule() {
        let rule = FilenameTransform::default();
        assert_eq!(rule.apply("foo.jpg"), "foo_rand.png");
        assert_eq!(rule.apply("ILSVRC2012_val_00000001.jpg"), "ILSVRC2012_val_00000001_rand.png");
    }

    // Tests every occurrence is replaced and other names pass through
    // Verified by replacing only the last occurrence
    #[test]
    fn test_apply_all_occurrences() {
        let rule = FilenameTransform::default();
        assert_eq!(rule.apply("a.jpg.jpg"), "a_rand.png_rand.png");
        assert_eq!(rule.apply("b.png"), "b.png");
    }

    // Tests sources are selected by suffix
    // Verified by matching anywhere in the name
    #[test]
    fn test_matches() {
        let rule = FilenameTransform::new(SOURCE_SUFFIX, SEAM_VARIANT_SUFFIX);
        assert!(rule.matches("cat.jpg"));
        assert!(!rule.matches("cat.jpg.txt"));
        assert!(!rule.matches("cat_seam.png"));
        assert_eq!(rule.apply("cat.jpg"), "cat_seam.png");
    }

    // Tests source listing keeps matching files only, sorted, and names the directory on failure
    // Verified by returning entries in directory order
    #[test]
    fn test_source_files() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        for name in ["b,c.jpg", "a.jpg", "a_rand.png", "notes.txt"] {
            fs::write(dir.path().join(name), b"").expect("Failed to create file");
        }
        fs::create_dir(dir.path().join("nested.jpg")).expect("Failed to create dir");

        let files = FilenameTransform::default()
            .source_files(dir.path())
            .expect("Failed to list sources");
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap_or_default().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b,c.jpg"]);

        let missing = dir.path().join("absent");
        match FilenameTransform::default().source_files(&missing) {
            Err(ScoreError::FileSystem { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected a file system error, got {other:?}"),
        }
    }
}
