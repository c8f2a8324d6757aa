//! Tests for command-line parsing and command dispatch

#[cfg(test)]
mod tests {
    use clap::Parser;
    use image::{Rgb, RgbImage};
    use seamscore::ScoreError;
    use seamscore::io::cli::{Cli, Command, CommandRunner, resolve_config};
    use seamscore::io::configuration::{DEFAULT_MODEL_FILE, DEFAULT_REPORT_FILE, DEFAULT_SEED};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use tracing::Level;

    fn run(args: &[&str]) -> (seamscore::Result<()>, String) {
        let cli = Cli::try_parse_from(args).expect("Failed to parse arguments");
        let mut runner = CommandRunner::new(cli);
        let mut out = Vec::new();
        let result = runner.run_with_output(&mut out);
        (result, String::from_utf8(out).expect("Output is not UTF-8"))
    }

    fn path_arg(path: &Path) -> &str {
        path.to_str().expect("Temp path is not UTF-8")
    }

    // Tests score defaults to the conventional model and report names
    // Verified by changing the default report file
    #[test]
    fn test_parse_score_defaults() {
        let cli = Cli::parse_from(["seamscore", "score", "val"]);

        assert_eq!(
            cli.command,
            Command::Score {
                images: PathBuf::from("val"),
                model: PathBuf::from(DEFAULT_MODEL_FILE),
                config: None,
                output: PathBuf::from(DEFAULT_REPORT_FILE),
            }
        );
    }

    // Tests prepare positional and optional arguments
    // Verified by dropping the seed default
    #[test]
    fn test_parse_prepare() {
        let cli = Cli::parse_from(["seamscore", "prepare", "data", "64", "--gray"]);

        let Command::Prepare {
            datadir,
            size,
            gray,
            seed,
            ..
        } = cli.command
        else {
            panic!("expected prepare");
        };
        assert_eq!(datadir, PathBuf::from("data"));
        assert_eq!(size, 64);
        assert!(gray);
        assert_eq!(seed, DEFAULT_SEED);
    }

    // Tests verbosity flags map to log levels and progress display
    // Verified by inverting the quiet flag
    #[test]
    fn test_log_level() {
        let default = Cli::parse_from(["seamscore", "lookup", "n01"]);
        assert_eq!(default.log_level(), Level::INFO);
        assert!(default.should_show_progress());

        let quiet = Cli::parse_from(["seamscore", "lookup", "n01", "-q"]);
        assert_eq!(quiet.log_level(), Level::WARN);
        assert!(!quiet.should_show_progress());

        let verbose = Cli::parse_from(["seamscore", "--verbose", "lookup", "n01"]);
        assert_eq!(verbose.log_level(), Level::DEBUG);

        assert!(Cli::try_parse_from(["seamscore", "-q", "-v", "lookup", "n01"]).is_err());
    }

    // Tests lookup prints the mapped description
    // Verified by printing the index column instead
    #[test]
    fn test_lookup_command() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let map = dir.path().join("map_clsloc.txt");
        fs::write(&map, "n01440764 1 tench\nn02226429 631 grasshopper\n")
            .expect("Failed to write map");

        let (result, out) = run(&["seamscore", "lookup", "n02226429", "--map", path_arg(&map)]);
        assert!(result.is_ok());
        assert_eq!(out, "n02226429 -> grasshopper\n");

        let (result, _) = run(&["seamscore", "lookup", "n00000000", "--map", path_arg(&map)]);
        assert!(matches!(result, Err(ScoreError::CategoryNotFound { .. })));
    }

    // Tests summarize prints count and scenario means
    // Verified by averaging over all groups including incomplete ones
    #[test]
    fn test_summarize_command() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = dir.path().join("scoring.toml");
        fs::write(
            &config,
            "[[scenarios]]\nname = \"seam05\"\ndirectory = \"v05\"\n",
        )
        .expect("Failed to write config");
        let report = dir.path().join("report.txt");
        fs::write(
            &report,
            "a.jpg\nresnet,X,1.0\nseam05,X,0.5\nb.jpg\nresnet,Y,0.5\nseam05,Y,0.25\nc.jpg\nresnet,Z,0.9\n",
        )
        .expect("Failed to write report");

        let (result, out) = run(&[
            "seamscore",
            "summarize",
            path_arg(&report),
            "--config",
            path_arg(&config),
        ]);
        assert!(result.is_ok());
        assert_eq!(out, "Count = 2\nresnet = 0.75\nseam05 = 0.375\n");

        let (result, out) = run(&[
            "seamscore",
            "summarize",
            path_arg(&report),
            "--config",
            path_arg(&config),
            "--json",
        ]);
        assert!(result.is_ok());
        let json: serde_json::Value = serde_json::from_str(&out).expect("Output is not JSON");
        assert_eq!(json["count"], 2);
        assert_eq!(json["incomplete"][0]["file_name"], "c.jpg");
    }

    // Tests out-of-range severities are rejected before any file is touched
    // Verified by clamping the percentage instead
    #[test]
    fn test_perturb_rejects_percentage() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let output = dir.path().join("out");

        let (result, _) = run(&[
            "seamscore",
            "-q",
            "perturb",
            path_arg(dir.path()),
            path_arg(&output),
            "1.5",
        ]);
        assert!(matches!(result, Err(ScoreError::InvalidParameter { .. })));
        assert!(!output.exists());
    }

    // Tests perturb writes both variants per source and skips unreadable files
    // Verified by aborting on the first bad file
    #[test]
    fn test_perturb_command() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let input = dir.path().join("val");
        fs::create_dir_all(&input).expect("Failed to create input dir");

        let img = RgbImage::from_fn(12, 8, |x, y| Rgb([(x * 20) as u8, (y * 30) as u8, 90]));
        img.save_with_format(input.join("cat.jpg"), image::ImageFormat::Png)
            .expect("Failed to save image");
        fs::write(input.join("broken.jpg"), b"junk").expect("Failed to write file");
        fs::write(input.join("notes.txt"), b"ignored").expect("Failed to write file");

        let output = dir.path().join("val_10");
        let (result, _) = run(&[
            "seamscore",
            "-q",
            "perturb",
            path_arg(&input),
            path_arg(&output),
            "0.1",
        ]);
        assert!(result.is_ok());

        let mut written: Vec<String> = fs::read_dir(&output)
            .expect("Failed to list output")
            .map(|e| e.expect("Bad entry").file_name().to_string_lossy().to_string())
            .collect();
        written.sort();
        assert_eq!(written, vec!["cat_rand.png", "cat_seam.png"]);

        let seam = image::open(output.join("cat_seam.png")).expect("Failed to open variant");
        assert_eq!((seam.width(), seam.height()), (12, 8));
    }

    // Tests scoring without a config uses sibling scenario directories
    // Verified by resolving scenarios inside the image directory
    #[test]
    fn test_resolve_config_default() {
        let config = resolve_config(None, Path::new("data/val")).expect("Failed to resolve");
        assert_eq!(config.scenarios[0].directory, PathBuf::from("data/val_05"));

        let missing = resolve_config(Some(Path::new("/nonexistent/scoring.toml")), Path::new("x"));
        assert!(missing.is_err());
    }
}
