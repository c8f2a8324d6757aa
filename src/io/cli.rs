//! Command-line interface for preparation, scoring, aggregation and perturbation

use crate::dataset::artifact::{Dataset, FeatureArtifact, LabelArtifact};
use crate::dataset::category::CategoryIndex;
use crate::dataset::preparation::{DatasetBuilder, SkipSummary};
use crate::io::configuration::{
    DEFAULT_CATEGORY_MAP, DEFAULT_IMAGE_SIZE, DEFAULT_MODEL_FILE, DEFAULT_REPORT_FILE,
    DEFAULT_SEED, PREDICT_TOP_K, SEAM_VARIANT_SUFFIX, SHUFFLE_PREVIEW, SOURCE_SUFFIX,
    ScoringConfig,
};
use crate::io::error::{Result, ScoreError, file_system, invalid_parameter, io_error};
use crate::io::image::{ColorMode, export_png, load_rgb};
use crate::io::progress::ProgressManager;
use crate::io::report::write_report;
use crate::perturb::plan::{PerturbationPlan, validate_fraction};
use crate::scoring::category_map::CategoryMap;
use crate::scoring::centroid::CentroidClassifier;
use crate::scoring::classifier::Classifier;
use crate::scoring::scorer::BatchScorer;
use crate::scoring::summary::Summarizer;
use crate::scoring::variant::FilenameTransform;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{Level, info, warn};

#[derive(Parser)]
#[command(name = "seamscore")]
#[command(
    author,
    version,
    about = "Score images against seam-perturbed variants and summarise the results"
)]
/// Command-line arguments for the scoring tool
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Only log warnings and errors, and hide progress bars
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log per-file detail
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,
}

/// Subcommands of the scoring tool
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Resize and label category folders into feature and label artifacts
    Prepare {
        /// Directory whose subdirectories are categories
        #[arg(value_name = "DATADIR")]
        datadir: PathBuf,

        /// Edge length images are resized to
        #[arg(value_name = "SIZE", default_value_t = DEFAULT_IMAGE_SIZE)]
        size: u32,

        /// Keep a single luminance channel
        #[arg(short, long)]
        gray: bool,

        /// Directory the artifacts are written to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Seed for shuffling samples
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },

    /// Fit a nearest-centroid model from prepared artifacts
    Fit {
        /// Directory holding the artifacts
        #[arg(short, long, default_value = ".")]
        artifacts: PathBuf,

        /// Model file to write
        #[arg(short, long, default_value = DEFAULT_MODEL_FILE)]
        model: PathBuf,
    },

    /// Print the top predictions for one image
    Predict {
        /// Image to classify
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Model file to read
        #[arg(short, long, default_value = DEFAULT_MODEL_FILE)]
        model: PathBuf,

        /// Category map used to describe class identifiers
        #[arg(short, long)]
        categories: Option<PathBuf>,
    },

    /// Score every source image and its scenario variants into a report
    Score {
        /// Directory of original images
        #[arg(value_name = "IMAGES")]
        images: PathBuf,

        /// Model file to read
        #[arg(short, long, default_value = DEFAULT_MODEL_FILE)]
        model: PathBuf,

        /// TOML file with the baseline tag, variant rule and ordered scenarios
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Report file, overwritten if present
        #[arg(short, long, default_value = DEFAULT_REPORT_FILE)]
        output: PathBuf,
    },

    /// Average each scenario's probability over a report
    Summarize {
        /// Report file written by `score`
        #[arg(value_name = "REPORT")]
        report: PathBuf,

        /// TOML file defining the expected scenarios
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the description of a class identifier
    Lookup {
        /// Class identifier, e.g. n02226429
        #[arg(value_name = "ID")]
        id: String,

        /// Category map file
        #[arg(short, long, default_value = DEFAULT_CATEGORY_MAP)]
        map: PathBuf,
    },

    /// Write seam-replaced and randomly replaced variants of every source image
    Perturb {
        /// Directory of original images
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Directory the variants are written to
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Fraction of rows and columns to replace, between 0.0 and 1.0
        #[arg(value_name = "PERCENTAGE")]
        percentage: f32,

        /// Seed for the random pass
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
}

impl Cli {
    /// Default log level implied by the verbosity flags
    pub const fn log_level(&self) -> Level {
        if self.quiet {
            Level::WARN
        } else if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

fn stdout_error(source: std::io::Error) -> ScoreError {
    ScoreError::FileSystem {
        path: PathBuf::from("<stdout>"),
        operation: "write output",
        source,
    }
}

fn log_skips(stage: &str, skipped: &SkipSummary) {
    if skipped.total() > 0 {
        warn!(
            "{stage}: skipped {} file(s) ({} unreadable, {} undecodable, {} other)",
            skipped.total(),
            skipped.io,
            skipped.decode,
            skipped.other
        );
    }
}

/// Scoring configuration from `config`, or the default scenarios next to `images`
///
/// # Errors
///
/// Returns an error if the configuration file cannot be loaded
pub fn resolve_config(config: Option<&Path>, images: &Path) -> Result<ScoringConfig> {
    config.map_or_else(
        || Ok(ScoringConfig::default_for(images)),
        ScoringConfig::from_toml_file,
    )
}

/// Runs the selected subcommand
pub struct CommandRunner {
    cli: Cli,
    progress: ProgressManager,
}

impl CommandRunner {
    /// Create a runner for parsed arguments
    pub const fn new(cli: Cli) -> Self {
        let progress = ProgressManager::new(cli.should_show_progress());
        Self { cli, progress }
    }

    /// Run the subcommand
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot start or a fatal step fails;
    /// per-file failures are logged and counted instead
    pub fn run(&mut self) -> Result<()> {
        let mut out = std::io::stdout().lock();
        self.run_with_output(&mut out)
    }

    /// Run the subcommand, writing results to `out`
    ///
    /// # Errors
    ///
    /// Same as [`CommandRunner::run`]
    pub fn run_with_output<W: Write>(&mut self, out: &mut W) -> Result<()> {
        match self.cli.command.clone() {
            Command::Prepare {
                datadir,
                size,
                gray,
                output,
                seed,
            } => {
                let mode = if gray { ColorMode::Gray } else { ColorMode::Color };
                self.prepare(&datadir, size, mode, &output, seed, out)
            }
            Command::Fit { artifacts, model } => Self::fit(&artifacts, &model),
            Command::Predict {
                image,
                model,
                categories,
            } => Self::predict(&image, &model, categories.as_deref(), out),
            Command::Score {
                images,
                model,
                config,
                output,
            } => self.score(&images, &model, config.as_deref(), &output),
            Command::Summarize {
                report,
                config,
                json,
            } => Self::summarize(&report, config.as_deref(), json, out),
            Command::Lookup { id, map } => Self::lookup(&id, &map, out),
            Command::Perturb {
                input,
                output,
                percentage,
                seed,
            } => self.perturb(&input, &output, percentage, seed),
        }
    }

    fn prepare<W: Write>(
        &mut self,
        datadir: &Path,
        size: u32,
        mode: ColorMode,
        output: &Path,
        seed: u64,
        out: &mut W,
    ) -> Result<()> {
        let categories = CategoryIndex::discover(datadir)?;
        info!(
            "found {} categories under {}",
            categories.len(),
            datadir.display()
        );

        let builder = DatasetBuilder::new(size, mode)?;
        let mut batch = builder.build(datadir, categories, &mut self.progress)?;
        info!("prepared {} samples", batch.samples.len());
        log_skips("prepare", &batch.skipped);

        batch.shuffle(seed);
        let preview: Vec<String> = batch
            .samples
            .iter()
            .take(SHUFFLE_PREVIEW)
            .map(|s| s.label.to_string())
            .collect();
        info!("first shuffled labels: {}", preview.join(" "));

        let (features, labels) = batch.to_arrays()?;
        let dataset = Dataset::new(
            FeatureArtifact { mode, features },
            LabelArtifact {
                categories: batch.categories.names().to_vec(),
                labels,
            },
        )?;
        dataset.save(output)?;
        info!("artifacts written to {}", output.display());

        for (label, name) in batch.categories.iter() {
            writeln!(out, "{label} -> {name}").map_err(stdout_error)?;
        }
        Ok(())
    }

    fn fit(artifacts: &Path, model_path: &Path) -> Result<()> {
        let dataset = Dataset::load(artifacts)?;
        info!("NUMBER CLASSES = {}", dataset.class_count());

        let model = CentroidClassifier::fit(&dataset)?;
        model.save(model_path)?;
        info!(
            "fitted {} centroids on {} samples into {}",
            model.categories().len(),
            dataset.len(),
            model_path.display()
        );
        Ok(())
    }

    fn predict<W: Write>(
        image: &Path,
        model_path: &Path,
        categories: Option<&Path>,
        out: &mut W,
    ) -> Result<()> {
        let model = CentroidClassifier::load(model_path)?;
        let map = categories.map(CategoryMap::from_file).transpose()?;
        let ranking = model.predict(image)?;

        for prediction in ranking.top_k(PREDICT_TOP_K) {
            let description = map
                .as_ref()
                .and_then(|m| m.describe(&prediction.class_id).ok())
                .unwrap_or("-");
            writeln!(
                out,
                "{},{description},{}",
                prediction.class_id, prediction.probability
            )
            .map_err(stdout_error)?;
        }
        Ok(())
    }

    fn score(
        &mut self,
        images: &Path,
        model_path: &Path,
        config: Option<&Path>,
        output: &Path,
    ) -> Result<()> {
        let config = resolve_config(config, images)?;
        let model = CentroidClassifier::load(model_path)?;
        let scorer = BatchScorer::new(&model, &config);

        let run = scorer.score_directory(images, &mut self.progress)?;
        write_report(output, &run.groups)?;
        info!(
            "wrote {} image group(s) to {}",
            run.groups.len(),
            output.display()
        );
        log_skips("score", &run.skipped);
        Ok(())
    }

    fn summarize<W: Write>(
        report: &Path,
        config: Option<&Path>,
        json: bool,
        out: &mut W,
    ) -> Result<()> {
        let config = resolve_config(config, Path::new(""))?;
        let summary = Summarizer::from_config(&config)?.summarize_file(report)?;

        if !summary.malformed.is_empty() || !summary.incomplete.is_empty() {
            warn!(
                "{} malformed line(s), {} group(s) left out of the averages",
                summary.malformed.len(),
                summary.incomplete.len()
            );
        }

        if json {
            let text = serde_json::to_string_pretty(&summary.to_json())
                .map_err(|e| invalid_parameter("summary", &report.display(), &e))?;
            writeln!(out, "{text}").map_err(stdout_error)
        } else {
            summary.write_text(out).map_err(stdout_error)
        }
    }

    fn lookup<W: Write>(id: &str, map_path: &Path, out: &mut W) -> Result<()> {
        let map = CategoryMap::from_file(map_path)?;
        let description = map.describe(id)?;
        writeln!(out, "{id} -> {description}").map_err(stdout_error)
    }

    fn perturb(&mut self, input: &Path, output: &Path, percentage: f32, seed: u64) -> Result<()> {
        let fraction = validate_fraction(percentage)?;
        let random_rule = FilenameTransform::default();
        let seam_rule = FilenameTransform::new(SOURCE_SUFFIX, SEAM_VARIANT_SUFFIX);

        let files = random_rule.source_files(input)?;

        std::fs::create_dir_all(output).map_err(file_system(output, "create directory"))?;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut skipped = SkipSummary::default();
        self.progress.initialize("perturb", files.len());

        for path in &files {
            self.progress.start_file(path);
            let result = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .ok_or_else(|| io_error("image path has no file name"))
                .and_then(|name| {
                    let img = load_rgb(path)?;
                    let plan = PerturbationPlan::new(fraction, img.width(), img.height())?;
                    info!(
                        "{name}: replacing {} rows and {} columns, {} random pixels",
                        plan.rows, plan.cols, plan.random_pixels
                    );
                    let pair = plan.apply(&img, &mut rng)?;
                    export_png(&pair.seam, &output.join(seam_rule.apply(&name)))?;
                    export_png(&pair.random, &output.join(random_rule.apply(&name)))
                });

            if let Err(e) = result {
                warn!("skipping {}: {e}", path.display());
                skipped.record(e.skip_kind());
            }
            self.progress.complete_file();
        }
        self.progress.finish();

        log_skips("perturb", &skipped);
        Ok(())
    }
}
