//! Plain-text scoring report
//!
//! Each image contributes its file name on one line followed by one
//! `scenario,classId,probability` line per pass, baseline first.

use crate::io::error::{Result, ScoreError};
use crate::scoring::scorer::{ImageGroup, PredictionRecord};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Format one record line, without the trailing newline
pub fn format_record(record: &PredictionRecord) -> String {
    format!(
        "{},{},{}",
        record.scenario, record.class_id, record.probability
    )
}

/// Streams image groups to any writer
pub struct ReportWriter<W: Write> {
    writer: W,
    destination: PathBuf,
    groups_written: usize,
}

impl ReportWriter<BufWriter<File>> {
    /// Create (or truncate) a report file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| ScoreError::FileSystem {
            path: path.to_path_buf(),
            operation: "create report",
            source: e,
        })?;
        Ok(Self::new(BufWriter::new(file), path))
    }
}

impl<W: Write> ReportWriter<W> {
    /// Wrap a writer; `destination` is only used in error messages
    pub fn new(writer: W, destination: impl Into<PathBuf>) -> Self {
        Self {
            writer,
            destination: destination.into(),
            groups_written: 0,
        }
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}").map_err(|e| ScoreError::FileSystem {
            path: self.destination.clone(),
            operation: "write report",
            source: e,
        })
    }

    /// Append one image group and log its lines
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails
    pub fn write_group(&mut self, group: &ImageGroup) -> Result<()> {
        info!("File {}", group.file_name);
        self.write_line(&group.file_name)?;
        for record in &group.records {
            let line = format_record(record);
            info!("{line}");
            self.write_line(&line)?;
        }
        self.groups_written += 1;
        Ok(())
    }

    /// Number of groups written so far
    pub const fn groups_written(&self) -> usize {
        self.groups_written
    }

    /// Flush and return the inner writer
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush().map_err(|e| ScoreError::FileSystem {
            path: self.destination.clone(),
            operation: "flush report",
            source: e,
        })?;
        Ok(self.writer)
    }
}

/// Write all groups to `path`, overwriting any existing report
///
/// # Errors
///
/// Returns an error if the file cannot be created or written
pub fn write_report(path: &Path, groups: &[ImageGroup]) -> Result<()> {
    let mut writer = ReportWriter::create(path)?;
    for group in groups {
        writer.write_group(group)?;
    }
    writer.finish()?;
    Ok(())
}
