//! Aggregation of scoring reports into per-scenario averages
//!
//! A report is a sequence of groups: a file-name line (ending with the source
//! suffix, commas allowed) followed by one `scenario,classId,probability` line
//! per expected scenario, in a fixed order. Only complete, well-formed groups contribute to the averages; every
//! other group is flagged and every bad line is reported.

use crate::io::configuration::{SOURCE_SUFFIX, ScoringConfig};
use crate::io::error::{Result, ScoreError, invalid_parameter};
use crate::math::probability::mean;
use serde::Serialize;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use tracing::warn;

/// Running sum for one scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioTotals {
    /// Scenario tag
    pub name: String,
    /// Sum of accepted probabilities
    pub sum: f64,
    /// Number of accepted probabilities
    pub count: usize,
}

impl ScenarioTotals {
    /// Mean probability, `None` before anything was accepted
    pub fn mean(&self) -> Option<f64> {
        mean(self.sum, self.count)
    }
}

/// A record line that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedLine {
    /// 1-based line number
    pub line_number: usize,
    /// Line content, trimmed
    pub content: String,
    /// Why the line was rejected
    pub reason: String,
}

/// A group left out of the averages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncompleteGroup {
    /// File name heading the group, empty for records before any heading
    pub file_name: String,
    /// 1-based line number of the heading
    pub line_number: usize,
    /// Why the group was rejected
    pub reason: String,
}

/// Aggregated statistics of one report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Groups that contributed to the averages
    pub image_count: usize,
    /// Totals per scenario, in expected order
    pub scenarios: Vec<ScenarioTotals>,
    /// Lines that could not be parsed
    pub malformed: Vec<MalformedLine>,
    /// Groups that were flagged instead of averaged
    pub incomplete: Vec<IncompleteGroup>,
}

impl Summary {
    /// Mean probability of a scenario by tag
    pub fn mean_of(&self, scenario: &str) -> Option<f64> {
        self.scenarios
            .iter()
            .find(|t| t.name == scenario)
            .and_then(ScenarioTotals::mean)
    }

    /// Print `Count = N` followed by `scenario = mean` lines
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails
    pub fn write_text<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "Count = {}", self.image_count)?;
        for totals in &self.scenarios {
            match totals.mean() {
                Some(avg) => writeln!(writer, "{} = {avg}", totals.name)?,
                None => writeln!(writer, "{} = n/a", totals.name)?,
            }
        }
        Ok(())
    }

    /// Summary as JSON, including per-scenario means
    pub fn to_json(&self) -> serde_json::Value {
        let scenarios: Vec<serde_json::Value> = self
            .scenarios
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "mean": t.mean(),
                    "sum": t.sum,
                    "count": t.count,
                })
            })
            .collect();

        serde_json::json!({
            "count": self.image_count,
            "scenarios": scenarios,
            "malformed": self.malformed,
            "incomplete": self.incomplete,
        })
    }
}

/// Split a record line into scenario, class identifier and probability
///
/// # Errors
///
/// Returns a description of the problem when the line does not have exactly
/// three comma-separated tokens or the probability is not a number
pub fn parse_record(line: &str) -> std::result::Result<(&str, &str, f64), String> {
    let tokens: Vec<&str> = line.split(',').collect();
    let &[scenario, class_id, probability] = tokens.as_slice() else {
        return Err(format!("expected 3 tokens, found {}", tokens.len()));
    };
    let probability = probability
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad probability '{probability}': {e}"))?;
    Ok((scenario.trim(), class_id.trim(), probability))
}

struct PendingGroup {
    file_name: String,
    line_number: usize,
    records: Vec<(String, f64)>,
    malformed: bool,
}

/// Aggregates reports against a fixed, ordered scenario list
pub struct Summarizer {
    expected: Vec<String>,
    heading_suffix: String,
}

impl Summarizer {
    /// Create a summarizer expecting `expected` records per group, in order
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario list is empty
    pub fn new(expected: Vec<String>) -> Result<Self> {
        if expected.is_empty() {
            return Err(invalid_parameter(
                "scenarios",
                &"[]",
                &"at least one scenario is required",
            ));
        }
        Ok(Self {
            expected,
            heading_suffix: SOURCE_SUFFIX.to_string(),
        })
    }

    /// Summarizer for reports written under `config`: baseline then scenarios,
    /// file lines recognised by the variant rule's source suffix
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration yields no scenario tags
    pub fn from_config(config: &ScoringConfig) -> Result<Self> {
        Ok(Self::new(config.scenario_names())?.with_heading_suffix(&config.variant.find))
    }

    /// Recognise file-name lines by `suffix` instead of the default source suffix
    #[must_use]
    pub fn with_heading_suffix(mut self, suffix: &str) -> Self {
        suffix.clone_into(&mut self.heading_suffix);
        self
    }

    /// Whether a trimmed report line starts a new group
    pub fn is_heading(&self, line: &str) -> bool {
        line.ends_with(&self.heading_suffix)
    }

    /// Expected scenario tags
    pub fn expected(&self) -> &[String] {
        &self.expected
    }

    fn empty_summary(&self) -> Summary {
        Summary {
            image_count: 0,
            scenarios: self
                .expected
                .iter()
                .map(|name| ScenarioTotals {
                    name: name.clone(),
                    sum: 0.0,
                    count: 0,
                })
                .collect(),
            malformed: Vec::new(),
            incomplete: Vec::new(),
        }
    }

    /// Aggregate report lines
    pub fn summarize_lines<'l>(&self, lines: impl IntoIterator<Item = &'l str>) -> Summary {
        let mut summary = self.empty_summary();
        let mut pending: Option<PendingGroup> = None;

        for (index, raw) in lines.into_iter().enumerate() {
            let line_number = index + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if self.is_heading(line) {
                if let Some(group) = pending.take() {
                    self.close_group(group, &mut summary);
                }
                pending = Some(PendingGroup {
                    file_name: line.to_string(),
                    line_number,
                    records: Vec::with_capacity(self.expected.len()),
                    malformed: false,
                });
                continue;
            }

            let group = pending.get_or_insert_with(|| PendingGroup {
                file_name: String::new(),
                line_number,
                records: Vec::new(),
                malformed: true,
            });

            match parse_record(line) {
                Ok((scenario, _, probability)) => {
                    group.records.push((scenario.to_string(), probability));
                }
                Err(reason) => {
                    warn!("line {line_number} malformed ({reason}): {line}");
                    group.malformed = true;
                    summary.malformed.push(MalformedLine {
                        line_number,
                        content: line.to_string(),
                        reason,
                    });
                }
            }
        }

        if let Some(group) = pending.take() {
            self.close_group(group, &mut summary);
        }
        summary
    }

    fn close_group(&self, group: PendingGroup, summary: &mut Summary) {
        match self.check_group(&group) {
            Ok(()) => {
                for (totals, (_, probability)) in summary.scenarios.iter_mut().zip(&group.records)
                {
                    totals.sum += probability;
                    totals.count += 1;
                }
                summary.image_count += 1;
            }
            Err(reason) => {
                warn!(
                    "group '{}' at line {} not averaged: {reason}",
                    group.file_name, group.line_number
                );
                summary.incomplete.push(IncompleteGroup {
                    file_name: group.file_name,
                    line_number: group.line_number,
                    reason,
                });
            }
        }
    }

    fn check_group(&self, group: &PendingGroup) -> std::result::Result<(), String> {
        if group.file_name.is_empty() {
            return Err("records without a file name line".to_string());
        }
        if group.malformed {
            return Err("contains malformed lines".to_string());
        }
        if group.records.len() != self.expected.len() {
            return Err(format!(
                "expected {} records, found {}",
                self.expected.len(),
                group.records.len()
            ));
        }
        for (position, ((found, _), expected)) in
            group.records.iter().zip(&self.expected).enumerate()
        {
            if found != expected {
                return Err(format!(
                    "expected scenario '{expected}' at position {}, found '{found}'",
                    position + 1
                ));
            }
        }
        Ok(())
    }

    /// Aggregate a report held in memory
    pub fn summarize_str(&self, text: &str) -> Summary {
        self.summarize_lines(text.lines())
    }

    /// Aggregate a report from a buffered reader; `origin` is used in errors
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails
    pub fn summarize_reader<R: BufRead>(&self, reader: R, origin: &Path) -> Result<Summary> {
        let lines = reader
            .lines()
            .collect::<std::io::Result<Vec<String>>>()
            .map_err(|e| ScoreError::FileSystem {
                path: origin.to_path_buf(),
                operation: "read report",
                source: e,
            })?;
        Ok(self.summarize_lines(lines.iter().map(String::as_str)))
    }

    /// Aggregate a report file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read
    pub fn summarize_file(&self, path: &Path) -> Result<Summary> {
        let file = std::fs::File::open(path).map_err(|e| ScoreError::FileSystem {
            path: path.to_path_buf(),
            operation: "open report",
            source: e,
        })?;
        self.summarize_reader(BufReader::new(file), path)
    }
}
