//! Batch extraction over a directory of saved responses.
//!
//! Each response is parsed and rendered on its own; a failing document is
//! logged, reported and leaves no output file behind.

use std::collections::hash_map::{Entry, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::error::Result;
use crate::parser::{ParseOptions, ResponseParser};
use crate::render::{self, JsonFormat, RenderOptions};

/// Name of the timing summary written next to the outputs.
pub const TIME_FILE: &str = "time.txt";

/// Output format for extracted documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Markdown (default)
    #[default]
    Markdown,
    /// Plain text
    Text,
    /// JSON
    Json,
}

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Output format of each `<stem>.txt`
    pub format: OutputFormat,

    /// Parsing options applied to every response
    pub parse: ParseOptions,

    /// Rendering options applied to every document
    pub render: RenderOptions,

    /// Process documents in parallel
    pub parallel: bool,

    /// Extension of the response files to pick up
    pub extension: String,
}

impl BatchOptions {
    /// Create new batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set parsing options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the response file extension (without the dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Markdown,
            parse: ParseOptions::default(),
            render: RenderOptions::default(),
            parallel: true,
            extension: "json".to_string(),
        }
    }
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Output files written, in input order
    pub succeeded: Vec<PathBuf>,
    /// Inputs that failed, with the error message
    pub failed: Vec<(PathBuf, String)>,
    /// Wall time of the whole run
    pub elapsed: Duration,
}

impl BatchReport {
    /// Number of inputs seen.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Average seconds per input, zero for an empty run.
    pub fn average_secs(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            n => self.elapsed.as_secs_f64() / n as f64,
        }
    }
}

/// Parse and render one response file.
pub fn process_document(path: &Path, options: &BatchOptions) -> Result<String> {
    let doc = ResponseParser::open_with_options(path, options.parse.clone())?.parse()?;
    match options.format {
        OutputFormat::Markdown => render::to_markdown(&doc, &options.render),
        OutputFormat::Text => render::to_text(&doc, &options.render),
        OutputFormat::Json => render::to_json(&doc, JsonFormat::Pretty),
    }
}

/// List the response files of a directory, sorted by path.
pub fn collect_inputs(input_dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if path.is_file() && matches {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Name of the output file written for an input.
pub fn output_name(input: &Path) -> String {
    format!("{}.txt", input.file_stem().unwrap_or_default().to_string_lossy())
}

/// Split off inputs whose output name an earlier input already claims.
///
/// Names are compared case-insensitively, so `a.json` and `a.JSON` collide
/// on every filesystem.
fn split_collisions(inputs: Vec<PathBuf>) -> (Vec<PathBuf>, Vec<(PathBuf, String)>) {
    let mut claimed: HashMap<String, PathBuf> = HashMap::new();
    let mut unique = Vec::with_capacity(inputs.len());
    let mut collisions = Vec::new();

    for input in inputs {
        let name = output_name(&input);
        match claimed.entry(name.to_lowercase()) {
            Entry::Occupied(first) => {
                let message = format!(
                    "output {} is already taken by {}",
                    name,
                    first.get().display()
                );
                collisions.push((input, message));
            }
            Entry::Vacant(slot) => {
                slot.insert(input.clone());
                unique.push(input);
            }
        }
    }
    (unique, collisions)
}

/// Runs batch extraction from an input directory into a save directory.
pub struct BatchRunner {
    options: BatchOptions,
}

impl BatchRunner {
    /// Create a runner.
    pub fn new(options: BatchOptions) -> Self {
        Self { options }
    }

    /// Process every response in `input_dir`.
    ///
    /// `on_done` is called once per input with whether it succeeded; with
    /// parallel processing it may be called from several threads. An input
    /// whose output name is already taken by an earlier one fails without
    /// being parsed.
    pub fn run<F>(&self, input_dir: &Path, save_dir: &Path, on_done: F) -> Result<BatchReport>
    where
        F: Fn(&Path, bool) + Sync,
    {
        let (inputs, collisions) =
            split_collisions(collect_inputs(input_dir, &self.options.extension)?);
        fs::create_dir_all(save_dir)?;
        log::info!(
            "Extracting {} responses from {}",
            inputs.len(),
            input_dir.display()
        );

        let start = Instant::now();
        let process = |input: &PathBuf| {
            let outcome = self.process_one(input, save_dir);
            on_done(input.as_path(), outcome.is_ok());
            outcome
        };
        let outcomes: Vec<Result<PathBuf>> = if self.options.parallel {
            inputs.par_iter().map(process).collect()
        } else {
            inputs.iter().map(process).collect()
        };
        let elapsed = start.elapsed();

        let mut report = BatchReport {
            elapsed,
            ..Default::default()
        };
        for (input, outcome) in inputs.into_iter().zip(outcomes) {
            match outcome {
                Ok(output) => report.succeeded.push(output),
                Err(e) => {
                    log::warn!("Failed to extract {}: {}", input.display(), e);
                    report.failed.push((input, e.to_string()));
                }
            }
        }
        for (input, message) in collisions {
            log::warn!("Skipping {}: {}", input.display(), message);
            on_done(input.as_path(), false);
            report.failed.push((input, message));
        }

        write_timing(save_dir, &report)?;
        Ok(report)
    }

    fn process_one(&self, input: &Path, save_dir: &Path) -> Result<PathBuf> {
        let content = process_document(input, &self.options)?;
        let output = save_dir.join(output_name(input));
        fs::write(&output, content)?;
        log::debug!("Wrote {}", output.display());
        Ok(output)
    }
}

/// Run batch extraction with a no-op progress callback.
pub fn run_batch(input_dir: &Path, save_dir: &Path, options: BatchOptions) -> Result<BatchReport> {
    BatchRunner::new(options).run(input_dir, save_dir, |_, _| {})
}

fn write_timing(save_dir: &Path, report: &BatchReport) -> Result<()> {
    let total = report.elapsed.as_secs_f64();
    let text = format!("time: {}\navg time: {}\n", total, report.average_secs());
    fs::write(save_dir.join(TIME_FILE), text)?;
    log::info!("time: {}, avg time: {}", total, report.average_secs());
    Ok(())
}
