//! Directory batch runner.
//!
//! Outline mode writes one `<stem>.json` per PDF; ranking mode writes a
//! single report for the whole directory. A document that fails is logged
//! and skipped, never retried. Every JSON file is serialized in full and
//! written through a `.tmp` sibling, so a partial file is never visible.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::detect::has_pdf_extension;
use crate::error::{Error, Result};
use crate::model::Section;
use crate::parser::ExtractOptions;
use crate::rank::{Embedder, Ranker};
use crate::render::{to_json, JsonFormat};

/// Default file name of a ranking report.
pub const DEFAULT_REPORT_FILE: &str = "ranked_sections.json";

/// Outcome of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStatus {
    /// Output written to this path
    Written(PathBuf),
    /// Sections extracted for the shared report
    Extracted(usize),
    /// Processing failed with this message
    Failed(String),
}

/// What a batch run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// File names of the PDFs found, in processing order
    pub documents: Vec<String>,
    /// Files written
    pub outputs: Vec<PathBuf>,
    /// (file name, error message) of every failed document
    pub failed: Vec<(String, String)>,
}

impl BatchSummary {
    /// Number of documents processed without error.
    pub fn succeeded(&self) -> usize {
        self.documents.len() - self.failed.len()
    }

    /// Whether every document succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Persona and task of a ranking run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankRequest {
    pub persona: String,
    pub job_to_be_done: String,
    /// Report file name inside the output directory
    pub file_name: String,
}

impl RankRequest {
    /// Create a request writing to the default report file.
    pub fn new(persona: impl Into<String>, job_to_be_done: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            job_to_be_done: job_to_be_done.into(),
            file_name: DEFAULT_REPORT_FILE.to_string(),
        }
    }

    /// Write the report under another name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }
}

/// Runs the outline or ranking pipeline over a directory of PDFs.
#[derive(Debug, Clone, Default)]
pub struct BatchRunner {
    options: ExtractOptions,
    format: JsonFormat,
}

impl BatchRunner {
    /// Create a runner.
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            options,
            format: JsonFormat::Pretty,
        }
    }

    /// Set the JSON format of written files.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// The extraction options in use.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Write one outline file per PDF.
    pub fn run_outlines(&self, input_dir: &Path, output_dir: &Path) -> Result<BatchSummary> {
        self.run_outlines_with(input_dir, output_dir, |_, _| {})
    }

    /// Write one outline file per PDF, reporting each document to `progress`.
    pub fn run_outlines_with<F>(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        progress: F,
    ) -> Result<BatchSummary>
    where
        F: Fn(&str, &DocumentStatus) + Sync,
    {
        let files = list_pdfs(input_dir)?;
        if files.is_empty() {
            log::warn!("No PDF files found in {}", input_dir.display());
            return Ok(BatchSummary::default());
        }
        fs::create_dir_all(output_dir)?;

        let process = |path: &PathBuf| {
            let name = file_name(path);
            let status = match self.write_outline(path, output_dir) {
                Ok(written) => {
                    log::info!("{} -> {}", name, written.display());
                    DocumentStatus::Written(written)
                }
                Err(e) => {
                    log::error!("Failed to process {}: {}", name, e);
                    DocumentStatus::Failed(e.to_string())
                }
            };
            progress(&name, &status);
            (name, status)
        };

        let results: Vec<(String, DocumentStatus)> = if self.options.parallel {
            files.par_iter().map(process).collect()
        } else {
            files.iter().map(process).collect()
        };

        Ok(summarize(results))
    }

    fn write_outline(&self, path: &Path, output_dir: &Path) -> Result<PathBuf> {
        let outline = crate::outline_from_file(path, &self.options)?;
        let json = to_json(&outline, self.format)?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let target = output_dir.join(format!("{}.json", stem));
        write_atomic(&target, &json)?;
        Ok(target)
    }

    /// Rank the sections of every PDF together and write one report.
    pub fn run_ranking<E: Embedder>(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        ranker: &Ranker<E>,
        request: &RankRequest,
    ) -> Result<BatchSummary> {
        self.run_ranking_with(input_dir, output_dir, ranker, request, |_, _| {})
    }

    /// Rank the sections of every PDF together, reporting each document to
    /// `progress`.
    pub fn run_ranking_with<E, F>(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        ranker: &Ranker<E>,
        request: &RankRequest,
        progress: F,
    ) -> Result<BatchSummary>
    where
        E: Embedder,
        F: Fn(&str, &DocumentStatus) + Sync,
    {
        let files = list_pdfs(input_dir)?;
        if files.is_empty() {
            log::warn!("No PDF files found in {}", input_dir.display());
            return Ok(BatchSummary::default());
        }
        fs::create_dir_all(output_dir)?;

        let process = |path: &PathBuf| {
            let name = file_name(path);
            let result = crate::sections_from_file(path, &self.options);
            let status = match &result {
                Ok(sections) => {
                    log::info!("{}: {} sections", name, sections.len());
                    DocumentStatus::Extracted(sections.len())
                }
                Err(e) => {
                    log::error!("Failed to process {}: {}", name, e);
                    DocumentStatus::Failed(e.to_string())
                }
            };
            progress(&name, &status);
            (name, status, result.unwrap_or_default())
        };

        let results: Vec<(String, DocumentStatus, Vec<Section>)> = if self.options.parallel {
            files.par_iter().map(process).collect()
        } else {
            files.iter().map(process).collect()
        };

        let mut sections = Vec::new();
        let mut statuses = Vec::with_capacity(results.len());
        for (name, status, found) in results {
            sections.extend(found);
            statuses.push((name, status));
        }
        let mut summary = summarize(statuses);

        let report = ranker.report(
            summary.documents.clone(),
            &request.persona,
            &request.job_to_be_done,
            sections,
        )?;
        let target = output_dir.join(&request.file_name);
        write_atomic(&target, &to_json(&report, self.format)?)?;
        log::info!(
            "Ranked {} sections -> {}",
            report.sections.len(),
            target.display()
        );
        summary.outputs.push(target);

        Ok(summary)
    }
}

/// PDF files of a directory (extension matched case-insensitively), sorted
/// by file name.
pub fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let unreadable = |reason: String| Error::InputDirectory {
        path: dir.to_path_buf(),
        reason,
    };

    if !dir.is_dir() {
        return Err(unreadable("not a directory".to_string()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| unreadable(e.to_string()))? {
        let path = entry.map_err(|e| unreadable(e.to_string()))?.path();
        if has_pdf_extension(&path) && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Write `contents` to `path` via a `.tmp` sibling and a rename.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    if let Err(e) = fs::write(&tmp, contents).and_then(|_| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn summarize(results: Vec<(String, DocumentStatus)>) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for (name, status) in results {
        match status {
            DocumentStatus::Written(path) => summary.outputs.push(path),
            DocumentStatus::Extracted(_) => {}
            DocumentStatus::Failed(message) => summary.failed.push((name.clone(), message)),
        }
        summary.documents.push(name);
    }
    summary
}
