//! # pdfoutline
//!
//! Heading outline extraction and persona-driven section ranking for PDF
//! documents.
//!
//! The library reads the text of a PDF together with its font metadata,
//! ranks font clusters by size, and turns heading-like lines into a
//! title plus an ordered list of H1/H2/H3 entries.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{outline_from_file, render, ExtractOptions};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let outline = outline_from_file("report.pdf", &ExtractOptions::default())?;
//!     println!("{}", render::to_json(&outline, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Two-pass heading detection**: font profiling, then classification
//! - **Multilingual keywords**: 17 languages, including CJK and Indic scripts
//! - **Section ranking**: cosine similarity of ONNX sentence embeddings against a persona and a task
//! - **Batch processing**: whole directories, in parallel with Rayon

pub mod batch;
pub mod detect;
pub mod error;
pub mod heading;
pub mod model;
pub mod parser;
pub mod rank;
pub mod render;

// Re-export commonly used types
pub use batch::{BatchRunner, BatchSummary, DocumentStatus, RankRequest};
pub use detect::PdfHeader;
pub use error::{Error, Result};
pub use heading::{extract_outline, FontProfile, LanguageFilter, OutlineAssembler, PipelineProfile};
pub use model::{
    HeadingCandidate, HeadingLevel, Line, Outline, RankedSection, ReportMetadata, Section,
    SectionReport, Span,
};
pub use parser::{CollectedDocument, ErrorMode, ExtractOptions, LopdfBackend, SpanCollector};
pub use rank::{Embedder, HashingEmbedder, OnnxConfig, OnnxEmbedder, Ranker};
pub use render::JsonFormat;

use std::path::Path;

/// Collect spans and lines of a PDF file.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{collect_file, ExtractOptions};
///
/// let doc = collect_file("report.pdf", &ExtractOptions::default()).unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn collect_file<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<CollectedDocument> {
    let backend = LopdfBackend::load_file(path)?;
    SpanCollector::new(options.error_mode).collect(&backend)
}

/// Collect spans and lines of a PDF held in memory.
pub fn collect_bytes(data: &[u8], options: &ExtractOptions) -> Result<CollectedDocument> {
    let backend = LopdfBackend::load_bytes(data)?;
    SpanCollector::new(options.error_mode).collect(&backend)
}

/// Extract the title and heading outline of a PDF file.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{outline_from_file, ExtractOptions};
///
/// let outline = outline_from_file("manual.pdf", &ExtractOptions::new().lenient()).unwrap();
/// for heading in &outline.outline {
///     println!("{} {} (p. {})", heading.level, heading.text, heading.page);
/// }
/// ```
pub fn outline_from_file<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<Outline> {
    let doc = collect_file(path, options)?;
    Ok(extract_outline(&doc, &PipelineProfile::outline()))
}

/// Extract the title and heading outline of a PDF held in memory.
pub fn outline_from_bytes(data: &[u8], options: &ExtractOptions) -> Result<Outline> {
    let doc = collect_bytes(data, options)?;
    Ok(extract_outline(&doc, &PipelineProfile::outline()))
}

/// Cut a PDF file into rankable sections, one per heading.
///
/// Section titles come from the section profile, which matches keywords of
/// `options.language` only.
pub fn sections_from_file<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<Vec<Section>> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let doc = collect_file(path, options)?;
    Ok(rank::extract_sections(&name, &doc, options))
}

/// Font profile of a PDF file under the outline profile.
pub fn font_profile_from_file<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<FontProfile> {
    let doc = collect_file(path, options)?;
    Ok(OutlineAssembler::default().font_profile(&doc))
}
