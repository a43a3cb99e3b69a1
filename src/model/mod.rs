//! Data model shared by the extraction and ranking stages.
//!
//! Spans and lines come out of the PDF collector, heading candidates and
//! outlines out of the classifier, sections and reports out of the ranker.
//! Everything here is plain data with serde support.

mod outline;
mod section;
mod span;

pub use outline::{HeadingCandidate, HeadingLevel, Outline};
pub use section::{RankedSection, ReportMetadata, ScoredSection, Section, SectionReport};
pub use span::{is_bold_font, round_size, Line, Span};
