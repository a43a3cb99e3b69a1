//! Heading detection.
//!
//! Works in two passes over a [`CollectedDocument`]: the font profiler ranks
//! font clusters by size, then every line is tested against the structural
//! patterns and the keyword lexicon and mapped to a level through the
//! pipeline profile.

mod assembler;
mod classifier;
mod config;
pub mod lexicon;
mod patterns;
mod profile;
mod title;

pub use assembler::OutlineAssembler;
pub use classifier::HeadingClassifier;
pub use config::{LevelTable, OutlineOrder, PipelineProfile};
pub use lexicon::LanguageFilter;
pub use patterns::HeadingPatterns;
pub use profile::{FontCluster, FontProfile};
pub use title::provisional_title;

use crate::model::Outline;
use crate::parser::CollectedDocument;

/// Build the outline of a collected document under a profile.
pub fn extract_outline(doc: &CollectedDocument, profile: &PipelineProfile) -> Outline {
    OutlineAssembler::new(profile.clone()).assemble(doc)
}
