//! Section ranking types.

use serde::{Deserialize, Serialize};

/// A heading of one document together with the text of its page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Source file name (e.g., "report.pdf")
    pub document: String,

    /// Page number (1-indexed)
    pub page: u32,

    /// Heading text
    pub title: String,

    /// Full text of the heading's page
    pub content: String,
}

/// A section with its relevance score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSection {
    pub section: Section,
    pub score: f32,
}

/// Run-level metadata of a ranking report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// File names of the processed documents
    pub input_documents: Vec<String>,

    /// Persona the ranking was computed for
    pub persona: String,

    /// Task the persona wants to accomplish
    pub job_to_be_done: String,

    /// Local time of the run (`%Y-%m-%d %H:%M:%S`)
    pub timestamp: String,
}

/// One entry of a ranking report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSection {
    pub document: String,
    pub page: u32,
    pub section_title: String,
    /// 1-based position in the report
    pub importance_rank: usize,
    /// Cosine similarity, rounded to 4 decimals
    pub score: f64,
    /// Page text, truncated
    pub refined_text: String,
}

/// Sections ranked against a persona and task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionReport {
    pub metadata: ReportMetadata,
    pub sections: Vec<RankedSection>,
}
