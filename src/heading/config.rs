//! Pipeline profiles.
//!
//! The outline and the section-ranking pipelines share one classification
//! routine but differ in how many font clusters they keep, where unknown
//! fonts land, which levels ranks map to and how the result is ordered.

use super::lexicon::LanguageFilter;
use crate::model::HeadingLevel;

/// Rank to heading level lookup.
///
/// Index `i` holds the level of rank `i`; every rank at or past the end of
/// the table maps to the last entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelTable {
    levels: [HeadingLevel; 4],
}

impl LevelTable {
    /// Title for the largest cluster, then H1 to H3.
    pub const OUTLINE: LevelTable = LevelTable {
        levels: [
            HeadingLevel::Title,
            HeadingLevel::H1,
            HeadingLevel::H2,
            HeadingLevel::H3,
        ],
    };

    /// No title level; ranks 2 and beyond collapse into H3.
    pub const SECTIONS: LevelTable = LevelTable {
        levels: [
            HeadingLevel::H1,
            HeadingLevel::H2,
            HeadingLevel::H3,
            HeadingLevel::H3,
        ],
    };

    /// Create a table from explicit levels.
    pub const fn new(levels: [HeadingLevel; 4]) -> Self {
        Self { levels }
    }

    /// Level of a rank.
    pub fn level(&self, rank: usize) -> HeadingLevel {
        self.levels[rank.min(self.levels.len() - 1)]
    }
}

/// Order of headings in an assembled outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineOrder {
    /// Stable sort by page number
    ByPage,
    /// Order in which lines were met
    Encounter,
}

/// Parameters of one heading pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineProfile {
    /// Number of font clusters kept after sorting (K)
    pub cluster_limit: usize,

    /// Rank assigned to fonts outside the kept clusters
    pub default_rank: usize,

    /// Rank to level mapping
    pub levels: LevelTable,

    /// Ordering of the final outline
    pub order: OutlineOrder,

    /// Keyword lists consulted by the classifier
    pub language: LanguageFilter,
}

impl PipelineProfile {
    /// Profile used for per-document outlines.
    pub fn outline() -> Self {
        Self {
            cluster_limit: 4,
            default_rank: 3,
            levels: LevelTable::OUTLINE,
            order: OutlineOrder::ByPage,
            language: LanguageFilter::All,
        }
    }

    /// Profile used to cut documents into rankable sections.
    pub fn sections() -> Self {
        Self {
            cluster_limit: 5,
            default_rank: 2,
            levels: LevelTable::SECTIONS,
            order: OutlineOrder::Encounter,
            language: LanguageFilter::Only("en".to_string()),
        }
    }

    /// Restrict keyword matching to one language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = LanguageFilter::Only(language.into());
        self
    }

    /// Level of a font rank under this profile.
    pub fn level_for_rank(&self, rank: usize) -> HeadingLevel {
        self.levels.level(rank)
    }
}

impl Default for PipelineProfile {
    fn default() -> Self {
        Self::outline()
    }
}
