//! Heading classification of single lines.

use super::config::PipelineProfile;
use super::lexicon;
use super::patterns::HeadingPatterns;
use super::profile::FontProfile;
use crate::model::{HeadingLevel, Line};

/// Decides whether a line is a heading and at which level.
#[derive(Debug, Clone, Copy)]
pub struct HeadingClassifier<'a> {
    profile: &'a PipelineProfile,
    fonts: &'a FontProfile,
    patterns: &'static HeadingPatterns,
}

impl<'a> HeadingClassifier<'a> {
    /// Create a classifier over a finished font profile.
    pub fn new(profile: &'a PipelineProfile, fonts: &'a FontProfile) -> Self {
        Self {
            profile,
            fonts,
            patterns: HeadingPatterns::shared(),
        }
    }

    /// Whether the text matches a structural pattern or a keyword.
    pub fn is_heading_like(&self, text: &str) -> bool {
        self.patterns.is_heading_like(text) || lexicon::contains_keyword(text, &self.profile.language)
    }

    /// Level of a line that is known to be heading-like.
    pub fn level_of(&self, line: &Line) -> HeadingLevel {
        if let Some(level) = self.patterns.lexical_override(&line.text) {
            return level;
        }
        let rank = self.fonts.rank_of(&line.font_name, line.font_size);
        self.profile.level_for_rank(rank)
    }

    /// Classify a line; `None` when it is not heading-like.
    pub fn classify(&self, line: &Line) -> Option<HeadingLevel> {
        if !self.is_heading_like(&line.text) {
            return None;
        }
        let level = self.level_of(line);
        log::trace!("{:?} -> {} (page {})", line.text, level, line.page);
        Some(level)
    }
}
