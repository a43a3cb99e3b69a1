//! Structural heading patterns.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::HeadingLevel;

/// Words that always mark a second-level heading in lab manuals and reports.
pub const SUBSECTION_MARKERS: &[&str] = &["AIM", "ALGORITHM", "PROCEDURE", "OUTPUT", "RESULT", "实验", "小结"];

/// Case-insensitive regexes that make a line heading-like.
#[derive(Debug)]
pub struct HeadingPatterns {
    /// "PROGRAM 3", "Program 12: Sorting"
    program: Regex,
    /// Everything checked by [`HeadingPatterns::is_heading_like`]
    structural: Vec<Regex>,
}

impl HeadingPatterns {
    /// Compile the pattern set.
    pub fn new() -> Self {
        let program = Regex::new(r"(?i)^PROGRAM\s+\d+").unwrap();
        let structural = [
            r"(?i)^(AIM|ALGORITHM|CODE|OUTPUT|RESULT|PROCEDURE|INTRODUCTION|实验|小结)$",
            // capitals and spaces, at least three characters
            r"(?i)^[A-Z][A-Z\s]{2,}$",
            // "2.1 Background"
            r"(?i)^[0-9]+(\.[0-9]+)*\s+[A-Z].+",
            // one to six capitalized words
            r"(?i)^[A-Z][a-z]+(\s+[A-Z][a-z]+){0,5}$",
            // short runs of CJK ideographs
            r"^[\x{4e00}-\x{9fa5}]{2,10}$",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect();

        Self {
            program,
            structural,
        }
    }

    /// Pattern set shared by every classifier in the process.
    pub fn shared() -> &'static HeadingPatterns {
        static PATTERNS: OnceLock<HeadingPatterns> = OnceLock::new();
        PATTERNS.get_or_init(HeadingPatterns::new)
    }

    /// Whether the line starts with a "PROGRAM <number>" marker.
    pub fn is_program_marker(&self, text: &str) -> bool {
        self.program.is_match(text)
    }

    /// Whether any structural pattern matches the trimmed line.
    pub fn is_heading_like(&self, text: &str) -> bool {
        let text = text.trim();
        self.is_program_marker(text) || self.structural.iter().any(|re| re.is_match(text))
    }

    /// Level forced by the wording of a line, regardless of its font.
    pub fn lexical_override(&self, text: &str) -> Option<HeadingLevel> {
        if self.is_program_marker(text) {
            return Some(HeadingLevel::H1);
        }
        let upper = text.to_uppercase();
        if SUBSECTION_MARKERS.contains(&upper.as_str()) {
            return Some(HeadingLevel::H2);
        }
        None
    }
}

impl Default for HeadingPatterns {
    fn default() -> Self {
        Self::new()
    }
}
