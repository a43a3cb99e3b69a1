//! Heading outline types.

use serde::{Deserialize, Serialize};

/// Structural level assigned to a heading-like line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Document title (never emitted inside an outline)
    Title,
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Label used in JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::Title => "Title",
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line classified as a heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingCandidate {
    /// Structural level
    pub level: HeadingLevel,

    /// Normalized line text
    pub text: String,

    /// Page number (1-indexed)
    pub page: u32,
}

impl HeadingCandidate {
    /// Create a new heading candidate.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// Title plus ordered headings of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    /// Resolved document title (empty when none was found)
    pub title: String,

    /// Headings below the title
    pub outline: Vec<HeadingCandidate>,
}

impl Outline {
    /// Create an empty outline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of headings.
    pub fn len(&self) -> usize {
        self.outline.len()
    }

    /// Check if no heading was found.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Iterate over headings of one level.
    pub fn headings_at(&self, level: HeadingLevel) -> impl Iterator<Item = &HeadingCandidate> {
        self.outline.iter().filter(move |h| h.level == level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_serializes_as_label() {
        let json = serde_json::to_string(&HeadingLevel::H2).unwrap();
        assert_eq!(json, "\"H2\"");
        assert_eq!(HeadingLevel::Title.to_string(), "Title");
    }

    #[test]
    fn test_outline_json_shape() {
        let outline = Outline {
            title: "Lab Manual".to_string(),
            outline: vec![HeadingCandidate::new(HeadingLevel::H1, "PROGRAM 1", 2)],
        };
        let json = serde_json::to_string(&outline).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Lab Manual","outline":[{"level":"H1","text":"PROGRAM 1","page":2}]}"#
        );
    }

    #[test]
    fn test_headings_at() {
        let outline = Outline {
            title: String::new(),
            outline: vec![
                HeadingCandidate::new(HeadingLevel::H1, "One", 1),
                HeadingCandidate::new(HeadingLevel::H2, "Two", 1),
                HeadingCandidate::new(HeadingLevel::H1, "Three", 2),
            ],
        };
        assert_eq!(outline.headings_at(HeadingLevel::H1).count(), 2);
        assert_eq!(outline.len(), 3);
        assert!(!outline.is_empty());
    }
}
