//! Span and line records produced by the span collector.

use serde::{Deserialize, Serialize};

/// Round a font size to the nearest integer, ties to even.
///
/// Sizes like 10.5pt land on 10, 11.5pt on 12, which keeps histogram buckets
/// stable across documents produced by different PDF writers.
pub fn round_size(size: f32) -> i32 {
    size.round_ties_even() as i32
}

/// A single run of text drawn with one font at one size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// The text content, trimmed and NFC-normalized
    pub text: String,

    /// Base font name (e.g., "Helvetica-Bold")
    pub font_name: String,

    /// Effective font size in points
    pub size: f32,

    /// Font size rounded to an integer
    pub font_size: i32,

    /// Page number (1-indexed)
    pub page: u32,

    /// Whether the font name marks a bold face
    pub bold: bool,
}

impl Span {
    /// Create a new span.
    pub fn new(text: impl Into<String>, font_name: impl Into<String>, size: f32, page: u32) -> Self {
        let font_name = font_name.into();
        Self {
            text: text.into(),
            bold: is_bold_font(&font_name),
            font_size: round_size(size),
            font_name,
            size,
            page,
        }
    }
}

/// Check whether a font name marks a bold face.
pub fn is_bold_font(font_name: &str) -> bool {
    font_name.to_lowercase().contains("bold")
}

/// One visual line of text, reduced to its dominant typography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Non-empty span texts joined by single spaces
    pub text: String,

    /// Font of the largest span on the line
    pub font_name: String,

    /// Size of the largest span on the line, in points
    pub size: f32,

    /// `size` rounded to an integer
    pub font_size: i32,

    /// Page number (1-indexed)
    pub page: u32,

    /// Whether any span on the line uses a bold font
    pub bold: bool,
}

impl Line {
    /// Build a line from the spans that share one baseline.
    ///
    /// Spans with blank text are skipped. The dominant span is the first one
    /// with the maximum size. Returns `None` when no text remains.
    pub fn from_spans(spans: &[Span], page: u32) -> Option<Self> {
        let mut parts: Vec<&str> = Vec::with_capacity(spans.len());
        let mut dominant: Option<&Span> = None;
        let mut bold = false;

        for span in spans {
            let content = span.text.trim();
            if content.is_empty() {
                continue;
            }
            parts.push(content);
            if dominant.map_or(true, |d| span.size > d.size) {
                dominant = Some(span);
            }
            bold |= span.bold;
        }

        let text = parts.join(" ").trim().to_string();
        if text.is_empty() {
            return None;
        }

        let dominant = dominant?;
        Some(Self {
            text,
            font_name: dominant.font_name.clone(),
            size: dominant.size,
            font_size: round_size(dominant.size),
            page,
            bold,
        })
    }
}
