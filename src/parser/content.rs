//! Content stream walker.
//!
//! Turns the text operators of one page into lines (spans sharing a
//! baseline) and spans. A line may continue across `BT … ET` text objects,
//! since writers often draw one visual line as several objects (a bold
//! number, then regular text). Spans keep the order in which the content
//! stream draws them; no reading-order reconstruction is attempted.

use unicode_normalization::UnicodeNormalization;

use super::backend::{ContentOp, PageFonts, PdfValue};
use crate::model::Span;

/// Fallback font size when a stream shows text before any `Tf`.
const DEFAULT_FONT_SIZE: f32 = 12.0;

/// TJ adjustments (thousandths of text space) above this count as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Spans whose baselines differ by less than this fraction of the font size
/// belong to the same line.
pub const BASELINE_TOLERANCE: f32 = 0.3;

/// A run of spans on one baseline.
#[derive(Debug, Clone, Default)]
pub struct TextLine {
    /// Spans in drawing order
    pub spans: Vec<Span>,
    /// Baseline of the first span
    pub baseline: f32,
}

/// Lines of one page in drawing order.
#[derive(Debug, Clone, Default)]
struct LineBuilder {
    lines: Vec<TextLine>,
}

impl LineBuilder {
    /// Append to the previous line when the baseline matches, whichever
    /// text object drew it.
    fn push_span(&mut self, span: Span, y: f32) {
        let tolerance = span.size.abs() * BASELINE_TOLERANCE;
        match self.lines.last_mut() {
            Some(line) if (line.baseline - y).abs() <= tolerance => line.spans.push(span),
            _ => self.lines.push(TextLine {
                spans: vec![span],
                baseline: y,
            }),
        }
    }
}

/// Walks the content operations of one page.
pub struct PageWalker<'a> {
    fonts: &'a dyn PageFonts,
    page_number: u32,
}

impl<'a> PageWalker<'a> {
    /// Create a walker over the fonts resolved for a page.
    pub fn new(fonts: &'a dyn PageFonts, page_number: u32) -> Self {
        Self { fonts, page_number }
    }

    /// Collect the lines drawn by `ops`.
    pub fn walk(&self, ops: &[ContentOp]) -> Vec<TextLine> {
        let mut lines = LineBuilder::default();
        let mut state = TextState::default();
        let mut in_text_object = false;

        for op in ops {
            match op.operator.as_str() {
                "BT" => {
                    in_text_object = true;
                    state.matrix = TextMatrix::default();
                }
                "ET" => in_text_object = false,
                "Tf" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        state.font_resource = name.clone();
                        state.font_name = self
                            .fonts
                            .base_font(name)
                            .map(str::to_string)
                            .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                    }
                    state.font_size = op.number(1).unwrap_or(DEFAULT_FONT_SIZE);
                }
                "TL" => {
                    state.leading = op.number(0).unwrap_or(0.0);
                }
                "Td" => {
                    state
                        .matrix
                        .translate(op.number(0).unwrap_or(0.0), op.number(1).unwrap_or(0.0));
                }
                "TD" => {
                    let ty = op.number(1).unwrap_or(0.0);
                    state.leading = -ty;
                    state.matrix.translate(op.number(0).unwrap_or(0.0), ty);
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        state.matrix.set([
                            op.number(0).unwrap_or(1.0),
                            op.number(1).unwrap_or(0.0),
                            op.number(2).unwrap_or(0.0),
                            op.number(3).unwrap_or(1.0),
                            op.number(4).unwrap_or(0.0),
                            op.number(5).unwrap_or(0.0),
                        ]);
                    }
                }
                "T*" => state.next_line(),
                "Tj" | "TJ" | "'" | "\"" if in_text_object => {
                    if op.operator != "Tj" && op.operator != "TJ" {
                        state.next_line();
                    }
                    let text = self.show_text(op, &state.font_resource);
                    self.emit(&mut lines, &state, &text);
                }
                _ => {}
            }
        }

        lines.lines
    }

    /// Decode the string operand(s) of a text-showing operator.
    fn show_text(&self, op: &ContentOp, font_resource: &[u8]) -> String {
        let decode = |bytes: &[u8]| self.fonts.decode(font_resource, bytes);

        match op.operator.as_str() {
            "TJ" => {
                let Some(PdfValue::Array(items)) = op.operands.first() else {
                    return String::new();
                };
                let mut combined = String::new();
                for item in items {
                    match item {
                        PdfValue::Str(bytes) => combined.push_str(&decode(bytes.as_slice())),
                        other => {
                            // Negative adjustments move the pen right; large ones are word gaps.
                            let adjustment = -other.as_number().unwrap_or(0.0);
                            if adjustment > TJ_SPACE_THRESHOLD && needs_space(&combined) {
                                combined.push(' ');
                            }
                        }
                    }
                }
                combined
            }
            "\"" => match op.operands.get(2) {
                Some(PdfValue::Str(bytes)) => decode(bytes.as_slice()),
                _ => String::new(),
            },
            _ => match op.operands.first() {
                Some(PdfValue::Str(bytes)) => decode(bytes.as_slice()),
                _ => String::new(),
            },
        }
    }

    fn emit(&self, lines: &mut LineBuilder, state: &TextState, raw: &str) {
        let text: String = raw.trim().nfc().collect();
        if text.is_empty() {
            return;
        }
        let size = state.font_size * state.matrix.vertical_scale();
        let (_, y) = state.matrix.position();
        let span = Span::new(text, state.font_name.clone(), size, self.page_number);
        lines.push_span(span, y);
    }
}

/// Graphics-independent text state tracked across operators.
#[derive(Debug, Clone)]
struct TextState {
    font_resource: Vec<u8>,
    font_name: String,
    font_size: f32,
    leading: f32,
    matrix: TextMatrix,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_resource: Vec::new(),
            font_name: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            leading: 0.0,
            matrix: TextMatrix::default(),
        }
    }
}

impl TextState {
    /// Move to the start of the next line; `TL` defaults to zero.
    fn next_line(&mut self) {
        self.matrix.translate(0.0, -self.leading);
    }
}

/// Text matrix for tracking position in content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, [a, b, c, d, e, f]: [f32; 6]) {
        *self = Self { a, b, c, d, e, f };
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Whether a word gap should become a space after `text`.
fn needs_space(text: &str) -> bool {
    match text.chars().last() {
        Some(c) => !c.is_whitespace() && !is_spaceless_script_char(c),
        None => false,
    }
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
