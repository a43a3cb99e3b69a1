//! PDF parsing module.
//!
//! Everything that touches lopdf lives behind [`PdfBackend`]; the rest of
//! the crate only sees [`CollectedDocument`].

mod backend;
mod collector;
mod content;
mod options;

pub use backend::{
    decode_text_simple, ContentOp, LopdfBackend, NamedFonts, PageFonts, PageId, PdfBackend,
    PdfValue,
};
pub use collector::{CollectedDocument, CollectedPage, SpanCollector};
pub use content::{PageWalker, TextLine, BASELINE_TOLERANCE};
pub use options::{ErrorMode, ExtractOptions};
