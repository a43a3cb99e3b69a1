//! Span collection: PDF pages to normalized spans and lines.

use super::backend::{PageId, PdfBackend};
use super::content::PageWalker;
use super::options::ErrorMode;
use crate::error::{Error, Result};
use crate::model::{Line, Span};

/// Spans and lines of one page.
#[derive(Debug, Clone, Default)]
pub struct CollectedPage {
    /// Page number (1-indexed)
    pub number: u32,
    /// Every non-blank span in drawing order
    pub spans: Vec<Span>,
    /// One record per visual line
    pub lines: Vec<Line>,
}

impl CollectedPage {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }

    /// Page text, one line per row.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// All pages of a document, in page order.
#[derive(Debug, Clone, Default)]
pub struct CollectedDocument {
    pub pages: Vec<CollectedPage>,
}

impl CollectedDocument {
    /// Build a document from pages that are already in order.
    pub fn from_pages(pages: Vec<CollectedPage>) -> Self {
        Self { pages }
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// The first page, if the document has any.
    pub fn first_page(&self) -> Option<&CollectedPage> {
        self.pages.first()
    }

    /// Get a page by number (1-indexed).
    pub fn page(&self, number: u32) -> Option<&CollectedPage> {
        self.pages.iter().find(|p| p.number == number)
    }

    /// All spans of the document.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.pages.iter().flat_map(|p| p.spans.iter())
    }

    /// All lines of the document.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }

    /// Text of one page, or `None` when out of range.
    pub fn page_text(&self, number: u32) -> Option<String> {
        self.page(number).map(CollectedPage::text)
    }
}

/// Walks a PDF backend page by page and normalizes what it draws.
#[derive(Debug, Clone, Default)]
pub struct SpanCollector {
    error_mode: ErrorMode,
}

impl SpanCollector {
    /// Create a collector.
    pub fn new(error_mode: ErrorMode) -> Self {
        Self { error_mode }
    }

    /// Collect every page of the document.
    pub fn collect<B: PdfBackend + ?Sized>(&self, backend: &B) -> Result<CollectedDocument> {
        let pages = backend.pages();
        let mut collected = Vec::with_capacity(pages.len());

        for (number, page_id) in pages {
            match self.collect_page(backend, number, page_id) {
                Ok(page) => collected.push(page),
                Err(e) if self.error_mode == ErrorMode::Lenient => {
                    log::warn!("Skipping unreadable page {}: {}", number, e);
                    collected.push(CollectedPage::new(number));
                }
                Err(e) => {
                    return Err(Error::UnreadablePage {
                        page: number,
                        reason: e.to_string(),
                    })
                }
            }
        }

        log::debug!(
            "Collected {} pages, {} lines",
            collected.len(),
            collected.iter().map(|p| p.lines.len()).sum::<usize>()
        );

        Ok(CollectedDocument::from_pages(collected))
    }

    fn collect_page<B: PdfBackend + ?Sized>(
        &self,
        backend: &B,
        number: u32,
        page_id: PageId,
    ) -> Result<CollectedPage> {
        let mut page = CollectedPage::new(number);

        let Some(content) = backend.page_content(page_id)? else {
            return Ok(page);
        };
        let ops = backend.decode_content(&content)?;
        let fonts = backend.page_fonts(page_id)?;

        for line in PageWalker::new(fonts.as_ref(), number).walk(&ops) {
            if let Some(record) = Line::from_spans(&line.spans, number) {
                page.lines.push(record);
            }
            page.spans.extend(line.spans);
        }

        Ok(page)
    }
}
