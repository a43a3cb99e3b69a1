//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for PDF operations, isolating
//! the concrete PDF library (lopdf) from span collection.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use lopdf::{Document as LopdfDocument, Encoding, Object};

use crate::detect::{sniff_bytes, sniff_path};
use crate::error::{Error, Result};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// A value from a PDF content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

impl PdfValue {
    /// Numeric value of an integer or real operand.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            PdfValue::Integer(i) => Some(*i as f32),
            PdfValue::Real(r) => Some(*r),
            _ => None,
        }
    }
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    /// Create an operation.
    pub fn new(operator: impl Into<String>, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.into(),
            operands,
        }
    }

    /// Numeric operand at `index`, if present.
    pub fn number(&self, index: usize) -> Option<f32> {
        self.operands.get(index).and_then(PdfValue::as_number)
    }
}

/// Font names and text decoders of one page, resolved once per page.
pub trait PageFonts {
    /// Base font name behind a font resource name (`/F1` → `Helvetica-Bold`).
    fn base_font(&self, resource: &[u8]) -> Option<&str>;

    /// Decode a shown string with the encoding of a font resource.
    /// Falls back to simple decoding if the font or encoding is unavailable.
    fn decode(&self, resource: &[u8], bytes: &[u8]) -> String;
}

/// [`PageFonts`] with known base font names and no encodings.
#[derive(Debug, Clone, Default)]
pub struct NamedFonts {
    names: HashMap<Vec<u8>, String>,
}

impl NamedFonts {
    pub fn new(names: HashMap<Vec<u8>, String>) -> Self {
        Self { names }
    }
}

impl PageFonts for NamedFonts {
    fn base_font(&self, resource: &[u8]) -> Option<&str> {
        self.names.get(resource).map(String::as_str)
    }

    fn decode(&self, _resource: &[u8], bytes: &[u8]) -> String {
        decode_text_simple(bytes)
    }
}

/// Abstract interface for PDF document access.
///
/// Implementations provide page enumeration, page fonts and content stream
/// decoding without exposing any concrete PDF library types.
pub trait PdfBackend {
    /// Return all pages as (page_number → PageId), page numbers starting at 1.
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Resolve the fonts of a page and their encodings.
    fn page_fonts<'a>(&'a self, page: PageId) -> Result<Box<dyn PageFonts + 'a>>;

    /// Return the decompressed content stream of a page.
    ///
    /// `Ok(None)` means the page has no `/Contents` and is blank.
    fn page_content(&self, page: PageId) -> Result<Option<Vec<u8>>>;

    /// Parse raw content stream bytes into a sequence of operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path after checking the PDF header.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        sniff_path(path)?;
        let doc = LopdfDocument::load(path)?;
        Self::from_document(doc)
    }

    /// Load from an in-memory byte slice after checking the PDF header.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        sniff_bytes(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Self::from_document(doc)
    }

    fn from_document(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self { doc })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn stream_content(&self, obj: &Object) -> Result<Vec<u8>> {
        let stream = match obj {
            Object::Reference(r) => self.doc.get_object(*r)?.as_stream()?,
            Object::Stream(s) => s,
            _ => return Err(Error::PdfParse("Invalid content stream".to_string())),
        };
        // Uncompressed streams fail decompression; their raw bytes are the content.
        Ok(stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone()))
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_fonts<'a>(&'a self, page: PageId) -> Result<Box<dyn PageFonts + 'a>> {
        let fonts = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut resolved = LopdfPageFonts::default();
        for (name, font_dict) in fonts {
            let base_font = font_dict
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| String::from_utf8_lossy(&name).to_string());
            match font_dict.get_font_encoding(&self.doc) {
                Ok(encoding) => {
                    resolved.encodings.insert(name.clone(), encoding);
                }
                Err(e) => log::debug!("No encoding for font {}: {}", base_font, e),
            }
            resolved.names.insert(name, base_font);
        }
        Ok(Box::new(resolved))
    }

    fn page_content(&self, page: PageId) -> Result<Option<Vec<u8>>> {
        let page_dict = self.doc.get_dictionary(page)?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            Err(_) => return Ok(None),
        };

        let contents = match contents {
            Object::Reference(r) => match self.doc.get_object(*r)? {
                Object::Array(arr) => arr,
                other => return self.stream_content(other).map(Some),
            },
            Object::Array(arr) => arr,
            other => return self.stream_content(other).map(Some),
        };

        let mut content = Vec::new();
        for obj in contents {
            content.extend_from_slice(&self.stream_content(obj)?);
            content.push(b' ');
        }
        Ok(Some(content))
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content =
            lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }
}

/// Fonts of one lopdf page with their encodings, borrowed from the document.
#[derive(Default)]
struct LopdfPageFonts<'a> {
    names: HashMap<Vec<u8>, String>,
    encodings: HashMap<Vec<u8>, Encoding<'a>>,
}

impl PageFonts for LopdfPageFonts<'_> {
    fn base_font(&self, resource: &[u8]) -> Option<&str> {
        self.names.get(resource).map(String::as_str)
    }

    fn decode(&self, resource: &[u8], bytes: &[u8]) -> String {
        self.encodings
            .get(resource)
            .and_then(|enc| LopdfDocument::decode_text(enc, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes))
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}
