//! Extraction options and configuration.

/// Options for extracting outlines and sections.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Error handling mode for unreadable pages
    pub error_mode: ErrorMode,

    /// Keyword language for section extraction (ISO 639-1 code)
    pub language: String,

    /// Whether batch runs may process documents in parallel
    pub parallel: bool,
}

impl ExtractOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip unreadable pages).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the keyword language used by section extraction.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            language: "en".to_string(),
            parallel: true,
        }
    }
}

/// Error handling mode during span collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the document on any unreadable page
    #[default]
    Strict,
    /// Treat unreadable pages as blank and continue
    Lenient,
}
