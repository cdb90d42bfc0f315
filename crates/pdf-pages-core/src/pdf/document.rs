use std::path::Path;

use lopdf::Document as LoDocument;

use crate::error::{Error, Result};

/// Name used for documents loaded from memory without an explicit name.
const DEFAULT_NAME: &str = "document";

/// A parsed PDF whose pages can be handed to the page engine.
///
/// Nothing in this crate mutates the parsed object graph;
/// [`crate::PdfComposer`] works on its own renumbered copy.
#[derive(Clone)]
pub struct PdfDocument {
    inner: LoDocument,
    /// File stem used to name derived outputs
    name: String,
    page_count: usize,
}

impl PdfDocument {
    /// Parse a PDF from bytes
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Result<Self> {
        let inner = LoDocument::load_mem(bytes.as_ref())
            .map_err(|e| Error::PdfOpen(format!("Failed to parse PDF: {e}")))?;
        Ok(Self::from_lopdf(inner))
    }

    /// Wrap an already parsed lopdf document
    pub fn from_lopdf(inner: LoDocument) -> Self {
        let page_count = inner.get_pages().len();
        Self {
            inner,
            name: DEFAULT_NAME.to_string(),
            page_count,
        }
    }

    /// Open a PDF from a file path, named after the file stem
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            Error::PdfOpen(format!("Failed to read file {}: {}", path.display(), e))
        })?;
        Ok(Self::from_bytes(bytes)?.with_name(file_stem(path)))
    }

    /// Replace the name used for derived output files
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get number of pages
    pub const fn page_count(&self) -> usize {
        self.page_count
    }

    /// PDF header version, e.g. `1.5`
    pub fn version(&self) -> &str {
        &self.inner.version
    }

    pub(crate) fn lopdf(&self) -> &LoDocument {
        &self.inner
    }
}

/// File stem of `path`, falling back to the default document name.
pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_NAME)
        .to_string()
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("name", &self.name)
            .field("page_count", &self.page_count)
            .field("version", &self.inner.version)
            .field("objects", &self.inner.objects.len())
            .finish()
    }
}
