//! Assembling a new PDF from an ordered list of pages.
//!
//! # Id space
//!
//! Every document added to a [`PdfComposer`] is renumbered so its object ids
//! start right after the previous document's. Page handles are therefore
//! unique across all sources and can be mixed freely by the page engine.
//!
//! # Page tree
//!
//! The output gets a single flat `Pages` node whose `Kids` follow the
//! requested order exactly. Source page trees, catalogs and outlines are
//! dropped; attributes a page inherited from its old tree are copied onto
//! the page itself so it renders the same under its new parent.

use std::collections::HashSet;

use lopdf::{Dictionary, Document as LoDocument, Object, ObjectId};
use tracing::debug;

use super::document::PdfDocument;
use crate::error::{Error, Result};

/// Page attributes that may be inherited from ancestor `Pages` nodes.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// Header version used when no source document is available.
const DEFAULT_VERSION: &str = "1.5";

/// Opaque handle to one page of a document added to a [`PdfComposer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageHandle(ObjectId);

impl PageHandle {
    pub const fn object_id(self) -> ObjectId {
        self.0
    }
}

/// Options for serializing a composed document
#[derive(Debug, Clone)]
pub struct ComposeOptions {
    /// Compress content streams before saving
    pub compress: bool,
    /// Header version; defaults to the first source's version
    pub version: Option<String>,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            compress: true,
            version: None,
        }
    }
}

/// Document Writer: builds output PDFs from page handles of its sources.
#[derive(Debug)]
pub struct PdfComposer {
    sources: Vec<LoDocument>,
    next_id: u32,
}

impl Default for PdfComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfComposer {
    pub const fn new() -> Self {
        Self {
            sources: Vec::new(),
            next_id: 1,
        }
    }

    /// Register a source document and return its pages in document order.
    ///
    /// Adding the same document twice yields two independent sets of handles.
    pub fn add(&mut self, doc: &PdfDocument) -> Vec<PageHandle> {
        let mut source = doc.lopdf().clone();
        source.renumber_objects_with(self.next_id);
        self.next_id = source.max_id + 1;

        let pages: Vec<PageHandle> = source.get_pages().into_values().map(PageHandle).collect();
        debug!(
            "Added '{}' to composer: {} pages, ids up to {}",
            doc.name(),
            pages.len(),
            source.max_id
        );

        self.sources.push(source);
        pages
    }

    /// Serialize a new PDF containing `pages` in the given order.
    pub fn compose(&self, pages: &[PageHandle], options: &ComposeOptions) -> Result<Vec<u8>> {
        let version = options
            .version
            .clone()
            .or_else(|| self.sources.first().map(|d| d.version.clone()))
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());
        let mut document = LoDocument::with_version(version);

        for source in &self.sources {
            for (object_id, object) in &source.objects {
                match object.type_name().unwrap_or(b"") {
                    b"Catalog" | b"Pages" | b"Page" | b"Outlines" | b"Outline" => {}
                    _ => {
                        document.objects.insert(*object_id, object.clone());
                    }
                }
            }
        }
        document.max_id = self.next_id.saturating_sub(1);

        let pages_id = document.new_object_id();
        let mut placed = HashSet::with_capacity(pages.len());
        let mut kids = Vec::with_capacity(pages.len());

        for &handle in pages {
            let mut page = self.page_dictionary(handle)?;
            page.set("Parent", Object::Reference(pages_id));

            // A page listed twice needs its own object; the copy shares content.
            let id = if placed.insert(handle) {
                handle.0
            } else {
                document.new_object_id()
            };
            document.objects.insert(id, Object::Dictionary(page));
            kids.push(Object::Reference(id));
        }

        let count = i64::try_from(kids.len())
            .map_err(|_| Error::PdfSave(format!("too many pages: {}", kids.len())))?;
        let pages_dict = Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(count)),
        ]);
        document.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = document.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        document.trailer.set("Root", Object::Reference(catalog_id));

        let pruned = document.prune_objects();
        debug!(
            "Composed {} pages, pruned {} unused objects",
            count,
            pruned.len()
        );

        document.renumber_objects();
        if options.compress {
            document.compress();
        }

        let mut output = Vec::new();
        document
            .save_to(&mut output)
            .map_err(|e| Error::PdfSave(format!("Failed to save composed PDF: {e}")))?;

        Ok(output)
    }

    /// Clone a page dictionary with its inherited attributes made explicit.
    fn page_dictionary(&self, handle: PageHandle) -> Result<Dictionary> {
        let source = self
            .sources
            .iter()
            .find(|s| s.objects.contains_key(&handle.0))
            .ok_or_else(|| Error::Lopdf(format!("unknown page object {:?}", handle.0)))?;

        let mut page = source
            .get_dictionary(handle.0)
            .map_err(|e| Error::Lopdf(format!("page object {:?}: {e}", handle.0)))?
            .clone();

        for key in INHERITABLE {
            if !page.has(key)
                && let Some(value) = inherited(source, &page, key)
            {
                page.set(key, value);
            }
        }

        Ok(page)
    }
}

/// Look `key` up in the ancestors of `page`.
fn inherited(doc: &LoDocument, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_dictionary(parent?).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    None
}
