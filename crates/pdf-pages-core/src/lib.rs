//! PDF Pages Core Library
//!
//! This library edits the page order of PDF documents:
//! - Page-sequence engine (validate, extract, remove, move, insert, merge)
//! - PDF reading and composing via lopdf
//! - Async file loading and saving
//! - Output naming and configuration

pub mod config;
pub mod error;
pub mod pages;
pub mod pdf;
pub mod util;

pub use config::{EditorConfig, OutputNames};
pub use error::{Error, Result};
pub use pages::{Anchor, Insertion, MoveAlternatives, PageRange, Side, validate};
pub use pdf::{ComposeOptions, PageHandle, PdfComposer, PdfDocument, load_pdf, load_pdfs, save_pdf};

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

/// High-level editor that runs reader, page engine and writer together
#[derive(Debug, Clone, Default)]
pub struct PdfEditor {
    config: EditorConfig,
}

/// An edited document, ready to be written
#[derive(Debug, Clone, Serialize)]
pub struct EditedPdf {
    /// Suggested output file name
    pub file_name: String,
    /// Number of pages in the output
    pub page_count: usize,
    /// Serialized PDF
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// Pages of `source` to insert next to a destination page.
///
/// A missing `start` means page 1, a missing `end` means the last page, so
/// leaving both out inserts the whole document.
#[derive(Debug, Clone, Copy)]
pub struct InsertRequest<'a> {
    pub source: &'a PdfDocument,
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub anchor: Anchor,
}

impl<'a> InsertRequest<'a> {
    /// Insert all of `source`
    pub const fn whole(source: &'a PdfDocument, anchor: Anchor) -> Self {
        Self {
            source,
            start: None,
            end: None,
            anchor,
        }
    }

    /// Insert pages `start..=end` of `source`
    pub const fn pages(source: &'a PdfDocument, start: usize, end: usize, anchor: Anchor) -> Self {
        Self {
            source,
            start: Some(start),
            end: Some(end),
            anchor,
        }
    }
}

impl PdfEditor {
    /// Create a new editor with the given configuration
    pub const fn new(config: EditorConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Keep pages `start..=end`
    pub fn extract(&self, doc: &PdfDocument, start: usize, end: usize) -> Result<EditedPdf> {
        let range = validate(doc.page_count(), start, end)?;
        info!("Extracting pages {} from '{}'", range, doc.name());

        let mut composer = PdfComposer::new();
        let handles = composer.add(doc);
        let extracted = pages::extract(&handles, range)?;

        self.finish(&composer, &extracted, named(doc, &self.config.names.extracted))
    }

    /// Drop pages `start..=end`
    pub fn remove(&self, doc: &PdfDocument, start: usize, end: usize) -> Result<EditedPdf> {
        let range = validate(doc.page_count(), start, end)?;
        info!("Removing pages {} from '{}'", range, doc.name());

        let mut composer = PdfComposer::new();
        let handles = composer.add(doc);
        let trimmed = pages::remove(&handles, range)?;

        self.finish(&composer, &trimmed, named(doc, &self.config.names.trimmed))
    }

    /// Move pages `start..=end` next to `anchor`
    pub fn rearrange(
        &self,
        doc: &PdfDocument,
        start: usize,
        end: usize,
        anchor: Anchor,
    ) -> Result<EditedPdf> {
        let range = validate(doc.page_count(), start, end)?;
        info!("Moving pages {} {} in '{}'", range, anchor, doc.name());

        let mut composer = PdfComposer::new();
        let handles = composer.add(doc);
        let moved = pages::move_block(&handles, range, anchor)?;

        self.finish(&composer, &moved, named(doc, &self.config.names.rearranged))
    }

    /// Insert blocks from other documents into `destination`.
    ///
    /// Anchors refer to the destination's original numbering; blocks are
    /// applied in request order.
    pub fn insert(
        &self,
        destination: &PdfDocument,
        requests: &[InsertRequest<'_>],
    ) -> Result<EditedPdf> {
        if requests.is_empty() {
            return Err(Error::EmptyInput("insert"));
        }

        // Validate every source range before composing anything.
        let ranges = requests
            .iter()
            .map(|r| PageRange::resolve(r.source.page_count(), r.start, r.end))
            .collect::<Result<Vec<_>>>()?;

        let mut composer = PdfComposer::new();
        let target = composer.add(destination);

        let mut insertions = Vec::with_capacity(requests.len());
        for (request, range) in requests.iter().zip(ranges) {
            let source_pages = composer.add(request.source);
            let block = pages::extract(&source_pages, range)?;
            info!(
                "Inserting pages {} of '{}' {} of '{}'",
                range,
                request.source.name(),
                request.anchor,
                destination.name()
            );
            insertions.push(Insertion::new(block, request.anchor));
        }

        let expanded = pages::insert_blocks(&target, &insertions)?;
        self.finish(&composer, &expanded, named(destination, &self.config.names.expanded))
    }

    /// Concatenate documents in order
    pub fn merge(&self, docs: &[PdfDocument]) -> Result<EditedPdf> {
        if docs.len() == 1 {
            warn!("Merging a single document produces a plain copy");
        }

        let mut composer = PdfComposer::new();
        let sources: Vec<Vec<PageHandle>> = docs.iter().map(|d| composer.add(d)).collect();
        let merged = pages::merge(&sources)?;
        info!("Merging {} documents into {} pages", docs.len(), merged.len());

        self.finish(&composer, &merged, self.config.names.merged.clone())
    }

    /// Where `edited` is written under the configured output directory
    pub fn output_path(&self, edited: &EditedPdf) -> PathBuf {
        self.config.output_dir.join(&edited.file_name)
    }

    fn finish(
        &self,
        composer: &PdfComposer,
        pages: &[PageHandle],
        file_name: String,
    ) -> Result<EditedPdf> {
        let options = ComposeOptions {
            compress: self.config.compress,
            ..Default::default()
        };
        let bytes = composer.compose(pages, &options)?;

        Ok(EditedPdf {
            file_name,
            page_count: pages.len(),
            bytes,
        })
    }
}

fn named(doc: &PdfDocument, suffix: &str) -> String {
    util::suffixed_file_name(doc.name(), suffix)
}
