use thiserror::Error;

use crate::pages::{MoveAlternatives, Side};

/// Unified error type for pdf-pages-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Page-sequence edits (range checks, no-op moves, empty inputs)
/// - PDF operations (opening, composing, saving)
/// - Configuration operations (loading, validation)
/// - General I/O operations
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Page Sequence Errors
    // ==========================================================================
    /// Range ends before it starts
    #[error("end page {end} cannot be lower than start page {start}")]
    Order { start: usize, end: usize },

    /// A range bound or anchor lies outside the document
    #[error("{what} page {page} is out of range, must be between 1 and {length}")]
    Bounds {
        what: &'static str,
        page: usize,
        length: usize,
    },

    /// Rearrangement that would leave the page order unchanged
    #[error(
        "moving pages {start}-{end} {side} page {anchor} does not change the page order; {alternatives}"
    )]
    NoOpRejected {
        start: usize,
        end: usize,
        side: Side,
        anchor: usize,
        alternatives: MoveAlternatives,
    },

    /// Operation needs at least one input and got none
    #[error("no documents to {0}")]
    EmptyInput(&'static str),

    /// Relative position outside `before`/`after`
    #[error("invalid relative position '{0}', use 'before' or 'after'")]
    Side(String),

    // ==========================================================================
    // PDF Errors
    // ==========================================================================
    /// Failed to open or parse a PDF file
    #[error("failed to open PDF: {0}")]
    PdfOpen(String),

    /// Failed to save a PDF
    #[error("failed to save PDF: {0}")]
    PdfSave(String),

    /// Error from the lopdf library
    #[error("lopdf error: {0}")]
    Lopdf(String),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking parse or serialize task panicked or was cancelled
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    /// Whether this error comes from validating the requested edit rather
    /// than from reading or writing documents.
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Order { .. }
                | Self::Bounds { .. }
                | Self::NoOpRejected { .. }
                | Self::EmptyInput(_)
                | Self::Side(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
