mod composer;
mod document;
pub mod io;

pub use composer::{ComposeOptions, PageHandle, PdfComposer};
pub use document::PdfDocument;
pub use io::{load_pdf, load_pdfs, save_pdf};
