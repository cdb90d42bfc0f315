//! Async document I/O.
//!
//! Files are read and written with `tokio::fs`; parsing runs on the blocking
//! pool since lopdf is synchronous and large files take a while.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::document::{PdfDocument, file_stem};
use crate::error::{Error, Result};

/// Load a single PDF document, named after its file stem
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<PdfDocument> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        Error::PdfOpen(format!("Failed to read file {}: {}", path.display(), e))
    })?;

    let name = file_stem(&path);
    let doc = tokio::task::spawn_blocking(move || PdfDocument::from_bytes(bytes)).await??;
    debug!("Loaded {} ({} pages)", path.display(), doc.page_count());

    Ok(doc.with_name(name))
}

/// Load several PDF documents concurrently, preserving input order
pub async fn load_pdfs(paths: &[impl AsRef<Path>]) -> Result<Vec<PdfDocument>> {
    let handles: Vec<_> = paths
        .iter()
        .map(|p| tokio::spawn(load_pdf(p.as_ref().to_owned())))
        .collect();

    let mut documents = Vec::with_capacity(handles.len());
    for handle in handles {
        documents.push(handle.await??);
    }
    Ok(documents)
}

/// Write PDF bytes to `path`, creating parent directories as needed
pub async fn save_pdf(bytes: &[u8], path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref().to_owned();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| Error::PdfSave(format!("Failed to write {}: {}", path.display(), e)))?;
    info!("Wrote {} ({} bytes)", path.display(), bytes.len());

    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pdf::test_support::sample_pdf;

    #[tokio::test]
    async fn test_load_pdf_names_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chapter.pdf");
        std::fs::write(&path, sample_pdf("c", 3)).unwrap();

        let doc = load_pdf(&path).await.unwrap();
        assert_eq!(doc.name(), "chapter");
        assert_eq!(doc.page_count(), 3);
    }

    #[tokio::test]
    async fn test_load_pdf_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_pdf(dir.path().join("missing.pdf")).await.unwrap_err();
        assert!(matches!(err, Error::PdfOpen(_)));
    }

    #[tokio::test]
    async fn test_load_pdfs_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for (name, pages) in [("one", 1), ("two", 2), ("three", 3)] {
            let path = dir.path().join(format!("{name}.pdf"));
            std::fs::write(&path, sample_pdf(name, pages)).unwrap();
            paths.push(path);
        }

        let docs = load_pdfs(&paths).await.unwrap();
        let names: Vec<_> = docs.iter().map(PdfDocument::name).collect();
        assert_eq!(names, vec!["one", "two", "three"]);
        assert_eq!(docs[2].page_count(), 3);
    }

    #[tokio::test]
    async fn test_save_pdf_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output").join("nested").join("out.pdf");

        let written = save_pdf(b"%PDF-1.5", &path).await.unwrap();
        assert_eq!(written, path);
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.5");
    }
}
