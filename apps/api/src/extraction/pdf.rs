use anyhow::{Context, Result};

/// Direct text-layer extraction from PDF bytes.
///
/// Synchronous and CPU-bound; the extractor runs it on the blocking pool.
pub trait PdfTextLayer: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> Result<String>;
}

/// `pdf-extract` backed text layer.
pub struct PdfExtractLayer;

impl PdfTextLayer for PdfExtractLayer {
    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes).context("PDF text layer extraction failed")
    }
}
