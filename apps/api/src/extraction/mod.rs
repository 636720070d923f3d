//! Document text extraction: best-effort plain text from uploaded PDF / DOCX bytes.
//!
//! PDFs go through the text layer first; when that throws or yields fewer than
//! `min_chars` trimmed characters the raw file is OCR'd and the longer of the
//! two transcripts wins. DOCX/DOC go through the raw-text converter.
//!
//! All three backends are traits so tests can count and script their calls.

pub mod docx;
pub mod error;
pub mod ocr;
pub mod pdf;

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, info, warn};

pub use docx::{DocxConverter, ZipDocxConverter};
pub use error::ExtractError;
pub use ocr::{OcrEngine, OcrOptions, TesseractCli};
pub use pdf::{PdfExtractLayer, PdfTextLayer};

/// Trimmed-character floor below which direct PDF text is treated as a scan.
pub const DEFAULT_MIN_TEXT_CHARS: usize = 50;

/// Which strategy produced an `ExtractedText`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    DirectParse,
    OcrFallback,
    DocxParse,
}

/// Best-effort transcript of one uploaded document. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedText {
    pub text: String,
    pub provenance: Provenance,
    /// Length of `text` in characters (not bytes).
    pub char_len: usize,
}

impl ExtractedText {
    pub fn new(text: String, provenance: Provenance) -> Self {
        let char_len = text.chars().count();
        Self {
            text,
            provenance,
            char_len,
        }
    }

    pub fn trimmed_len(&self) -> usize {
        trimmed_len(&self.text)
    }
}

/// Recognized upload kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Doc,
    Docx,
}

impl DocumentKind {
    /// Accepts `pdf`, `.PDF`, `docx`, ... Anything else is `UnsupportedFormat`.
    pub fn from_extension(extension: &str) -> Result<Self, ExtractError> {
        let normalized = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "doc" => Ok(DocumentKind::Doc),
            "docx" => Ok(DocumentKind::Docx),
            _ => Err(ExtractError::UnsupportedFormat(extension.to_string())),
        }
    }
}

pub fn trimmed_len(text: &str) -> usize {
    text.trim().chars().count()
}

pub struct DocumentTextExtractor {
    pdf: Arc<dyn PdfTextLayer>,
    ocr: Arc<dyn OcrEngine>,
    docx: Arc<dyn DocxConverter>,
    ocr_options: OcrOptions,
    min_chars: usize,
}

impl DocumentTextExtractor {
    pub fn new(
        pdf: Arc<dyn PdfTextLayer>,
        ocr: Arc<dyn OcrEngine>,
        docx: Arc<dyn DocxConverter>,
    ) -> Self {
        Self {
            pdf,
            ocr,
            docx,
            ocr_options: OcrOptions::default(),
            min_chars: DEFAULT_MIN_TEXT_CHARS,
        }
    }

    /// Production wiring: pdf-extract, tesseract CLI, zip/XML DOCX reader.
    pub fn with_default_backends(ocr_options: OcrOptions) -> Self {
        Self::new(
            Arc::new(PdfExtractLayer),
            Arc::new(TesseractCli::new()),
            Arc::new(ZipDocxConverter),
        )
        .with_ocr_options(ocr_options)
    }

    pub fn with_ocr_options(mut self, options: OcrOptions) -> Self {
        self.ocr_options = options;
        self
    }

    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    pub async fn extract(
        &self,
        bytes: Bytes,
        declared_extension: &str,
    ) -> Result<ExtractedText, ExtractError> {
        let kind = DocumentKind::from_extension(declared_extension)?;

        let extracted = match kind {
            DocumentKind::Pdf => self.extract_pdf(bytes).await?,
            DocumentKind::Doc | DocumentKind::Docx => self.extract_docx(bytes).await?,
        };

        info!(
            "Extracted {} chars from {:?} upload ({:?})",
            extracted.char_len, kind, extracted.provenance
        );
        Ok(extracted)
    }

    async fn extract_pdf(&self, bytes: Bytes) -> Result<ExtractedText, ExtractError> {
        let layer = Arc::clone(&self.pdf);
        let input = bytes.clone();
        let direct = tokio::task::spawn_blocking(move || layer.extract_text(&input))
            .await
            .unwrap_or_else(|join_err| Err(anyhow::anyhow!("PDF parser aborted: {join_err}")));

        let direct_len = match &direct {
            Ok(text) => trimmed_len(text),
            Err(e) => {
                warn!("Direct PDF extraction failed: {e:#}");
                0
            }
        };

        if let Ok(text) = &direct {
            debug!("Direct PDF extraction: {direct_len} trimmed chars");
            if direct_len >= self.min_chars {
                return Ok(ExtractedText::new(text.clone(), Provenance::DirectParse));
            }
        }

        info!(
            "Direct PDF text below {} chars, attempting OCR",
            self.min_chars
        );
        match self.run_ocr(&bytes).await {
            Ok(ocr_text) if trimmed_len(&ocr_text) > direct_len => {
                return Ok(ExtractedText::new(ocr_text, Provenance::OcrFallback));
            }
            Ok(_) => debug!("OCR text not longer than direct extraction, keeping direct text"),
            Err(e) => warn!("OCR failed: {e:#}"),
        }

        match direct {
            Ok(text) if direct_len > 0 => Ok(ExtractedText::new(text, Provenance::DirectParse)),
            _ => Err(ExtractError::InsufficientText { chars: direct_len }),
        }
    }

    /// Materializes the upload so the OCR engine can read it from disk.
    /// The temporary directory is removed when this returns.
    async fn run_ocr(&self, bytes: &[u8]) -> anyhow::Result<String> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("upload.pdf");
        tokio::fs::write(&path, bytes).await?;
        self.ocr.recognize(&path, &self.ocr_options).await
    }

    async fn extract_docx(&self, bytes: Bytes) -> Result<ExtractedText, ExtractError> {
        let converter = Arc::clone(&self.docx);
        let converted = tokio::task::spawn_blocking(move || converter.extract_raw_text(&bytes))
            .await
            .map_err(|e| ExtractError::ExtractionFailed(format!("DOCX converter aborted: {e}")))?
            .map_err(|e| {
                warn!("DOCX extraction error: {e:#}");
                ExtractError::ExtractionFailed(format!("Failed to extract text from DOCX file: {e}"))
            })?;

        for message in &converted.messages {
            debug!("DOCX converter: {message}");
        }

        Ok(ExtractedText::new(converted.text, Provenance::DocxParse))
    }
}
