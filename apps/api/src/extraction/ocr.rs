use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Tesseract engine mode 1: LSTM only.
pub const ENGINE_MODE_LSTM: u8 = 1;
/// Tesseract page segmentation mode 6: a single uniform block of text.
pub const PSM_SINGLE_BLOCK: u8 = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct OcrOptions {
    pub language: String,
    pub engine_mode: u8,
    pub page_segmentation_mode: u8,
    /// Rasterization resolution for PDF pages.
    pub dpi: u32,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            engine_mode: ENGINE_MODE_LSTM,
            page_segmentation_mode: PSM_SINGLE_BLOCK,
            dpi: 300,
        }
    }
}

/// Optical character recognition over a document on disk.
///
/// May fail (engine missing, unreadable file) or succeed with empty text.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, path: &Path, options: &OcrOptions) -> Result<String>;
}

/// OCR through the `pdftoppm` (poppler-utils) and `tesseract` command-line tools.
///
/// Pages are rasterized into a temporary directory that is removed when the
/// call returns, whatever the outcome.
pub struct TesseractCli {
    pdftoppm_bin: PathBuf,
    tesseract_bin: PathBuf,
}

impl TesseractCli {
    pub fn new() -> Self {
        Self {
            pdftoppm_bin: PathBuf::from("pdftoppm"),
            tesseract_bin: PathBuf::from("tesseract"),
        }
    }

    async fn rasterize(&self, pdf: &Path, out_dir: &Path, dpi: u32) -> Result<Vec<PathBuf>> {
        let prefix = out_dir.join("page");
        let output = Command::new(&self.pdftoppm_bin)
            .arg("-png")
            .arg("-r")
            .arg(dpi.to_string())
            .arg(pdf)
            .arg(&prefix)
            .output()
            .await
            .context("Failed to run pdftoppm (is poppler-utils installed?)")?;

        if !output.status.success() {
            bail!(
                "pdftoppm failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let mut pages = Vec::new();
        let mut entries = tokio::fs::read_dir(out_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "png") {
                pages.push(path);
            }
        }
        // pdftoppm zero-pads page numbers, so lexical order is page order.
        pages.sort();

        if pages.is_empty() {
            bail!("pdftoppm produced no page images");
        }
        Ok(pages)
    }

    async fn recognize_image(&self, image: &Path, options: &OcrOptions) -> Result<String> {
        let output = Command::new(&self.tesseract_bin)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&options.language)
            .arg("--oem")
            .arg(options.engine_mode.to_string())
            .arg("--psm")
            .arg(options.page_segmentation_mode.to_string())
            .output()
            .await
            .context("Failed to run tesseract (is tesseract-ocr installed?)")?;

        if !output.status.success() {
            return Err(anyhow!(
                "tesseract failed on {}: {}",
                image.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrEngine for TesseractCli {
    async fn recognize(&self, path: &Path, options: &OcrOptions) -> Result<String> {
        let work_dir = tempfile::tempdir().context("Failed to create OCR work directory")?;

        let pages = self.rasterize(path, work_dir.path(), options.dpi).await?;
        info!(
            "OCR: rasterized {} page(s) at {} dpi (lang={})",
            pages.len(),
            options.dpi,
            options.language
        );

        let mut text = String::new();
        for (i, page) in pages.iter().enumerate() {
            match self.recognize_image(page, options).await {
                Ok(page_text) => {
                    debug!("OCR page {}: {} chars", i + 1, page_text.len());
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str(page_text.trim_end());
                }
                Err(e) => warn!("OCR page {} skipped: {e}", i + 1),
            }
        }

        Ok(text)
    }
}
