//! Text acquisition for PDFs.
//!
//! A document is read from its embedded text layer when any page carries
//! text; otherwise every page is rasterized and run through OCR. The decision
//! is made once for the whole document.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

mod poppler;
mod tools;

pub use poppler::PopplerTesseract;
pub use tools::collect_tool_versions;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireConfig {
    pub ocr_lang: String,
    pub ocr_dpi: u32,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            ocr_lang: "eng".to_string(),
            ocr_dpi: 200,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AcquisitionMode {
    Native,
    Ocr,
}

impl AcquisitionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Ocr => "ocr",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredText {
    pub text: String,
    pub mode: AcquisitionMode,
    pub page_count: usize,
    pub native_page_count: usize,
}

/// Source of per-page text for one PDF.
pub trait PageTextSource {
    /// Text layer of every page, in page order. Image-only pages are empty.
    fn text_layer_pages(&self, pdf_path: &Path) -> Result<Vec<String>>;

    /// Fails when the OCR toolchain cannot run at all.
    fn ensure_ocr_available(&self) -> Result<()>;

    /// OCR output for a 1-based page number.
    fn ocr_page(&self, pdf_path: &Path, page_number: usize) -> Result<String>;
}

pub fn acquire_text(pdf_path: &Path, config: &AcquireConfig) -> Result<String> {
    Ok(acquire(pdf_path, config)?.text)
}

pub fn acquire(pdf_path: &Path, config: &AcquireConfig) -> Result<AcquiredText> {
    acquire_with(&PopplerTesseract::new(config.clone()), pdf_path)
}

pub fn acquire_text_from_bytes(bytes: &[u8], config: &AcquireConfig) -> Result<AcquiredText> {
    acquire_bytes_with(&PopplerTesseract::new(config.clone()), bytes)
}

/// Spills `bytes` to a temporary PDF and acquires it. The file is removed
/// when acquisition returns, whether it succeeded or not.
pub fn acquire_bytes_with<S: PageTextSource>(source: &S, bytes: &[u8]) -> Result<AcquiredText> {
    let mut upload = tempfile::Builder::new()
        .prefix("legallens_upload_")
        .suffix(".pdf")
        .tempfile()
        .context("failed to create temporary PDF")?;

    upload
        .write_all(bytes)
        .with_context(|| format!("failed to write temporary PDF {}", upload.path().display()))?;
    upload
        .flush()
        .with_context(|| format!("failed to flush temporary PDF {}", upload.path().display()))?;

    acquire_with(source, upload.path())
}

pub fn acquire_with<S: PageTextSource>(source: &S, pdf_path: &Path) -> Result<AcquiredText> {
    let pages = source.text_layer_pages(pdf_path)?;
    let page_count = pages.len();
    let native_page_count = pages.iter().filter(|page| page_has_text(page)).count();

    if has_native_text(&pages) {
        info!(
            pdf = %pdf_path.display(),
            page_count,
            native_page_count,
            mode = AcquisitionMode::Native.as_str(),
            "acquiring text"
        );
        return Ok(AcquiredText {
            text: join_pages(&pages),
            mode: AcquisitionMode::Native,
            page_count,
            native_page_count,
        });
    }

    info!(
        pdf = %pdf_path.display(),
        page_count,
        mode = AcquisitionMode::Ocr.as_str(),
        "no text layer found, acquiring text"
    );
    source.ensure_ocr_available()?;

    let mut ocr_pages = Vec::with_capacity(page_count);
    for page_number in 1..=page_count {
        let page_text = source.ocr_page(pdf_path, page_number).with_context(|| {
            format!(
                "failed OCR extraction for {} page {}",
                pdf_path.display(),
                page_number
            )
        })?;
        debug!(
            page = page_number,
            chars = non_whitespace_char_count(&page_text),
            "ocr page complete"
        );
        ocr_pages.push(page_text);
    }

    Ok(AcquiredText {
        text: join_pages(&ocr_pages),
        mode: AcquisitionMode::Ocr,
        page_count,
        native_page_count,
    })
}

/// True when any page has non-whitespace text.
pub fn has_native_text(pages: &[String]) -> bool {
    pages.iter().any(|page| page_has_text(page))
}

pub fn join_pages(pages: &[String]) -> String {
    pages.join("\n").trim().to_string()
}

fn page_has_text(page: &str) -> bool {
    non_whitespace_char_count(page) > 0
}

pub fn non_whitespace_char_count(text: &str) -> usize {
    text.chars()
        .filter(|character| !character.is_whitespace())
        .count()
}
