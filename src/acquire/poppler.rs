use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};

use super::tools::command_available;
use super::{AcquireConfig, PageTextSource};

/// Reads the text layer with `pdftotext` and OCRs pages with `pdftoppm`
/// followed by `tesseract`.
#[derive(Debug, Clone)]
pub struct PopplerTesseract {
    config: AcquireConfig,
}

impl PopplerTesseract {
    pub fn new(config: AcquireConfig) -> Self {
        Self { config }
    }
}

impl PageTextSource for PopplerTesseract {
    fn text_layer_pages(&self, pdf_path: &Path) -> Result<Vec<String>> {
        if !pdf_path.is_file() {
            bail!("PDF not found: {}", pdf_path.display());
        }

        let output = Command::new("pdftotext")
            .arg("-enc")
            .arg("UTF-8")
            .arg(pdf_path)
            .arg("-")
            .output()
            .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "pdftotext returned non-zero exit status for {}: {}",
                pdf_path.display(),
                stderr.trim()
            );
        }

        Ok(split_pdftotext_pages(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }

    fn ensure_ocr_available(&self) -> Result<()> {
        for program in ["pdftoppm", "tesseract"] {
            if !command_available(program) {
                bail!("OCR requires {program}, which could not be executed");
            }
        }
        Ok(())
    }

    fn ocr_page(&self, pdf_path: &Path, page_number: usize) -> Result<String> {
        let scratch = tempfile::Builder::new()
            .prefix("legallens_ocr_")
            .tempdir()
            .context("failed to create OCR scratch directory")?;

        let image = self.rasterize_page(pdf_path, page_number, scratch.path())?;
        self.recognize_image(&image)
            .with_context(|| format!("{} page {}", pdf_path.display(), page_number))
    }
}

impl PopplerTesseract {
    /// Renders one page to `<dir>/page.png`.
    fn rasterize_page(&self, pdf_path: &Path, page_number: usize, dir: &Path) -> Result<PathBuf> {
        let output_root = dir.join("page");
        let output = Command::new("pdftoppm")
            .arg("-f")
            .arg(page_number.to_string())
            .arg("-l")
            .arg(page_number.to_string())
            .arg("-r")
            .arg(self.config.ocr_dpi.to_string())
            .arg("-singlefile")
            .arg("-png")
            .arg(pdf_path)
            .arg(&output_root)
            .output()
            .with_context(|| format!("failed to execute pdftoppm for {}", pdf_path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "pdftoppm returned non-zero exit status for {} page {}: {}",
                pdf_path.display(),
                page_number,
                stderr.trim()
            );
        }

        let image = output_root.with_extension("png");
        if !image.is_file() {
            bail!(
                "pdftoppm did not produce an image for {} page {}",
                pdf_path.display(),
                page_number
            );
        }
        Ok(image)
    }

    fn recognize_image(&self, image: &Path) -> Result<String> {
        let output = Command::new("tesseract")
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.ocr_lang)
            .output()
            .with_context(|| format!("failed to execute tesseract for {}", image.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "tesseract returned non-zero exit status (lang {}): {}",
                self.config.ocr_lang,
                stderr.trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).replace('\u{0000}', ""))
    }
}

/// Splits `pdftotext` output into pages. Every page, including the last, is
/// terminated by a form feed, so image-only pages come back as empty strings.
pub(super) fn split_pdftotext_pages(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    let body = raw.strip_suffix('\u{000C}').unwrap_or(raw);
    body.split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect()
}
