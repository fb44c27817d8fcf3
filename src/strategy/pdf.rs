//! PDF extraction with an OCR fallback for scanned documents.
//!
//! Per document:
//!
//! ```text
//! text layer ──non-blank──▶ done (OCR never runs)
//!     │ blank
//!     ├─ no OCR engine ─────▶ blank text, NoText
//!     ├─ no renderer ───────▶ blank text, Degraded
//!     └─ render every page ─▶ preprocess ─▶ scratch PNG ─▶ OCR
//!                             pages joined with "\n" in page order
//! ```
//!
//! The blank check covers the whole document, not each page: one page of
//! real text is enough to skip OCR for all the others.

use super::{extension_in, ExtractionStrategy};
use crate::capability::Capability;
use crate::config::OcrSettings;
use crate::error::Doc2TxtError;
use crate::item::FileItem;
use crate::ocr::OcrEngine;
use crate::output::Extraction;
use crate::pipeline::preprocess::prepare_for_ocr;
use crate::pipeline::render::PageRasterizer;
use crate::pipeline::scratch::ScratchImage;
use lopdf::Document;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// PDFs: native text layer first, OCR over rendered pages when it is blank.
#[derive(Clone)]
pub struct PdfStrategy {
    ocr: Option<Arc<dyn OcrEngine>>,
    rasterizer: Capability<Arc<dyn PageRasterizer>>,
    settings: OcrSettings,
}

/// What the native text layer yielded.
struct TextLayer {
    text: String,
    /// Set when reading stopped early; `text` holds what came before.
    failure: Option<String>,
}

impl TextLayer {
    /// `Degraded` when reading stopped early, otherwise `complete(text)`.
    fn finish(self, complete: fn(String) -> Extraction) -> Extraction {
        match self.failure {
            Some(reason) => Extraction::degraded(self.text, reason),
            None => complete(self.text),
        }
    }
}

impl PdfStrategy {
    pub fn new(
        ocr: Option<Arc<dyn OcrEngine>>,
        rasterizer: Capability<Arc<dyn PageRasterizer>>,
        settings: OcrSettings,
    ) -> Self {
        Self {
            ocr,
            rasterizer,
            settings,
        }
    }

    /// Text-layer only; never attempts OCR.
    pub fn without_ocr() -> Self {
        Self::new(
            None,
            Capability::unavailable("OCR disabled"),
            OcrSettings::default(),
        )
    }

    /// Render, preprocess and recognise every page.
    ///
    /// Returns the page texts joined with newlines and the page count. The
    /// first failing page aborts the pass; its scratch file is still removed.
    fn ocr_pages(
        &self,
        ocr: &dyn OcrEngine,
        rasterizer: &dyn PageRasterizer,
        pdf: &Path,
    ) -> Result<(String, usize), Doc2TxtError> {
        let pages = rasterizer.render_pages(pdf, self.settings.dpi)?;
        info!(
            "OCR: {} pages of {} at {} DPI",
            pages.len(),
            pdf.display(),
            self.settings.dpi
        );

        let mut texts = Vec::with_capacity(pages.len());
        for (idx, page) in pages.iter().enumerate() {
            let prepared = prepare_for_ocr(page);
            let scratch = ScratchImage::write(&self.settings.scratch_dir, &prepared)?;
            let result = ocr.image_to_text(scratch.path(), Some(&self.settings.lang));
            let scratch_path = scratch.path().to_path_buf();
            if let Err(e) = scratch.remove() {
                warn!(
                    "Could not delete scratch image {}: {}",
                    scratch_path.display(),
                    e
                );
            }
            let text = result?;
            debug!("OCR page {} → {} chars", idx + 1, text.len());
            texts.push(text);
        }

        Ok((texts.join("\n"), pages.len()))
    }
}

impl ExtractionStrategy for PdfStrategy {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn matches(&self, extension: &str) -> bool {
        extension_in(extension, &["pdf"])
    }

    fn extract(&self, item: &FileItem) -> Result<Extraction, Doc2TxtError> {
        let layer = read_text_layer(item.local_path());
        if !layer.text.trim().is_empty() {
            return Ok(layer.finish(Extraction::native));
        }

        let Some(ocr) = &self.ocr else {
            info!("No text found in PDF and OCR is disabled: {}", item.source());
            return Ok(layer.finish(Extraction::no_text));
        };

        let rasterizer = match &self.rasterizer {
            Capability::Available(r) => r,
            Capability::Unavailable { reason } => {
                let e = Doc2TxtError::DependencyMissing {
                    dependency: "PDF renderer",
                    reason: reason.clone(),
                };
                warn!("Cannot OCR {}: {}", item.source(), e);
                return Ok(Extraction::degraded(layer.text, e.to_string()));
            }
        };

        match self.ocr_pages(ocr.as_ref(), rasterizer.as_ref(), item.local_path()) {
            Ok((text, pages)) => Ok(Extraction::ocr(text, pages)),
            Err(e) => {
                warn!("OCR failed for PDF {}: {}", item.source(), e);
                Ok(Extraction::degraded(layer.text, e.to_string()))
            }
        }
    }
}

/// Read the text layer page by page.
///
/// Corrupt or encrypted documents never raise: the text of the pages read
/// before the failure is returned together with the reason. lopdf skips
/// content streams it cannot decode, so such a page reads as empty rather
/// than failing.
fn read_text_layer(path: &Path) -> TextLayer {
    let doc = match Document::load(path) {
        Ok(doc) => doc,
        Err(e) => {
            let e = Doc2TxtError::SourceRead {
                path: path.to_path_buf(),
                detail: e.to_string(),
            };
            warn!("PDF read failed: {}", e);
            return TextLayer {
                text: String::new(),
                failure: Some(e.to_string()),
            };
        }
    };

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    collect_pages(path, &page_numbers, |n| doc.extract_text(&[n]))
}

/// Join per-page text in order, stopping at the first page that fails.
fn collect_pages<E: std::fmt::Display>(
    path: &Path,
    page_numbers: &[u32],
    mut extract_page: impl FnMut(u32) -> Result<String, E>,
) -> TextLayer {
    let mut pages = Vec::with_capacity(page_numbers.len());
    let mut failure = None;
    for &page_num in page_numbers {
        match extract_page(page_num) {
            Ok(text) => pages.push(text),
            Err(e) => {
                let e = Doc2TxtError::SourceRead {
                    path: path.to_path_buf(),
                    detail: format!("page {page_num}: {e}"),
                };
                warn!("PDF read stopped early: {}", e);
                failure = Some(e.to_string());
                break;
            }
        }
    }

    TextLayer {
        text: pages.join("\n"),
        failure,
    }
}
