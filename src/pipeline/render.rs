//! PDF rasterisation: render every page of a document to a `DynamicImage`.
//!
//! pdfium is bound at runtime. [`PdfiumRasterizer::locate`] resolves and
//! test-binds the library once at startup; if that fails the OCR fallback
//! for PDFs is reported unavailable instead of failing later per document.

use crate::error::RasterError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Renders the pages of a PDF into bitmaps.
pub trait PageRasterizer: Send + Sync {
    /// Render all pages of `pdf` at `dpi`, in page order.
    fn render_pages(&self, pdf: &Path, dpi: u32) -> Result<Vec<DynamicImage>, RasterError>;
}

/// Where the pdfium shared library is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LibrarySource {
    File(PathBuf),
    System,
}

/// [`PageRasterizer`] backed by the pdfium library.
#[derive(Debug, Clone)]
pub struct PdfiumRasterizer {
    source: LibrarySource,
}

impl PdfiumRasterizer {
    /// Resolve the pdfium library and check that it can be bound.
    ///
    /// Resolution order (first match wins):
    /// 1. `renderer_path`: the library file, or a directory containing it
    /// 2. `PDFIUM_LIB_PATH`: path to the library file
    /// 3. the system loader search path
    pub fn locate(renderer_path: Option<&Path>) -> Result<Self, RasterError> {
        let source = resolve_library(renderer_path)?;
        let bindings = bind(&source)?;
        drop(bindings);
        info!("PDF renderer ready: {:?}", source);
        Ok(Self { source })
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn render_pages(&self, pdf: &Path, dpi: u32) -> Result<Vec<DynamicImage>, RasterError> {
        let pdfium = Pdfium::new(bind(&self.source)?);

        let document = pdfium
            .load_pdf_from_file(pdf, None)
            .map_err(|e| RasterError::Load {
                path: pdf.to_path_buf(),
                detail: format!("{:?}", e),
            })?;

        // PDF user space is 72 units per inch
        let render_config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / 72.0);

        let pages = document.pages();
        let mut images = Vec::with_capacity(pages.len() as usize);
        for (idx, page) in pages.iter().enumerate() {
            let bitmap =
                page.render_with_config(&render_config)
                    .map_err(|e| RasterError::Page {
                        page: idx + 1,
                        detail: format!("{:?}", e),
                    })?;
            let image = bitmap.as_image();
            debug!(
                "Rendered page {} → {}x{} px",
                idx + 1,
                image.width(),
                image.height()
            );
            images.push(image);
        }

        Ok(images)
    }
}

fn resolve_library(renderer_path: Option<&Path>) -> Result<LibrarySource, RasterError> {
    if let Some(path) = renderer_path {
        let file = if path.is_dir() {
            Pdfium::pdfium_platform_library_name_at_path(path)
        } else {
            path.to_path_buf()
        };
        if !file.exists() {
            return Err(RasterError::RendererUnavailable {
                reason: format!("'{}' does not exist", file.display()),
            });
        }
        return Ok(LibrarySource::File(file));
    }

    if let Ok(env_path) = std::env::var("PDFIUM_LIB_PATH") {
        let p = PathBuf::from(env_path);
        if p.exists() {
            return Ok(LibrarySource::File(p));
        }
        debug!(
            "PDFIUM_LIB_PATH '{}' not found; trying the system library",
            p.display()
        );
    }

    Ok(LibrarySource::System)
}

fn bind(source: &LibrarySource) -> Result<Box<dyn PdfiumLibraryBindings>, RasterError> {
    let bound = match source {
        LibrarySource::File(path) => Pdfium::bind_to_library(path),
        LibrarySource::System => Pdfium::bind_to_system_library(),
    };
    bound.map_err(|e| RasterError::RendererUnavailable {
        reason: format!("{:?}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_missing_file_is_unavailable() {
        let err = resolve_library(Some(Path::new("/no/such/libpdfium.so"))).unwrap_err();
        assert!(matches!(err, RasterError::RendererUnavailable { .. }));
        assert!(err.to_string().contains("/no/such/libpdfium.so"));
    }

    #[test]
    fn directory_without_library_is_unavailable() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = resolve_library(Some(dir.path())).unwrap_err();
        assert!(matches!(err, RasterError::RendererUnavailable { .. }));
    }

    #[test]
    fn explicit_file_is_used_verbatim() {
        let dir = tempfile::TempDir::new().unwrap();
        let lib = dir.path().join("libpdfium-custom.so");
        std::fs::write(&lib, b"").unwrap();
        assert_eq!(
            resolve_library(Some(&lib)).unwrap(),
            LibrarySource::File(lib.clone())
        );
    }

    #[test]
    fn bogus_library_fails_to_bind() {
        let dir = tempfile::TempDir::new().unwrap();
        let lib = dir.path().join("libpdfium.so");
        std::fs::write(&lib, b"definitely not a shared object").unwrap();
        let err = PdfiumRasterizer::locate(Some(&lib)).unwrap_err();
        assert!(matches!(err, RasterError::RendererUnavailable { .. }));
    }
}
