//! Runtime availability of the optional native engines.
//!
//! OCR and PDF rasterisation depend on native software that may be absent.
//! Both are probed once at startup and the result is threaded into strategy
//! construction, so no strategy re-probes per document and a missing engine
//! is never a fatal error.

use crate::config::ExtractionConfig;
use crate::error::Doc2TxtError;
use crate::ocr::{OcrEngine, TesseractEngine};
use crate::pipeline::render::{PageRasterizer, PdfiumRasterizer};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Either a usable handle or the reason it is not available.
pub enum Capability<T> {
    Available(T),
    Unavailable { reason: String },
}

impl<T> Capability<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Capability::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn available(&self) -> Option<&T> {
        match self {
            Capability::Available(v) => Some(v),
            Capability::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available(_))
    }

    /// Why the capability is unavailable; None when it is available.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Capability::Available(_) => None,
            Capability::Unavailable { reason } => Some(reason),
        }
    }
}

impl<T: Clone> Clone for Capability<T> {
    fn clone(&self) -> Self {
        match self {
            Capability::Available(v) => Capability::Available(v.clone()),
            Capability::Unavailable { reason } => Capability::Unavailable {
                reason: reason.clone(),
            },
        }
    }
}

impl<T> fmt::Debug for Capability<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Available(_) => f.write_str("Available"),
            Capability::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

/// The engines shared by every strategy for the lifetime of a run.
#[derive(Clone, Debug)]
pub struct Capabilities {
    pub ocr: Capability<Arc<dyn OcrEngine>>,
    pub rasterizer: Capability<Arc<dyn PageRasterizer>>,
}

impl Capabilities {
    /// Probe the native engines requested by `config`.
    ///
    /// The rasteriser is only probed when OCR is available, since rendered
    /// pages are useless without an engine to read them.
    pub fn probe(config: &ExtractionConfig) -> Self {
        if !config.ocr_enabled {
            info!("OCR disabled; images and scanned PDFs will produce empty text");
            return Self::disabled();
        }

        let ocr: Capability<Arc<dyn OcrEngine>> =
            match TesseractEngine::new(config.tesseract_cmd.as_deref()) {
                Ok(engine) => Capability::Available(Arc::new(engine)),
                Err(e) => {
                    let e = Doc2TxtError::OcrUnavailable {
                        reason: e.to_string(),
                    };
                    warn!("{}", e);
                    Capability::unavailable(e.to_string())
                }
            };

        let rasterizer: Capability<Arc<dyn PageRasterizer>> = if ocr.is_available() {
            match PdfiumRasterizer::locate(config.renderer_path.as_deref()) {
                Ok(r) => Capability::Available(Arc::new(r)),
                Err(e) => {
                    warn!("Scanned PDFs will not be OCR'd: {}", e);
                    Capability::unavailable(e.to_string())
                }
            }
        } else {
            Capability::unavailable("OCR engine unavailable")
        };

        Self { ocr, rasterizer }
    }

    /// No OCR, no rasterisation.
    pub fn disabled() -> Self {
        Self {
            ocr: Capability::unavailable("OCR disabled"),
            rasterizer: Capability::unavailable("OCR disabled"),
        }
    }

    /// Explicit engines, e.g. alternative backends or test doubles.
    pub fn with_engines(ocr: Arc<dyn OcrEngine>, rasterizer: Arc<dyn PageRasterizer>) -> Self {
        Self {
            ocr: Capability::Available(ocr),
            rasterizer: Capability::Available(rasterizer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_probes_nothing() {
        let caps = Capabilities::probe(&ExtractionConfig::default());
        assert!(!caps.ocr.is_available());
        assert!(!caps.rasterizer.is_available());
        assert_eq!(caps.ocr.reason(), Some("OCR disabled"));
    }

    #[test]
    fn missing_tesseract_degrades_instead_of_failing() {
        let config = ExtractionConfig::builder()
            .ocr_enabled(true)
            .tesseract_cmd("/definitely/not/tesseract")
            .build()
            .unwrap();
        let caps = Capabilities::probe(&config);
        assert!(!caps.ocr.is_available());
        assert!(caps.ocr.reason().unwrap().contains("/definitely/not/tesseract"));
        assert!(!caps.rasterizer.is_available());
    }

    #[test]
    fn capability_accessors() {
        let c: Capability<u8> = Capability::Available(7);
        assert_eq!(c.available(), Some(&7));
        assert_eq!(c.reason(), None);
        let u: Capability<u8> = Capability::unavailable("gone");
        assert_eq!(u.available(), None);
        assert_eq!(format!("{u:?}"), r#"Unavailable { reason: "gone" }"#);
    }
}
