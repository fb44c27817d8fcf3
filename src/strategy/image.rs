use super::{extension_in, ExtractionStrategy};
use crate::config::OcrSettings;
use crate::error::Doc2TxtError;
use crate::item::FileItem;
use crate::ocr::OcrEngine;
use crate::output::Extraction;
use std::sync::Arc;
use tracing::{info, warn};

/// Raster images: OCR only, empty text when OCR is unavailable.
#[derive(Clone)]
pub struct ImageStrategy {
    ocr: Option<Arc<dyn OcrEngine>>,
    lang: String,
}

impl ImageStrategy {
    pub const EXTENSIONS: &'static [&'static str] = &["png", "jpg", "jpeg", "tiff", "bmp"];

    pub fn new(ocr: Option<Arc<dyn OcrEngine>>, settings: &OcrSettings) -> Self {
        Self {
            ocr,
            lang: settings.lang.clone(),
        }
    }
}

impl ExtractionStrategy for ImageStrategy {
    fn name(&self) -> &'static str {
        "image"
    }

    fn matches(&self, extension: &str) -> bool {
        extension_in(extension, Self::EXTENSIONS)
    }

    fn extract(&self, item: &FileItem) -> Result<Extraction, Doc2TxtError> {
        let Some(ocr) = &self.ocr else {
            info!("OCR unavailable; no text for image {}", item.source());
            return Ok(Extraction::no_text(""));
        };

        match ocr.image_to_text(item.local_path(), Some(&self.lang)) {
            Ok(text) => Ok(Extraction::ocr(text, 1)),
            Err(e) => {
                warn!("Image OCR failed for {}: {}", item.source(), e);
                Ok(Extraction::degraded("", e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use crate::output::ExtractionOutcome;
    use std::path::Path;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingOcr {
        calls: Mutex<Vec<(String, Option<String>)>>,
        fail: bool,
    }

    impl OcrEngine for RecordingOcr {
        fn image_to_text(&self, image: &Path, lang: Option<&str>) -> Result<String, OcrError> {
            self.calls
                .lock()
                .unwrap()
                .push((image.display().to_string(), lang.map(str::to_string)));
            if self.fail {
                return Err(OcrError::Failed {
                    mode: "psm 6",
                    status: "exit status: 1".into(),
                    stderr: "Error in pixReadStream".into(),
                });
            }
            Ok("SCANNED".into())
        }
    }

    fn scan() -> FileItem {
        FileItem::new("in/scan.TIFF", "scan", "TIFF", "in/scan.TIFF", "in")
    }

    #[test]
    fn matches_image_extensions_case_insensitively() {
        let s = ImageStrategy::new(None, &OcrSettings::default());
        for ext in ["png", "JPG", "jpeg", "Tiff", "bmp"] {
            assert!(s.matches(ext), "{ext}");
        }
        for ext in ["gif", "tif", "webp", "pdf"] {
            assert!(!s.matches(ext), "{ext}");
        }
    }

    #[test]
    fn without_ocr_returns_empty_text() {
        let s = ImageStrategy::new(None, &OcrSettings::default());
        let out = s.extract(&scan()).unwrap();
        assert_eq!(out.text, "");
        assert_eq!(out.outcome, ExtractionOutcome::NoText);
    }

    #[test]
    fn ocr_uses_configured_language() {
        let ocr = Arc::new(RecordingOcr::default());
        let settings = OcrSettings {
            lang: "fra".into(),
            ..OcrSettings::default()
        };
        let s = ImageStrategy::new(Some(ocr.clone()), &settings);
        let out = s.extract(&scan()).unwrap();
        assert_eq!(out.text, "SCANNED");
        assert_eq!(out.outcome, ExtractionOutcome::Ocr { pages: 1 });
        let calls = ocr.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[("in/scan.TIFF".to_string(), Some("fra".to_string()))]);
    }

    #[test]
    fn ocr_failure_degrades_to_empty() {
        let ocr = Arc::new(RecordingOcr {
            fail: true,
            ..RecordingOcr::default()
        });
        let s = ImageStrategy::new(Some(ocr), &OcrSettings::default());
        let out = s.extract(&scan()).unwrap();
        assert_eq!(out.text, "");
        assert!(out.is_degraded());
    }
}
