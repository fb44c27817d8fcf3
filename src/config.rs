//! Configuration types for document-to-text extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. The config is read once at startup;
//! the OCR settings derived from it are shared read-only by every strategy
//! for the lifetime of a run.

use crate::error::Doc2TxtError;
use std::path::PathBuf;

/// Language passed to the OCR engine when none is configured.
pub const DEFAULT_OCR_LANG: &str = "eng";

/// Rendering resolution for scanned PDF pages when none is configured.
pub const DEFAULT_OCR_DPI: u32 = 300;

const MIN_DPI: u32 = 72;
const MAX_DPI: u32 = 600;

/// Configuration for an extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_doc2txt::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .ocr_enabled(true)
///     .ocr_lang("deu")
///     .ocr_dpi(200)
///     .build()
///     .unwrap();
/// assert_eq!(config.ocr_lang(), "deu");
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Use OCR for images and for PDFs without a text layer. Default: false.
    pub ocr_enabled: bool,

    /// Explicit path to the tesseract binary. If None, `tesseract` is
    /// looked up on `PATH`.
    pub tesseract_cmd: Option<PathBuf>,

    /// Location of the native PDF page renderer: either the pdfium shared
    /// library itself or the directory that contains it. If None,
    /// `PDFIUM_LIB_PATH` and then the system loader path are tried.
    pub renderer_path: Option<PathBuf>,

    /// OCR language code, e.g. "eng", "deu", "eng+fra". None means
    /// [`DEFAULT_OCR_LANG`].
    pub ocr_lang: Option<String>,

    /// Rendering DPI for scanned PDF pages. Range: 72–600. Default: 300.
    ///
    /// Tesseract is tuned for glyphs roughly 20–30 px tall; 300 DPI puts
    /// 10-pt body text in that band before the 2× preprocessing upscale.
    pub ocr_dpi: u32,

    /// Directory for per-page scratch images. None means the system temp dir.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            ocr_enabled: false,
            tesseract_cmd: None,
            renderer_path: None,
            ocr_lang: None,
            ocr_dpi: DEFAULT_OCR_DPI,
            scratch_dir: None,
        }
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The effective OCR language.
    pub fn ocr_lang(&self) -> &str {
        self.ocr_lang.as_deref().unwrap_or(DEFAULT_OCR_LANG)
    }

    /// The read-only OCR settings shared by the image and PDF strategies.
    pub fn ocr_settings(&self) -> OcrSettings {
        OcrSettings {
            lang: self.ocr_lang().to_string(),
            dpi: self.ocr_dpi,
            scratch_dir: self
                .scratch_dir
                .clone()
                .unwrap_or_else(std::env::temp_dir),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn ocr_enabled(mut self, v: bool) -> Self {
        self.config.ocr_enabled = v;
        self
    }

    pub fn tesseract_cmd(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.tesseract_cmd = Some(path.into());
        self
    }

    pub fn renderer_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.renderer_path = Some(path.into());
        self
    }

    pub fn ocr_lang(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_lang = Some(lang.into());
        self
    }

    pub fn ocr_dpi(mut self, dpi: u32) -> Self {
        self.config.ocr_dpi = dpi.clamp(MIN_DPI, MAX_DPI);
        self
    }

    pub fn scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.scratch_dir = Some(dir.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, Doc2TxtError> {
        let c = &self.config;
        if c.ocr_dpi < MIN_DPI || c.ocr_dpi > MAX_DPI {
            return Err(Doc2TxtError::InvalidConfig(format!(
                "OCR DPI must be {MIN_DPI}–{MAX_DPI}, got {}",
                c.ocr_dpi
            )));
        }
        if let Some(lang) = &c.ocr_lang {
            let valid = !lang.is_empty()
                && lang
                    .split('+')
                    .all(|part| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_'));
            if !valid {
                return Err(Doc2TxtError::InvalidConfig(format!(
                    "OCR language must look like 'eng' or 'eng+fra', got '{lang}'"
                )));
            }
        }
        Ok(self.config)
    }
}

/// OCR parameters shared read-only by every strategy that performs OCR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrSettings {
    /// Language code handed to the engine.
    pub lang: String,
    /// Rasterisation resolution for PDF pages.
    pub dpi: u32,
    /// Where per-page scratch images are created.
    pub scratch_dir: PathBuf,
}

impl Default for OcrSettings {
    fn default() -> Self {
        ExtractionConfig::default().ocr_settings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = ExtractionConfig::default();
        assert!(!c.ocr_enabled);
        assert_eq!(c.ocr_dpi, 300);
        assert_eq!(c.ocr_lang(), "eng");
        assert_eq!(c.ocr_settings().scratch_dir, std::env::temp_dir());
    }

    #[test]
    fn dpi_is_clamped() {
        let c = ExtractionConfig::builder().ocr_dpi(10).build().unwrap();
        assert_eq!(c.ocr_dpi, 72);
        let c = ExtractionConfig::builder().ocr_dpi(10_000).build().unwrap();
        assert_eq!(c.ocr_dpi, 600);
    }

    #[test]
    fn accepts_combined_languages() {
        let c = ExtractionConfig::builder()
            .ocr_lang("eng+chi_sim")
            .build()
            .unwrap();
        assert_eq!(c.ocr_settings().lang, "eng+chi_sim");
    }

    #[test]
    fn rejects_malformed_language() {
        for bad in ["", "eng+", "en g", "-l eng"] {
            let err = ExtractionConfig::builder().ocr_lang(bad).build();
            assert!(err.is_err(), "'{bad}' should be rejected");
        }
    }

    #[test]
    fn scratch_dir_override() {
        let c = ExtractionConfig::builder()
            .scratch_dir("/var/tmp/ocr")
            .build()
            .unwrap();
        assert_eq!(c.ocr_settings().scratch_dir, PathBuf::from("/var/tmp/ocr"));
    }
}
