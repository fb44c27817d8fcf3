//! Optical character recognition.
//!
//! Strategies only see the [`OcrEngine`] trait. The engine is constructed
//! once per run and shared through an `Arc`, so locating the native binary
//! happens a single time no matter how many images are recognised.

mod tesseract;

pub use tesseract::{RecognitionMode, TesseractEngine};

use crate::error::OcrError;
use std::path::Path;

/// Image → text.
pub trait OcrEngine: Send + Sync {
    /// Recognise the text in the image at `image`.
    ///
    /// `lang` defaults to [`crate::config::DEFAULT_OCR_LANG`]. Returns the
    /// trimmed text, or an empty string when nothing was recognised.
    fn image_to_text(&self, image: &Path, lang: Option<&str>) -> Result<String, OcrError>;
}
