//! Stages of the scanned-PDF OCR fallback.
//!
//! Only PDFs without a native text layer take this path:
//!
//! ```text
//! render ──▶ preprocess ──▶ scratch ──▶ OCR engine
//! (pdfium)   (gray/2x/...)  (temp PNG)  (tesseract)
//! ```
//!
//! 1. [`render`]     — rasterise every page at the configured DPI
//! 2. [`preprocess`] — grayscale, upscale, normalise, denoise, binarise
//! 3. [`scratch`]    — write the page to a unique temp PNG and delete it
//!    as soon as the engine has read it

pub mod preprocess;
pub mod render;
pub mod scratch;
