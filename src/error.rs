//! Error types for the edgequake-doc2txt library.
//!
//! Two layers of failure exist, mirroring how a batch run degrades:
//!
//! * [`Doc2TxtError`]: an operation could not produce what was asked for
//!   (engine missing, source unreadable, output not writable). Returned as
//!   `Err` from strategies, engines and the output writer.
//!
//! * [`ItemError`]: the serialisable record the pipeline keeps when one
//!   item of a run fails. Stored inside [`crate::output::ItemResult`]; the
//!   run itself always continues with the next item.
//!
//! [`OcrError`] and [`RasterError`] are the engine-level errors of the two
//! native capabilities; both convert into [`Doc2TxtError`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while extracting or writing a single document.
#[derive(Debug, Error)]
pub enum Doc2TxtError {
    // ── Capability errors ─────────────────────────────────────────────────
    /// The OCR engine could not be initialised. Callers degrade to OCR-disabled.
    #[error("OCR engine unavailable: {reason}\nInstall tesseract or pass --tesseract-cmd <PATH>.")]
    OcrUnavailable { reason: String },

    /// An optional reader or renderer is not available in this environment.
    #[error("{dependency} is not available: {reason}")]
    DependencyMissing {
        dependency: &'static str,
        reason: String,
    },

    // ── Source errors ─────────────────────────────────────────────────────
    /// The source document is corrupt, encrypted or otherwise unreadable.
    #[error("Failed to read '{path}': {detail}")]
    SourceRead { path: PathBuf, detail: String },

    /// Page rasterisation failed.
    #[error(transparent)]
    Rasterization(#[from] RasterError),

    /// The OCR engine failed on an image.
    #[error(transparent)]
    Ocr(#[from] OcrError),

    /// A scratch image for the OCR engine could not be written.
    #[error("Failed to write scratch image in '{dir}': {detail}")]
    ScratchWrite { dir: PathBuf, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output text file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// A strategy reported a failure of its own.
    #[error("Strategy '{strategy}' failed: {detail}")]
    Strategy {
        strategy: &'static str,
        detail: String,
    },

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors from the OCR engine.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The OCR binary could not be located or did not answer `--version`.
    #[error("OCR binary '{binary}' not found: {reason}")]
    BinaryNotFound { binary: PathBuf, reason: String },

    /// The OCR process could not be started.
    #[error("Failed to run '{binary}': {source}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The OCR process ran but reported failure.
    #[error("OCR ({mode}) exited with {status}: {stderr}")]
    Failed {
        mode: &'static str,
        status: String,
        stderr: String,
    },
}

/// Errors from the PDF page rasteriser.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The native renderer library could not be located or bound.
    #[error(
        "PDF renderer unavailable: {reason}\n\
Pass --renderer-path <DIR|FILE> or set PDFIUM_LIB_PATH=/path/to/libpdfium."
    )]
    RendererUnavailable { reason: String },

    /// The renderer could not open the document.
    #[error("Renderer could not open '{path}': {detail}")]
    Load { path: PathBuf, detail: String },

    /// A single page could not be rendered.
    #[error("Rasterisation failed for page {page}: {detail}")]
    Page { page: usize, detail: String },
}

/// A non-fatal failure of one item in a run.
///
/// Stored alongside [`crate::output::ItemResult`]. The run continues with
/// the next item regardless.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemError {
    /// The strategy returned an error (or panicked) for this item.
    #[error("{item}: extraction with '{strategy}' failed: {detail}")]
    ExtractionFailed {
        item: String,
        strategy: String,
        detail: String,
    },

    /// Text was extracted but could not be written.
    #[error("{item}: writing '{path}' failed: {detail}")]
    WriteFailed {
        item: String,
        path: PathBuf,
        detail: String,
    },
}
