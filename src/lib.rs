//! # edgequake-doc2txt
//!
//! Convert a directory of mixed documents into plain-text files.
//!
//! Each input file is routed by extension to an extraction strategy. PDFs
//! use their embedded text layer when it has any text. Scanned PDFs with a
//! blank text layer fall back to OCR: every page is rendered, cleaned up
//! for recognition and passed to the OCR engine. One `.txt` is written per
//! input, mirroring the input directory structure under the output root.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input dir
//!  │
//!  ├─ 1. Discover  walk the tree, one FileItem per regular file
//!  ├─ 2. Route     extension → strategy (text, docx, image, pdf, fallback)
//!  ├─ 3. Extract   native text, or render → preprocess → scratch PNG → OCR
//!  └─ 4. Write     <output>/<relative dir>/<name>.txt (atomic)
//! ```
//!
//! Missing native engines are probed once at startup (see [`Capabilities`]);
//! they degrade a run to "no OCR" instead of failing it. A failing item is
//! logged and recorded in the [`RunReport`]; the run continues.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_doc2txt::{build_pipeline, ExtractionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::builder().ocr_enabled(true).build()?;
//!     let report = build_pipeline(&config, "out").run("docs");
//!     eprintln!(
//!         "{} of {} written, {} via OCR",
//!         report.stats.written_items, report.stats.total_items, report.stats.ocr_items
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `doc2txt` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! edgequake-doc2txt = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod capability;
pub mod config;
pub mod convert;
pub mod error;
pub mod item;
pub mod ocr;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod provider;
pub mod strategy;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use capability::{Capabilities, Capability};
pub use config::{ExtractionConfig, ExtractionConfigBuilder, OcrSettings};
pub use convert::{build_pipeline, output_path, write_output, Pipeline};
pub use error::{Doc2TxtError, ItemError, OcrError, RasterError};
pub use item::FileItem;
pub use ocr::{OcrEngine, RecognitionMode, TesseractEngine};
pub use output::{Extraction, ExtractionOutcome, ItemResult, RunReport, RunStats};
pub use pipeline::render::{PageRasterizer, PdfiumRasterizer};
pub use progress::{NoopProgressCallback, ProgressCallback, RunProgressCallback};
pub use provider::{FileProvider, LocalFileProvider};
pub use strategy::{
    DocxStrategy, ExtractionStrategy, FallbackStrategy, ImageStrategy, PdfStrategy,
    PlainTextStrategy, StrategyRegistry,
};
