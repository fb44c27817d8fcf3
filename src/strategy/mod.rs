//! Extraction strategies: one per file-type family.
//!
//! | extensions                  | strategy            |
//! |-----------------------------|---------------------|
//! | txt, csv, log, md           | [`PlainTextStrategy`] |
//! | docx                        | [`DocxStrategy`]      |
//! | png, jpg, jpeg, tiff, bmp   | [`ImageStrategy`]     |
//! | pdf                         | [`PdfStrategy`]       |
//! | anything else               | [`FallbackStrategy`]  |
//!
//! Strategies are resolved through a [`StrategyRegistry`], which always
//! keeps the catch-all last.

mod docx;
mod fallback;
mod image;
mod pdf;
mod registry;
mod text;

pub use self::docx::DocxStrategy;
pub use self::fallback::FallbackStrategy;
pub use self::image::ImageStrategy;
pub use self::pdf::PdfStrategy;
pub use self::registry::StrategyRegistry;
pub use self::text::PlainTextStrategy;

use crate::error::Doc2TxtError;
use crate::item::FileItem;
use crate::output::Extraction;

/// A type-specific text-extraction handler selected by file extension.
pub trait ExtractionStrategy: Send + Sync {
    /// Short name used in logs and run reports.
    fn name(&self) -> &'static str;

    /// Whether this strategy handles `extension` (no dot, any case).
    fn matches(&self, extension: &str) -> bool;

    /// Extract the text of `item`.
    ///
    /// Missing tooling and unreadable sources are reported through
    /// [`Extraction::outcome`], not as errors. `Err` means the item failed.
    fn extract(&self, item: &FileItem) -> Result<Extraction, Doc2TxtError>;
}

/// Case-insensitive membership test shared by the built-in strategies.
fn extension_in(extension: &str, set: &[&str]) -> bool {
    let ext = extension.trim_start_matches('.');
    set.iter().any(|candidate| candidate.eq_ignore_ascii_case(ext))
}
