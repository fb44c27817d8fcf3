use super::ExtractionStrategy;
use crate::error::Doc2TxtError;
use crate::item::FileItem;
use crate::output::Extraction;
use tracing::debug;

/// Catch-all for unrecognised file types: matches everything, extracts nothing.
///
/// Only [`super::StrategyRegistry`] holds one, and always consults it last.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackStrategy;

impl ExtractionStrategy for FallbackStrategy {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn matches(&self, _extension: &str) -> bool {
        true
    }

    fn extract(&self, item: &FileItem) -> Result<Extraction, Doc2TxtError> {
        debug!(
            "No extractor for '.{}'; writing empty text for {}",
            item.extension(),
            item.source()
        );
        Ok(Extraction::unsupported())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::ExtractionOutcome;

    #[test]
    fn matches_anything_and_returns_empty() {
        let s = FallbackStrategy;
        for ext in ["", "exe", "PDF", "tar.gz"] {
            assert!(s.matches(ext));
        }
        let item = FileItem::new("x.bin", "x", "bin", "/does/not/matter.bin", "");
        let out = s.extract(&item).unwrap();
        assert_eq!(out.text, "");
        assert_eq!(out.outcome, ExtractionOutcome::Unsupported);
    }
}
