use super::{
    DocxStrategy, ExtractionStrategy, FallbackStrategy, ImageStrategy, PdfStrategy,
    PlainTextStrategy,
};
use crate::capability::Capabilities;
use crate::config::ExtractionConfig;
use tracing::debug;

/// Ordered strategy list with a catch-all that is always consulted last.
///
/// The first registered strategy whose `matches` accepts the extension wins.
/// Selection is total: an unknown extension resolves to [`FallbackStrategy`].
pub struct StrategyRegistry {
    specific: Vec<Box<dyn ExtractionStrategy>>,
    fallback: FallbackStrategy,
}

impl StrategyRegistry {
    /// A registry holding only the catch-all.
    pub fn new() -> Self {
        Self {
            specific: Vec::new(),
            fallback: FallbackStrategy,
        }
    }

    /// The built-in strategies, wired to the probed engines.
    pub fn with_defaults(caps: &Capabilities, config: &ExtractionConfig) -> Self {
        let settings = config.ocr_settings();
        let ocr = caps.ocr.available().cloned();

        let mut registry = Self::new();
        registry.register(PlainTextStrategy);
        registry.register(DocxStrategy);
        registry.register(ImageStrategy::new(ocr.clone(), &settings));
        registry.register(PdfStrategy::new(ocr, caps.rasterizer.clone(), settings));
        registry
    }

    /// Append a strategy. It is consulted after those already registered
    /// and before the catch-all.
    pub fn register(&mut self, strategy: impl ExtractionStrategy + 'static) -> &mut Self {
        debug!("Registered extraction strategy '{}'", strategy.name());
        self.specific.push(Box::new(strategy));
        self
    }

    /// The strategy responsible for `extension`.
    pub fn choose(&self, extension: &str) -> &dyn ExtractionStrategy {
        self.specific
            .iter()
            .find(|s| s.matches(extension))
            .map(|s| s.as_ref())
            .unwrap_or(&self.fallback)
    }

    /// Strategy names in consultation order, catch-all included.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.specific
            .iter()
            .map(|s| s.name())
            .chain(std::iter::once(self.fallback.name()))
            .collect()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Doc2TxtError;
    use crate::item::FileItem;
    use crate::output::Extraction;

    struct Named(&'static str, &'static [&'static str]);

    impl ExtractionStrategy for Named {
        fn name(&self) -> &'static str {
            self.0
        }
        fn matches(&self, extension: &str) -> bool {
            self.1.iter().any(|e| e.eq_ignore_ascii_case(extension))
        }
        fn extract(&self, _item: &FileItem) -> Result<Extraction, Doc2TxtError> {
            Ok(Extraction::native(self.0))
        }
    }

    fn defaults() -> StrategyRegistry {
        StrategyRegistry::with_defaults(&Capabilities::disabled(), &ExtractionConfig::default())
    }

    #[test]
    fn default_order_ends_with_fallback() {
        assert_eq!(
            defaults().strategy_names(),
            vec!["text", "docx", "image", "pdf", "fallback"]
        );
    }

    #[test]
    fn chooses_by_extension_case_insensitively() {
        let r = defaults();
        assert_eq!(r.choose("txt").name(), "text");
        assert_eq!(r.choose("DOCX").name(), "docx");
        assert_eq!(r.choose("Jpeg").name(), "image");
        assert_eq!(r.choose("pdf").name(), "pdf");
    }

    #[test]
    fn unknown_extension_resolves_to_fallback() {
        let r = defaults();
        for ext in ["xyz", "", "exe", "doc"] {
            assert_eq!(r.choose(ext).name(), "fallback", "{ext}");
        }
    }

    #[test]
    fn first_match_wins() {
        let mut r = StrategyRegistry::new();
        r.register(Named("first", &["dat"]))
            .register(Named("second", &["dat", "bin"]));
        assert_eq!(r.choose("dat").name(), "first");
        assert_eq!(r.choose("bin").name(), "second");
    }

    #[test]
    fn registered_strategies_precede_fallback() {
        let mut r = defaults();
        r.register(Named("rtf", &["rtf"]));
        assert_eq!(r.choose("rtf").name(), "rtf");
        assert_eq!(r.strategy_names().last(), Some(&"fallback"));
    }

    #[test]
    fn empty_registry_still_selects() {
        let r = StrategyRegistry::new();
        assert_eq!(r.choose("pdf").name(), "fallback");
    }
}
