use super::{extension_in, ExtractionStrategy};
use crate::error::Doc2TxtError;
use crate::item::FileItem;
use crate::output::Extraction;
use tracing::warn;

/// Plain-text family: the file content is the text.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextStrategy;

impl PlainTextStrategy {
    pub const EXTENSIONS: &'static [&'static str] = &["txt", "csv", "log", "md"];
}

impl ExtractionStrategy for PlainTextStrategy {
    fn name(&self) -> &'static str {
        "text"
    }

    fn matches(&self, extension: &str) -> bool {
        extension_in(extension, Self::EXTENSIONS)
    }

    /// Decode as UTF-8; invalid sequences become U+FFFD.
    fn extract(&self, item: &FileItem) -> Result<Extraction, Doc2TxtError> {
        match std::fs::read(item.local_path()) {
            Ok(bytes) => Ok(Extraction::native(
                String::from_utf8_lossy(&bytes).into_owned(),
            )),
            Err(e) => {
                let e = Doc2TxtError::SourceRead {
                    path: item.local_path().to_path_buf(),
                    detail: e.to_string(),
                };
                warn!("{}", e);
                Ok(Extraction::degraded("", e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::ExtractionOutcome;
    use tempfile::TempDir;

    fn item_for(path: &std::path::Path) -> FileItem {
        FileItem::from_path(path.parent().unwrap(), path).unwrap()
    }

    #[test]
    fn matches_declared_set_only() {
        let s = PlainTextStrategy;
        for ext in ["txt", "CSV", "Log", "md"] {
            assert!(s.matches(ext), "{ext}");
        }
        for ext in ["pdf", "docx", "text", "", "markdown"] {
            assert!(!s.matches(ext), "{ext}");
        }
    }

    #[test]
    fn reads_file_verbatim() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("notes.md");
        std::fs::write(&p, "# Title\n\nbody, with ünïcode\n").unwrap();
        let out = PlainTextStrategy.extract(&item_for(&p)).unwrap();
        assert_eq!(out.text, "# Title\n\nbody, with ünïcode\n");
        assert_eq!(out.outcome, ExtractionOutcome::Native);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("bad.txt");
        std::fs::write(&p, b"ok \xff\xfe end").unwrap();
        let out = PlainTextStrategy.extract(&item_for(&p)).unwrap();
        assert!(out.text.starts_with("ok "));
        assert!(out.text.ends_with(" end"));
        assert!(out.text.contains('\u{FFFD}'));
    }

    #[test]
    fn unreadable_file_degrades_to_empty() {
        let item = FileItem::new("gone", "gone", "txt", "/no/such/gone.txt", "");
        let out = PlainTextStrategy.extract(&item).unwrap();
        assert_eq!(out.text, "");
        assert!(out.is_degraded());
    }
}
