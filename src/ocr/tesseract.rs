//! Tesseract-backed [`OcrEngine`].
//!
//! Tesseract is driven as a child process (`tesseract <img> stdout -l <lang>
//! --oem 3 --psm N`). Each image is tried with the configured recognition
//! modes in order and the first non-blank result wins: block segmentation
//! copes with column layouts that confuse automatic page segmentation, and
//! vice versa.

use super::OcrEngine;
use crate::config::DEFAULT_OCR_LANG;
use crate::error::OcrError;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// A tesseract page-segmentation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognitionMode {
    /// `--psm 6`: treat the image as one uniform block of text.
    SingleBlock,
    /// `--psm 3`: fully automatic page segmentation.
    FullPage,
}

impl RecognitionMode {
    /// Order in which modes are tried.
    pub const DEFAULT_ORDER: [RecognitionMode; 2] =
        [RecognitionMode::SingleBlock, RecognitionMode::FullPage];

    pub fn name(self) -> &'static str {
        match self {
            RecognitionMode::SingleBlock => "psm 6",
            RecognitionMode::FullPage => "psm 3",
        }
    }

    fn args(self) -> [&'static str; 4] {
        match self {
            RecognitionMode::SingleBlock => ["--oem", "3", "--psm", "6"],
            RecognitionMode::FullPage => ["--oem", "3", "--psm", "3"],
        }
    }
}

/// OCR engine that shells out to a tesseract binary.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
}

impl TesseractEngine {
    /// Locate tesseract and verify it runs.
    ///
    /// `binary` overrides the `tesseract` found on `PATH`. Fails with
    /// [`OcrError::BinaryNotFound`] when the binary cannot be started or
    /// does not answer `--version`; callers treat that as "OCR disabled".
    pub fn new(binary: Option<&Path>) -> Result<Self, OcrError> {
        let binary = binary
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("tesseract"));

        let output = Command::new(&binary)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| OcrError::BinaryNotFound {
                binary: binary.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(OcrError::BinaryNotFound {
                binary,
                reason: format!("`--version` exited with {}", output.status),
            });
        }

        // tesseract 4 prints its version on stderr, 5 on stdout
        let banner = if output.stdout.is_empty() {
            &output.stderr
        } else {
            &output.stdout
        };
        let version = String::from_utf8_lossy(banner)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
        info!("OCR engine ready: {} ({})", binary.display(), version);

        Ok(Self { binary })
    }

    fn run_mode(&self, image: &Path, lang: &str, mode: RecognitionMode) -> Result<String, OcrError> {
        let output = Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(lang)
            .args(mode.args())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| OcrError::Spawn {
                binary: self.binary.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(OcrError::Failed {
                mode: mode.name(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl OcrEngine for TesseractEngine {
    fn image_to_text(&self, image: &Path, lang: Option<&str>) -> Result<String, OcrError> {
        let lang = lang.unwrap_or(DEFAULT_OCR_LANG);
        let mut last_err = None;
        let mut any_ran = false;

        for mode in RecognitionMode::DEFAULT_ORDER {
            match self.run_mode(image, lang, mode) {
                Ok(text) if !text.is_empty() => {
                    debug!(
                        "OCR {} → {} chars with {}",
                        image.display(),
                        text.len(),
                        mode.name()
                    );
                    return Ok(text);
                }
                Ok(_) => {
                    any_ran = true;
                    debug!("OCR {} blank with {}", image.display(), mode.name());
                }
                Err(e) => {
                    warn!("OCR {} failed with {}: {}", image.display(), mode.name(), e);
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(e) if !any_ran => Err(e),
            _ => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_reported() {
        let err = TesseractEngine::new(Some(Path::new("/definitely/not/tesseract"))).unwrap_err();
        assert!(matches!(err, OcrError::BinaryNotFound { .. }), "got {err:?}");
    }

    #[test]
    fn block_mode_is_tried_first() {
        assert_eq!(
            RecognitionMode::DEFAULT_ORDER,
            [RecognitionMode::SingleBlock, RecognitionMode::FullPage]
        );
        assert_eq!(RecognitionMode::SingleBlock.args()[3], "6");
        assert_eq!(RecognitionMode::FullPage.args()[3], "3");
    }

    #[cfg(unix)]
    mod fake_binary {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        /// Write an executable shell script standing in for tesseract.
        ///
        /// Arguments arrive as `<image> stdout -l <lang> --oem 3 --psm <N>`.
        fn fake_tesseract(dir: &TempDir, body: &str) -> PathBuf {
            let path = dir.path().join("tesseract");
            let script = format!(
                "#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then echo 'tesseract 5.3.0'; exit 0; fi\n{body}\n"
            );
            std::fs::write(&path, script).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn image(dir: &TempDir) -> PathBuf {
            let p = dir.path().join("page.png");
            std::fs::write(&p, b"not really a png").unwrap();
            p
        }

        #[test]
        fn falls_back_to_full_page_when_block_is_blank() {
            let dir = TempDir::new().unwrap();
            let bin = fake_tesseract(
                &dir,
                "if [ \"$8\" = \"6\" ]; then printf '   \\n'; exit 0; fi\nprintf '  ABC\\n'",
            );
            let engine = TesseractEngine::new(Some(&bin)).unwrap();
            let text = engine.image_to_text(&image(&dir), None).unwrap();
            assert_eq!(text, "ABC");
        }

        #[test]
        fn first_non_blank_mode_wins() {
            let dir = TempDir::new().unwrap();
            let bin = fake_tesseract(&dir, "echo \"mode $8\"");
            let engine = TesseractEngine::new(Some(&bin)).unwrap();
            assert_eq!(engine.image_to_text(&image(&dir), None).unwrap(), "mode 6");
        }

        #[test]
        fn language_is_passed_through() {
            let dir = TempDir::new().unwrap();
            let bin = fake_tesseract(&dir, "echo \"lang=$4\"");
            let engine = TesseractEngine::new(Some(&bin)).unwrap();
            let img = image(&dir);
            assert_eq!(engine.image_to_text(&img, Some("deu")).unwrap(), "lang=deu");
            assert_eq!(engine.image_to_text(&img, None).unwrap(), "lang=eng");
        }

        #[test]
        fn all_blank_is_empty_not_error() {
            let dir = TempDir::new().unwrap();
            let bin = fake_tesseract(&dir, "exit 0");
            let engine = TesseractEngine::new(Some(&bin)).unwrap();
            assert_eq!(engine.image_to_text(&image(&dir), None).unwrap(), "");
        }

        #[test]
        fn failing_mode_falls_through_to_next() {
            let dir = TempDir::new().unwrap();
            let bin = fake_tesseract(
                &dir,
                "if [ \"$8\" = \"6\" ]; then echo boom >&2; exit 1; fi\necho recovered",
            );
            let engine = TesseractEngine::new(Some(&bin)).unwrap();
            assert_eq!(engine.image_to_text(&image(&dir), None).unwrap(), "recovered");
        }

        #[test]
        fn every_mode_failing_is_an_error() {
            let dir = TempDir::new().unwrap();
            let bin = fake_tesseract(&dir, "echo 'cannot read image' >&2; exit 1");
            let engine = TesseractEngine::new(Some(&bin)).unwrap();
            let err = engine.image_to_text(&image(&dir), None).unwrap_err();
            match err {
                OcrError::Failed { mode, stderr, .. } => {
                    assert_eq!(mode, "psm 3");
                    assert!(stderr.contains("cannot read image"));
                }
                other => panic!("unexpected error {other:?}"),
            }
        }

        #[test]
        fn version_failure_means_not_found() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("tesseract");
            std::fs::write(&path, "#!/bin/sh\nexit 3\n").unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            let err = TesseractEngine::new(Some(&path)).unwrap_err();
            assert!(matches!(err, OcrError::BinaryNotFound { .. }));
        }
    }
}
