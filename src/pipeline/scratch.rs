//! Per-page scratch images handed to the OCR engine.
//!
//! The OCR engine reads images from disk, so each preprocessed page is
//! written to a uniquely named PNG, recognised, and deleted before the next
//! page is rendered to disk. The name is unique per call, so two pipelines
//! sharing a scratch directory never collide. The file is also removed on
//! drop, which covers every early-return and error path.

use crate::error::Doc2TxtError;
use image::{DynamicImage, GrayImage, ImageFormat};
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

const PREFIX: &str = ".doc2txt-page-";

/// A PNG on disk that lives exactly as long as this value.
pub struct ScratchImage {
    file: NamedTempFile,
}

impl ScratchImage {
    /// Encode `image` as PNG into a fresh file inside `dir`.
    pub fn write(dir: &Path, image: &GrayImage) -> Result<Self, Doc2TxtError> {
        let scratch_err = |detail: String| Doc2TxtError::ScratchWrite {
            dir: dir.to_path_buf(),
            detail,
        };

        let mut file = tempfile::Builder::new()
            .prefix(PREFIX)
            .suffix(".png")
            .tempfile_in(dir)
            .map_err(|e| scratch_err(e.to_string()))?;

        {
            let mut writer = BufWriter::new(file.as_file_mut());
            DynamicImage::ImageLuma8(image.clone())
                .write_to(&mut writer, ImageFormat::Png)
                .map_err(|e| scratch_err(e.to_string()))?;
            writer.flush().map_err(|e| scratch_err(e.to_string()))?;
        }

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the file now, reporting failures instead of ignoring them.
    pub fn remove(self) -> std::io::Result<()> {
        self.file.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn written_png_is_readable_then_removed() {
        let dir = TempDir::new().unwrap();
        let img = GrayImage::from_pixel(8, 4, Luma([255]));

        let scratch = ScratchImage::write(dir.path(), &img).unwrap();
        let path = scratch.path().to_path_buf();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with(PREFIX));
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 4));

        scratch.remove().unwrap();
        assert!(!path.exists());
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn dropped_without_remove_is_deleted() {
        let dir = TempDir::new().unwrap();
        let img = GrayImage::new(2, 2);
        {
            let _scratch = ScratchImage::write(dir.path(), &img).unwrap();
            assert_eq!(entries(dir.path()), 1);
        }
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn names_are_unique_per_call() {
        let dir = TempDir::new().unwrap();
        let img = GrayImage::new(2, 2);
        let a = ScratchImage::write(dir.path(), &img).unwrap();
        let b = ScratchImage::write(dir.path(), &img).unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn missing_directory_is_a_scratch_error() {
        let img = GrayImage::new(2, 2);
        let err = ScratchImage::write(Path::new("/no/such/scratch/dir"), &img).err().unwrap();
        assert!(matches!(err, Doc2TxtError::ScratchWrite { .. }));
    }
}
