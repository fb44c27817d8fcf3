//! Image preprocessing applied to rendered PDF pages before OCR.
//!
//! Scanned pages tend to be grey, low-contrast and speckled. Tesseract does
//! markedly better on large, clean, pure black-on-white glyphs, so every page
//! goes through five steps, in this order:
//!
//! 1. grayscale (single channel)
//! 2. 2× upscale with Catmull-Rom (bicubic) interpolation, so small fonts
//!    reach a recognisable glyph height
//! 3. contrast normalisation: stretch the darkest pixel to 0 and the
//!    brightest to 255
//! 4. 3×3 median filter to remove salt-and-pepper noise
//! 5. binarisation: luminance > 180 → white, otherwise black

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};

/// Luminance threshold for binarisation; values above become white.
pub const BINARIZE_THRESHOLD: u8 = 180;

/// Linear upscale factor applied before filtering.
pub const UPSCALE_FACTOR: u32 = 2;

/// Run the full preprocessing pipeline on one page.
pub fn prepare_for_ocr(page: &DynamicImage) -> GrayImage {
    let gray = page.to_luma8();
    let upscaled = upscale(&gray, UPSCALE_FACTOR);
    let stretched = normalize_contrast(&upscaled);
    let denoised = median_filter_3x3(&stretched);
    binarize(&denoised, BINARIZE_THRESHOLD)
}

fn upscale(img: &GrayImage, factor: u32) -> GrayImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return img.clone();
    }
    imageops::resize(img, w * factor, h * factor, FilterType::CatmullRom)
}

/// Linearly map `[min, max]` luminance onto `[0, 255]`.
pub fn normalize_contrast(img: &GrayImage) -> GrayImage {
    let (lo, hi) = img
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));
    if hi <= lo {
        return img.clone();
    }
    let range = u32::from(hi - lo);
    let mut out = img.clone();
    for p in out.pixels_mut() {
        let v = u32::from(p[0] - lo) * 255 / range;
        p[0] = v as u8;
    }
    out
}

/// 3×3 median filter; borders replicate the edge pixels.
pub fn median_filter_3x3(img: &GrayImage) -> GrayImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return img.clone();
    }
    let mut out = GrayImage::new(w, h);
    let mut window = [0u8; 9];
    for y in 0..h {
        for x in 0..w {
            let mut i = 0;
            for dy in [-1i64, 0, 1] {
                for dx in [-1i64, 0, 1] {
                    let sx = (x as i64 + dx).clamp(0, w as i64 - 1) as u32;
                    let sy = (y as i64 + dy).clamp(0, h as i64 - 1) as u32;
                    window[i] = img.get_pixel(sx, sy)[0];
                    i += 1;
                }
            }
            window.sort_unstable();
            out.put_pixel(x, y, Luma([window[4]]));
        }
    }
    out
}

/// Map luminance strictly above `threshold` to 255 and everything else to 0.
pub fn binarize(img: &GrayImage, threshold: u8) -> GrayImage {
    let mut out = img.clone();
    for p in out.pixels_mut() {
        p[0] = if p[0] > threshold { 255 } else { 0 };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn output_is_doubled_and_binary() {
        let mut page = RgbImage::from_pixel(20, 10, Rgb([230, 230, 230]));
        for x in 5..15 {
            page.put_pixel(x, 5, Rgb([20, 20, 20]));
        }
        let out = prepare_for_ocr(&DynamicImage::ImageRgb8(page));
        assert_eq!(out.dimensions(), (40, 20));
        assert!(out.pixels().all(|p| p[0] == 0 || p[0] == 255));
        // background stays white, the stroke survives as black
        assert_eq!(out.get_pixel(0, 0)[0], 255);
        assert!(out.pixels().any(|p| p[0] == 0));
    }

    #[test]
    fn contrast_is_stretched_to_full_range() {
        let mut img = GrayImage::from_pixel(4, 1, Luma([100]));
        img.put_pixel(0, 0, Luma([50]));
        img.put_pixel(3, 0, Luma([150]));
        let out = normalize_contrast(&img);
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert_eq!(out.get_pixel(1, 0)[0], 127);
        assert_eq!(out.get_pixel(3, 0)[0], 255);
    }

    #[test]
    fn flat_image_is_left_alone() {
        let img = GrayImage::from_pixel(3, 3, Luma([90]));
        assert_eq!(normalize_contrast(&img), img);
    }

    #[test]
    fn median_removes_isolated_speck() {
        let mut img = GrayImage::from_pixel(5, 5, Luma([255]));
        img.put_pixel(2, 2, Luma([0]));
        let out = median_filter_3x3(&img);
        assert!(out.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn median_keeps_solid_regions() {
        let mut img = GrayImage::from_pixel(6, 6, Luma([255]));
        for y in 0..6 {
            for x in 0..3 {
                img.put_pixel(x, y, Luma([0]));
            }
        }
        let out = median_filter_3x3(&img);
        assert_eq!(out.get_pixel(0, 3)[0], 0);
        assert_eq!(out.get_pixel(5, 3)[0], 255);
    }

    #[test]
    fn threshold_boundary_goes_black() {
        let mut img = GrayImage::new(3, 1);
        img.put_pixel(0, 0, Luma([179]));
        img.put_pixel(1, 0, Luma([180]));
        img.put_pixel(2, 0, Luma([181]));
        let out = binarize(&img, BINARIZE_THRESHOLD);
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert_eq!(out.get_pixel(1, 0)[0], 0);
        assert_eq!(out.get_pixel(2, 0)[0], 255);
    }

    #[test]
    fn empty_image_does_not_panic() {
        let out = prepare_for_ocr(&DynamicImage::ImageLuma8(GrayImage::new(0, 0)));
        assert_eq!(out.dimensions(), (0, 0));
    }
}
