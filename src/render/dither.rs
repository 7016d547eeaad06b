//! # Atkinson Error Diffusion
//!
//! Converts a continuous-tone grayscale surface to binary output while
//! preserving perceived brightness.
//!
//! ## Error Diffusion
//!
//! Each pixel is classified black or white against a fixed threshold; the
//! quantization error (what the classification got wrong) is pushed onto
//! pixels that have not been visited yet, so neighboring classifications
//! compensate. Atkinson's kernel distributes six eighths of the error and
//! deliberately drops the remaining two, which keeps highlights clean on
//! reflective displays:
//!
//! ```text
//!          ●   1/8  1/8
//! 1/8  1/8  1/8
//!      1/8
//! ```
//!
//! (● = current pixel; first row continues right, rows below are y+1, y+2.)
//!
//! ## Gamma
//!
//! Before classification every sample is lifted through a power curve
//! (`v^(1/gamma)` on the normalized ink density, default gamma 1.8). Thin
//! dark strokes, anti-aliased text above all, would otherwise fall under
//! the threshold and vanish. Both constants are hand-tuned visual
//! defaults; they are configurable but not derived.
//!
//! Output is deterministic: the same sample array always produces the same
//! packed bits. There is no randomness anywhere in the pipeline.

use crate::raster::MonoImage;
use crate::render::GraySurface;

/// Classification threshold on the gamma-corrected 0–255 scale.
pub const THRESHOLD: u8 = 128;

/// Default gamma for the pre-classification power curve.
pub const DEFAULT_GAMMA: f32 = 1.8;

/// Tunable dithering parameters.
#[derive(Debug, Clone, Copy)]
pub struct DitherConfig {
    /// Gamma exponent; samples are raised to `1/gamma` before thresholding.
    pub gamma: f32,
}

impl Default for DitherConfig {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
        }
    }
}

/// Neighbor offsets receiving 1/8 of the quantization error each.
const KERNEL: [(i32, i32); 6] = [(1, 0), (2, 0), (-1, 1), (0, 1), (1, 1), (0, 2)];

/// Dither a grayscale surface to a packed monochrome image.
pub fn atkinson(src: &GraySurface, config: &DitherConfig) -> MonoImage {
    let width = src.width() as usize;
    let height = src.height() as usize;
    let mut out = MonoImage::new(src.width(), src.height());
    if width == 0 || height == 0 {
        return out;
    }

    // Gamma-correct into a float working buffer; errors diffuse in the
    // corrected space.
    let exponent = 1.0 / config.gamma;
    let mut work: Vec<f32> = src
        .samples()
        .iter()
        .map(|&v| 255.0 * (v as f32 / 255.0).powf(exponent))
        .collect();

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let value = work[idx];
            let ink = value >= THRESHOLD as f32;
            if ink {
                out.set_pixel(x as i32, y as i32, true);
            }

            let error = value - if ink { 255.0 } else { 0.0 };
            let share = error / 8.0;
            for &(dx, dy) in &KERNEL {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                // Error falling off the edges is lost, not wrapped
                if nx < 0 || nx >= width as i32 || ny >= height as i32 {
                    continue;
                }
                work[ny as usize * width + nx as usize] += share;
            }
        }
    }

    out
}

/// Threshold a surface without diffusion.
///
/// For surfaces that are already effectively binary (bitmap glyphs, QR
/// blocks routed through the gray path) diffusion would only smear edges.
pub fn threshold(src: &GraySurface, cutoff: u8) -> MonoImage {
    let mut out = MonoImage::new(src.width(), src.height());
    for y in 0..src.height() as i32 {
        for x in 0..src.width() as i32 {
            if src.get(x, y) >= cutoff {
                out.set_pixel(x, y, true);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(width: u32, height: u32, value: u8) -> GraySurface {
        GraySurface::from_samples(
            width,
            height,
            vec![value; width as usize * height as usize],
        )
        .unwrap()
    }

    #[test]
    fn test_white_stays_white() {
        let out = atkinson(&flat(32, 16, 0), &DitherConfig::default());
        assert_eq!(out.ink_count(), 0);
    }

    #[test]
    fn test_black_stays_black() {
        let out = atkinson(&flat(32, 16, 255), &DitherConfig::default());
        assert_eq!(out.ink_count(), 32 * 16);
    }

    #[test]
    fn test_deterministic_output() {
        let samples: Vec<u8> = (0..64u32 * 64)
            .map(|i| ((i * 7 + i / 64 * 13) % 256) as u8)
            .collect();
        let src = GraySurface::from_samples(64, 64, samples).unwrap();
        let a = atkinson(&src, &DitherConfig::default());
        let b = atkinson(&src, &DitherConfig::default());
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn test_midtone_density_roughly_preserved() {
        // Gamma 1.0 to keep the target density at face value
        let config = DitherConfig { gamma: 1.0 };
        let out = atkinson(&flat(64, 64, 128), &config);
        let density = out.ink_count() as f32 / (64.0 * 64.0);
        assert!(
            (density - 0.5).abs() < 0.15,
            "50% gray should dither to ~50% ink, got {}",
            density
        );
    }

    #[test]
    fn test_gamma_lifts_thin_strokes() {
        // Sample 100 falls below the raw threshold but survives gamma 1.8:
        // (100/255)^(1/1.8) * 255 ≈ 151 ≥ 128.
        let src = flat(1, 1, 100);
        let plain = atkinson(&src, &DitherConfig { gamma: 1.0 });
        assert_eq!(plain.ink_count(), 0);
        let corrected = atkinson(&src, &DitherConfig::default());
        assert_eq!(corrected.ink_count(), 1);
    }

    #[test]
    fn test_edge_error_lost_not_wrapped() {
        // Single dark pixel in the last column classifies black; its error
        // diffuses right off the edge and must be lost, not wrapped onto
        // the start of the next row.
        let mut src = GraySurface::new(4, 4);
        src.set(3, 0, 200);
        let out = atkinson(&src, &DitherConfig::default());
        assert!(out.get_pixel(3, 0));
        assert_eq!(out.ink_count(), 1);
        assert!(!out.get_pixel(0, 1));
    }

    #[test]
    fn test_threshold_plain() {
        let mut src = GraySurface::new(2, 1);
        src.set(0, 0, 64);
        src.set(1, 0, 63);
        let out = threshold(&src, 64);
        assert!(out.get_pixel(0, 0));
        assert!(!out.get_pixel(1, 0));
    }
}
