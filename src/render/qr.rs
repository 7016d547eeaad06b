//! # QR Matrix Generation and Rasterization
//!
//! Module matrices come from the `qrcode` crate, a conformant QR
//! implementation; encoding is not reimplemented here. This module owns
//! the geometry: picking the largest integer module scale that fits the
//! target rectangle, centering, and drawing dark modules as filled blocks
//! through the clipping canvas primitives.
//!
//! Every output pixel is routed through a caller-supplied coordinate
//! remap, so the same rasterizer serves normal and rotated canvases: the
//! identity for the common case, a rotation for panels composed on
//! swapped axes.

use qrcode::{EcLevel, QrCode};
use serde::{Deserialize, Serialize};

use crate::error::TintaError;
use crate::raster::MonoImage;

/// Quiet-zone width in modules around the symbol.
///
/// E-paper modules are large; the full four-module quiet zone of the
/// standard wastes scarce panel area, so the default is tighter and
/// callers can widen it.
pub const DEFAULT_MARGIN_MODULES: u32 = 2;

/// QR error-correction level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErrorLevel {
    /// ~7% recovery
    L,
    /// ~15% recovery
    #[default]
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery
    H,
}

impl ErrorLevel {
    fn to_ec_level(self) -> EcLevel {
        match self {
            ErrorLevel::L => EcLevel::L,
            ErrorLevel::M => EcLevel::M,
            ErrorLevel::Q => EcLevel::Q,
            ErrorLevel::H => EcLevel::H,
        }
    }
}

/// An immutable QR module matrix.
#[derive(Debug, Clone)]
pub struct QrMatrix {
    size: u32,
    modules: Vec<bool>,
}

impl QrMatrix {
    /// Encode `text` at the given error-correction level.
    ///
    /// Fails with `InvalidSettings` when the payload exceeds QR capacity;
    /// payload contents are caller/settings data, so that is their error.
    pub fn generate(text: &str, level: ErrorLevel) -> Result<Self, TintaError> {
        let code = QrCode::with_error_correction_level(text, level.to_ec_level())
            .map_err(|e| TintaError::InvalidSettings(format!("QR encoding failed: {}", e)))?;
        let size = code.width();
        let mut modules = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                modules.push(code[(x, y)] == qrcode::Color::Dark);
            }
        }
        Ok(Self {
            size: size as u32,
            modules,
        })
    }

    /// Modules per side.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Whether the module at `(x, y)` is dark. Out-of-range is light.
    pub fn is_dark(&self, x: u32, y: u32) -> bool {
        if x >= self.size || y >= self.size {
            return false;
        }
        self.modules[(y * self.size + x) as usize]
    }
}

/// Target rectangle for [`draw`].
#[derive(Debug, Clone, Copy)]
pub struct QrPlacement {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// Quiet zone in modules, scaled with the symbol.
    pub margin_modules: u32,
}

impl QrPlacement {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            margin_modules: DEFAULT_MARGIN_MODULES,
        }
    }
}

/// Rasterize a matrix into `canvas`, centered in the placement rect.
///
/// Scale is the largest integer such that
/// `(size + 2 * margin_modules) * scale` fits both axes, floored at 1 so a
/// too-small rect degrades to clipping instead of disappearing; the canvas
/// primitives absorb anything that lands outside. `remap` is applied to
/// every output pixel.
pub fn draw<F>(canvas: &mut MonoImage, matrix: &QrMatrix, placement: QrPlacement, remap: F)
where
    F: Fn(i32, i32) -> (i32, i32),
{
    let total_modules = matrix.size() + 2 * placement.margin_modules;
    let scale = (placement.width / total_modules)
        .min(placement.height / total_modules)
        .max(1);

    // Center the full symbol (quiet zone included), then step inside it
    let total_px = total_modules * scale;
    let origin_x =
        placement.x + (placement.width as i32 - total_px as i32) / 2 + (placement.margin_modules * scale) as i32;
    let origin_y =
        placement.y + (placement.height as i32 - total_px as i32) / 2 + (placement.margin_modules * scale) as i32;

    for my in 0..matrix.size() {
        for mx in 0..matrix.size() {
            if !matrix.is_dark(mx, my) {
                continue;
            }
            let block_x = origin_x + (mx * scale) as i32;
            let block_y = origin_y + (my * scale) as i32;
            for dy in 0..scale as i32 {
                for dx in 0..scale as i32 {
                    let (px, py) = remap(block_x + dx, block_y + dy);
                    canvas.set_pixel(px, py, true);
                }
            }
        }
    }
}

/// Identity remap for the common, unrotated case.
pub fn no_remap(x: i32, y: i32) -> (i32, i32) {
    (x, y)
}
