//! # Font Store
//!
//! Process-wide, read-only glyph source for the text rasterizer.
//!
//! Two backends:
//!
//! - **Spleen PSF2 bitmap fonts** (always available, bundled by the
//!   `spleen-font` crate): monospace cells at 6×12, 8×16 and 12×24,
//!   scaled up by integer factors to reach larger pixel sizes. Bold is
//!   double-struck one pixel to the right.
//! - **TTF via `ab_glyph`** (optional): proportional, anti-aliased
//!   coverage. Installed once at startup from caller-supplied bytes.
//!
//! The store is initialized exactly once and never mutated afterwards;
//! concurrent renders read it freely. Re-fetching or swapping fonts per
//! request is not supported by design.

use ab_glyph::{Font, FontArc, ScaleFont};
use spleen_font::{FONT_6X12, FONT_8X16, FONT_12X24, PSF2Font};
use std::sync::OnceLock;

use crate::error::TintaError;
use crate::render::GraySurface;

static STORE: OnceLock<FontStore> = OnceLock::new();

/// Logical font weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Vertical metrics for one line at a given pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMetrics {
    pub ascent: u32,
    pub descent: u32,
}

impl LineMetrics {
    pub fn line_height(&self) -> u32 {
        self.ascent + self.descent
    }
}

/// Bitmap faces bundled with the crate: (cell width, cell height, data).
const BITMAP_FACES: [(u32, u32, &[u8]); 3] = [
    (6, 12, FONT_6X12),
    (8, 16, FONT_8X16),
    (12, 24, FONT_12X24),
];

/// Process-wide font resource.
pub struct FontStore {
    ttf_regular: Option<FontArc>,
    ttf_bold: Option<FontArc>,
}

impl FontStore {
    /// The global store. Bitmap-only unless [`FontStore::install_ttf`]
    /// ran first.
    pub fn global() -> &'static FontStore {
        STORE.get_or_init(|| FontStore {
            ttf_regular: None,
            ttf_bold: None,
        })
    }

    /// Install TTF faces. Must run before the first render; fails if the
    /// store was already initialized or the bytes do not parse.
    pub fn install_ttf(regular: &[u8], bold: Option<&[u8]>) -> Result<(), TintaError> {
        let regular = FontArc::try_from_vec(regular.to_vec())
            .map_err(|e| TintaError::Font(format!("regular face: {}", e)))?;
        let bold = match bold {
            Some(bytes) => Some(
                FontArc::try_from_vec(bytes.to_vec())
                    .map_err(|e| TintaError::Font(format!("bold face: {}", e)))?,
            ),
            None => None,
        };
        STORE
            .set(FontStore {
                ttf_regular: Some(regular),
                ttf_bold: bold,
            })
            .map_err(|_| TintaError::Font("font store already initialized".into()))
    }

    fn ttf_for(&self, weight: FontWeight) -> Option<&FontArc> {
        match weight {
            FontWeight::Bold => self.ttf_bold.as_ref().or(self.ttf_regular.as_ref()),
            FontWeight::Regular => self.ttf_regular.as_ref(),
        }
    }

    /// Pick the bitmap face and integer scale for a pixel size: largest
    /// cell height not exceeding `px`, scaled as far as it fits.
    fn bitmap_face(px: u32) -> (u32, u32, &'static [u8], u32) {
        let px = px.max(BITMAP_FACES[0].1);
        let mut chosen = BITMAP_FACES[0];
        let mut scale = 1;
        for &(w, h, data) in &BITMAP_FACES {
            let s = px / h;
            if s >= 1 && h * s >= chosen.1 * scale {
                chosen = (w, h, data);
                scale = s;
            }
        }
        (chosen.0, chosen.1, chosen.2, scale)
    }

    /// Vertical metrics for a line of text at `px`.
    pub fn metrics(&self, px: u32, weight: FontWeight) -> LineMetrics {
        if let Some(font) = self.ttf_for(weight) {
            let scaled = font.as_scaled(px as f32);
            let ascent = scaled.ascent().ceil().max(0.0) as u32;
            let descent = (-scaled.descent()).ceil().max(0.0) as u32;
            return LineMetrics { ascent, descent };
        }
        let (_, cell_h, _, scale) = Self::bitmap_face(px);
        let height = cell_h * scale;
        // PSF cells reserve the bottom fifth for descenders
        let descent = height / 5;
        LineMetrics {
            ascent: height - descent,
            descent,
        }
    }

    /// Advance width of `text` on one line at `px`.
    pub fn measure(&self, text: &str, px: u32, weight: FontWeight) -> u32 {
        if let Some(font) = self.ttf_for(weight) {
            let scaled = font.as_scaled(px as f32);
            let mut advance = 0.0f32;
            for ch in text.chars() {
                advance += scaled.h_advance(font.glyph_id(ch));
            }
            return advance.ceil() as u32;
        }
        let (cell_w, _, _, scale) = Self::bitmap_face(px);
        text.chars().count() as u32 * cell_w * scale
    }

    /// Draw one line of text with its baseline at `(x, baseline)`,
    /// accumulating coverage into the surface. Returns the advance width.
    pub fn draw_line(
        &self,
        surface: &mut GraySurface,
        x: i32,
        baseline: i32,
        text: &str,
        px: u32,
        weight: FontWeight,
    ) -> u32 {
        if let Some(font) = self.ttf_for(weight) {
            return draw_ttf_line(font, surface, x, baseline, text, px);
        }
        draw_bitmap_line(surface, x, baseline, text, px, weight)
    }
}

fn draw_ttf_line(
    font: &FontArc,
    surface: &mut GraySurface,
    x: i32,
    baseline: i32,
    text: &str,
    px: u32,
) -> u32 {
    let scaled = font.as_scaled(px as f32);
    let mut caret = 0.0f32;

    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        let glyph = glyph_id.with_scale_and_position(
            px as f32,
            ab_glyph::point(x as f32 + caret, baseline as f32),
        );
        caret += scaled.h_advance(glyph_id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px_x = gx as i32 + bounds.min.x as i32;
                let px_y = gy as i32 + bounds.min.y as i32;
                surface.darken(px_x, px_y, (coverage.clamp(0.0, 1.0) * 255.0) as u8);
            });
        }
    }

    caret.ceil() as u32
}

fn draw_bitmap_line(
    surface: &mut GraySurface,
    x: i32,
    baseline: i32,
    text: &str,
    px: u32,
    weight: FontWeight,
) -> u32 {
    let (cell_w, cell_h, data, scale) = FontStore::bitmap_face(px);
    let height = cell_h * scale;
    let ascent = height - height / 5;
    let top = baseline - ascent as i32;
    let mut font = PSF2Font::new(data).unwrap();

    let mut caret = 0i32;
    for ch in text.chars() {
        let utf8 = ch.to_string();
        match font.glyph_for_utf8(utf8.as_bytes()) {
            Some(glyph) => {
                for (row_y, row) in glyph.enumerate() {
                    for (col_x, on) in row.enumerate() {
                        if !on || row_y >= cell_h as usize || col_x >= cell_w as usize {
                            continue;
                        }
                        let gx = x + caret + (col_x as u32 * scale) as i32;
                        let gy = top + (row_y as u32 * scale) as i32;
                        for dy in 0..scale as i32 {
                            for dx in 0..scale as i32 {
                                surface.set(gx + dx, gy + dy, 255);
                                if weight == FontWeight::Bold {
                                    surface.set(gx + dx + 1, gy + dy, 255);
                                }
                            }
                        }
                    }
                }
            }
            None => {
                // Unknown glyph: hollow box, same convention as the cell
                let w = (cell_w * scale) as i32;
                let h = (cell_h * scale) as i32;
                for gx in 0..w {
                    surface.set(x + caret + gx, top, 255);
                    surface.set(x + caret + gx, top + h - 1, 255);
                }
                for gy in 0..h {
                    surface.set(x + caret, top + gy, 255);
                    surface.set(x + caret + w - 1, top + gy, 255);
                }
            }
        }
        caret += (cell_w * scale) as i32;
    }

    caret as u32
}
