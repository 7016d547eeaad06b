//! # Text Rasterizer
//!
//! Measures and draws glyph runs, with greedy word-wrap against a pixel
//! budget.
//!
//! Drawing into a packed canvas goes through a temporary grayscale
//! surface: glyph coverage accumulates there, and any sample at or above
//! the alpha threshold (default 64/255) counts as ink. Drawing into a
//! [`GraySurface`] keeps the anti-aliased coverage so the dithering engine
//! can decide later; that is the path declarative widget output takes.
//!
//! Wrapping shrinks the font size in integer steps down to a minimum
//! until the block fits its line budget; a block that still overflows at
//! the minimum loses its excess lines (e-paper cannot scroll).

use crate::raster::MonoImage;
use crate::render::GraySurface;
use crate::render::fonts::{FontStore, FontWeight, LineMetrics};

/// Coverage at or above this counts as ink when drawing into a packed
/// canvas. Hand-tuned default, see `DitherConfig` for its sibling.
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 64;

/// Size and weight of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub px: u32,
    pub weight: FontWeight,
}

impl TextStyle {
    pub fn regular(px: u32) -> Self {
        Self {
            px,
            weight: FontWeight::Regular,
        }
    }

    pub fn bold(px: u32) -> Self {
        Self {
            px,
            weight: FontWeight::Bold,
        }
    }
}

/// One laid-out line carrying its own style, so a block can mix a large
/// headline with smaller body lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    pub text: String,
    pub style: TextStyle,
}

impl StyledLine {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Horizontal alignment of lines within a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Measure one line: advance width plus vertical metrics.
pub fn measure_line(text: &str, style: TextStyle) -> (u32, LineMetrics) {
    let store = FontStore::global();
    (
        store.measure(text, style.px, style.weight),
        store.metrics(style.px, style.weight),
    )
}

/// Greedy word-wrap of `text` into at most `max_lines` lines of at most
/// `max_width` pixels, shrinking from `style.px` down to `min_px` in
/// integer steps until the block fits. Returns the styled lines at the
/// size that fit (or the truncated minimum-size layout).
pub fn wrap(
    text: &str,
    style: TextStyle,
    max_width: u32,
    max_lines: usize,
    min_px: u32,
) -> Vec<StyledLine> {
    let min_px = min_px.min(style.px).max(1);
    let mut px = style.px.max(1);
    let mut lines;
    loop {
        lines = wrap_at(text, px, style.weight, max_width);
        if lines.len() <= max_lines || px <= min_px {
            break;
        }
        px -= 1;
    }
    lines.truncate(max_lines);

    let chosen = TextStyle {
        px,
        weight: style.weight,
    };
    lines
        .into_iter()
        .map(|text| StyledLine::new(text, chosen))
        .collect()
}

/// One greedy pass at a fixed size. Words longer than the budget are
/// broken by character so a single token cannot overflow the canvas.
fn wrap_at(text: &str, px: u32, weight: FontWeight, max_width: u32) -> Vec<String> {
    let store = FontStore::global();
    let fits = |s: &str| store.measure(s, px, weight) <= max_width;

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if fits(&candidate) {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if fits(word) {
            current = word.to_string();
            continue;
        }
        // Oversized word: hard-break by characters
        for ch in word.chars() {
            let mut candidate = current.clone();
            candidate.push(ch);
            if fits(&candidate) || current.is_empty() {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Draw one line into a packed canvas with its baseline at
/// `(x, baseline)`. Coverage below `alpha_threshold` is discarded.
pub fn draw_line_into(
    canvas: &mut MonoImage,
    x: i32,
    baseline: i32,
    line: &StyledLine,
    alpha_threshold: u8,
) {
    let (width, metrics) = measure_line(&line.text, line.style);
    if width == 0 {
        return;
    }
    // Temporary coverage surface, thresholded into the canvas
    let mut surface = GraySurface::new(width, metrics.line_height());
    FontStore::global().draw_line(
        &mut surface,
        0,
        metrics.ascent as i32,
        &line.text,
        line.style.px,
        line.style.weight,
    );

    let top = baseline - metrics.ascent as i32;
    for sy in 0..surface.height() as i32 {
        for sx in 0..surface.width() as i32 {
            if surface.get(sx, sy) >= alpha_threshold {
                canvas.set_pixel(x + sx, top + sy, true);
            }
        }
    }
}

/// Total height of a block of styled lines.
pub fn block_height(lines: &[StyledLine]) -> u32 {
    lines
        .iter()
        .map(|line| {
            FontStore::global()
                .metrics(line.style.px, line.style.weight)
                .line_height()
        })
        .sum()
}

/// Draw a block of lines into a gray surface, stacked top to bottom
/// starting at `y`, aligned within `[x, x + width)`. Returns the height
/// consumed.
pub fn draw_block(
    surface: &mut GraySurface,
    x: i32,
    y: i32,
    width: u32,
    lines: &[StyledLine],
    align: HAlign,
) -> u32 {
    let store = FontStore::global();
    let mut cursor = y;
    for line in lines {
        let advance = store.measure(&line.text, line.style.px, line.style.weight);
        let metrics = store.metrics(line.style.px, line.style.weight);
        let offset = match align {
            HAlign::Left => 0,
            HAlign::Center => (width.saturating_sub(advance) / 2) as i32,
            HAlign::Right => width.saturating_sub(advance) as i32,
        };
        store.draw_line(
            surface,
            x + offset,
            cursor + metrics.ascent as i32,
            &line.text,
            line.style.px,
            line.style.weight,
        );
        cursor += metrics.line_height() as i32;
    }
    (cursor - y) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_nonzero_for_text() {
        let (width, metrics) = measure_line("Hello", TextStyle::regular(24));
        assert!(width > 0);
        assert!(metrics.line_height() > 0);
    }

    #[test]
    fn test_wrap_respects_width() {
        let style = TextStyle::regular(16);
        let lines = wrap("the quick brown fox jumps over the lazy dog", style, 120, 10, 12);
        assert!(lines.len() > 1);
        for line in &lines {
            let (width, _) = measure_line(&line.text, line.style);
            assert!(width <= 120, "line '{}' is {}px", line.text, width);
        }
    }

    #[test]
    fn test_wrap_shrinks_to_fit_line_budget() {
        let style = TextStyle::regular(24);
        // Budget of 2 lines forces a smaller size than 24px
        let lines = wrap(
            "a reasonably long message that will not fit two big lines",
            style,
            160,
            2,
            12,
        );
        assert!(lines.len() <= 2);
        assert!(lines[0].style.px < 24);
        assert!(lines[0].style.px >= 12);
    }

    #[test]
    fn test_wrap_truncates_at_min_px() {
        let style = TextStyle::regular(13);
        let text = "word ".repeat(200);
        let lines = wrap(&text, style, 60, 3, 12);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].style.px, 12);
    }

    #[test]
    fn test_wrap_breaks_oversized_word() {
        let style = TextStyle::regular(16);
        let lines = wrap("abcdefghijklmnopqrstuvwxyz", style, 48, 20, 16);
        assert!(lines.len() > 1);
        for line in &lines {
            let (width, _) = measure_line(&line.text, line.style);
            assert!(width <= 48);
        }
    }

    #[test]
    fn test_wrap_empty_text_single_empty_line() {
        let lines = wrap("", TextStyle::regular(16), 100, 3, 12);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "");
    }

    #[test]
    fn test_draw_line_thresholds_into_canvas() {
        let mut canvas = MonoImage::new(200, 40);
        let line = StyledLine::new("ink", TextStyle::regular(24));
        draw_line_into(&mut canvas, 2, 30, &line, DEFAULT_ALPHA_THRESHOLD);
        assert!(canvas.ink_count() > 0);
    }

    #[test]
    fn test_draw_line_off_canvas_absorbed() {
        let mut canvas = MonoImage::new(8, 8);
        let line = StyledLine::new("way too long for this canvas", TextStyle::regular(24));
        draw_line_into(&mut canvas, -500, -500, &line, DEFAULT_ALPHA_THRESHOLD);
        // Nothing lands, nothing panics
        assert_eq!(canvas.ink_count(), 0);
    }

    #[test]
    fn test_block_mixes_styles_per_line() {
        let lines = vec![
            StyledLine::new("HEADLINE", TextStyle::bold(32)),
            StyledLine::new("body text", TextStyle::regular(16)),
        ];
        let expected = block_height(&lines);
        let mut surface = GraySurface::new(300, 100);
        let consumed = draw_block(&mut surface, 0, 0, 300, &lines, HAlign::Left);
        assert_eq!(consumed, expected);
        assert!(surface.samples().iter().any(|&v| v > 0));
    }

    #[test]
    fn test_block_center_alignment_indents() {
        let lines = vec![StyledLine::new("x", TextStyle::regular(16))];
        let mut surface = GraySurface::new(100, 20);
        draw_block(&mut surface, 0, 0, 100, &lines, HAlign::Center);
        // Leftmost columns stay empty when a 1-glyph line is centered in 100px
        let mut leftmost_ink = None;
        'scan: for x in 0..100 {
            for y in 0..20 {
                if surface.get(x, y) > 0 {
                    leftmost_ink = Some(x);
                    break 'scan;
                }
            }
        }
        assert!(leftmost_ink.unwrap_or(0) > 10);
    }
}
