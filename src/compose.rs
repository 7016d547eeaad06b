//! # Canvas Compositor
//!
//! Stitches slot-sized monochrome images into one full-canvas buffer.
//!
//! The canvas starts fully white; every black source pixel is OR'd into
//! its mapped destination. Black wins on overlap: no part can erase a
//! pixel another part drew. Destination coordinates outside the canvas
//! are silently dropped, so parts may hang off the edges.

use crate::raster::MonoImage;

/// One image placed at an offset on the target canvas.
#[derive(Debug, Clone)]
pub struct Placed {
    pub x: i32,
    pub y: i32,
    pub image: MonoImage,
}

impl Placed {
    pub fn new(x: i32, y: i32, image: MonoImage) -> Self {
        Self { x, y, image }
    }
}

/// Merge `parts` onto a white `width × height` canvas with OR semantics.
pub fn compose(width: u32, height: u32, parts: &[Placed]) -> MonoImage {
    let mut canvas = MonoImage::new(width, height);
    for part in parts {
        for sy in 0..part.image.height() as i32 {
            for sx in 0..part.image.width() as i32 {
                if part.image.get_pixel(sx, sy) {
                    canvas.set_pixel(part.x + sx, part.y + sy, true);
                }
            }
        }
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_black(width: u32, height: u32) -> MonoImage {
        let mut img = MonoImage::new(width, height);
        img.fill_rect(0, 0, width, height, true);
        img
    }

    #[test]
    fn test_overlap_black_wins() {
        // Black part then white part over the same 2x2 region: still black.
        // A white part contributes nothing, only set pixels are copied.
        let parts = [
            Placed::new(0, 0, all_black(2, 2)),
            Placed::new(0, 0, MonoImage::new(2, 2)),
        ];
        let canvas = compose(2, 2, &parts);
        assert_eq!(canvas.ink_count(), 4);

        // Same result with the white part first
        let parts = [
            Placed::new(0, 0, MonoImage::new(2, 2)),
            Placed::new(0, 0, all_black(2, 2)),
        ];
        let canvas = compose(2, 2, &parts);
        assert_eq!(canvas.ink_count(), 4);
    }

    #[test]
    fn test_offsets_map_to_destination() {
        let mut part = MonoImage::new(2, 2);
        part.set_pixel(0, 0, true);
        let canvas = compose(8, 8, &[Placed::new(3, 5, part)]);
        assert!(canvas.get_pixel(3, 5));
        assert_eq!(canvas.ink_count(), 1);
    }

    #[test]
    fn test_out_of_bounds_pixels_dropped() {
        let canvas = compose(4, 4, &[Placed::new(2, 2, all_black(4, 4))]);
        // Only the 2x2 in-bounds corner lands
        assert_eq!(canvas.ink_count(), 4);
        assert!(canvas.get_pixel(2, 2));
        assert!(canvas.get_pixel(3, 3));

        // Fully off-canvas part contributes nothing and does not error
        let canvas = compose(4, 4, &[Placed::new(-10, -10, all_black(2, 2))]);
        assert_eq!(canvas.ink_count(), 0);
    }

    #[test]
    fn test_negative_offset_partial_clip() {
        let canvas = compose(4, 4, &[Placed::new(-1, -1, all_black(2, 2))]);
        assert_eq!(canvas.ink_count(), 1);
        assert!(canvas.get_pixel(0, 0));
    }

    #[test]
    fn test_empty_parts_gives_white_canvas() {
        let canvas = compose(16, 16, &[]);
        assert_eq!(canvas.ink_count(), 0);
        assert_eq!(canvas.data().len(), 2 * 16);
    }
}
