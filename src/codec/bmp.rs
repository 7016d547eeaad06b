//! # BMP Container Encoder
//!
//! Serializes a monochrome canvas into the 1bpp palettized BMP layout the
//! device firmware consumes. Every field offset, size and byte order here
//! is wire contract; the tests pin them byte-for-byte.
//!
//! ## File Layout
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0  | 2 | `BM` magic |
//! | 2  | 4 | file size (LE) |
//! | 6  | 4 | reserved, zero |
//! | 10 | 4 | pixel data offset (62) |
//! | 14 | 4 | `biSize` (40) |
//! | 18 | 4 | `biWidth` |
//! | 22 | 4 | `biHeight`, negative = top-down, positive = bottom-up |
//! | 26 | 2 | `biPlanes` (1) |
//! | 28 | 2 | `biBitCount` (1) |
//! | 30 | 4 | `biCompression` (0) |
//! | 34 | 4 | `biSizeImage` |
//! | 38 | 8 | resolution, zero |
//! | 46 | 4 | `biClrUsed` (2) |
//! | 50 | 4 | `biClrImportant` (0) |
//! | 54 | 8 | palette: `FF FF FF 00` white, `00 00 00 00` black |
//! | 62 |   | pixel rows, each padded to a 4-byte boundary |
//!
//! Container rows are `width.div_ceil(32) * 4` bytes, wider than the
//! source packing's `width.div_ceil(8)` stride, so every row is re-strided
//! on write. The `invert` option XORs all pixel-data bytes after
//! placement (some panels want inverted data); the palette is untouched.

use crate::error::TintaError;
use crate::raster::MonoImage;

/// Fixed offset of the pixel data: headers plus the two-entry palette.
const PIXEL_OFFSET: u32 = 14 + 40 + 8;

/// Encoding options for the BMP container.
#[derive(Debug, Clone, Copy)]
pub struct BmpOptions {
    /// Store rows top-down (negative `biHeight`). Bottom-up reverses the
    /// row order on write, as the classic format expects.
    pub top_down: bool,
    /// XOR all pixel-data bytes after placement.
    pub invert: bool,
}

impl Default for BmpOptions {
    fn default() -> Self {
        Self {
            top_down: true,
            invert: false,
        }
    }
}

/// Container row stride: rows padded to a 4-byte boundary.
fn row_bytes(width: u32) -> usize {
    width.div_ceil(32) as usize * 4
}

fn push_u16_le(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn push_u32_le(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn push_i32_le(out: &mut Vec<u8>, value: i32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Encode a canvas into BMP bytes.
pub fn encode(image: &MonoImage, options: BmpOptions) -> Result<Vec<u8>, TintaError> {
    let width = image.width();
    let height = image.height();
    if width == 0 || height == 0 {
        return Err(TintaError::EncodingFailed(format!(
            "cannot encode empty canvas ({}x{})",
            width, height
        )));
    }
    let stride = image.stride();
    if image.data().len() != stride * height as usize {
        return Err(TintaError::EncodingFailed(
            "canvas data length does not match its dimensions".into(),
        ));
    }

    let row_len = row_bytes(width);
    let image_size = (row_len * height as usize) as u32;
    let file_size = PIXEL_OFFSET + image_size;

    let mut out = Vec::with_capacity(file_size as usize);

    // File header
    out.extend_from_slice(b"BM");
    push_u32_le(&mut out, file_size);
    push_u16_le(&mut out, 0);
    push_u16_le(&mut out, 0);
    push_u32_le(&mut out, PIXEL_OFFSET);

    // Info header
    push_u32_le(&mut out, 40);
    push_i32_le(&mut out, width as i32);
    let bi_height = if options.top_down {
        -(height as i32)
    } else {
        height as i32
    };
    push_i32_le(&mut out, bi_height);
    push_u16_le(&mut out, 1); // planes
    push_u16_le(&mut out, 1); // bits per pixel
    push_u32_le(&mut out, 0); // compression
    push_u32_le(&mut out, image_size);
    push_u32_le(&mut out, 0); // x pixels per meter
    push_u32_le(&mut out, 0); // y pixels per meter
    push_u32_le(&mut out, 2); // colors used
    push_u32_le(&mut out, 0); // important colors

    // Palette, BGRA: index 0 = white, index 1 = black
    out.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0x00]);
    out.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    // Pixel rows, re-strided and optionally reversed
    let pixel_start = out.len();
    for y in 0..height as usize {
        let src_y = if options.top_down {
            y
        } else {
            height as usize - 1 - y
        };
        let row = &image.data()[src_y * stride..src_y * stride + stride];
        let mut padded = vec![0u8; row_len];
        padded[..stride].copy_from_slice(row);
        out.extend_from_slice(&padded);
    }

    if options.invert {
        for byte in &mut out[pixel_start..] {
            *byte ^= 0xFF;
        }
    }

    debug_assert_eq!(out.len(), file_size as usize);
    Ok(out)
}

/// Parse the pixel region back out of an encoded file.
///
/// `invert` must match the flag the file was encoded with; the option is
/// not recorded in the container. Used by the round-trip tests and by
/// preview tooling.
pub fn decode(bytes: &[u8], invert: bool) -> Result<MonoImage, TintaError> {
    if bytes.len() < PIXEL_OFFSET as usize || &bytes[0..2] != b"BM" {
        return Err(TintaError::EncodingFailed("not a BMP file".into()));
    }
    let pixel_offset = u32::from_le_bytes(bytes[10..14].try_into().unwrap()) as usize;
    let width = i32::from_le_bytes(bytes[18..22].try_into().unwrap());
    let raw_height = i32::from_le_bytes(bytes[22..26].try_into().unwrap());
    let bit_count = u16::from_le_bytes(bytes[28..30].try_into().unwrap());
    if bit_count != 1 || width <= 0 || raw_height == 0 {
        return Err(TintaError::EncodingFailed(
            "unsupported BMP variant".into(),
        ));
    }

    let top_down = raw_height < 0;
    let width = width as u32;
    let height = raw_height.unsigned_abs();
    let row_len = row_bytes(width);
    let stride = width.div_ceil(8) as usize;
    let needed = pixel_offset + row_len * height as usize;
    if bytes.len() < needed {
        return Err(TintaError::EncodingFailed("truncated BMP file".into()));
    }

    let mut data = vec![0u8; stride * height as usize];
    for y in 0..height as usize {
        let dst_y = if top_down {
            y
        } else {
            height as usize - 1 - y
        };
        let row_start = pixel_offset + y * row_len;
        for (i, byte) in bytes[row_start..row_start + stride].iter().enumerate() {
            data[dst_y * stride + i] = if invert { byte ^ 0xFF } else { *byte };
        }
    }

    // Mask padding bits beyond the pixel width so foreign files still
    // produce a canonical buffer
    let tail_bits = width % 8;
    if tail_bits != 0 {
        let mask = 0xFFu8 << (8 - tail_bits);
        for y in 0..height as usize {
            data[y * stride + stride - 1] &= mask;
        }
    }

    MonoImage::from_packed(width, height, data)
        .ok_or_else(|| TintaError::EncodingFailed("inconsistent BMP dimensions".into()))
}
