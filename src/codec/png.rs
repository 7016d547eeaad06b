//! # PNG Container Encoder
//!
//! Minimal byte-exact PNG writer for 1-bit grayscale output: no interlace,
//! filter type 0 on every scanline, one zlib-deflated `IDAT`, chunks
//! framed as `length(4) + type(4) + data + crc32(type + data)`.
//!
//! PNG grayscale puts 0 = black and 1 = white, the opposite of the
//! canvas's ink bits, so every packed byte is bit-inverted on write.
//!
//! CRC-32 is the standard reflected polynomial `0xEDB88320`, table-driven;
//! the table is built once at compile time.

use flate2::Compression;
use flate2::write::ZlibEncoder;
use std::io::Write;

use crate::error::TintaError;
use crate::raster::MonoImage;

const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

const fn build_crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 != 0 {
                0xEDB8_8320 ^ (c >> 1)
            } else {
                c >> 1
            };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

const CRC_TABLE: [u32; 256] = build_crc_table();

/// Standard CRC-32 over a byte buffer.
pub fn crc32(data: &[u8]) -> u32 {
    let mut c = 0xFFFF_FFFFu32;
    for &byte in data {
        c = CRC_TABLE[((c ^ byte as u32) & 0xFF) as usize] ^ (c >> 8);
    }
    c ^ 0xFFFF_FFFF
}

/// Append one chunk: length, type, data, CRC over type + data.
fn push_chunk(out: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(chunk_type);
    out.extend_from_slice(data);

    let mut crc_input = Vec::with_capacity(4 + data.len());
    crc_input.extend_from_slice(chunk_type);
    crc_input.extend_from_slice(data);
    out.extend_from_slice(&crc32(&crc_input).to_be_bytes());
}

/// Encode a canvas into PNG bytes.
pub fn encode(image: &MonoImage) -> Result<Vec<u8>, TintaError> {
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

    // Raw scanline stream: filter byte 0, then the row with ink bits
    // inverted to PNG's 0 = black convention
    let mut raw = Vec::with_capacity((stride + 1) * height as usize);
    for y in 0..height as usize {
        raw.push(0u8);
        for &byte in &image.data()[y * stride..(y + 1) * stride] {
            raw.push(!byte);
        }
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&raw)
        .and_then(|_| encoder.finish())
        .map_err(|e| TintaError::EncodingFailed(format!("deflate failed: {}", e)))
        .and_then(|idat| {
            let mut out = Vec::new();
            out.extend_from_slice(&SIGNATURE);

            let mut ihdr = Vec::with_capacity(13);
            ihdr.extend_from_slice(&width.to_be_bytes());
            ihdr.extend_from_slice(&height.to_be_bytes());
            ihdr.push(1); // bit depth
            ihdr.push(0); // color type: grayscale
            ihdr.push(0); // compression
            ihdr.push(0); // filter
            ihdr.push(0); // interlace
            push_chunk(&mut out, b"IHDR", &ihdr);
            push_chunk(&mut out, b"IDAT", &idat);
            push_chunk(&mut out, b"IEND", &[]);
            Ok(out)
        })
}
