//! # Bitmap Container Encoders
//!
//! Byte-exact serializers for the two container formats device firmware
//! accepts:
//!
//! | Module | Format |
//! |--------|--------|
//! | [`bmp`] | 1bpp palettized BMP, padded rows, top-down or bottom-up |
//! | [`png`] | 1-bit grayscale PNG, filter 0, single `IDAT` |
//!
//! Both consume a finished `MonoImage` and nothing else; rendering and
//! encoding never interleave.

pub mod bmp;
pub mod png;

use crate::error::TintaError;
use crate::raster::MonoImage;

/// Output container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    Bmp,
    Png,
}

impl ContainerFormat {
    /// Guess the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "bmp" => Some(ContainerFormat::Bmp),
            "png" => Some(ContainerFormat::Png),
            _ => None,
        }
    }
}

/// Encode with format-appropriate defaults (`BmpOptions::default()` for
/// BMP). Callers with firmware-specific needs use the format modules
/// directly.
pub fn encode(image: &MonoImage, format: ContainerFormat) -> Result<Vec<u8>, TintaError> {
    match format {
        ContainerFormat::Bmp => bmp::encode(image, bmp::BmpOptions::default()),
        ContainerFormat::Png => png::encode(image),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_mapping() {
        assert_eq!(ContainerFormat::from_extension("bmp"), Some(ContainerFormat::Bmp));
        assert_eq!(ContainerFormat::from_extension("PNG"), Some(ContainerFormat::Png));
        assert_eq!(ContainerFormat::from_extension("gif"), None);
    }

    #[test]
    fn test_dispatch_produces_each_magic() {
        let img = MonoImage::new(8, 8);
        let bmp = encode(&img, ContainerFormat::Bmp).unwrap();
        assert_eq!(&bmp[0..2], b"BM");
        let png = encode(&img, ContainerFormat::Png).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
