//! Picture widget: an embedded image scaled to the slot and dithered.
//!
//! The image arrives base64-encoded in the settings object: the caller
//! fetched or stored it, the core never touches the network. Decoding and
//! resizing go through the `image` crate; the continuous-tone result is
//! centered on a white surface and Atkinson-dithered into exact bits.
//!
//! Fully transparent pixels count as white, matching how the panels show
//! unprinted area.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::RenderContext;
use crate::error::TintaError;
use crate::render::GraySurface;
use crate::render::dither::{self, DEFAULT_GAMMA, DitherConfig};
use crate::widget::{RenderOutput, Widget};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PictureSettings {
    /// Base64-encoded PNG or JPEG bytes.
    data: String,
    /// Gamma for the dithering pass; panels differ in how they crush
    /// midtones, so this one is per-picture tunable.
    gamma: f32,
}

impl Default for PictureSettings {
    fn default() -> Self {
        Self {
            data: String::new(),
            gamma: DEFAULT_GAMMA,
        }
    }
}

pub struct Picture;

impl Widget for Picture {
    fn id(&self) -> &'static str {
        "picture"
    }

    fn name(&self) -> &'static str {
        "Picture"
    }

    fn default_settings(&self) -> Value {
        serde_json::to_value(PictureSettings::default()).unwrap_or_default()
    }

    fn validate(&self, settings: &Value) -> bool {
        // Shape only; whether the payload decodes is a render-time question
        serde_json::from_value::<PictureSettings>(settings.clone())
            .map(|parsed| parsed.gamma > 0.0)
            .unwrap_or(false)
    }

    fn render(
        &self,
        settings: &Value,
        _ctx: &RenderContext,
        width: u32,
        height: u32,
    ) -> Result<RenderOutput, TintaError> {
        let settings: PictureSettings = serde_json::from_value(settings.clone())
            .map_err(|e| TintaError::InvalidSettings(e.to_string()))?;
        if settings.data.is_empty() {
            return Err(TintaError::InvalidSettings("no image data".into()));
        }

        let bytes = BASE64
            .decode(settings.data.as_bytes())
            .map_err(|e| TintaError::InvalidSettings(format!("image data is not base64: {}", e)))?;
        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| TintaError::InvalidSettings(format!("image decode failed: {}", e)))?;

        // Contain-fit into the slot, preserving aspect ratio
        let (src_w, src_h) = (decoded.width().max(1) as u64, decoded.height().max(1) as u64);
        let scale_num = (width as u64 * src_h).min(height as u64 * src_w);
        let fit_w = (scale_num / src_h).max(1) as u32;
        let fit_h = (scale_num / src_w).max(1) as u32;
        let resized = decoded.resize_exact(fit_w, fit_h, FilterType::Triangle);
        let gray = resized.to_luma_alpha8();

        let mut surface = GraySurface::new(width, height);
        let offset_x = (width.saturating_sub(fit_w) / 2) as i32;
        let offset_y = (height.saturating_sub(fit_h) / 2) as i32;
        for (x, y, pixel) in gray.enumerate_pixels() {
            let [luma, alpha] = pixel.0;
            if alpha == 0 {
                continue; // transparent = white
            }
            surface.set(offset_x + x as i32, offset_y + y as i32, 255 - luma);
        }

        let config = DitherConfig {
            gamma: settings.gamma,
        };
        Ok(RenderOutput::Direct(dither::atkinson(&surface, &config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::dither::DitherConfig;
    use crate::widget;
    use serde_json::json;

    fn ctx() -> RenderContext {
        RenderContext::new("https://frames.example", "dev-1")
    }

    /// Mid-gray 4x4 PNG built with the crate's own encoder-independent
    /// tooling, so the fixture cannot drift from the reader.
    fn gray_png_base64() -> String {
        let mut img = image::GrayImage::new(4, 4);
        for pixel in img.pixels_mut() {
            pixel.0 = [128];
        }
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        BASE64.encode(&bytes)
    }

    #[test]
    fn test_validate_checks_shape_not_payload() {
        assert!(Picture.validate(&Picture.default_settings()));
        assert!(Picture.validate(&json!({"data": "not base64 at all"})));
        assert!(!Picture.validate(&json!({"gamma": 0.0})));
        assert!(!Picture.validate(&json!({"data": 5})));
    }

    #[test]
    fn test_empty_payload_fails_at_render() {
        let result = widget::run(
            &Picture,
            &Picture.default_settings(),
            &ctx(),
            64,
            64,
            &DitherConfig::default(),
        );
        assert!(matches!(result, Err(TintaError::InvalidSettings(_))));
    }

    #[test]
    fn test_bad_base64_and_bad_image_fail_cleanly() {
        for data in ["%%%not-base64%%%", "aGVsbG8gd29ybGQ="] {
            let result = widget::run(
                &Picture,
                &json!({"data": data}),
                &ctx(),
                64,
                64,
                &DitherConfig::default(),
            );
            assert!(
                matches!(result, Err(TintaError::InvalidSettings(_))),
                "payload {:?}",
                data
            );
        }
    }

    #[test]
    fn test_gray_image_dithers_into_slot() {
        let img = widget::run(
            &Picture,
            &json!({"data": gray_png_base64()}),
            &ctx(),
            64,
            64,
            &DitherConfig::default(),
        )
        .unwrap();
        assert_eq!((img.width(), img.height()), (64, 64));
        // Mid-gray scaled to fill: some ink, not solid black
        let ink = img.ink_count();
        assert!(ink > 0 && ink < 64 * 64, "ink count {}", ink);
    }

    #[test]
    fn test_render_is_deterministic() {
        let settings = json!({"data": gray_png_base64()});
        let a = widget::run(&Picture, &settings, &ctx(), 48, 32, &DitherConfig::default()).unwrap();
        let b = widget::run(&Picture, &settings, &ctx(), 48, 32, &DitherConfig::default()).unwrap();
        assert_eq!(a.data(), b.data());
    }
}
