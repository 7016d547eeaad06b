//! Setup widget: the provisioning screen a factory-fresh device shows.
//!
//! A headline, the caller-constructed setup link as a large QR code, and
//! the device identity at the bottom so support can read it back. Shown
//! full-panel only; the declared output sizes are the supported panel
//! geometries, and anything else is rejected as `unsupported_size`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::RenderContext;
use crate::error::TintaError;
use crate::raster::MonoImage;
use crate::render::qr::{self, ErrorLevel, QrMatrix, QrPlacement};
use crate::render::text::{self, DEFAULT_ALPHA_THRESHOLD, StyledLine, TextStyle};
use crate::widget::{RenderOutput, Widget};

/// Panel geometries this screen is laid out for.
const PANEL_SIZES: [(u32, u32); 3] = [(800, 480), (640, 384), (400, 300)];

const HEADLINE_PX: u32 = 28;
const FOOTER_PX: u32 = 14;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SetupSettings {
    /// Setup link, constructed by the caller (the core never builds URLs).
    url: String,
    headline: String,
}

impl Default for SetupSettings {
    fn default() -> Self {
        Self {
            url: "https://example.com/setup".into(),
            headline: "Scan to set up this display".into(),
        }
    }
}

pub struct Setup;

impl Widget for Setup {
    fn id(&self) -> &'static str {
        "setup"
    }

    fn name(&self) -> &'static str {
        "Device Setup"
    }

    fn output_sizes(&self) -> &'static [(u32, u32)] {
        &PANEL_SIZES
    }

    fn default_settings(&self) -> Value {
        serde_json::to_value(SetupSettings::default()).unwrap_or_default()
    }

    fn validate(&self, settings: &Value) -> bool {
        match serde_json::from_value::<SetupSettings>(settings.clone()) {
            Ok(parsed) => !parsed.url.trim().is_empty(),
            Err(_) => false,
        }
    }

    fn render(
        &self,
        settings: &Value,
        ctx: &RenderContext,
        width: u32,
        height: u32,
    ) -> Result<RenderOutput, TintaError> {
        let settings: SetupSettings = serde_json::from_value(settings.clone())
            .map_err(|e| TintaError::InvalidSettings(e.to_string()))?;

        let mut canvas = MonoImage::new(width, height);

        let headline = StyledLine::new(settings.headline, TextStyle::bold(HEADLINE_PX));
        let (headline_w, headline_m) = text::measure_line(&headline.text, headline.style);
        let headline_strip = headline_m.line_height() + 8;
        text::draw_line_into(
            &mut canvas,
            (width.saturating_sub(headline_w) / 2) as i32,
            (4 + headline_m.ascent) as i32,
            &headline,
            DEFAULT_ALPHA_THRESHOLD,
        );

        let footer = StyledLine::new(
            format!("Device {}", ctx.device_id),
            TextStyle::regular(FOOTER_PX),
        );
        let (footer_w, footer_m) = text::measure_line(&footer.text, footer.style);
        let footer_strip = footer_m.line_height() + 8;
        text::draw_line_into(
            &mut canvas,
            (width.saturating_sub(footer_w) / 2) as i32,
            (height.saturating_sub(footer_strip) + 4 + footer_m.ascent) as i32,
            &footer,
            DEFAULT_ALPHA_THRESHOLD,
        );

        let matrix = QrMatrix::generate(&settings.url, ErrorLevel::M)?;
        let placement = QrPlacement {
            x: 0,
            y: headline_strip as i32,
            width,
            height: height.saturating_sub(headline_strip + footer_strip),
            margin_modules: qr::DEFAULT_MARGIN_MODULES,
        };
        qr::draw(&mut canvas, &matrix, placement, qr::no_remap);

        Ok(RenderOutput::Direct(canvas))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::dither::DitherConfig;
    use crate::widget;
    use serde_json::json;

    fn ctx() -> RenderContext {
        RenderContext::new("https://frames.example", "AB12CD")
    }

    #[test]
    fn test_declares_exact_panel_sizes() {
        assert_eq!(Setup.output_sizes(), &PANEL_SIZES);
    }

    #[test]
    fn test_renders_on_declared_panel() {
        let img = widget::run(
            &Setup,
            &json!({"url": "https://frames.example/setup/AB12CD"}),
            &ctx(),
            800,
            480,
            &DitherConfig::default(),
        )
        .unwrap();
        assert_eq!((img.width(), img.height()), (800, 480));
        assert!(img.ink_count() > 0);
    }

    #[test]
    fn test_rejects_undeclared_size() {
        let result = widget::run(
            &Setup,
            &Setup.default_settings(),
            &ctx(),
            800,
            481,
            &DitherConfig::default(),
        );
        assert!(matches!(result, Err(TintaError::UnsupportedSize { .. })));
    }

    #[test]
    fn test_validate_requires_url() {
        assert!(Setup.validate(&Setup.default_settings()));
        assert!(!Setup.validate(&json!({"url": " "})));
    }
}
