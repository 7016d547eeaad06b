//! QR link widget: a caller-constructed URL as a scannable code, with an
//! optional caption underneath.
//!
//! The widget never builds business URLs: whatever string arrives in its
//! settings is what gets encoded. Drawn directly into the packed canvas:
//! QR modules need exact bits, dithering would destroy them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::RenderContext;
use crate::error::TintaError;
use crate::raster::MonoImage;
use crate::render::qr::{self, ErrorLevel, QrMatrix, QrPlacement};
use crate::render::text::{self, DEFAULT_ALPHA_THRESHOLD, StyledLine, TextStyle};
use crate::widget::{RenderOutput, Widget};

const CAPTION_PX: u32 = 14;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct QrLinkSettings {
    url: String,
    caption: Option<String>,
    error_level: ErrorLevel,
    margin_modules: u32,
}

impl Default for QrLinkSettings {
    fn default() -> Self {
        Self {
            url: "https://example.com".into(),
            caption: None,
            error_level: ErrorLevel::default(),
            margin_modules: qr::DEFAULT_MARGIN_MODULES,
        }
    }
}

pub struct QrLink;

impl Widget for QrLink {
    fn id(&self) -> &'static str {
        "qr_link"
    }

    fn name(&self) -> &'static str {
        "QR Link"
    }

    fn default_settings(&self) -> Value {
        serde_json::to_value(QrLinkSettings::default()).unwrap_or_default()
    }

    fn validate(&self, settings: &Value) -> bool {
        match serde_json::from_value::<QrLinkSettings>(settings.clone()) {
            Ok(parsed) => !parsed.url.trim().is_empty(),
            Err(_) => false,
        }
    }

    fn render(
        &self,
        settings: &Value,
        _ctx: &RenderContext,
        width: u32,
        height: u32,
    ) -> Result<RenderOutput, TintaError> {
        let settings: QrLinkSettings = serde_json::from_value(settings.clone())
            .map_err(|e| TintaError::InvalidSettings(e.to_string()))?;

        let mut canvas = MonoImage::new(width, height);
        let matrix = QrMatrix::generate(&settings.url, settings.error_level)?;

        let caption = settings
            .caption
            .filter(|c| !c.trim().is_empty())
            .map(|c| StyledLine::new(c, TextStyle::regular(CAPTION_PX)));
        let caption_strip = caption
            .as_ref()
            .map(|line| {
                let (_, metrics) = text::measure_line(&line.text, line.style);
                metrics.line_height() + 4
            })
            .unwrap_or(0);

        let placement = QrPlacement {
            x: 0,
            y: 0,
            width,
            height: height.saturating_sub(caption_strip),
            margin_modules: settings.margin_modules,
        };
        qr::draw(&mut canvas, &matrix, placement, qr::no_remap);

        if let Some(line) = caption {
            let (advance, metrics) = text::measure_line(&line.text, line.style);
            let x = (width.saturating_sub(advance) / 2) as i32;
            let baseline = (height.saturating_sub(caption_strip) + metrics.ascent) as i32 + 2;
            text::draw_line_into(&mut canvas, x, baseline, &line, DEFAULT_ALPHA_THRESHOLD);
        }

        Ok(RenderOutput::Direct(canvas))
    }
}
