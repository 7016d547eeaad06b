//! Clock widget: big time headline with a date line underneath.
//!
//! The instant comes from the render context; the caller resolves "now"
//! so renders stay pure and reproducible. The user's UTC offset is applied
//! here because the panel shows wall-clock time.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::RenderContext;
use crate::error::TintaError;
use crate::render::fonts::FontWeight;
use crate::render::text::{HAlign, StyledLine, TextStyle};
use crate::render::tree::VisualNode;
use crate::widget::{RenderOutput, Widget};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ClockSettings {
    twenty_four_hour: bool,
    show_date: bool,
    /// Optional caption under the date (e.g. a location name).
    label: Option<String>,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            twenty_four_hour: true,
            show_date: true,
            label: None,
        }
    }
}

pub struct Clock;

impl Widget for Clock {
    fn id(&self) -> &'static str {
        "clock"
    }

    fn name(&self) -> &'static str {
        "Clock"
    }

    fn default_settings(&self) -> Value {
        serde_json::to_value(ClockSettings::default()).unwrap_or_default()
    }

    fn validate(&self, settings: &Value) -> bool {
        serde_json::from_value::<ClockSettings>(settings.clone()).is_ok()
    }

    fn render(
        &self,
        settings: &Value,
        ctx: &RenderContext,
        _width: u32,
        height: u32,
    ) -> Result<RenderOutput, TintaError> {
        let settings: ClockSettings = serde_json::from_value(settings.clone())
            .map_err(|e| TintaError::InvalidSettings(e.to_string()))?;

        let offset = FixedOffset::east_opt(ctx.user.utc_offset_minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
        let local = ctx.now.with_timezone(&offset);

        let time_text = if settings.twenty_four_hour {
            local.format("%H:%M").to_string()
        } else {
            local.format("%-I:%M %p").to_string()
        };

        let time_px = (height / 3).clamp(24, 96);
        let mut lines = vec![StyledLine::new(
            time_text,
            TextStyle {
                px: time_px,
                weight: FontWeight::Bold,
            },
        )];
        if settings.show_date {
            let date_px = (height / 10).clamp(12, 24);
            lines.push(StyledLine::new(
                local.format("%a %-d %b %Y").to_string(),
                TextStyle::regular(date_px),
            ));
        }
        if let Some(label) = settings.label.filter(|l| !l.trim().is_empty()) {
            lines.push(StyledLine::new(label, TextStyle::regular(12)));
        }

        Ok(RenderOutput::Declarative(VisualNode::Lines {
            lines,
            align: HAlign::Center,
        }))
    }
}
