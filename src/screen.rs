//! # Screen Assembly
//!
//! The control flow of one render request:
//!
//! ```text
//! ScreenRequest ──► validate ──► layout.slots() ──► widget::run() per slot
//!                                                        │ (rayon)
//!                              compose() ◄───────────────┘
//!                                 │
//!                       portrait? rotate to panel-native
//! ```
//!
//! Requests are independent: every canvas and surface is freshly
//! allocated per call, so slot rendering fans out across threads without
//! any locking. The result is always a panel-native `width × height`
//! canvas ready for a container encoder.

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compose::{self, Placed};
use crate::context::RenderContext;
use crate::error::TintaError;
use crate::layout::LayoutConfig;
use crate::raster::{MonoImage, Rotation};
use crate::render::dither::DitherConfig;
use crate::widget;

/// One widget placed into one layout slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub slot: usize,
    pub widget: String,
    #[serde(default)]
    pub settings: Value,
}

/// A complete description of what one panel should show.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenRequest {
    pub width: u32,
    pub height: u32,
    pub layout: LayoutConfig,
    #[serde(default)]
    pub slots: Vec<SlotAssignment>,
}

impl ScreenRequest {
    /// Boundary validation: geometry, slot indices, widget ids. Settings
    /// contents are each widget's own concern.
    fn validate(&self) -> Result<(), TintaError> {
        if self.width == 0 || self.height == 0 {
            return Err(TintaError::InvalidSettings(format!(
                "display geometry {}x{} is empty",
                self.width, self.height
            )));
        }
        let slot_count = self.layout.ratios.len();
        let mut seen = vec![false; slot_count];
        for assignment in &self.slots {
            if assignment.slot >= slot_count {
                return Err(TintaError::InvalidSettings(format!(
                    "slot index {} out of range for {} slots",
                    assignment.slot, slot_count
                )));
            }
            if seen[assignment.slot] {
                return Err(TintaError::InvalidSettings(format!(
                    "slot {} assigned twice",
                    assignment.slot
                )));
            }
            seen[assignment.slot] = true;
            if widget::by_id(&assignment.widget).is_none() {
                return Err(TintaError::InvalidSettings(format!(
                    "unknown widget '{}'",
                    assignment.widget
                )));
            }
        }
        Ok(())
    }
}

/// Render a screen with default dithering parameters.
pub fn render(request: &ScreenRequest, ctx: &RenderContext) -> Result<MonoImage, TintaError> {
    render_with(request, ctx, &DitherConfig::default())
}

/// Render a screen. Unassigned slots stay white; a portrait layout is
/// composed on swapped axes and rotated to panel-native order at the end.
pub fn render_with(
    request: &ScreenRequest,
    ctx: &RenderContext,
    dither: &DitherConfig,
) -> Result<MonoImage, TintaError> {
    request.validate()?;

    let (logical_w, logical_h) = if request.layout.portrait {
        (request.height, request.width)
    } else {
        (request.width, request.height)
    };
    let slots = request.layout.slots(logical_w, logical_h);
    debug!(
        "rendering {}x{} screen, {} slots, {} assigned",
        logical_w,
        logical_h,
        slots.len(),
        request.slots.len()
    );

    let parts: Vec<Placed> = request
        .slots
        .par_iter()
        .map(|assignment| {
            let rect = slots[assignment.slot];
            let widget = widget::by_id(&assignment.widget).ok_or_else(|| {
                TintaError::InvalidSettings(format!("unknown widget '{}'", assignment.widget))
            })?;
            widget::run(
                widget,
                &assignment.settings,
                ctx,
                rect.width,
                rect.height,
                dither,
            )
            .map(|image| Placed::new(rect.x as i32, rect.y as i32, image))
        })
        .collect::<Result<Vec<_>, TintaError>>()?;

    let composed = compose::compose(logical_w, logical_h, &parts);
    Ok(if request.layout.portrait {
        composed.rotated(Rotation::Cw90)
    } else {
        composed
    })
}
