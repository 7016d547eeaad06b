//! # Widget Renderer
//!
//! A widget is one rectangle's worth of drawing logic. The set is closed
//! and known at compile time; the registry is a static slice, not mutable
//! global state.
//!
//! Every render call runs the same state machine:
//!
//! ```text
//! validate(settings) ──no──► InvalidSettings
//!        │yes
//! size ∈ output_sizes? ──no──► UnsupportedSize   (empty set = any size)
//!        │yes
//! render(settings, ctx, size)
//!        │
//!        ├─ Direct(MonoImage)      → done
//!        └─ Declarative(VisualNode) → lowered through the dithering engine
//! ```
//!
//! Widgets are side-effect-free: whatever external data they need is
//! resolved by the caller and arrives through [`RenderContext`] or the
//! settings object. Nothing here reads the clock, the filesystem or the
//! network.

pub mod clock;
pub mod message;
pub mod picture;
pub mod qr_link;
pub mod setup;

use serde_json::Value;

use crate::context::RenderContext;
use crate::error::TintaError;
use crate::raster::MonoImage;
use crate::render::dither::DitherConfig;
use crate::render::tree::{self, VisualNode};

/// What a widget's `render` hands back.
pub enum RenderOutput {
    /// Exact bits, drawn through the canvas primitives.
    Direct(MonoImage),
    /// A declarative tree, lowered through the dithering engine.
    Declarative(VisualNode),
}

/// One member of the closed widget set.
pub trait Widget: Sync {
    /// Stable identifier used in slot assignments.
    fn id(&self) -> &'static str;

    /// Human-readable name for listings.
    fn name(&self) -> &'static str;

    /// Exact `(width, height)` pairs this widget supports. Empty = any.
    fn output_sizes(&self) -> &'static [(u32, u32)] {
        &[]
    }

    /// Settings object a fresh slot assignment starts from.
    fn default_settings(&self) -> Value;

    /// Whether the opaque settings object is acceptable.
    fn validate(&self, settings: &Value) -> bool;

    /// Produce output for a `width × height` canvas.
    fn render(
        &self,
        settings: &Value,
        ctx: &RenderContext,
        width: u32,
        height: u32,
    ) -> Result<RenderOutput, TintaError>;
}

static REGISTRY: [&dyn Widget; 5] = [
    &clock::Clock,
    &message::Message,
    &qr_link::QrLink,
    &picture::Picture,
    &setup::Setup,
];

/// The closed widget set, in listing order.
pub fn registry() -> &'static [&'static dyn Widget] {
    &REGISTRY
}

/// Look a widget up by its id.
pub fn by_id(id: &str) -> Option<&'static dyn Widget> {
    registry().iter().find(|w| w.id() == id).copied()
}

/// Run the render state machine for one widget against one canvas size.
pub fn run(
    widget: &dyn Widget,
    settings: &Value,
    ctx: &RenderContext,
    width: u32,
    height: u32,
    dither: &DitherConfig,
) -> Result<MonoImage, TintaError> {
    if !widget.validate(settings) {
        return Err(TintaError::InvalidSettings(format!(
            "widget '{}' rejected its settings",
            widget.id()
        )));
    }

    let sizes = widget.output_sizes();
    if !sizes.is_empty() && !sizes.contains(&(width, height)) {
        return Err(TintaError::UnsupportedSize {
            widget: widget.id().to_string(),
            width,
            height,
        });
    }

    match widget.render(settings, ctx, width, height)? {
        RenderOutput::Direct(image) => Ok(image),
        RenderOutput::Declarative(node) => Ok(tree::lower(&node, width, height, dither)),
    }
}
