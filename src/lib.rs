//! # Tinta - Monochrome Rendering Core for E-Paper Displays
//!
//! Tinta is a Rust library for serving visual content to battery-powered
//! electronic-paper displays that can only show pure black/white raster
//! images. It provides:
//!
//! - **Packed canvas**: 1bpp pixel buffers with clip-safe primitives
//! - **Dithering**: Atkinson error diffusion for continuous-tone output
//! - **Widgets**: a closed, pluggable set of slot renderers
//! - **Layout**: weighted ratio splitting with exact pixel accounting
//! - **Containers**: byte-exact BMP and PNG encoders for device firmware
//!
//! ## Quick Start
//!
//! ```no_run
//! use tinta::{
//!     codec::{self, ContainerFormat},
//!     context::RenderContext,
//!     screen::{ScreenRequest, SlotAssignment},
//!     layout::{LayoutConfig, Orientation, Ratios},
//! };
//!
//! let request = ScreenRequest {
//!     width: 800,
//!     height: 480,
//!     layout: LayoutConfig {
//!         orientation: Orientation::Horizontal,
//!         portrait: false,
//!         ratios: Ratios::parse("1:2:1")?,
//!     },
//!     slots: vec![SlotAssignment {
//!         slot: 0,
//!         widget: "clock".into(),
//!         settings: serde_json::json!({}),
//!     }],
//! };
//!
//! let ctx = RenderContext::new("https://frames.example", "device-1")
//!     .with_now(chrono::Utc::now());
//! let image = tinta::screen::render(&request, &ctx)?;
//! let bytes = codec::encode(&image, ContainerFormat::Bmp)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`raster`] | Packed 1bpp canvas and pixel primitives |
//! | [`render`] | Dithering, fonts, text, QR, visual trees |
//! | [`widget`] | The closed widget set and its render state machine |
//! | [`layout`] | Ratio parsing and largest-remainder slot splitting |
//! | [`compose`] | OR-compositing of slot images |
//! | [`screen`] | Request validation and full-screen assembly |
//! | [`codec`] | BMP and PNG container encoders |
//! | [`context`] | Caller-resolved per-request data |
//! | [`error`] | Error types |
//!
//! ## Purity
//!
//! The core is stateless and synchronous: no I/O, no clock reads, no
//! mutable globals. The single shared resource is the font store,
//! initialized once and read-only for the process lifetime. Every render
//! recomputes from its inputs, so identical requests produce identical
//! bytes.

pub mod codec;
pub mod compose;
pub mod context;
pub mod error;
pub mod layout;
pub mod raster;
pub mod render;
pub mod screen;
pub mod widget;

// Re-exports for convenience
pub use context::RenderContext;
pub use error::TintaError;
pub use raster::MonoImage;
