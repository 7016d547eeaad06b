//! # Error Types
//!
//! This module defines error types used throughout the tinta library.
//!
//! The three kinds a caller has to handle are `InvalidSettings`,
//! `UnsupportedSize` and `EncodingFailed`; they are always returned as
//! values, never raised across the core boundary. Pixel-level out-of-range
//! writes are absorbed by the canvas primitives and never surface here.

use thiserror::Error;

/// Main error type for tinta operations
#[derive(Debug, Error)]
pub enum TintaError {
    /// Widget rejected its settings object
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Requested canvas size is not in the widget's declared set
    #[error("unsupported size {width}x{height} for widget '{widget}'")]
    UnsupportedSize {
        widget: String,
        width: u32,
        height: u32,
    },

    /// Internal inconsistency while building a container
    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    /// Font store installation error
    #[error("font error: {0}")]
    Font(String),

    /// I/O error wrapper (CLI file handling)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
