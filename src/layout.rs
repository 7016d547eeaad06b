//! # Layout/Ratio Splitter
//!
//! Divides a display area into N weighted rectangular slots.
//!
//! A layout is an orientation plus an integer ratio sequence, written in
//! its text form as a colon-joined string (`"1:2:1"`). Splitting uses
//! largest-remainder apportionment so the slot sizes always sum to the
//! axis size exactly, with no rounding drift regardless of the ratios.
//!
//! ```text
//! ratios 1:2:1, horizontal, 800×480
//!
//! ┌─────┬──────────┬─────┐
//! │ 200 │   400    │ 200 │  heights all 480
//! └─────┴──────────┴─────┘
//! x:  0      200      600
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Axis along which the display is divided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Slots side by side, split along the x axis
    #[default]
    Horizontal,
    /// Slots stacked, split along the y axis
    Vertical,
}

/// A non-empty sequence of positive integer slot weights.
///
/// Serializes to its canonical colon-joined text form; parsing that form
/// back always yields the same sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ratios(Vec<u32>);

impl Ratios {
    /// Build from a weight sequence. Empty sequences and zero weights are
    /// rejected.
    pub fn new(weights: Vec<u32>) -> Result<Self, String> {
        if weights.is_empty() {
            return Err("ratio sequence must not be empty".into());
        }
        if weights.iter().any(|&w| w == 0) {
            return Err("ratio weights must be positive".into());
        }
        Ok(Self(weights))
    }

    /// Parse the colon-joined text form (`"1:2:1"`).
    pub fn parse(text: &str) -> Result<Self, String> {
        let weights = text
            .split(':')
            .map(|part| {
                part.trim()
                    .parse::<u32>()
                    .map_err(|_| format!("invalid ratio segment '{}'", part))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(weights)
    }

    pub fn weights(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Ratios {
    /// Canonical text form: weights joined with `:`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .0
            .iter()
            .map(|w| w.to_string())
            .collect::<Vec<_>>()
            .join(":");
        f.write_str(&text)
    }
}

impl Serialize for Ratios {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Ratios {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ratios::parse(&text).map_err(D::Error::custom)
    }
}

/// How a display area is divided among widget slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub orientation: Orientation,
    /// Panel is mounted rotated 90°; the screen is composed on swapped
    /// axes and rotated to panel-native order at the end.
    #[serde(default)]
    pub portrait: bool,
    pub ratios: Ratios,
}

impl LayoutConfig {
    /// Compute the slot rectangles for a canvas of the given size.
    ///
    /// Slots tile the canvas exactly along the split axis and span the
    /// full cross dimension.
    pub fn slots(&self, width: u32, height: u32) -> Vec<SlotRect> {
        let axis = match self.orientation {
            Orientation::Horizontal => width,
            Orientation::Vertical => height,
        };
        let sizes = apportion(axis, self.ratios.weights());

        let mut rects = Vec::with_capacity(sizes.len());
        let mut offset = 0u32;
        for size in sizes {
            rects.push(match self.orientation {
                Orientation::Horizontal => SlotRect {
                    x: offset,
                    y: 0,
                    width: size,
                    height,
                },
                Orientation::Vertical => SlotRect {
                    x: 0,
                    y: offset,
                    width,
                    height: size,
                },
            });
            offset += size;
        }
        rects
    }
}

/// A rectangular sub-region of the display canvas assigned to one widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Largest-remainder apportionment of `axis` pixels over integer weights.
///
/// `base_i = floor(axis * w_i / sum)`, then the shortfall is handed out one
/// pixel at a time to the slots with the largest fractional remainder,
/// ties broken by original index. The result always sums to `axis` exactly
/// and is deterministic for equal inputs. Pure integer arithmetic: the
/// remainder of `axis * w_i / sum` is compared instead of a float fraction.
pub fn apportion(axis: u32, weights: &[u32]) -> Vec<u32> {
    let sum: u64 = weights.iter().map(|&w| w as u64).sum();
    if sum == 0 {
        return vec![0; weights.len()];
    }

    let mut sizes = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());
    let mut allocated = 0u64;
    for (i, &w) in weights.iter().enumerate() {
        let exact = axis as u64 * w as u64;
        let base = exact / sum;
        sizes.push(base as u32);
        remainders.push((exact % sum, i));
        allocated += base;
    }

    // Highest remainder first, original index breaks ties
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    let mut shortfall = axis as u64 - allocated;
    for &(_, i) in &remainders {
        if shortfall == 0 {
            break;
        }
        sizes[i] += 1;
        shortfall -= 1;
    }
    sizes
}
