//! # Contract Tests
//!
//! End-to-end checks of the rendering pipeline and the byte-exact
//! container contracts device firmware depends on.
//!
//! ## Test Coverage
//!
//! - **Pipeline**: screen description → layout → widgets → composition,
//!   verified against the geometry the layout math promises.
//! - **Containers**: BMP/PNG framing, checked byte-for-byte against the
//!   wire contract. Expectations are stated inline; the fields are small
//!   enough that stored golden files would only hide them.
//! - **Determinism**: identical requests produce identical bytes, across
//!   the whole pipeline, with parallel slot rendering in play.

use chrono::TimeZone;
use pretty_assertions::assert_eq;
use serde_json::json;

use tinta::codec::bmp::{self, BmpOptions};
use tinta::codec::png;
use tinta::context::RenderContext;
use tinta::error::TintaError;
use tinta::layout::{LayoutConfig, Orientation, Ratios};
use tinta::raster::MonoImage;
use tinta::screen::{self, ScreenRequest, SlotAssignment};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Context with a pinned clock so every render is reproducible.
fn fixed_ctx() -> RenderContext {
    RenderContext::new("https://frames.example", "AB12CD")
        .with_now(chrono::Utc.with_ymd_and_hms(2025, 3, 9, 18, 5, 0).unwrap())
}

/// The reference screen: 800×480 split 1:2:1 with all three slot widgets.
fn reference_request() -> ScreenRequest {
    ScreenRequest {
        width: 800,
        height: 480,
        layout: LayoutConfig {
            orientation: Orientation::Horizontal,
            portrait: false,
            ratios: Ratios::parse("1:2:1").unwrap(),
        },
        slots: vec![
            SlotAssignment {
                slot: 0,
                widget: "clock".into(),
                settings: json!({}),
            },
            SlotAssignment {
                slot: 1,
                widget: "message".into(),
                settings: json!({"text": "# Status\n\nAll systems nominal"}),
            },
            SlotAssignment {
                slot: 2,
                widget: "qr_link".into(),
                settings: json!({"url": "https://frames.example/d/AB12CD"}),
            },
        ],
    }
}

// ============================================================================
// PIPELINE TESTS
// ============================================================================

#[test]
fn test_reference_screen_geometry() {
    let img = screen::render(&reference_request(), &fixed_ctx()).unwrap();
    assert_eq!((img.width(), img.height()), (800, 480));
    // Packed invariant: ceil(800/8) * 480
    assert_eq!(img.data().len(), 100 * 480);
    assert!(img.ink_count() > 0);
}

#[test]
fn test_layout_one_two_one_slot_geometry() {
    let layout = LayoutConfig {
        orientation: Orientation::Horizontal,
        portrait: false,
        ratios: Ratios::parse("1:2:1").unwrap(),
    };
    let slots = layout.slots(800, 480);
    let widths: Vec<u32> = slots.iter().map(|s| s.width).collect();
    let xs: Vec<u32> = slots.iter().map(|s| s.x).collect();
    assert_eq!(widths, vec![200, 400, 200]);
    assert_eq!(xs, vec![0, 200, 600]);
    assert!(slots.iter().all(|s| s.height == 480));
}

#[test]
fn test_pipeline_is_deterministic_end_to_end() {
    let request = reference_request();
    let ctx = fixed_ctx();
    let a = bmp::encode(
        &screen::render(&request, &ctx).unwrap(),
        BmpOptions::default(),
    )
    .unwrap();
    let b = bmp::encode(
        &screen::render(&request, &ctx).unwrap(),
        BmpOptions::default(),
    )
    .unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_odd_width_screen_keeps_packed_invariant() {
    let request = ScreenRequest {
        width: 403,
        height: 61,
        layout: LayoutConfig {
            orientation: Orientation::Vertical,
            portrait: false,
            ratios: Ratios::parse("2:1").unwrap(),
        },
        slots: vec![SlotAssignment {
            slot: 0,
            widget: "message".into(),
            settings: json!({"text": "odd geometry"}),
        }],
    };
    let img = screen::render(&request, &fixed_ctx()).unwrap();
    assert_eq!(img.data().len(), 403u32.div_ceil(8) as usize * 61);
}

#[test]
fn test_widget_failures_are_values_not_panics() {
    let mut request = reference_request();
    request.slots[2].settings = json!({"url": "x".repeat(9000)});
    match screen::render(&request, &fixed_ctx()) {
        Err(TintaError::InvalidSettings(_)) => {}
        other => panic!("expected InvalidSettings, got {:?}", other.map(|_| ())),
    }
}

// ============================================================================
// BMP CONTRACT TESTS
// ============================================================================

#[test]
fn test_bmp_contract_bytes_for_reference_screen() {
    let img = screen::render(&reference_request(), &fixed_ctx()).unwrap();
    let bytes = bmp::encode(&img, BmpOptions::default()).unwrap();

    // 800px rows are 100 container bytes; 14 + 40 + 8 header/palette
    assert_eq!(bytes.len(), 62 + 100 * 480);
    assert_eq!(&bytes[0..2], b"BM");
    assert_eq!(
        u32::from_le_bytes(bytes[2..6].try_into().unwrap()) as usize,
        bytes.len()
    );
    assert_eq!(i32::from_le_bytes(bytes[18..22].try_into().unwrap()), 800);
    assert_eq!(i32::from_le_bytes(bytes[22..26].try_into().unwrap()), -480);
    assert_eq!(
        &bytes[54..62],
        &[0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00]
    );
}

#[test]
fn test_bmp_minimal_file_size_example() {
    // All-white 2x1 canvas: one padded row after the 62 fixed bytes
    let bytes = bmp::encode(&MonoImage::new(2, 1), BmpOptions::default()).unwrap();
    assert_eq!(bytes.len(), 66);
}

#[test]
fn test_bmp_round_trip_through_full_pipeline() {
    let img = screen::render(&reference_request(), &fixed_ctx()).unwrap();
    for top_down in [true, false] {
        for invert in [true, false] {
            let options = BmpOptions { top_down, invert };
            let bytes = bmp::encode(&img, options).unwrap();
            let back = bmp::decode(&bytes, invert).unwrap();
            assert_eq!(
                back.data(),
                img.data(),
                "top_down={} invert={}",
                top_down,
                invert
            );
        }
    }
}

// ============================================================================
// PNG CONTRACT TESTS
// ============================================================================

#[test]
fn test_png_chunk_crcs_verify() {
    let img = screen::render(&reference_request(), &fixed_ctx()).unwrap();
    let bytes = png::encode(&img).unwrap();

    assert_eq!(&bytes[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);

    // Walk every chunk and recompute its CRC over type + data
    let mut offset = 8;
    let mut seen = Vec::new();
    while offset + 12 <= bytes.len() {
        let len = u32::from_be_bytes(bytes[offset..offset + 4].try_into().unwrap()) as usize;
        let crc_start = offset + 8 + len;
        let expected = png::crc32(&bytes[offset + 4..crc_start]);
        let stored = u32::from_be_bytes(bytes[crc_start..crc_start + 4].try_into().unwrap());
        assert_eq!(stored, expected);
        seen.push(bytes[offset + 4..offset + 8].to_vec());
        offset = crc_start + 4;
    }
    assert_eq!(offset, bytes.len());
    assert_eq!(
        seen,
        vec![b"IHDR".to_vec(), b"IDAT".to_vec(), b"IEND".to_vec()]
    );
}

#[test]
fn test_png_matches_canvas_via_independent_decoder() {
    let img = screen::render(&reference_request(), &fixed_ctx()).unwrap();
    let bytes = png::encode(&img).unwrap();

    let decoded = image::load_from_memory(&bytes).unwrap().to_luma8();
    assert_eq!(decoded.width(), img.width());
    assert_eq!(decoded.height(), img.height());
    let mut mismatches = 0;
    for y in 0..img.height() {
        for x in 0..img.width() {
            let ink = img.get_pixel(x as i32, y as i32);
            let luma = decoded.get_pixel(x, y).0[0];
            if ink != (luma == 0) {
                mismatches += 1;
            }
        }
    }
    assert_eq!(mismatches, 0);
}

// ============================================================================
// PORTRAIT TESTS
// ============================================================================

#[test]
fn test_portrait_screen_is_panel_native_and_rotated() {
    let mut request = reference_request();
    request.layout.portrait = true;
    let ctx = fixed_ctx();

    let portrait = screen::render(&request, &ctx).unwrap();
    assert_eq!((portrait.width(), portrait.height()), (800, 480));

    // The portrait composition differs from the landscape one
    request.layout.portrait = false;
    let landscape = screen::render(&request, &ctx).unwrap();
    assert_ne!(portrait.data(), landscape.data());
}
