//! Placeholder drawings used when a part has no usable geometry.
//!
//! Both placeholders are ordinary records in millimeters (EasyEDA Y-down
//! frame), so they go through the same encoders as real drawings.

use std::borrow::Cow;

use lcsc_easyeda::{BBox, PadShape, PinRotation, ShapeRecord};

use crate::geometry::union_bounds;
use crate::layers::{FAB, TOP_COPPER};

/// Records to draw, their extent, and whether the placeholder was substituted.
pub(crate) struct Drawable<'a> {
    pub records: Cow<'a, [ShapeRecord]>,
    pub bounds: BBox,
    pub used_fallback: bool,
}

pub(crate) fn drawable_or_placeholder(
    records: &[ShapeRecord],
    placeholder: fn() -> Vec<ShapeRecord>,
) -> Drawable<'_> {
    if let Some(bounds) = union_bounds(records) {
        return Drawable {
            records: Cow::Borrowed(records),
            bounds,
            used_fallback: false,
        };
    }

    log::warn!(
        "No geometry in {} decoded records, drawing placeholder",
        records.len()
    );
    let records = placeholder();
    let bounds = union_bounds(&records).unwrap_or(BBox::point(glam::DVec2::ZERO));
    Drawable {
        records: Cow::Owned(records),
        bounds,
        used_fallback: true,
    }
}

/// 10.16 x 7.62 mm body with pin 1 on the left and pin 2 on the right.
pub fn placeholder_symbol() -> Vec<ShapeRecord> {
    vec![
        ShapeRecord::Rectangle {
            x: -5.08,
            y: -3.81,
            width: 10.16,
            height: 7.62,
            filled: true,
            layer: None,
        },
        placeholder_pin("1", -7.62, PinRotation::Deg0),
        placeholder_pin("2", 7.62, PinRotation::Deg180),
    ]
}

/// Two 0.8 x 1.2 mm SMD pads inside a 2.4 x 1.6 mm fab outline.
pub fn placeholder_footprint() -> Vec<ShapeRecord> {
    vec![
        ShapeRecord::Rectangle {
            x: -1.2,
            y: -0.8,
            width: 2.4,
            height: 1.6,
            filled: false,
            layer: Some(FAB),
        },
        placeholder_pad("1", -1.0),
        placeholder_pad("2", 1.0),
    ]
}

fn placeholder_pin(number: &str, x: f64, rotation: PinRotation) -> ShapeRecord {
    ShapeRecord::Pin {
        x,
        y: 0.0,
        rotation,
        number: number.to_string(),
    }
}

fn placeholder_pad(number: &str, x: f64) -> ShapeRecord {
    ShapeRecord::Pad {
        shape: PadShape::Rect,
        x,
        y: 0.0,
        width: 0.8,
        height: 1.2,
        layer: TOP_COPPER,
        number: number.to_string(),
        hole_diameter: 0.0,
    }
}
