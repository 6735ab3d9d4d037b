use std::f64::consts::TAU;

use glam::DVec2;
use lcsc_easyeda::{BBox, ShapeRecord};

/// Segments used to approximate a non-circular ellipse.
pub const ELLIPSE_SEGMENTS: usize = 32;

/// Union of every record's extent, `None` when nothing has coordinates.
pub fn union_bounds(records: &[ShapeRecord]) -> Option<BBox> {
    records
        .iter()
        .filter_map(ShapeRecord::bounds)
        .reduce(|acc, bbox| acc.union(&bbox))
}

/// Closed outline of an axis-aligned ellipse; the first point is repeated last.
pub fn ellipse_outline(center: DVec2, radii: DVec2) -> Vec<DVec2> {
    (0..=ELLIPSE_SEGMENTS)
        .map(|i| {
            let t = TAU * (i % ELLIPSE_SEGMENTS) as f64 / ELLIPSE_SEGMENTS as f64;
            center + radii * DVec2::new(t.cos(), t.sin())
        })
        .collect()
}

pub fn is_circular(rx: f64, ry: f64) -> bool {
    (rx - ry).abs() <= 1e-9
}

/// Append the first point when the outline is not already closed.
pub fn close_outline(points: &[DVec2]) -> Vec<DVec2> {
    let mut closed = points.to_vec();
    if let (Some(first), Some(last)) = (points.first(), points.last())
        && first != last
    {
        closed.push(*first);
    }
    closed
}
