//! Canonical geometric primitives shared by the symbol and footprint encoders.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Cardinal pin direction in the EasyEDA (Y-down) frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinRotation {
    /// Stub points right
    Deg0,
    /// Stub points down
    Deg90,
    /// Stub points left
    Deg180,
    /// Stub points up
    Deg270,
}

impl PinRotation {
    /// Anything that is not exactly 0, 90 or 180 becomes 270. EasyEDA's own
    /// preview code falls through to "up" the same way, so the output stays
    /// compatible with what users see upstream.
    pub fn from_degrees(degrees: f64) -> Self {
        if degrees == 0.0 {
            Self::Deg0
        } else if degrees == 90.0 {
            Self::Deg90
        } else if degrees == 180.0 {
            Self::Deg180
        } else {
            Self::Deg270
        }
    }

    pub fn degrees(self) -> f64 {
        match self {
            Self::Deg0 => 0.0,
            Self::Deg90 => 90.0,
            Self::Deg180 => 180.0,
            Self::Deg270 => 270.0,
        }
    }

    /// Unit vector along the pin stub, Y-down.
    pub fn direction(self) -> DVec2 {
        match self {
            Self::Deg0 => DVec2::X,
            Self::Deg90 => DVec2::Y,
            Self::Deg180 => DVec2::NEG_X,
            Self::Deg270 => DVec2::NEG_Y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PadShape {
    Rect,
    Oval,
    Ellipse,
    Polygon,
}

impl PadShape {
    /// Parse an EasyEDA pad shape token. Unknown tokens fall back to `Rect`.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_uppercase().as_str() {
            "OVAL" => Self::Oval,
            "ELLIPSE" => Self::Ellipse,
            "POLYGON" => Self::Polygon,
            "RECT" => Self::Rect,
            other => {
                log::debug!("Unknown pad shape {other:?}, using RECT");
                Self::Rect
            }
        }
    }
}

/// One decoded primitive. Coordinates are already in the working unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeRecord {
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        filled: bool,
        /// EasyEDA layer id for footprint rectangles, `None` in symbols.
        layer: Option<u32>,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    Pin {
        x: f64,
        y: f64,
        rotation: PinRotation,
        /// Declared pin number, also used as the pin name.
        number: String,
    },
    Polyline {
        points: Vec<DVec2>,
    },
    /// Closed and filled.
    Polygon {
        points: Vec<DVec2>,
    },
    Pad {
        shape: PadShape,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        layer: u32,
        number: String,
        hole_diameter: f64,
    },
    Track {
        width: f64,
        layer: u32,
        points: Vec<DVec2>,
    },
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
        stroke_width: f64,
        layer: u32,
    },
    Hole {
        x: f64,
        y: f64,
        diameter: f64,
    },
}

impl ShapeRecord {
    /// Short lowercase name used in log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rectangle { .. } => "rectangle",
            Self::Ellipse { .. } => "ellipse",
            Self::Pin { .. } => "pin",
            Self::Polyline { .. } => "polyline",
            Self::Polygon { .. } => "polygon",
            Self::Pad { .. } => "pad",
            Self::Track { .. } => "track",
            Self::Circle { .. } => "circle",
            Self::Hole { .. } => "hole",
        }
    }

    /// Axis-aligned extent of the record. Every variant carries coordinates,
    /// but a point list can in principle be empty when built by hand.
    pub fn bounds(&self) -> Option<BBox> {
        match self {
            Self::Rectangle {
                x,
                y,
                width,
                height,
                ..
            } => Some(BBox::from_corners(
                DVec2::new(*x, *y),
                DVec2::new(x + width, y + height),
            )),
            Self::Ellipse { cx, cy, rx, ry } => Some(BBox::around(
                DVec2::new(*cx, *cy),
                DVec2::new(rx.abs(), ry.abs()),
            )),
            Self::Pin { x, y, .. } => Some(BBox::point(DVec2::new(*x, *y))),
            Self::Polyline { points } | Self::Polygon { points } | Self::Track { points, .. } => {
                BBox::from_points(points)
            }
            Self::Pad {
                x,
                y,
                width,
                height,
                ..
            } => Some(BBox::around(
                DVec2::new(*x, *y),
                DVec2::new(width.abs(), height.abs()) / 2.0,
            )),
            Self::Circle { cx, cy, radius, .. } => Some(BBox::around(
                DVec2::new(*cx, *cy),
                DVec2::splat(radius.abs()),
            )),
            Self::Hole { x, y, diameter } => Some(BBox::around(
                DVec2::new(*x, *y),
                DVec2::splat(diameter.abs() / 2.0),
            )),
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl BBox {
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn point(p: DVec2) -> Self {
        Self { min: p, max: p }
    }

    pub fn around(center: DVec2, half_extent: DVec2) -> Self {
        Self::from_corners(center - half_extent, center + half_extent)
    }

    pub fn from_points(points: &[DVec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(Self::point(*first), |bbox, p| {
            bbox.union(&Self::point(*p))
        }))
    }

    pub fn union(&self, other: &BBox) -> BBox {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) / 2.0
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }
}
