use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Decode-time multiplier from EasyEDA units to the caller's working unit.
///
/// EasyEDA stores geometry in 10 mil steps, so one source unit is 0.254 mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale(f64);

impl Scale {
    /// Keep source units.
    pub const NATIVE: Scale = Scale(1.0);
    /// Millimeters, used by the KiCad encoders.
    pub const MILLIMETERS: Scale = Scale(0.254);
    /// Pixels for a 400x400 symbol preview.
    pub const SYMBOL_PREVIEW: Scale = Scale(0.2);
    /// Pixels for a 400x400 footprint preview.
    pub const FOOTPRINT_PREVIEW: Scale = Scale(0.4);

    pub const fn new(factor: f64) -> Self {
        Self(factor)
    }

    pub const fn factor(self) -> f64 {
        self.0
    }

    /// Scale a length (size, width, radius, drill).
    pub fn length(self, value: f64) -> f64 {
        value * self.0
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::NATIVE
    }
}

/// Per-drawing translation read from the payload header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawingOrigin {
    pub x: f64,
    pub y: f64,
}

impl DrawingOrigin {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Map a source coordinate into the working unit: subtract, then scale.
    pub fn point(self, x: f64, y: f64, scale: Scale) -> DVec2 {
        DVec2::new(x - self.x, y - self.y) * scale.factor()
    }
}
