//! Opcode dispatch from tokenized lines to [`ShapeRecord`]s.

use glam::DVec2;

use crate::error::RecordError;
use crate::shape::{PadShape, PinRotation, ShapeRecord};
use crate::tokenizer::tokenize;
use crate::units::{DrawingOrigin, Scale};

/// Per-call decode state.
pub struct DecodeContext {
    pub origin: DrawingOrigin,
    pub scale: Scale,
    pins_decoded: usize,
}

impl DecodeContext {
    pub fn new(origin: DrawingOrigin, scale: Scale) -> Self {
        Self {
            origin,
            scale,
            pins_decoded: 0,
        }
    }

    fn point(&self, x: f64, y: f64) -> DVec2 {
        self.origin.point(x, y, self.scale)
    }

    fn length(&self, value: f64) -> f64 {
        self.scale.length(value)
    }
}

type DecodeFn = fn(&[String], &mut DecodeContext) -> Result<ShapeRecord, RecordError>;

pub struct OpcodeEntry {
    pub opcode: &'static str,
    pub min_fields: usize,
    decode: DecodeFn,
}

static OPCODES: &[OpcodeEntry] = &[
    OpcodeEntry {
        opcode: "R",
        min_fields: 4,
        decode: decode_rectangle,
    },
    OpcodeEntry {
        opcode: "E",
        min_fields: 4,
        decode: decode_ellipse,
    },
    OpcodeEntry {
        opcode: "P",
        min_fields: 2,
        decode: decode_pin,
    },
    OpcodeEntry {
        opcode: "PL",
        min_fields: 1,
        decode: decode_polyline,
    },
    OpcodeEntry {
        opcode: "PG",
        min_fields: 1,
        decode: decode_polygon,
    },
    OpcodeEntry {
        opcode: "PAD",
        min_fields: 5,
        decode: decode_pad,
    },
    OpcodeEntry {
        opcode: "TRACK",
        min_fields: 3,
        decode: decode_track,
    },
    OpcodeEntry {
        opcode: "CIRCLE",
        min_fields: 3,
        decode: decode_circle,
    },
    OpcodeEntry {
        opcode: "RECT",
        min_fields: 4,
        decode: decode_rect,
    },
    OpcodeEntry {
        opcode: "HOLE",
        min_fields: 3,
        decode: decode_hole,
    },
];

/// Look up the table entry for an opcode.
pub fn lookup(opcode: &str) -> Option<&'static OpcodeEntry> {
    OPCODES.iter().find(|entry| entry.opcode == opcode)
}

/// Opcodes the decoder understands.
pub fn known_opcodes() -> impl Iterator<Item = &'static str> {
    OPCODES.iter().map(|entry| entry.opcode)
}

/// Decode shape-language lines into records, in input order.
///
/// Unknown opcodes and malformed records are skipped with a debug log.
pub fn decode<S: AsRef<str>>(lines: &[S], origin: DrawingOrigin, scale: Scale) -> Vec<ShapeRecord> {
    let mut ctx = DecodeContext::new(origin, scale);
    let mut records = Vec::with_capacity(lines.len());

    for (line_no, line) in lines.iter().enumerate() {
        let Some(tokens) = tokenize(line.as_ref()) else {
            continue;
        };
        let Some(entry) = lookup(&tokens.opcode) else {
            log::debug!("Skipping unknown opcode {:?} on line {line_no}", tokens.opcode);
            continue;
        };
        if tokens.fields.len() < entry.min_fields {
            log::debug!(
                "Skipping {} on line {line_no}: {}",
                entry.opcode,
                RecordError::TooFewFields {
                    expected: entry.min_fields,
                    found: tokens.fields.len(),
                }
            );
            continue;
        }
        match (entry.decode)(&tokens.fields, &mut ctx) {
            Ok(record) => records.push(record),
            Err(err) => log::debug!("Skipping {} on line {line_no}: {err}", entry.opcode),
        }
    }

    records
}

fn number(fields: &[String], index: usize) -> Result<f64, RecordError> {
    let raw = fields.get(index).map(String::as_str).unwrap_or_default();
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RecordError::NotANumber {
            index,
            value: raw.to_string(),
        })
}

/// Like [`number`], but an absent or empty field yields `default`.
fn number_or(fields: &[String], index: usize, default: f64) -> Result<f64, RecordError> {
    match fields.get(index) {
        Some(raw) if !raw.trim().is_empty() => number(fields, index),
        _ => Ok(default),
    }
}

fn layer_or(fields: &[String], index: usize, default: u32) -> Result<u32, RecordError> {
    match fields.get(index).map(|raw| raw.trim()) {
        Some(raw) if !raw.is_empty() => raw.parse().map_err(|_| RecordError::NotANumber {
            index,
            value: raw.to_string(),
        }),
        _ => Ok(default),
    }
}

fn text_or(fields: &[String], index: usize) -> Option<String> {
    fields
        .get(index)
        .map(|raw| raw.trim())
        .filter(|raw| !raw.is_empty())
        .map(str::to_string)
}

/// Parse `"x1 y1 x2 y2 ..."`. A dangling odd coordinate is ignored.
fn points(field: &str, ctx: &DecodeContext) -> Result<Vec<DVec2>, RecordError> {
    let coords = field
        .split_whitespace()
        .map(|raw| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| RecordError::NotANumber {
                    index: 0,
                    value: raw.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let points: Vec<DVec2> = coords
        .chunks_exact(2)
        .map(|pair| ctx.point(pair[0], pair[1]))
        .collect();
    if points.len() < 2 {
        return Err(RecordError::TooFewPoints(points.len()));
    }
    Ok(points)
}

fn decode_rectangle(
    fields: &[String],
    ctx: &mut DecodeContext,
) -> Result<ShapeRecord, RecordError> {
    let p = ctx.point(number(fields, 0)?, number(fields, 1)?);
    // An empty fill field still counts as filled; only `none` or no field at all is hollow.
    let filled = fields.get(8).is_some_and(|fill| fill.trim() != "none");
    Ok(ShapeRecord::Rectangle {
        x: p.x,
        y: p.y,
        width: ctx.length(number(fields, 2)?),
        height: ctx.length(number(fields, 3)?),
        filled,
        layer: None,
    })
}

fn decode_ellipse(fields: &[String], ctx: &mut DecodeContext) -> Result<ShapeRecord, RecordError> {
    let c = ctx.point(number(fields, 0)?, number(fields, 1)?);
    Ok(ShapeRecord::Ellipse {
        cx: c.x,
        cy: c.y,
        rx: ctx.length(number(fields, 2)?),
        ry: ctx.length(number(fields, 3)?),
    })
}

fn decode_pin(fields: &[String], ctx: &mut DecodeContext) -> Result<ShapeRecord, RecordError> {
    let p = ctx.point(number(fields, 0)?, number(fields, 1)?);
    let rotation = PinRotation::from_degrees(number_or(fields, 2, 0.0)?);

    // Field 4 holds the drawn pin label; symbols name pins by number.
    ctx.pins_decoded += 1;
    let number = text_or(fields, 5).unwrap_or_else(|| ctx.pins_decoded.to_string());
    Ok(ShapeRecord::Pin {
        x: p.x,
        y: p.y,
        rotation,
        number,
    })
}

fn decode_polyline(fields: &[String], ctx: &mut DecodeContext) -> Result<ShapeRecord, RecordError> {
    let points = points(&fields[0], ctx)?;
    Ok(ShapeRecord::Polyline { points })
}

fn decode_polygon(fields: &[String], ctx: &mut DecodeContext) -> Result<ShapeRecord, RecordError> {
    match decode_polyline(fields, ctx)? {
        ShapeRecord::Polyline { points } => Ok(ShapeRecord::Polygon { points }),
        other => Ok(other),
    }
}

fn decode_pad(fields: &[String], ctx: &mut DecodeContext) -> Result<ShapeRecord, RecordError> {
    let p = ctx.point(number(fields, 1)?, number(fields, 2)?);
    Ok(ShapeRecord::Pad {
        shape: PadShape::from_token(&fields[0]),
        x: p.x,
        y: p.y,
        width: ctx.length(number(fields, 3)?),
        height: ctx.length(number(fields, 4)?),
        layer: layer_or(fields, 5, 1)?,
        number: text_or(fields, 6).unwrap_or_default(),
        hole_diameter: ctx.length(number_or(fields, 7, 0.0)?),
    })
}

fn decode_track(fields: &[String], ctx: &mut DecodeContext) -> Result<ShapeRecord, RecordError> {
    Ok(ShapeRecord::Track {
        width: ctx.length(number(fields, 0)?),
        layer: layer_or(fields, 1, 3)?,
        points: points(&fields[2], ctx)?,
    })
}

fn decode_circle(fields: &[String], ctx: &mut DecodeContext) -> Result<ShapeRecord, RecordError> {
    let c = ctx.point(number(fields, 0)?, number(fields, 1)?);
    Ok(ShapeRecord::Circle {
        cx: c.x,
        cy: c.y,
        radius: ctx.length(number(fields, 2)?),
        stroke_width: ctx.length(number_or(fields, 3, 1.0)?),
        layer: layer_or(fields, 4, 3)?,
    })
}

fn decode_rect(fields: &[String], ctx: &mut DecodeContext) -> Result<ShapeRecord, RecordError> {
    let p = ctx.point(number(fields, 0)?, number(fields, 1)?);
    Ok(ShapeRecord::Rectangle {
        x: p.x,
        y: p.y,
        width: ctx.length(number(fields, 2)?),
        height: ctx.length(number(fields, 3)?),
        filled: false,
        layer: Some(layer_or(fields, 4, 3)?),
    })
}

fn decode_hole(fields: &[String], ctx: &mut DecodeContext) -> Result<ShapeRecord, RecordError> {
    let p = ctx.point(number(fields, 0)?, number(fields, 1)?);
    Ok(ShapeRecord::Hole {
        x: p.x,
        y: p.y,
        diameter: ctx.length(number(fields, 2)?),
    })
}
