//! `.kicad_mod` footprint encoder.
//!
//! Footprints share EasyEDA's Y-down orientation, so coordinates are written
//! unchanged. Text anchors are derived from the union bounding box of all
//! records: reference above, value below, package label in the middle.

use glam::DVec2;
use lcsc_easyeda::{PadShape, ShapeRecord};
use lcsc_sexpr::formatter::format_tree;
use lcsc_sexpr::{ListBuilder, Sexpr, at, kv};

use crate::builder::{ListBuilderExt, font_effects, pts};
use crate::fallback::{drawable_or_placeholder, placeholder_footprint};
use crate::geometry::{ellipse_outline, is_circular};
use crate::layers::{THROUGH_HOLE_LAYERS, TOP_SILK, graphic_layer, smd_pad_layers};
use crate::metadata::ComponentMetadata;
use crate::{EncodedDocument, FORMAT_VERSION, GENERATOR};

const GRAPHIC_WIDTH: f64 = 0.12;

#[derive(Debug, Clone, PartialEq)]
pub struct FootprintOptions {
    /// Gap between the drawing's bounding box and the reference/value text.
    pub text_margin: f64,
    /// Written as `(model "<path>" ...)` when set.
    pub model_path: Option<String>,
}

impl Default for FootprintOptions {
    fn default() -> Self {
        Self {
            text_margin: 1.5,
            model_path: None,
        }
    }
}

/// Encode records (in millimeters) with default options.
pub fn encode_footprint(records: &[ShapeRecord], metadata: &ComponentMetadata) -> EncodedDocument {
    encode_footprint_with(records, metadata, &FootprintOptions::default())
}

pub fn encode_footprint_with(
    records: &[ShapeRecord],
    metadata: &ComponentMetadata,
    options: &FootprintOptions,
) -> EncodedDocument {
    let name = metadata.footprint_entry_name();
    let drawable = drawable_or_placeholder(records, placeholder_footprint);
    let bounds = drawable.bounds;
    let through_hole = is_through_hole(&drawable.records);

    let mut fp = ListBuilder::node("footprint");
    fp.push(Sexpr::string(name.as_str()))
        .push(kv("version", FORMAT_VERSION))
        .push(kv("generator", GENERATOR))
        .kv_str("layer", "F.Cu")
        .kv_str("descr", &metadata.description)
        .kv_str("tags", &format!("{} LCSC:{}", metadata.package, metadata.part_id))
        .push(kv("attr", if through_hole { "through_hole" } else { "smd" }));

    let center = bounds.center();
    fp.push(fp_text(
        "reference",
        "REF**",
        DVec2::new(center.x, bounds.min.y - options.text_margin),
        "F.SilkS",
        1.0,
        0.15,
    ))
    .push(fp_text(
        "value",
        &name,
        DVec2::new(center.x, bounds.max.y + options.text_margin),
        "F.Fab",
        1.0,
        0.15,
    ))
    .push(fp_text("user", &metadata.package, center, "F.Fab", 0.8, 0.12));

    for record in drawable.records.iter() {
        let nodes = record_nodes(record);
        if nodes.is_empty() {
            log::debug!("{} records have no footprint equivalent", record.kind());
        }
        fp.extend(nodes);
    }

    if let Some(path) = &options.model_path {
        fp.push(model(path));
    }

    log::info!(
        "Encoded footprint {name}: {} records, {}{}",
        drawable.records.len(),
        if through_hole { "through_hole" } else { "smd" },
        if drawable.used_fallback { " (placeholder)" } else { "" }
    );

    EncodedDocument {
        name,
        text: format_tree(&fp.build()),
        used_fallback: drawable.used_fallback,
    }
}

/// Any drilled pad makes the whole footprint through-hole. The drill sign is
/// ignored.
pub fn is_through_hole(records: &[ShapeRecord]) -> bool {
    records.iter().any(|record| {
        matches!(record, ShapeRecord::Pad { hole_diameter, .. } if *hole_diameter != 0.0)
    })
}

fn fp_text(kind: &str, text: &str, pos: DVec2, layer: &str, size: f64, thickness: f64) -> Sexpr {
    let mut node = ListBuilder::node("fp_text");
    node.push(kind)
        .push(Sexpr::string(text))
        .push(at(pos.x, pos.y, None))
        .kv_str("layer", layer)
        .push(font_effects(size, Some(thickness), false));
    node.build()
}

fn record_nodes(record: &ShapeRecord) -> Vec<Sexpr> {
    match record {
        ShapeRecord::Pad {
            shape,
            x,
            y,
            width,
            height,
            layer,
            number,
            hole_diameter,
        } => vec![pad(
            number,
            *shape,
            DVec2::new(*x, *y),
            DVec2::new(*width, *height),
            *layer,
            *hole_diameter,
        )],
        ShapeRecord::Hole { x, y, diameter } => vec![hole(DVec2::new(*x, *y), *diameter)],
        ShapeRecord::Track {
            width,
            layer,
            points,
        } => segments(points, *width, graphic_layer(*layer)),
        ShapeRecord::Polyline { points } => {
            segments(points, GRAPHIC_WIDTH, graphic_layer(TOP_SILK))
        }
        ShapeRecord::Polygon { points } => vec![fp_poly(points, "solid")],
        ShapeRecord::Circle {
            cx,
            cy,
            radius,
            stroke_width,
            layer,
        } => vec![fp_circle(
            DVec2::new(*cx, *cy),
            *radius,
            *stroke_width,
            graphic_layer(*layer),
        )],
        ShapeRecord::Ellipse { cx, cy, rx, ry } if is_circular(*rx, *ry) => vec![fp_circle(
            DVec2::new(*cx, *cy),
            *rx,
            GRAPHIC_WIDTH,
            graphic_layer(TOP_SILK),
        )],
        ShapeRecord::Ellipse { cx, cy, rx, ry } => {
            let outline = ellipse_outline(DVec2::new(*cx, *cy), DVec2::new(*rx, *ry));
            vec![fp_poly(&outline, "none")]
        }
        ShapeRecord::Rectangle {
            x,
            y,
            width,
            height,
            layer,
            ..
        } => {
            let mut node = ListBuilder::node("fp_rect");
            node.kv_point("start", DVec2::new(*x, *y))
                .kv_point("end", DVec2::new(x + width, y + height))
                .kv_str("layer", graphic_layer(layer.unwrap_or(TOP_SILK)))
                .kv_f64("width", GRAPHIC_WIDTH)
                .push(kv("fill", "none"));
            vec![node.build()]
        }
        ShapeRecord::Pin { .. } => Vec::new(),
    }
}

fn pad_shape_token(shape: PadShape, size: DVec2) -> &'static str {
    match shape {
        PadShape::Rect | PadShape::Polygon => "rect",
        PadShape::Oval => "oval",
        PadShape::Ellipse if is_circular(size.x, size.y) => "circle",
        PadShape::Ellipse => "oval",
    }
}

fn pad(
    number: &str,
    shape: PadShape,
    pos: DVec2,
    size: DVec2,
    layer: u32,
    hole_diameter: f64,
) -> Sexpr {
    let drill = hole_diameter.abs();
    let mut node = ListBuilder::node("pad");
    node.push(Sexpr::string(number));
    if drill > 0.0 {
        node.push("thru_hole");
    } else {
        node.push("smd");
    }
    node.push(pad_shape_token(shape, size))
        .push(at(pos.x, pos.y, None))
        .kv_point("size", size);

    if drill > 0.0 {
        node.kv_f64("drill", drill)
            .push(layers_node(&THROUGH_HOLE_LAYERS));
    } else {
        node.push(layers_node(&smd_pad_layers(layer)));
    }
    node.build()
}

fn hole(pos: DVec2, diameter: f64) -> Sexpr {
    let mut node = ListBuilder::node("pad");
    node.push(Sexpr::string(""))
        .push("np_thru_hole")
        .push("circle")
        .push(at(pos.x, pos.y, None))
        .kv_point("size", DVec2::splat(diameter))
        .kv_f64("drill", diameter)
        .push(layers_node(&THROUGH_HOLE_LAYERS));
    node.build()
}

fn layers_node(layers: &[&str]) -> Sexpr {
    let mut node = ListBuilder::node("layers");
    node.extend(layers.iter().map(|layer| Sexpr::string(*layer)));
    node.build()
}

fn segments(points: &[DVec2], width: f64, layer: &str) -> Vec<Sexpr> {
    points
        .windows(2)
        .map(|pair| {
            let mut node = ListBuilder::node("fp_line");
            node.kv_point("start", pair[0])
                .kv_point("end", pair[1])
                .kv_str("layer", layer)
                .kv_f64("width", width);
            node.build()
        })
        .collect()
}

fn fp_circle(center: DVec2, radius: f64, width: f64, layer: &str) -> Sexpr {
    let mut node = ListBuilder::node("fp_circle");
    node.kv_point("center", center)
        .kv_point("end", center + DVec2::new(radius, 0.0))
        .kv_str("layer", layer)
        .kv_f64("width", width)
        .push(kv("fill", "none"));
    node.build()
}

fn fp_poly(points: &[DVec2], fill: &str) -> Sexpr {
    let mut node = ListBuilder::node("fp_poly");
    node.push(pts(points))
        .kv_str("layer", graphic_layer(TOP_SILK))
        .kv_f64("width", GRAPHIC_WIDTH)
        .push(kv("fill", fill));
    node.build()
}

fn model(path: &str) -> Sexpr {
    let xyz = |v: f64| {
        let mut node = ListBuilder::node("xyz");
        node.push(v).push(v).push(v);
        node.build()
    };
    let mut node = ListBuilder::node("model");
    node.push(Sexpr::string(path))
        .push(kv("offset", xyz(0.0)))
        .push(kv("scale", xyz(1.0)))
        .push(kv("rotate", xyz(0.0)));
    node.build()
}
