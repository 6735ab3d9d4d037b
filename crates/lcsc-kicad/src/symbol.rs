//! `.kicad_sym` symbol library encoder.

use glam::DVec2;
use lcsc_easyeda::{PinRotation, ShapeRecord};
use lcsc_sexpr::formatter::format_tree;
use lcsc_sexpr::{ListBuilder, Sexpr, at, kv};

use crate::builder::{ListBuilderExt, fill, font_effects, pts, stroke};
use crate::fallback::{drawable_or_placeholder, placeholder_symbol};
use crate::geometry::{close_outline, ellipse_outline, is_circular};
use crate::metadata::{ComponentMetadata, PROPERTY_NAMES};
use crate::{EncodedDocument, FORMAT_VERSION, GENERATOR};

/// EasyEDA symbols are Y-down, KiCad symbols are Y-up.
const Y_FLIP: DVec2 = DVec2::new(1.0, -1.0);

const PIN_LENGTH: f64 = 2.54;
const PIN_NAME_OFFSET: f64 = 1.016;
const TEXT_SIZE: f64 = 1.27;
const STROKE_WIDTH: f64 = 0.254;

/// Property anchor Y offset from the symbol origin and whether it is hidden,
/// matching [`PROPERTY_NAMES`] order.
const PROPERTY_LAYOUT: [(f64, bool); 7] = [
    (5.08, false),
    (-5.08, false),
    (-7.62, true),
    (0.0, true),
    (0.0, true),
    (-10.16, true),
    (-12.7, true),
];

/// Encode records (in millimeters) as a single-symbol library document.
pub fn encode_symbol(records: &[ShapeRecord], metadata: &ComponentMetadata) -> EncodedDocument {
    let name = metadata.symbol_entry_name();
    let drawable = drawable_or_placeholder(records, placeholder_symbol);

    let mut symbol = ListBuilder::node("symbol");
    symbol
        .push(Sexpr::string(name.as_str()))
        .push(kv("pin_names", kv("offset", PIN_NAME_OFFSET)))
        .push(kv("in_bom", true))
        .push(kv("on_board", true));

    let values = metadata.property_values();
    for (id, (key, (offset_y, hidden))) in PROPERTY_NAMES.iter().zip(PROPERTY_LAYOUT).enumerate() {
        symbol.push(property(id as i64, key, values[id], offset_y, hidden));
    }

    let mut unit = ListBuilder::node("symbol");
    unit.push(Sexpr::string(format!("{name}_1_1")));
    for record in drawable.records.iter() {
        match record_node(record) {
            Some(node) => {
                unit.push(node);
            }
            None => log::debug!("{} records have no symbol equivalent", record.kind()),
        }
    }
    symbol.push(unit.build());

    let mut lib = ListBuilder::node("kicad_symbol_lib");
    lib.push(kv("version", FORMAT_VERSION))
        .push(kv("generator", GENERATOR))
        .push(symbol.build());

    let size = drawable.bounds.size();
    log::info!(
        "Encoded symbol {name}: {} records, {:.2} x {:.2} mm{}",
        drawable.records.len(),
        size.x,
        size.y,
        if drawable.used_fallback { " (placeholder)" } else { "" }
    );

    EncodedDocument {
        name,
        text: format_tree(&lib.build()),
        used_fallback: drawable.used_fallback,
    }
}

/// KiCad pin angle for an EasyEDA stub direction. Mirroring across the X axis
/// swaps up and down.
pub fn kicad_pin_angle(rotation: PinRotation) -> f64 {
    match rotation {
        PinRotation::Deg0 => 0.0,
        PinRotation::Deg90 => 270.0,
        PinRotation::Deg180 => 180.0,
        PinRotation::Deg270 => 90.0,
    }
}

fn property(id: i64, key: &str, value: &str, offset_y: f64, hidden: bool) -> Sexpr {
    let mut node = ListBuilder::node("property");
    node.push(Sexpr::string(key))
        .push(Sexpr::string(value))
        .push(kv("id", id))
        .push(at(0.0, offset_y, Some(0.0)))
        .push(font_effects(TEXT_SIZE, None, hidden));
    node.build()
}

fn flip(x: f64, y: f64) -> DVec2 {
    DVec2::new(x, y) * Y_FLIP
}

fn record_node(record: &ShapeRecord) -> Option<Sexpr> {
    match record {
        ShapeRecord::Rectangle {
            x,
            y,
            width,
            height,
            filled,
            ..
        } => {
            let mut node = ListBuilder::node("rectangle");
            node.kv_point("start", flip(*x, *y))
                .kv_point("end", flip(x + width, y + height))
                .push(stroke(STROKE_WIDTH))
                .push(fill(if *filled { "background" } else { "none" }));
            Some(node.build())
        }
        ShapeRecord::Ellipse { cx, cy, rx, ry } if is_circular(*rx, *ry) => {
            Some(circle(flip(*cx, *cy), *rx))
        }
        ShapeRecord::Ellipse { cx, cy, rx, ry } => {
            let outline = ellipse_outline(flip(*cx, *cy), DVec2::new(*rx, *ry));
            Some(polyline(&outline, false))
        }
        ShapeRecord::Circle { cx, cy, radius, .. } => Some(circle(flip(*cx, *cy), *radius)),
        ShapeRecord::Polyline { points } | ShapeRecord::Track { points, .. } => {
            Some(polyline(&flip_all(points), false))
        }
        ShapeRecord::Polygon { points } => Some(polyline(&close_outline(&flip_all(points)), true)),
        ShapeRecord::Pin {
            x,
            y,
            rotation,
            number,
        } => Some(pin(flip(*x, *y), *rotation, number)),
        ShapeRecord::Pad { .. } | ShapeRecord::Hole { .. } => None,
    }
}

fn flip_all(points: &[DVec2]) -> Vec<DVec2> {
    points.iter().map(|p| *p * Y_FLIP).collect()
}

fn circle(center: DVec2, radius: f64) -> Sexpr {
    let mut node = ListBuilder::node("circle");
    node.kv_point("center", center)
        .kv_f64("radius", radius)
        .push(stroke(STROKE_WIDTH))
        .push(fill("none"));
    node.build()
}

fn polyline(points: &[DVec2], filled: bool) -> Sexpr {
    let mut node = ListBuilder::node("polyline");
    node.push(pts(points))
        .push(stroke(STROKE_WIDTH))
        .push(fill(if filled { "background" } else { "none" }));
    node.build()
}

/// Pins are named after their number.
fn pin(p: DVec2, rotation: PinRotation, number: &str) -> Sexpr {
    let mut node = ListBuilder::node("pin");
    node.push("unspecified")
        .push("line")
        .push(at(p.x, p.y, Some(kicad_pin_angle(rotation))))
        .kv_f64("length", PIN_LENGTH)
        .push(pin_label("name", number))
        .push(pin_label("number", number));
    node.build()
}

fn pin_label(tag: &str, text: &str) -> Sexpr {
    let mut node = ListBuilder::node(tag);
    node.push(Sexpr::string(text))
        .push(font_effects(TEXT_SIZE, None, false));
    node.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> ComponentMetadata {
        ComponentMetadata {
            name: "R1".into(),
            prefix: "U".into(),
            part_id: "C1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn pin_angles_mirror_vertical_directions() {
        assert_eq!(kicad_pin_angle(PinRotation::Deg0), 0.0);
        assert_eq!(kicad_pin_angle(PinRotation::Deg90), 270.0);
        assert_eq!(kicad_pin_angle(PinRotation::Deg180), 180.0);
        assert_eq!(kicad_pin_angle(PinRotation::Deg270), 90.0);
    }

    #[test]
    fn header_and_properties() {
        let doc = encode_symbol(&[], &meta());
        let parsed = lcsc_sexpr::parse(&doc.text).unwrap();
        assert_eq!(parsed.tag(), Some("kicad_symbol_lib"));
        assert_eq!(
            lcsc_sexpr::kicad::number_prop(parsed.as_list().unwrap(), "version"),
            Some(20211014.0)
        );
        assert!(doc.text.contains("(generator kicad_lcsc_manager)"));
        assert!(doc.text.contains("(property \"Reference\" \"U\""));
        assert!(doc.text.contains("(property \"LCSC\" \"C1\""));
        assert!(doc.text.contains("(symbol \"C1_R1_1_1\""));
        assert_eq!(doc.name, "C1_R1");
    }

    #[test]
    fn points_are_flipped() {
        let records = [ShapeRecord::Pin {
            x: 1.0,
            y: 2.0,
            rotation: PinRotation::Deg90,
            number: "3".into(),
        }];
        let doc = encode_symbol(&records, &meta());
        assert!(doc.text.contains("(pin unspecified line"));
        assert!(doc.text.contains("(at 1 -2 270)"));
        assert!(doc.text.contains("(name \"3\""));
        assert!(doc.text.contains("(number \"3\""));
    }

    #[test]
    fn pin_label_field_is_not_the_pin_name() {
        let records = lcsc_easyeda::decode(
            &["P~0~0~0~~VCC~8"],
            lcsc_easyeda::DrawingOrigin::default(),
            lcsc_easyeda::Scale::NATIVE,
        );
        let doc = encode_symbol(&records, &meta());
        assert!(doc.text.contains("(name \"8\""));
        assert!(doc.text.contains("(number \"8\""));
        assert!(!doc.text.contains("VCC"));
    }

    #[test]
    fn non_circular_ellipse_becomes_polyline() {
        let records = [
            ShapeRecord::Ellipse {
                cx: 0.0,
                cy: 0.0,
                rx: 2.0,
                ry: 1.0,
            },
            ShapeRecord::Ellipse {
                cx: 0.0,
                cy: 0.0,
                rx: 1.0,
                ry: 1.0,
            },
        ];
        let parsed = lcsc_sexpr::parse(&encode_symbol(&records, &meta()).text).unwrap();
        assert_eq!(parsed.count_tagged("polyline"), 1);
        assert_eq!(parsed.count_tagged("circle"), 1);
        assert_eq!(parsed.count_tagged("xy"), 33);
    }
}
