use glam::DVec2;
use lcsc_easyeda::decoder::known_opcodes;
use lcsc_easyeda::{DrawingOrigin, PinRotation, Scale, ShapeRecord, decode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const SYMBOL_LINES: &[&str] = &[
    "R~0~0~10~10~~~#880000~1~#FFFFFF",
    "E~20~20~5~5",
    "P~5~5~0~~A~1",
    "PL~0 0 10 0 10 10",
    "PG~0 0 5 0 5 5",
    "P~-5~5~180~~K~2",
];

#[test]
fn scenario_rectangle_and_pin() {
    init_logger();
    let records = decode(
        &["R~0~0~10~10~~~#000~1~none", "P~5~5~0~~~1"],
        DrawingOrigin::new(0.0, 0.0),
        Scale::NATIVE,
    );

    assert_eq!(
        records,
        vec![
            ShapeRecord::Rectangle {
                x: 0.0,
                y: 0.0,
                width: 10.0,
                height: 10.0,
                filled: false,
                layer: None,
            },
            ShapeRecord::Pin {
                x: 5.0,
                y: 5.0,
                rotation: PinRotation::Deg0,
                number: "1".to_string(),
            },
        ]
    );
}

#[test]
fn decodes_in_millimeters() {
    init_logger();
    let records = decode(
        &["TRACK~1~3~400 300 410 300"],
        DrawingOrigin::new(400.0, 300.0),
        Scale::MILLIMETERS,
    );
    let ShapeRecord::Track {
        width,
        layer,
        points,
    } = &records[0]
    else {
        panic!("expected a track, got {records:?}");
    };
    approx::assert_relative_eq!(*width, 0.254, epsilon = 1e-9);
    assert_eq!(*layer, 3);
    approx::assert_relative_eq!(points[1].x, 2.54, epsilon = 1e-9);
    assert_eq!(points[0], DVec2::ZERO);
}

#[test]
fn output_preserves_input_order() {
    init_logger();
    let kinds: Vec<&str> = decode(SYMBOL_LINES, DrawingOrigin::default(), Scale::NATIVE)
        .iter()
        .map(ShapeRecord::kind)
        .collect();
    assert_eq!(
        kinds,
        vec!["rectangle", "ellipse", "pin", "polyline", "polygon", "pin"]
    );
}

fn garbage_opcode(rng: &mut StdRng) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcxyz0123456789_#$";
    loop {
        let len = rng.gen_range(1..8);
        let opcode: String = (0..len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        if !known_opcodes().any(|known| known == opcode) {
            return opcode;
        }
    }
}

#[test]
fn garbage_opcodes_do_not_disturb_other_records() {
    init_logger();
    let baseline = decode(SYMBOL_LINES, DrawingOrigin::default(), Scale::NATIVE);
    let mut rng = StdRng::seed_from_u64(0x1c5c);

    for _ in 0..200 {
        let mut lines: Vec<String> = SYMBOL_LINES.iter().map(|s| s.to_string()).collect();
        let insert_at = rng.gen_range(0..=lines.len());
        let fields = rng.gen_range(0..6);
        let mut line = garbage_opcode(&mut rng);
        for _ in 0..fields {
            line.push('~');
            line.push_str(&rng.gen_range(-100..100).to_string());
        }
        lines.insert(insert_at, line.clone());

        let decoded = decode(lines.as_slice(), DrawingOrigin::default(), Scale::NATIVE);
        assert_eq!(decoded, baseline, "garbage line {line:?} changed the output");
    }
}

#[test]
fn random_lines_never_panic() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(7);
    let opcodes: Vec<&str> = known_opcodes().collect();
    const TOKENS: &[&str] = &["", "0", "-1.5", "1e3", "nan", "x", "1 2", "1 2 3 4", "none", "~"];

    for _ in 0..500 {
        let mut line = opcodes[rng.gen_range(0..opcodes.len())].to_string();
        for _ in 0..rng.gen_range(0..10) {
            line.push('~');
            line.push_str(TOKENS[rng.gen_range(0..TOKENS.len())]);
        }
        let records = decode(&[line.as_str()], DrawingOrigin::default(), Scale::NATIVE);
        assert!(records.len() <= 1);
        for record in &records {
            match record {
                ShapeRecord::Polyline { points }
                | ShapeRecord::Polygon { points }
                | ShapeRecord::Track { points, .. } => assert!(points.len() >= 2),
                _ => {}
            }
        }
    }
}
