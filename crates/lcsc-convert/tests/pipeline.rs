use lcsc_convert::{ConvertConfig, Converter};
use lcsc_kicad::ComponentMetadata;
use lcsc_sexpr::kicad::{kicad_symbol_lib_items, symbol_names};
use serde_json::json;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn metadata() -> ComponentMetadata {
    ComponentMetadata {
        part_id: "C25804".to_string(),
        description: "10k 1% 0603 resistor".to_string(),
        ..Default::default()
    }
}

fn model_metadata() -> ComponentMetadata {
    ComponentMetadata {
        package: "0603".to_string(),
        ..metadata()
    }
}

fn symbol_payload() -> String {
    json!({
        "success": true,
        "result": {
            "dataStr": {
                "head": {
                    "x": "400",
                    "y": "300",
                    "c_para": {
                        "name": "10k",
                        "pre": "R?",
                        "package": "0603",
                        "Manufacturer": "UNI-ROYAL"
                    }
                },
                "shape": [
                    "R~390~295~20~10~~~#880000~1~#FFFFFF",
                    "P~385~300~180~~1~1",
                    "P~415~300~0~~2~2",
                    "T~L~400~290~0~#000~~8pt~~~~comment~10k~1~start~gge5~0~pinpart"
                ]
            }
        }
    })
    .to_string()
}

fn footprint_payload() -> String {
    json!({
        "packageDetail": {
            "dataStr": {
                "head": { "x": 4000, "y": 3000, "c_para": { "package": "0603" } },
                "shape": [
                    "PAD~RECT~3997~3000~3~3.5~1~1~0",
                    "PAD~RECT~4003~3000~3~3.5~1~2~0",
                    "TRACK~0.6~3~3994 2997 4006 2997",
                    "TRACK~0.6~3~3994 3003 4006 3003"
                ]
            }
        }
    })
    .to_string()
}

#[test]
fn symbol_payload_converts_with_params_and_footprint_ref() {
    init_logger();
    let result = Converter::default().convert_symbol_json(&symbol_payload(), &metadata());

    assert!(result.success);
    assert!(!result.used_fallback);
    assert_eq!(result.error, None);
    assert_eq!(result.name, "C25804_10k");

    let parsed = lcsc_sexpr::parse(&result.text).unwrap();
    assert_eq!(parsed.count_tagged("rectangle"), 1);
    assert_eq!(parsed.count_tagged("pin"), 2);
    assert!(result.text.contains("\"lcsc:C25804_0603\""));
    assert!(result.text.contains("\"UNI-ROYAL\""));
    assert!(result.text.contains("(property \"Reference\" \"R\""));
}

#[test]
fn footprint_payload_gets_model_path_and_margin() {
    init_logger();
    let config = ConvertConfig {
        footprint_text_margin: 3.0,
        ..Default::default()
    };
    let result = Converter::new(config).convert_footprint_json(&footprint_payload(), &metadata());

    assert!(result.success);
    assert_eq!(result.name, "C25804_0603");
    assert!(result.text.contains("(attr smd)"));
    assert!(
        result
            .text
            .contains("(model \"${KIPRJMOD}/libs/lcsc/3dmodels/C25804.wrl\"")
    );
    assert_eq!(lcsc_sexpr::parse(&result.text).unwrap().count_tagged("pad"), 2);
    assert_eq!(lcsc_sexpr::parse(&result.text).unwrap().count_tagged("fp_line"), 2);
}

#[test]
fn missing_structure_reports_failure_with_placeholder() {
    init_logger();
    let converter = Converter::default();
    let payload = json!({ "result": { "title": "no drawing" } }).to_string();

    let symbol = converter.convert_symbol_json(&payload, &metadata());
    assert!(!symbol.success);
    assert!(symbol.used_fallback);
    assert!(symbol.error.as_deref().unwrap().contains("dataStr"));
    assert_eq!(lcsc_sexpr::parse(&symbol.text).unwrap().count_tagged("pin"), 2);

    let footprint = converter.convert_footprint_json(&payload, &metadata());
    assert!(!footprint.success);
    assert!(footprint.error.as_deref().unwrap().contains("packageDetail"));
    assert_eq!(lcsc_sexpr::parse(&footprint.text).unwrap().count_tagged("pad"), 2);

    let garbage = converter.convert_symbol_json("not json", &metadata());
    assert!(!garbage.success);
    assert!(garbage.error.is_some());
}

#[test]
fn empty_shape_list_succeeds_with_placeholder() {
    init_logger();
    let payload = json!({ "dataStr": { "head": {}, "shape": [] } }).to_string();
    let result = Converter::default().convert_symbol_json(&payload, &metadata());
    assert!(result.success);
    assert!(result.used_fallback);
}

#[test]
fn model_conversion_and_placeholder_box() {
    init_logger();
    let converter = Converter::default();

    let ok = converter.convert_model(
        "newmtl mtl1\nKd 1 0 0\nendmtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nusemtl mtl1\nf 1 2 3\nf 3 2 1\n",
        &model_metadata(),
    );
    assert!(ok.success);
    assert!(!ok.used_fallback);
    assert_eq!(ok.name, "C25804");
    assert_eq!(ok.text.matches("Shape {").count(), 1);

    let empty = converter.convert_model("newmtl mtl1\nendmtl\n", &model_metadata());
    assert!(!empty.success);
    assert!(empty.used_fallback);
    assert_eq!(empty.name, "C25804");
    assert!(empty.text.starts_with("#VRML V2.0 utf8\n"));
    assert!(empty.text.contains("# Placeholder 3D model for 0603"));
    assert!(empty.text.contains("geometry Box {"));
    assert!(empty.text.contains("diffuseColor 0.8 0.8 0.8"));
    assert!(empty.error.is_some());
}

#[test]
fn merged_library_keeps_both_symbols() {
    init_logger();
    let converter = Converter::default();
    let first = converter.convert_symbol_json(&symbol_payload(), &metadata());
    let second = converter.convert_symbol(
        &[],
        &ComponentMetadata {
            name: "LED".to_string(),
            part_id: "C2286".to_string(),
            ..Default::default()
        },
    );

    let library = converter.merge_symbol("", &first).unwrap();
    let library = converter.merge_symbol(&library, &second).unwrap();
    let library = converter.merge_symbol(&library, &first).unwrap();

    let parsed = lcsc_sexpr::parse(&library).unwrap();
    let items = kicad_symbol_lib_items(&parsed).unwrap();
    assert_eq!(symbol_names(items), vec!["C25804_10k", "C2286_LED"]);
}

#[test]
fn conversions_run_on_parallel_threads() {
    init_logger();
    let converter = Converter::default();
    let payload = symbol_payload();
    let expected = converter.convert_symbol_json(&payload, &metadata());

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| converter.convert_symbol_json(&payload, &metadata())))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
