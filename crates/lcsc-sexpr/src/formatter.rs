//! KiCad-style text rendering for S-expression trees.
//!
//! Lists that only hold atoms, and lists whose tag is one of the short-form
//! tokens KiCad keeps on one line (`at`, `xy`, `font`, `stroke`, ...), are
//! written inline. Every other list puts its leading atoms on the opening
//! line and each remaining child on its own tab-indented line.

use crate::Sexpr;

const INDENT_CHAR: char = '\t';

/// Number of decimals kept when writing floats. KiCad stores 1 nm internally
/// for boards and 1e-4 mm is already below anything EasyEDA can express.
const FLOAT_DECIMALS: usize = 4;

const SHORT_FORM_TAGS: &[&str] = &[
    "at", "xy", "pts", "size", "font", "effects", "stroke", "fill", "start", "end", "center",
    "mid", "layers", "offset", "scale", "rotate", "xyz", "pin_names", "drill", "name", "number",
    "length", "width", "type", "layer", "justify", "color",
];

/// Format an S-expression tree. The returned string includes a trailing newline.
pub fn format_tree(sexpr: &Sexpr) -> String {
    let mut out = String::new();
    write_node(sexpr, 0, &mut out);
    out.push('\n');
    out
}

/// Format a number the way KiCad writes it: no exponent, no trailing zeros.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let mut s = format!("{:.*}", FLOAT_DECIMALS, value);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_string() } else { s }
}

/// Quote a string value, escaping special characters.
pub fn quote_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    quoted.push_str(&escape_string(value));
    quoted.push('"');
    quoted
}

pub(crate) fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            _ => result.push(ch),
        }
    }
    result
}

fn write_node(node: &Sexpr, depth: usize, out: &mut String) {
    match node {
        Sexpr::List(items) if !fits_inline(items) => write_block(items, depth, out),
        _ => write_compact(node, out),
    }
}

fn fits_inline(items: &[Sexpr]) -> bool {
    match items.first().and_then(Sexpr::as_sym) {
        Some(tag) if SHORT_FORM_TAGS.contains(&tag) => true,
        _ => items.iter().all(|item| !item.is_list()),
    }
}

fn write_block(items: &[Sexpr], depth: usize, out: &mut String) {
    let head_len = items.iter().take_while(|item| !item.is_list()).count();

    out.push('(');
    for (idx, item) in items[..head_len].iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        write_compact(item, out);
    }
    for item in &items[head_len..] {
        out.push('\n');
        push_indent(out, depth + 1);
        write_node(item, depth + 1, out);
    }
    out.push('\n');
    push_indent(out, depth);
    out.push(')');
}

fn write_compact(sexpr: &Sexpr, out: &mut String) {
    match sexpr {
        Sexpr::Symbol(s) => out.push_str(s),
        Sexpr::String(s) => out.push_str(&quote_string(s)),
        Sexpr::Int(n) => out.push_str(&n.to_string()),
        Sexpr::Float(f) => out.push_str(&format_number(*f)),
        Sexpr::List(items) => {
            out.push('(');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(' ');
                }
                write_compact(item, out);
            }
            out.push(')');
        }
    }
}

fn push_indent(out: &mut String, depth: usize) {
    out.extend(std::iter::repeat_n(INDENT_CHAR, depth));
}

#[cfg(test)]
mod tests {
    use super::{format_number, format_tree, quote_string};
    use crate::{Sexpr, parse};

    #[test]
    fn formats_nested_blocks_with_tabs() {
        let input = parse(
            "(kicad_pcb (version 20240101) (generator pcbnew) (general (thickness 1.6)))",
        )
        .unwrap();
        let expected = "(kicad_pcb\n\t(version 20240101)\n\t(generator pcbnew)\n\t(general\n\t\t(thickness 1.6)\n\t)\n)\n";

        assert_eq!(format_tree(&input), expected);
    }

    #[test]
    fn short_form_lists_stay_on_one_line() {
        let input = parse(
            "(property \"Reference\" \"U\" (at 0 5.08 0) (effects (font (size 1.27 1.27)) hide))",
        )
        .unwrap();
        let expected = "(property \"Reference\" \"U\"\n\t(at 0 5.08 0)\n\t(effects (font (size 1.27 1.27)) hide)\n)\n";

        assert_eq!(format_tree(&input), expected);
    }

    #[test]
    fn point_lists_stay_on_one_line() {
        let input = parse("(polyline (pts (xy 1 2) (xy 3 4)) (stroke (width 0)))").unwrap();
        let expected = "(polyline\n\t(pts (xy 1 2) (xy 3 4))\n\t(stroke (width 0))\n)\n";

        assert_eq!(format_tree(&input), expected);
    }

    #[test]
    fn parens_inside_strings_are_escaped_not_structural() {
        let sexpr = Sexpr::list(vec![
            Sexpr::symbol("descr"),
            Sexpr::string("a (b) \"c\""),
        ]);
        assert_eq!(format_tree(&sexpr), "(descr \"a (b) \\\"c\\\"\")\n");
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(2.54), "2.54");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(-0.00001), "0");
        assert_eq!(format_number(-7.62), "-7.62");
        assert_eq!(format_number(f64::NAN), "0");
    }

    #[test]
    fn quotes_and_escapes() {
        assert_eq!(quote_string("a\\b"), "\"a\\\\b\"");
        assert_eq!(quote_string("x\ny"), "\"x\\ny\"");
    }
}
