use glam::DVec2;
use lcsc_sexpr::{ListBuilder, Sexpr, kv, xy};

pub(crate) trait ListBuilderExt {
    fn kv_str(&mut self, key: &str, val: &str) -> &mut Self;
    fn kv_f64(&mut self, key: &str, val: f64) -> &mut Self;
    fn kv_point(&mut self, key: &str, p: DVec2) -> &mut Self;
}

impl ListBuilderExt for ListBuilder {
    fn kv_str(&mut self, key: &str, val: &str) -> &mut Self {
        self.push(kv(key, Sexpr::string(val)))
    }

    fn kv_f64(&mut self, key: &str, val: f64) -> &mut Self {
        self.push(kv(key, val))
    }

    fn kv_point(&mut self, key: &str, p: DVec2) -> &mut Self {
        let mut node = ListBuilder::node(key);
        node.push(p.x).push(p.y);
        self.push(node.build())
    }
}

pub(crate) fn pts(points: &[DVec2]) -> Sexpr {
    let mut node = ListBuilder::node("pts");
    node.extend(points.iter().map(|p| xy(p.x, p.y)));
    node.build()
}

/// `(effects (font (size s s)) [hide])`
pub(crate) fn font_effects(size: f64, thickness: Option<f64>, hide: bool) -> Sexpr {
    let mut font = ListBuilder::node("font");
    let mut size_node = ListBuilder::node("size");
    size_node.push(size).push(size);
    font.push(size_node.build());
    if let Some(thickness) = thickness {
        font.push(kv("thickness", thickness));
    }

    let mut effects = ListBuilder::node("effects");
    effects.push(font.build()).push_if(hide, "hide");
    effects.build()
}

/// `(stroke (width w) (type default))`
pub(crate) fn stroke(width: f64) -> Sexpr {
    let mut node = ListBuilder::node("stroke");
    node.push(kv("width", width)).push(kv("type", "default"));
    node.build()
}

/// `(fill (type kind))`
pub(crate) fn fill(kind: &str) -> Sexpr {
    kv("fill", kv("type", kind))
}
