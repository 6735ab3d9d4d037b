use std::collections::BTreeMap;

use glam::DVec3;

use crate::MeshError;

/// Color used for any channel a material does not declare.
pub const NEUTRAL_GRAY: [f64; 3] = [0.8, 0.8, 0.8];

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient: [f64; 3],
    pub diffuse: [f64; 3],
    pub specular: [f64; 3],
    pub transparency: Option<f64>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: NEUTRAL_GRAY,
            diffuse: NEUTRAL_GRAY,
            specular: NEUTRAL_GRAY,
            transparency: None,
        }
    }
}

/// Faces following one `usemtl`. Indices are 1-based into [`Mesh::vertices`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceGroup {
    pub material: String,
    pub faces: Vec<Vec<usize>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Millimeters, in declaration order.
    pub vertices: Vec<DVec3>,
    pub materials: BTreeMap<String, Material>,
    pub groups: Vec<FaceGroup>,
}

/// Parse EasyEDA OBJ text.
///
/// Malformed vertex and face lines are skipped with a warning. Faces that
/// appear before the first `usemtl` have no material and are dropped.
pub fn decode_mesh(text: &str) -> Result<Mesh, MeshError> {
    let mut mesh = Mesh::default();
    let mut open_material: Option<Material> = None;
    let mut orphan_faces = 0usize;

    for (line_no, line) in text.lines().enumerate() {
        let mut parts = line.split_whitespace();
        let Some(directive) = parts.next() else {
            continue;
        };
        let args: Vec<&str> = parts.collect();

        if directive == "endmtl" {
            if let Some(done) = open_material.take() {
                mesh.materials.insert(done.name.clone(), done);
            }
            continue;
        }
        if let Some(material) = open_material.as_mut() {
            match directive {
                "Ka" => set_color(&mut material.ambient, &args, line_no),
                "Kd" => set_color(&mut material.diffuse, &args, line_no),
                "Ks" => set_color(&mut material.specular, &args, line_no),
                "d" => match args.first().and_then(|v| v.parse::<f64>().ok()) {
                    Some(value) => material.transparency = Some(value),
                    None => log::warn!("Bad transparency on line {line_no}: {line:?}"),
                },
                _ => {}
            }
            continue;
        }

        match directive {
            "newmtl" => {
                let name = args.join(" ");
                open_material = Some(Material::new(name));
            }
            "v" => match parse_vertex(&args) {
                Some(v) => mesh.vertices.push(v),
                None => log::warn!("Skipping malformed vertex on line {line_no}: {line:?}"),
            },
            "usemtl" => mesh.groups.push(FaceGroup {
                material: args.join(" "),
                faces: Vec::new(),
            }),
            "f" => {
                let Some(face) = parse_face(&args) else {
                    log::warn!("Skipping malformed face on line {line_no}: {line:?}");
                    continue;
                };
                match mesh.groups.last_mut() {
                    Some(group) => group.faces.push(face),
                    None => orphan_faces += 1,
                }
            }
            _ => {}
        }
    }

    if let Some(unterminated) = open_material {
        log::debug!("Material {} has no endmtl, keeping it", unterminated.name);
        mesh.materials.insert(unterminated.name.clone(), unterminated);
    }
    if orphan_faces > 0 {
        log::warn!("Dropped {orphan_faces} faces declared before any usemtl");
    }
    if mesh.vertices.is_empty() {
        return Err(MeshError::MissingVertices);
    }

    log::debug!(
        "Decoded mesh: {} vertices, {} materials, {} face groups",
        mesh.vertices.len(),
        mesh.materials.len(),
        mesh.groups.len()
    );
    Ok(mesh)
}

fn parse_numbers<const N: usize>(args: &[&str]) -> Option<[f64; N]> {
    let mut out = [0.0; N];
    for (slot, raw) in out.iter_mut().zip(args) {
        *slot = raw.parse().ok().filter(|v: &f64| v.is_finite())?;
    }
    (args.len() >= N).then_some(out)
}

fn parse_vertex(args: &[&str]) -> Option<DVec3> {
    parse_numbers::<3>(args).map(DVec3::from_array)
}

fn set_color(channel: &mut [f64; 3], args: &[&str], line_no: usize) {
    match parse_numbers::<3>(args) {
        Some(color) => *channel = color,
        None => log::warn!("Bad color on line {line_no}, keeping default"),
    }
}

/// `f 1 2 3` or `f 1/1/1 2/2/2 3/3/3`; texture and normal refs are dropped.
fn parse_face(args: &[&str]) -> Option<Vec<usize>> {
    if args.is_empty() {
        return None;
    }
    args.iter()
        .map(|vertex| vertex.split('/').next()?.parse::<usize>().ok())
        .collect()
}
