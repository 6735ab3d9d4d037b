//! VRML 2.0 scene encoder.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use glam::DVec3;
use minijinja::{Environment, context};

use crate::MeshError;
use crate::obj::{FaceGroup, Material, Mesh};

const SHAPE_TEMPLATE: &str = include_str!("../templates/shape.wrl.jinja");
const PLACEHOLDER_TEMPLATE: &str = include_str!("../templates/placeholder.wrl.jinja");

pub const HEADER: &str = "#VRML V2.0 utf8\n";

/// Millimeters per VRML unit (KiCad reads `.wrl` files in 0.1 inch).
pub const MM_PER_UNIT: f64 = 2.54;

const AMBIENT_INTENSITY: f64 = 0.2;
const SHININESS: f64 = 0.5;

const PLACEHOLDER_DIFFUSE: f64 = 0.8;
const PLACEHOLDER_SPECULAR: f64 = 0.5;
/// Box extent in VRML units.
const PLACEHOLDER_SIZE: [f64; 3] = [2.0, 1.0, 0.5];

/// One face group with its own compact index space.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneShape<'a> {
    pub material: &'a Material,
    /// VRML units, first-seen order, last point repeated once at the end.
    pub points: Vec<DVec3>,
    /// Local indices per face.
    pub faces: Vec<Vec<usize>>,
}

/// Build one shape per face group whose material is known.
///
/// Groups naming an unknown material are dropped, as are faces that
/// reference a vertex outside `vertices`. Groups left without faces emit
/// nothing.
pub fn build_shapes<'a>(
    vertices: &[DVec3],
    materials: &'a BTreeMap<String, Material>,
    groups: &[FaceGroup],
) -> Vec<SceneShape<'a>> {
    let mut shapes = Vec::with_capacity(groups.len());

    for group in groups {
        let Some(material) = materials.get(&group.material) else {
            log::warn!(
                "Dropping face group with unknown material {:?} ({} faces)",
                group.material,
                group.faces.len()
            );
            continue;
        };

        let mut local_index: HashMap<usize, usize> = HashMap::new();
        let mut points = Vec::new();
        let mut faces = Vec::with_capacity(group.faces.len());

        for face in &group.faces {
            if let Some(bad) = face.iter().find(|&&i| i == 0 || i > vertices.len()) {
                log::warn!(
                    "Skipping face referencing vertex {bad} of {} in group {:?}",
                    vertices.len(),
                    group.material
                );
                continue;
            }

            let local_face: Vec<usize> = face
                .iter()
                .map(|&global| match local_index.entry(global) {
                    Entry::Occupied(slot) => *slot.get(),
                    Entry::Vacant(slot) => {
                        points.push(vertices[global - 1] / MM_PER_UNIT);
                        *slot.insert(points.len() - 1)
                    }
                })
                .collect();
            faces.push(local_face);
        }

        let Some(&last) = points.last() else {
            log::debug!("Face group {:?} has no usable faces", group.material);
            continue;
        };
        points.push(last);

        shapes.push(SceneShape {
            material,
            points,
            faces,
        });
    }

    shapes
}

/// Render a complete VRML document.
pub fn encode_scene(
    vertices: &[DVec3],
    materials: &BTreeMap<String, Material>,
    groups: &[FaceGroup],
) -> Result<String, MeshError> {
    let env = environment()?;
    let template = env.get_template("shape.wrl")?;

    let shapes = build_shapes(vertices, materials, groups);
    let mut out = String::from(HEADER);
    for shape in &shapes {
        let points: Vec<String> = shape
            .points
            .iter()
            .map(|p| format_triple(p.to_array()))
            .collect();
        let faces: Vec<String> = shape
            .faces
            .iter()
            .map(|face| {
                face.iter()
                    .map(|i| i.to_string())
                    .chain(std::iter::once("-1".to_string()))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect();

        out.push('\n');
        out.push_str(&template.render(context! {
            diffuse => format_triple(shape.material.diffuse),
            specular => format_triple(shape.material.specular),
            ambient_intensity => format_number(AMBIENT_INTENSITY),
            transparency => format_number(shape.material.transparency.unwrap_or(0.0)),
            shininess => format_number(SHININESS),
            points => points,
            faces => faces,
        })?);
        out.push('\n');
    }

    log::info!(
        "Encoded VRML scene: {} shapes from {} face groups",
        shapes.len(),
        groups.len()
    );
    Ok(out)
}

pub fn encode_mesh(mesh: &Mesh) -> Result<String, MeshError> {
    encode_scene(&mesh.vertices, &mesh.materials, &mesh.groups)
}

/// Gray box standing in for parts without a usable model.
///
/// `package` only appears in a comment line; line breaks in it are flattened.
pub fn placeholder_scene(package: &str) -> Result<String, MeshError> {
    let env = environment()?;
    let template = env.get_template("placeholder.wrl")?;
    let package = package.replace(['\r', '\n'], " ");

    let mut out = String::from(HEADER);
    out.push_str(&template.render(context! {
        package => package.trim(),
        diffuse => format_triple([PLACEHOLDER_DIFFUSE; 3]),
        specular => format_triple([PLACEHOLDER_SPECULAR; 3]),
        shininess => format_number(SHININESS),
        size => format_triple(PLACEHOLDER_SIZE),
    })?);
    out.push('\n');
    Ok(out)
}

fn environment() -> Result<Environment<'static>, MeshError> {
    let mut env = Environment::new();
    env.add_template("shape.wrl", SHAPE_TEMPLATE)?;
    env.add_template("placeholder.wrl", PLACEHOLDER_TEMPLATE)?;
    Ok(env)
}

fn format_triple(v: [f64; 3]) -> String {
    v.map(format_number).join(" ")
}

fn format_number(value: f64) -> String {
    let mut s = format!("{value:.6}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" { "0".to_string() } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.8), "0.8");
        assert_eq!(format_number(-0.0000001), "0");
        assert_eq!(format_triple([1.0, 0.5, 0.0]), "1 0.5 0");
    }

    #[test]
    fn global_reuse_across_groups_is_not_shared() {
        let vertices = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
        let mut materials = BTreeMap::new();
        materials.insert("a".to_string(), Material::new("a"));
        let groups = vec![
            FaceGroup {
                material: "a".into(),
                faces: vec![vec![3, 2, 1]],
            },
            FaceGroup {
                material: "a".into(),
                faces: vec![vec![1, 3, 2]],
            },
        ];
        let shapes = build_shapes(&vertices, &materials, &groups);
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].faces, vec![vec![0, 1, 2]]);
        assert_eq!(shapes[1].faces, vec![vec![0, 1, 2]]);
        assert_eq!(shapes[0].points[0], DVec3::Y / MM_PER_UNIT);
        assert_eq!(shapes[1].points[0], DVec3::ZERO);
    }

    #[test]
    fn out_of_range_faces_are_skipped() {
        let vertices = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
        let mut materials = BTreeMap::new();
        materials.insert("a".to_string(), Material::new("a"));
        let groups = vec![
            FaceGroup {
                material: "a".into(),
                faces: vec![vec![1, 2, 4], vec![0, 1, 2], vec![1, 2, 3]],
            },
            FaceGroup {
                material: "a".into(),
                faces: vec![vec![7, 8, 9]],
            },
        ];
        let shapes = build_shapes(&vertices, &materials, &groups);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].faces, vec![vec![0, 1, 2]]);
        assert_eq!(shapes[0].points.len(), 4);
    }

    #[test]
    fn placeholder_is_a_gray_box() {
        let scene = placeholder_scene("SOT-23").unwrap();
        assert!(scene.starts_with(HEADER));
        assert!(scene.contains("# Placeholder 3D model for SOT-23\n"));
        assert!(scene.contains("diffuseColor 0.8 0.8 0.8"));
        assert!(scene.contains("specularColor 0.5 0.5 0.5"));
        assert!(scene.contains("geometry Box {"));
        assert!(scene.contains("size 2 1 0.5"));
        assert_eq!(scene.matches("Shape {").count(), 1);
    }

    #[test]
    fn placeholder_package_stays_on_comment_line() {
        let scene = placeholder_scene("SOT\n23").unwrap();
        assert!(scene.contains("# Placeholder 3D model for SOT 23\n"));
    }
}
