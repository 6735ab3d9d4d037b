//! EasyEDA 3D model conversion.
//!
//! EasyEDA serves models as Wavefront OBJ text with the material library
//! inlined as `newmtl ... endmtl` blocks. [`obj::decode_mesh`] reads that
//! into a [`Mesh`]; [`wrl::encode_scene`] writes one VRML 2.0 `Shape` per
//! face group, with vertices deduplicated inside each group and scaled from
//! millimeters to VRML units of 2.54 mm.

pub mod obj;
pub mod wrl;

use thiserror::Error;

pub use obj::{FaceGroup, Material, Mesh, decode_mesh};
pub use wrl::{encode_mesh, encode_scene, placeholder_scene};

#[derive(Debug, Error)]
pub enum MeshError {
    /// The document has no `v` lines.
    #[error("Mesh has no vertex data")]
    MissingVertices,
    #[error("Failed to render scene: {0}")]
    Template(#[from] minijinja::Error),
}
