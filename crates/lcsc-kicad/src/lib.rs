//! KiCad library encoders for decoded EasyEDA drawings.
//!
//! Both encoders take records decoded with [`lcsc_easyeda::Scale::MILLIMETERS`]
//! and a [`ComponentMetadata`], and return an [`EncodedDocument`]. When the
//! records carry no geometry at all a placeholder drawing is emitted instead
//! and `used_fallback` is set.

mod builder;
pub mod fallback;
pub mod footprint;
pub mod geometry;
pub mod layers;
pub mod metadata;
pub mod sanitize;
pub mod symbol;

pub use footprint::{FootprintOptions, encode_footprint, encode_footprint_with};
pub use metadata::ComponentMetadata;
pub use sanitize::{library_entry_name, restore_name, sanitize_name};
pub use symbol::encode_symbol;

/// File format version written into every document.
pub const FORMAT_VERSION: i64 = 20211014;

/// Value of the `(generator ...)` header field.
pub const GENERATOR: &str = "kicad_lcsc_manager";

/// Encoder output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedDocument {
    /// Library entry name (symbol name or footprint file stem).
    pub name: String,
    pub text: String,
    /// The input had no usable geometry and a placeholder was drawn.
    pub used_fallback: bool,
}
