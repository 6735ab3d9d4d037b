//! Conversion pipeline from EasyEDA component data to KiCad library files.
//!
//! [`Converter`] ties the decoders and encoders together and fills in the
//! cross-references that depend on where the library lives: the symbol's
//! `Footprint` property and the footprint's 3D model path. Every conversion
//! returns a [`ConversionResult`]; structural failures still produce a usable
//! placeholder document with `success = false`.
//!
//! The converter performs no I/O. Callers write `text` to the paths that
//! [`ConvertConfig`] computes.

pub mod config;

use lcsc_easyeda::{DataHead, Scale, ShapeDocument, ShapeRecord};
use lcsc_kicad::{ComponentMetadata, EncodedDocument, FootprintOptions};
use lcsc_mesh::MeshError;
use lcsc_sexpr::kicad::LibraryError;
use serde::Serialize;

pub use config::{ConfigError, ConvertConfig};

/// Outcome of one conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionResult {
    /// Entry name: symbol name, footprint file stem, or part id for models.
    pub name: String,
    /// The input had the expected structure.
    pub success: bool,
    /// `text` is a placeholder rather than the part's own drawing.
    pub used_fallback: bool,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversionResult {
    fn encoded(doc: EncodedDocument) -> Self {
        Self {
            name: doc.name,
            success: true,
            used_fallback: doc.used_fallback,
            text: doc.text,
            error: None,
        }
    }

    fn failed(mut self, error: impl std::fmt::Display) -> Self {
        self.success = false;
        self.used_fallback = true;
        self.error = Some(error.to_string());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConvertConfig,
}

impl Converter {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Encode symbol records (millimeters) as a one-symbol library document.
    pub fn convert_symbol(
        &self,
        records: &[ShapeRecord],
        metadata: &ComponentMetadata,
    ) -> ConversionResult {
        let metadata = self.with_footprint_ref(metadata);
        let result = ConversionResult::encoded(lcsc_kicad::encode_symbol(records, &metadata));
        log::info!(
            "Converted symbol {} ({} records, fallback: {})",
            result.name,
            records.len(),
            result.used_fallback
        );
        result
    }

    /// Encode footprint records (millimeters) as a `.kicad_mod` document.
    pub fn convert_footprint(
        &self,
        records: &[ShapeRecord],
        metadata: &ComponentMetadata,
    ) -> ConversionResult {
        let options = FootprintOptions {
            text_margin: self.config.footprint_text_margin,
            model_path: (!metadata.part_id.trim().is_empty())
                .then(|| self.config.model_path(metadata.part_id.trim())),
        };
        let result = ConversionResult::encoded(lcsc_kicad::encode_footprint_with(
            records, metadata, &options,
        ));
        log::info!(
            "Converted footprint {} ({} records, fallback: {})",
            result.name,
            records.len(),
            result.used_fallback
        );
        result
    }

    /// Convert EasyEDA OBJ text to a VRML scene named after `metadata.part_id`.
    ///
    /// A mesh without vertex data yields a placeholder box labelled with the
    /// package name.
    pub fn convert_model(&self, obj_text: &str, metadata: &ComponentMetadata) -> ConversionResult {
        let part_id = metadata.part_id.trim();
        let result = ConversionResult {
            name: part_id.to_string(),
            success: true,
            used_fallback: false,
            text: String::new(),
            error: None,
        };

        match lcsc_mesh::decode_mesh(obj_text).and_then(|mesh| lcsc_mesh::encode_mesh(&mesh)) {
            Ok(text) => {
                log::info!("Converted 3D model for {part_id}");
                ConversionResult { text, ..result }
            }
            Err(err) => {
                match &err {
                    MeshError::MissingVertices => {
                        log::warn!("3D model for {part_id} has no vertices, writing placeholder")
                    }
                    _ => log::error!("Failed to convert 3D model for {part_id}: {err}"),
                }
                ConversionResult {
                    text: placeholder_model(&metadata.package),
                    ..result
                }
                .failed(err)
            }
        }
    }

    /// Decode the symbol drawing out of an EasyEDA component payload and
    /// encode it. Empty `metadata` fields are filled from `head.c_para`.
    pub fn convert_symbol_json(
        &self,
        payload: &str,
        metadata: &ComponentMetadata,
    ) -> ConversionResult {
        match ShapeDocument::from_symbol_json(payload) {
            Ok(doc) => {
                let metadata = complete_metadata(metadata, &doc.head);
                self.convert_symbol(&doc.decode(Scale::MILLIMETERS), &metadata)
            }
            Err(err) => {
                log::warn!("Symbol payload for {} unusable: {err}", metadata.part_id);
                self.convert_symbol(&[], metadata).failed(err)
            }
        }
    }

    /// Footprint counterpart of [`Converter::convert_symbol_json`].
    pub fn convert_footprint_json(
        &self,
        payload: &str,
        metadata: &ComponentMetadata,
    ) -> ConversionResult {
        match ShapeDocument::from_footprint_json(payload) {
            Ok(doc) => {
                let metadata = complete_metadata(metadata, &doc.head);
                self.convert_footprint(&doc.decode(Scale::MILLIMETERS), &metadata)
            }
            Err(err) => {
                log::warn!("Footprint payload for {} unusable: {err}", metadata.part_id);
                self.convert_footprint(&[], metadata).failed(err)
            }
        }
    }

    /// Add a converted symbol to the text of an existing symbol library.
    pub fn merge_symbol(
        &self,
        existing_library: &str,
        symbol: &ConversionResult,
    ) -> Result<String, LibraryError> {
        lcsc_sexpr::kicad::merge_symbol_into_library(existing_library, &symbol.text)
    }

    fn with_footprint_ref(&self, metadata: &ComponentMetadata) -> ComponentMetadata {
        let mut metadata = metadata.clone();
        if metadata.footprint_ref.trim().is_empty() {
            metadata.footprint_ref = self.config.footprint_ref(&metadata.footprint_entry_name());
        }
        metadata
    }
}

fn placeholder_model(package: &str) -> String {
    let package = if package.trim().is_empty() {
        "Unknown"
    } else {
        package
    };
    lcsc_mesh::placeholder_scene(package).unwrap_or_else(|err| {
        log::error!("Failed to render placeholder model: {err}");
        lcsc_mesh::wrl::HEADER.to_string()
    })
}

/// Fill empty metadata fields from the drawing's component parameters.
pub fn complete_metadata(metadata: &ComponentMetadata, head: &DataHead) -> ComponentMetadata {
    let mut out = metadata.clone();
    let fields = [
        (&mut out.name, "name"),
        (&mut out.prefix, "pre"),
        (&mut out.manufacturer, "Manufacturer"),
        (&mut out.package, "package"),
        (&mut out.datasheet, "link"),
    ];
    for (field, key) in fields {
        if field.trim().is_empty()
            && let Some(value) = head.param(key)
        {
            *field = value.to_string();
        }
    }
    out
}
