use serde::{Deserialize, Serialize};

use crate::sanitize::library_entry_name;

/// Symbol property names, in the order they are written.
pub const PROPERTY_NAMES: [&str; 7] = [
    "Reference",
    "Value",
    "Footprint",
    "Datasheet",
    "ki_description",
    "Manufacturer",
    "LCSC",
];

const DEFAULT_PREFIX: &str = "U";

/// Component fields read by the encoders. Built by whoever fetched the part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentMetadata {
    /// Display name, written as the symbol value.
    pub name: String,
    /// Reference designator prefix, e.g. `R` or `U?`.
    pub prefix: String,
    pub manufacturer: String,
    pub datasheet: String,
    pub package: String,
    /// `library:entry` reference stored in the symbol's Footprint property.
    pub footprint_ref: String,
    /// LCSC part number, e.g. `C2040`.
    #[serde(alias = "lcsc_id")]
    pub part_id: String,
    pub description: String,
}

impl ComponentMetadata {
    /// Prefix without EasyEDA's trailing `?`, defaulting to `U`.
    pub fn reference_prefix(&self) -> &str {
        let prefix = self.prefix.trim().trim_end_matches('?');
        if prefix.is_empty() {
            DEFAULT_PREFIX
        } else {
            prefix
        }
    }

    fn part_id_or_unknown(&self) -> &str {
        non_empty(&self.part_id).unwrap_or("Unknown")
    }

    /// `<part>_<name>`, sanitized.
    pub fn symbol_entry_name(&self) -> String {
        let label = non_empty(&self.name).unwrap_or(self.part_id_or_unknown());
        library_entry_name(self.part_id_or_unknown(), label)
    }

    /// `<part>_<package>`, sanitized.
    pub fn footprint_entry_name(&self) -> String {
        let package = non_empty(&self.package).unwrap_or("Unknown");
        library_entry_name(self.part_id_or_unknown(), package)
    }

    /// Values for [`PROPERTY_NAMES`], in the same order.
    pub fn property_values(&self) -> [&str; 7] {
        [
            self.reference_prefix(),
            &self.name,
            &self.footprint_ref,
            &self.datasheet,
            &self.description,
            &self.manufacturer,
            &self.part_id,
        ]
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}
