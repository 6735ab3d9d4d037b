//! KiCad-specific S-expression helpers.
//!
//! - [`props`] - small `(tag value)` query helpers
//! - [`symbol_lib`] - KiCad symbol library (`.kicad_sym`) inspection and merging

pub mod props;
pub mod symbol_lib;

pub use props::{child_list, number_prop, string_prop, sym_prop};
pub use symbol_lib::{
    LibraryError, find_symbol_index, kicad_symbol_lib_items, merge_symbol_into_library,
    symbol_name, symbol_names,
};
