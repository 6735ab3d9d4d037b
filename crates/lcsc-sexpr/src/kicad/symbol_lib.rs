//! KiCad symbol library (`.kicad_sym`) helpers.

use thiserror::Error;

use crate::formatter::format_tree;
use crate::{ParseError, Sexpr};

/// Failures while combining symbol library documents.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LibraryError {
    #[error("Failed to parse symbol library: {0}")]
    Parse(#[from] ParseError),
    #[error("Document is not a kicad_symbol_lib")]
    NotASymbolLibrary,
    #[error("Document does not contain a top-level symbol")]
    NoSymbol,
}

/// Return root items for a KiCad symbol library `(kicad_symbol_lib ...)`.
pub fn kicad_symbol_lib_items(sexpr: &Sexpr) -> Option<&[Sexpr]> {
    let items = sexpr.as_list()?;
    (items.first().and_then(Sexpr::as_sym) == Some("kicad_symbol_lib")).then_some(items)
}

fn kicad_symbol_lib_items_mut(sexpr: &mut Sexpr) -> Option<&mut Vec<Sexpr>> {
    let items = sexpr.as_list_mut()?;
    (items.first().and_then(Sexpr::as_sym) == Some("kicad_symbol_lib")).then_some(items)
}

/// Return the symbol name from a `(symbol "<name>" ...)` list.
pub fn symbol_name(symbol: &[Sexpr]) -> Option<String> {
    if symbol.first().and_then(Sexpr::as_sym) != Some("symbol") {
        return None;
    }
    symbol.get(1).and_then(Sexpr::as_text).map(str::to_string)
}

/// Return names of all top-level symbols in a KiCad symbol library.
pub fn symbol_names(kicad_symbol_lib: &[Sexpr]) -> Vec<String> {
    kicad_symbol_lib
        .iter()
        .filter_map(Sexpr::as_list)
        .filter_map(symbol_name)
        .collect()
}

/// Find the index of a top-level symbol by name.
pub fn find_symbol_index(kicad_symbol_lib: &[Sexpr], name: &str) -> Option<usize> {
    kicad_symbol_lib.iter().enumerate().find_map(|(idx, node)| {
        let list = node.as_list()?;
        (symbol_name(list).as_deref() == Some(name)).then_some(idx)
    })
}

/// Merge every top-level symbol of `new_doc` into the `existing` library text.
///
/// A symbol whose name already exists in the library replaces it in place;
/// new names are appended after the last entry. An empty `existing` string
/// yields `new_doc` re-formatted. The result is always re-formatted.
pub fn merge_symbol_into_library(existing: &str, new_doc: &str) -> Result<String, LibraryError> {
    let incoming = crate::parse(new_doc)?;
    let incoming_items = kicad_symbol_lib_items(&incoming).ok_or(LibraryError::NotASymbolLibrary)?;
    let symbols: Vec<(String, Sexpr)> = incoming_items
        .iter()
        .filter_map(|node| Some((symbol_name(node.as_list()?)?, node.clone())))
        .collect();
    if symbols.is_empty() {
        return Err(LibraryError::NoSymbol);
    }

    if existing.trim().is_empty() {
        return Ok(format_tree(&incoming));
    }

    let mut library = crate::parse(existing)?;
    let items = kicad_symbol_lib_items_mut(&mut library).ok_or(LibraryError::NotASymbolLibrary)?;

    for (name, symbol) in symbols {
        match find_symbol_index(items, &name) {
            Some(idx) => {
                log::debug!("Replacing existing symbol {name} in library");
                items[idx] = symbol;
            }
            None => {
                log::debug!("Appending symbol {name} to library");
                items.push(symbol);
            }
        }
    }

    Ok(format_tree(&library))
}
