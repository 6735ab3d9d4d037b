//! Common KiCad-ish S-expression query helpers.
//!
//! KiCad formats are full of small list nodes that behave like key/value
//! properties: `(layer "F.Cu")`, `(attr smd)`, `(length 2.54)`.

use crate::Sexpr;
use crate::find_child_list;

/// Find a direct child list `(tag ...)` within `list`.
pub fn child_list<'a>(list: &'a [Sexpr], tag: &str) -> Option<&'a [Sexpr]> {
    find_child_list(list, tag)
}

/// Find a string property `(tag "VALUE")` within `list`.
pub fn string_prop(list: &[Sexpr], tag: &str) -> Option<String> {
    child_list(list, tag)?.get(1)?.as_str().map(str::to_string)
}

/// Find a symbol atom property `(tag VALUE)` within `list`.
pub fn sym_prop(list: &[Sexpr], tag: &str) -> Option<String> {
    child_list(list, tag)?.get(1)?.as_sym().map(str::to_string)
}

/// Find a numeric property `(tag 1.27)` within `list`.
pub fn number_prop(list: &[Sexpr], tag: &str) -> Option<f64> {
    child_list(list, tag)?.get(1)?.as_number()
}
