//! Library entry names that are safe as bare KiCad identifiers.
//!
//! Reserved characters are replaced by brace tokens. `{` itself is escaped,
//! so every brace in the output starts a token and [`restore_name`] can
//! invert the mapping exactly.

const REPLACEMENTS: &[(char, &str)] = &[
    ('/', "{slash}"),
    ('\\', "{backslash}"),
    ('<', "{lt}"),
    ('>', "{gt}"),
    (':', "{colon}"),
    ('"', "{dblquote}"),
    (' ', "{space}"),
    ('.', "{dot}"),
    ('{', "{lbrace}"),
];

pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match REPLACEMENTS.iter().find(|(from, _)| *from == c) {
            Some((_, token)) => out.push_str(token),
            None => out.push(c),
        }
    }
    out
}

/// Inverse of [`sanitize_name`]. Unknown tokens are kept verbatim.
pub fn restore_name(sanitized: &str) -> String {
    let mut out = String::with_capacity(sanitized.len());
    let mut rest = sanitized;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let restored = tail.find('}').and_then(|end| {
            let token = &tail[..=end];
            REPLACEMENTS
                .iter()
                .find(|(_, t)| *t == token)
                .map(|(c, _)| (*c, end + 1))
        });
        match restored {
            Some((c, consumed)) => {
                out.push(c);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// `<part_id>_<label>`, sanitized.
pub fn library_entry_name(part_id: &str, label: &str) -> String {
    sanitize_name(&format!("{part_id}_{label}"))
}
