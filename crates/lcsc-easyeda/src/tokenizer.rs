//! Splits one shape-language line into an opcode and positional fields.

pub const FIELD_DELIMITER: char = '~';

/// One record line split at [`FIELD_DELIMITER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedLine {
    pub opcode: String,
    pub fields: Vec<String>,
}

/// Tokenize a single line. Blank and delimiter-only lines yield `None`.
///
/// No validation happens here: field counts and numeric parsing are the
/// decoder's job.
pub fn tokenize(line: &str) -> Option<TokenizedLine> {
    let line = line.trim_end();
    if line.chars().all(|c| c == FIELD_DELIMITER || c.is_whitespace()) {
        return None;
    }

    let mut parts = line.split(FIELD_DELIMITER);
    let opcode = parts.next()?.trim().to_string();
    let fields = parts.map(str::to_string).collect();
    Some(TokenizedLine { opcode, fields })
}
