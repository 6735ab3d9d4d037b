//! A small S-expression tree used to build and inspect KiCad library text.
//!
//! Documents are assembled with [`ListBuilder`] and [`kv`], rendered with
//! [`formatter::format_tree`], and read back with [`parse`] when an existing
//! library has to be merged or validated.

pub mod formatter;
pub mod kicad;

use std::fmt;

use thiserror::Error;

/// Find a direct child list `(name ...)` within a list of [`Sexpr`] nodes.
pub fn find_child_list<'a>(items: &'a [Sexpr], name: &str) -> Option<&'a [Sexpr]> {
    items
        .iter()
        .filter_map(Sexpr::as_list)
        .find(|list| list.first().and_then(Sexpr::as_sym) == Some(name))
}

/// An S-expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Sexpr {
    /// Unquoted identifier such as `rectangle` or `yes`
    Symbol(String),
    /// Quoted text
    String(String),
    Int(i64),
    Float(f64),
    List(Vec<Sexpr>),
}

impl Sexpr {
    pub fn symbol(s: impl Into<String>) -> Self {
        Self::Symbol(s.into())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    pub fn int(n: i64) -> Self {
        Self::Int(n)
    }

    pub fn float(f: f64) -> Self {
        Self::Float(f)
    }

    pub fn list(items: Vec<Sexpr>) -> Self {
        Self::List(items)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub fn as_sym(&self) -> Option<&str> {
        match self {
            Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Symbol or string content, whichever this atom is.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Symbol(s) | Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Coerce a number atom into f64.
    ///
    /// KiCad writes whole numbers without a decimal point, so both integer
    /// and float atoms are accepted.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Sexpr]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Sexpr>> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Leading symbol of a list node, e.g. `pad` for `(pad "1" smd ...)`.
    pub fn tag(&self) -> Option<&str> {
        self.as_list()?.first()?.as_sym()
    }

    /// Find a child list with the given name (first element)
    pub fn find_list(&self, name: &str) -> Option<&[Sexpr]> {
        find_child_list(self.as_list()?, name)
    }

    /// Count every list node in the tree whose tag is `name`, at any depth.
    pub fn count_tagged(&self, name: &str) -> usize {
        let own = usize::from(self.tag() == Some(name));
        let nested: usize = self
            .as_list()
            .map(|items| items.iter().map(|child| child.count_tagged(name)).sum())
            .unwrap_or_default();
        own + nested
    }
}

/// Create a key-value pair list
pub fn kv<K: Into<String>, V: Into<Sexpr>>(k: K, v: V) -> Sexpr {
    Sexpr::list(vec![Sexpr::symbol(k), v.into()])
}

/// Create an `(at x y)` or `(at x y rot)` list.
pub fn at(x: f64, y: f64, rotation: Option<f64>) -> Sexpr {
    let mut node = ListBuilder::node("at");
    node.push(x).push(y);
    if let Some(rotation) = rotation {
        node.push(rotation);
    }
    node.build()
}

/// Create an `(xy x y)` point.
pub fn xy(x: f64, y: f64) -> Sexpr {
    Sexpr::list(vec![Sexpr::symbol("xy"), Sexpr::float(x), Sexpr::float(y)])
}

/// A builder for constructing lists incrementally
#[derive(Debug, Default)]
pub struct ListBuilder {
    items: Vec<Sexpr>,
}

impl ListBuilder {
    /// Create a new builder with a node name
    pub fn node<N: Into<Sexpr>>(name: N) -> Self {
        Self {
            items: vec![name.into()],
        }
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<V: Into<Sexpr>>(&mut self, v: V) -> &mut Self {
        self.items.push(v.into());
        self
    }

    pub fn push_if<V: Into<Sexpr>>(&mut self, cond: bool, v: V) -> &mut Self {
        if cond {
            self.items.push(v.into());
        }
        self
    }

    pub fn extend<I, V>(&mut self, iter: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Sexpr>,
    {
        self.items.extend(iter.into_iter().map(Into::into));
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn build(self) -> Sexpr {
        Sexpr::list(self.items)
    }
}

impl From<&str> for Sexpr {
    fn from(s: &str) -> Self {
        Self::symbol(s)
    }
}

impl From<String> for Sexpr {
    fn from(s: String) -> Self {
        Self::symbol(s)
    }
}

impl From<i64> for Sexpr {
    fn from(n: i64) -> Self {
        Self::int(n)
    }
}

impl From<u32> for Sexpr {
    fn from(n: u32) -> Self {
        Self::int(n as i64)
    }
}

impl From<f64> for Sexpr {
    fn from(n: f64) -> Self {
        Self::float(n)
    }
}

impl From<bool> for Sexpr {
    fn from(b: bool) -> Self {
        Self::symbol(if b { "yes" } else { "no" })
    }
}

/// Errors that can occur during parsing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Unexpected end of input")]
    UnexpectedEof,
    #[error("Unexpected '{0}' at byte {1}")]
    UnexpectedChar(char, usize),
    #[error("Unclosed list starting at byte {0}")]
    UnclosedList(usize),
    #[error("Unterminated string starting at byte {0}")]
    UnterminatedString(usize),
}

/// Parser for S-expressions
pub struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parse a single expression.
    pub fn parse(&mut self) -> Result<Sexpr, ParseError> {
        self.skip_trivia();
        match self.peek() {
            None => Err(ParseError::UnexpectedEof),
            Some('(') => self.parse_list(),
            Some(')') => Err(ParseError::UnexpectedChar(')', self.pos)),
            Some('"') => self.parse_string(),
            Some(_) => Ok(self.parse_atom()),
        }
    }

    /// Parse expressions until the input is exhausted.
    pub fn parse_all(&mut self) -> Result<Vec<Sexpr>, ParseError> {
        let mut out = Vec::new();
        loop {
            self.skip_trivia();
            if self.peek().is_none() {
                return Ok(out);
            }
            out.push(self.parse()?);
        }
    }

    fn parse_list(&mut self) -> Result<Sexpr, ParseError> {
        let start = self.pos;
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                None => return Err(ParseError::UnclosedList(start)),
                Some(')') => {
                    self.bump();
                    return Ok(Sexpr::List(items));
                }
                Some(_) => items.push(self.parse()?),
            }
        }
    }

    fn parse_string(&mut self) -> Result<Sexpr, ParseError> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            let Some(ch) = self.bump() else {
                return Err(ParseError::UnterminatedString(start));
            };
            match ch {
                '"' => return Ok(Sexpr::String(out)),
                '\\' => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    Some(other) => out.push(other),
                    None => return Err(ParseError::UnterminatedString(start)),
                },
                other => out.push(other),
            }
        }
    }

    fn parse_atom(&mut self) -> Sexpr {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || ch == '(' || ch == ')' || ch == '"' {
                break;
            }
            self.bump();
        }
        let atom = &self.input[start..self.pos];
        if let Ok(n) = atom.parse::<i64>() {
            Sexpr::Int(n)
        } else if let Ok(f) = atom.parse::<f64>() {
            Sexpr::Float(f)
        } else {
            Sexpr::Symbol(atom.to_string())
        }
    }

    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.bump();
            } else if ch == ';' {
                while let Some(ch) = self.bump() {
                    if ch == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }
}

/// Parse a string into an S-expression
pub fn parse(input: &str) -> Result<Sexpr, ParseError> {
    log::trace!("Parsing S-expression from {} bytes of input", input.len());
    Parser::new(input).parse()
}

/// Parse a string into multiple S-expressions
pub fn parse_all(input: &str) -> Result<Vec<Sexpr>, ParseError> {
    log::trace!(
        "Parsing multiple S-expressions from {} bytes of input",
        input.len()
    );
    Parser::new(input).parse_all()
}

impl fmt::Display for Sexpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = formatter::format_tree(self);
        write!(f, "{}", formatted.trim_end_matches('\n'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_atom() {
        assert_eq!(parse("hello").unwrap(), Sexpr::symbol("hello"));
        assert_eq!(parse("123").unwrap(), Sexpr::Int(123));
        assert_eq!(parse("-2.54").unwrap(), Sexpr::Float(-2.54));
        assert_eq!(parse("F.Cu").unwrap(), Sexpr::symbol("F.Cu"));
    }

    #[test]
    fn test_parse_string() {
        assert_eq!(
            parse("\"hello world\"").unwrap(),
            Sexpr::string("hello world")
        );
        assert_eq!(
            parse("\"with\\\"quotes\\\"\"").unwrap(),
            Sexpr::string("with\"quotes\"")
        );
        assert_eq!(
            parse("\"line\\nbreak\"").unwrap(),
            Sexpr::string("line\nbreak")
        );
    }

    #[test]
    fn test_parse_nested() {
        let parsed = parse("(symbol \"R1\" (pin_names (offset 1.016)) (in_bom yes))").unwrap();
        assert_eq!(parsed.tag(), Some("symbol"));
        let items = parsed.as_list().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[1], Sexpr::string("R1"));
        let offset = find_child_list(parsed.find_list("pin_names").unwrap(), "offset").unwrap();
        assert_eq!(offset[1].as_number(), Some(1.016));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse(""), Err(ParseError::UnexpectedEof));
        assert_eq!(parse("(a (b c)"), Err(ParseError::UnclosedList(0)));
        assert_eq!(parse("(a \"b"), Err(ParseError::UnterminatedString(3)));
        assert_eq!(parse(")"), Err(ParseError::UnexpectedChar(')', 0)));
    }

    #[test]
    fn test_parse_with_comments() {
        let input = "
        ; leading comment
        (test ; inline comment
          value)
        ";
        let parsed = parse(input).unwrap();
        assert_eq!(
            parsed,
            Sexpr::list(vec![Sexpr::symbol("test"), Sexpr::symbol("value")])
        );
    }

    #[test]
    fn test_parse_all() {
        let exprs = parse_all("(a) (b 1) c").unwrap();
        assert_eq!(exprs.len(), 3);
        assert_eq!(exprs[1].tag(), Some("b"));
    }

    #[test]
    fn test_builder() {
        let mut pad = ListBuilder::node("pad");
        pad.push(Sexpr::string("1"))
            .push("smd")
            .push("rect")
            .push(at(-1.0, 0.0, None))
            .push_if(false, kv("drill", 0.5));
        let pad = pad.build();
        assert_eq!(pad.to_string(), "(pad \"1\" smd rect\n\t(at -1 0)\n)");
    }

    #[test]
    fn test_count_tagged() {
        let parsed = parse("(a (pin x) (b (pin y) (pin z)) (pins))").unwrap();
        assert_eq!(parsed.count_tagged("pin"), 3);
        assert_eq!(parsed.count_tagged("b"), 1);
    }

    #[test]
    fn test_roundtrip() {
        let inputs = [
            "(simple list)",
            "(nested (list with) (multiple levels))",
            r#"(with "quoted string" and atoms)"#,
            r#"(pin passive line (at 0 0 0) (length 2.54) (name "1") (number "1"))"#,
        ];

        for input in inputs {
            let parsed = parse(input).unwrap();
            let formatted = formatter::format_tree(&parsed);
            let reparsed = parse(&formatted).unwrap();
            assert_eq!(parsed, reparsed, "Roundtrip failed for: {input}");
        }
    }

    #[test]
    fn test_utf8_handling() {
        let parsed = parse(r#"(symbol "résistance" "日本語")"#).unwrap();
        let items = parsed.as_list().unwrap();
        assert_eq!(items[1], Sexpr::string("résistance"));
        assert_eq!(items[2], Sexpr::string("日本語"));
    }
}
