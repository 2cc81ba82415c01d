//! Recursive-descent reader for the data-literal subset of JavaScript/TypeScript.
//!
//! Only inert literals are accepted: objects, arrays, strings, numbers,
//! booleans, `null` and `undefined`. Identifiers, calls, spreads and template
//! interpolation in value position are rejected, so reading a data file never
//! runs any of its code.

use std::fmt;

/// A parsed literal value. Object members keep source order.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Undefined,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Literal>),
    Object(Vec<(String, Literal)>),
}

impl Literal {
    pub fn get(&self, key: &str) -> Option<&Literal> {
        match self {
            Literal::Object(members) => members.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Literal::Null | Literal::Undefined)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Literal::Null => "null",
            Literal::Undefined => "undefined",
            Literal::Bool(_) => "boolean",
            Literal::Number(_) => "number",
            Literal::String(_) => "string",
            Literal::Array(_) => "array",
            Literal::Object(_) => "object",
        }
    }
}

/// Parse failure with a byte offset into the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    pub offset: usize,
    pub message: String,
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.offset)
    }
}

impl std::error::Error for LiteralError {}

type ParseResult<T> = Result<T, LiteralError>;

/// 1-based line and column of a byte offset.
pub fn line_column(src: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (idx, ch) in src.char_indices() {
        if idx >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

/// Parse a standalone literal; trailing `;` and `as const` are tolerated.
pub fn parse_literal(src: &str) -> ParseResult<Literal> {
    let mut cursor = Cursor::new(src);
    let value = cursor.value()?;
    cursor.finish_statement()?;
    cursor.trivia()?;
    if !cursor.at_end() {
        return Err(cursor.error("unexpected trailing input after literal"));
    }
    Ok(value)
}

/// Locate `NAME` as a declared or exported binding and parse its initializer.
///
/// Returns `Ok(None)` when no such binding exists.
pub fn find_binding(src: &str, name: &str) -> ParseResult<Option<Literal>> {
    let mut cursor = Cursor::new(src);
    loop {
        // Surrounding code may hold regex literals such as `/a\/*b/`; a
        // comment that never closes is stepped over rather than fatal.
        if cursor.trivia().is_err() {
            cursor.bump();
            continue;
        }
        let Some(ch) = cursor.peek() else {
            return Ok(None);
        };

        if is_quote(ch) {
            // Strings in surrounding code are skipped whole so their text
            // never looks like a declaration. A quote left open on its line
            // is not a string (a regex `/"/`, say) and is stepped over;
            // an open template is an error.
            let start = cursor.pos;
            if let Err(err) = cursor.skip_string() {
                if ch == '`' {
                    return Err(err);
                }
                cursor.pos = start + ch.len_utf8();
            }
            continue;
        }

        if !is_ident_start(ch) {
            cursor.bump();
            continue;
        }

        let word = cursor.ident();
        match word {
            "const" | "let" | "var" => {
                cursor.trivia()?;
                if cursor.peek().is_some_and(is_ident_start) && cursor.ident() == name {
                    cursor.trivia()?;
                    if cursor.eat(':') {
                        cursor.skip_type_annotation()?;
                    }
                    cursor.trivia()?;
                    if cursor.eat('=') {
                        let value = cursor.value()?;
                        cursor.finish_statement()?;
                        return Ok(Some(value));
                    }
                }
            }
            "module" => {
                if cursor.member("exports") && cursor.member(name) && cursor.assignment()? {
                    return cursor.value().map(Some);
                }
            }
            "exports" => {
                if cursor.member(name) && cursor.assignment()? {
                    return cursor.value().map(Some);
                }
            }
            _ => {}
        }
    }
}

fn is_quote(ch: char) -> bool {
    matches!(ch, '"' | '\'' | '`')
}

fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphabetic()
}

fn is_ident_continue(ch: char) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit() || ch == '\u{200c}' || ch == '\u{200d}'
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> ParseResult<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(match self.peek() {
                Some(found) => format!("expected `{expected}`, found `{found}`"),
                None => format!("expected `{expected}`, found end of input"),
            }))
        }
    }

    /// Whitespace, `//` and `/* */` comments.
    fn trivia(&mut self) -> ParseResult<()> {
        loop {
            let rest = self.rest();
            if let Some(ch) = rest.chars().next().filter(|c| c.is_whitespace() || *c == '\u{feff}') {
                self.pos += ch.len_utf8();
            } else if rest.starts_with("//") {
                self.pos += rest.find('\n').unwrap_or(rest.len());
            } else if rest.starts_with("/*") {
                match rest[2..].find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => return Err(self.error("unterminated block comment")),
                }
            } else {
                return Ok(());
            }
        }
    }

    fn ident(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_continue) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    /// `.NAME` following a member expression head.
    fn member(&mut self, name: &str) -> bool {
        let checkpoint = self.pos;
        let matched = self.trivia().is_ok()
            && self.eat('.')
            && self.trivia().is_ok()
            && self.peek().is_some_and(is_ident_start)
            && self.ident() == name;
        if !matched {
            self.pos = checkpoint;
        }
        matched
    }

    /// A plain `=` (not `==`, `=>`).
    fn assignment(&mut self) -> ParseResult<bool> {
        self.trivia()?;
        if self.peek() == Some('=') && !matches!(self.peek_second(), Some('=' | '>')) {
            self.bump();
            return Ok(true);
        }
        Ok(false)
    }

    /// Skip a TypeScript annotation up to the initializer's `=`.
    fn skip_type_annotation(&mut self) -> ParseResult<()> {
        let mut depth = 0usize;
        loop {
            self.trivia()?;
            let Some(ch) = self.peek() else {
                return Err(self.error("unterminated type annotation"));
            };
            match ch {
                '<' | '(' | '[' | '{' => depth += 1,
                '>' | ')' | ']' | '}' => depth = depth.saturating_sub(1),
                '=' if self.peek_second() == Some('>') => {
                    self.pos += 2;
                    continue;
                }
                '=' if depth == 0 => return Ok(()),
                ';' if depth == 0 => return Err(self.error("declaration has no initializer")),
                c if is_quote(c) => {
                    self.skip_string()?;
                    continue;
                }
                _ => {}
            }
            self.bump();
        }
    }

    /// Optional `as const` / `satisfies T` tail and `;`.
    fn finish_statement(&mut self) -> ParseResult<()> {
        self.trivia()?;
        let rest = self.rest();
        if rest.starts_with("as") || rest.starts_with("satisfies") {
            let checkpoint = self.pos;
            let word = self.ident();
            if word == "as" || word == "satisfies" {
                while self.peek().is_some_and(|c| c != ';' && c != '\n') {
                    self.bump();
                }
            } else {
                self.pos = checkpoint;
            }
        }
        self.trivia()?;
        self.eat(';');
        Ok(())
    }

    fn value(&mut self) -> ParseResult<Literal> {
        self.trivia()?;
        match self.peek() {
            Some('{') => self.object(),
            Some('[') => self.array(),
            Some(c) if is_quote(c) => self.string().map(Literal::String),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => {
                self.number().map(Literal::Number)
            }
            Some(c) if is_ident_start(c) => {
                let start = self.pos;
                match self.ident() {
                    "true" => Ok(Literal::Bool(true)),
                    "false" => Ok(Literal::Bool(false)),
                    "null" => Ok(Literal::Null),
                    "undefined" => Ok(Literal::Undefined),
                    word => Err(LiteralError {
                        offset: start,
                        message: format!("`{word}` is not a data literal"),
                    }),
                }
            }
            Some(c) => Err(self.error(format!("unexpected `{c}` where a value was expected"))),
            None => Err(self.error("unexpected end of input where a value was expected")),
        }
    }

    fn object(&mut self) -> ParseResult<Literal> {
        self.expect('{')?;
        let mut members: Vec<(String, Literal)> = Vec::new();
        loop {
            self.trivia()?;
            if self.eat('}') {
                return Ok(Literal::Object(members));
            }

            if self.rest().starts_with("...") {
                return Err(self.error("spread members are not data literals"));
            }
            let key = match self.peek() {
                Some(c) if is_quote(c) => self.string()?,
                Some(c) if c.is_ascii_digit() || c == '.' => number_to_string(self.number()?),
                Some(c) if is_ident_start(c) => self.ident().to_string(),
                Some('[') => return Err(self.error("computed keys are not data literals")),
                Some(c) => return Err(self.error(format!("unexpected `{c}` in object key"))),
                None => return Err(self.error("unterminated object")),
            };

            self.trivia()?;
            if !self.eat(':') {
                return Err(self.error(format!("expected `:` after key `{key}`")));
            }
            let value = self.value()?;
            match members.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => members.push((key, value)),
            }

            self.trivia()?;
            if self.eat(',') {
                continue;
            }
            self.expect('}')?;
            return Ok(Literal::Object(members));
        }
    }

    fn array(&mut self) -> ParseResult<Literal> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.trivia()?;
            if self.eat(']') {
                return Ok(Literal::Array(items));
            }
            if self.peek() == Some(',') {
                return Err(self.error("array holes are not supported"));
            }
            if self.rest().starts_with("...") {
                return Err(self.error("spread elements are not data literals"));
            }
            items.push(self.value()?);
            self.trivia()?;
            if self.eat(',') {
                continue;
            }
            self.expect(']')?;
            return Ok(Literal::Array(items));
        }
    }

    fn string(&mut self) -> ParseResult<String> {
        let quote = self.bump().ok_or_else(|| self.error("expected a string"))?;
        let mut out = String::new();
        loop {
            let Some(ch) = self.bump() else {
                return Err(self.error("unterminated string"));
            };
            match ch {
                c if c == quote => return Ok(out),
                '\\' => self.escape(&mut out)?,
                '$' if quote == '`' && self.peek() == Some('{') => {
                    return Err(self.error("template interpolation is not a data literal"))
                }
                '\n' | '\r' if quote != '`' => return Err(self.error("unterminated string")),
                c => out.push(c),
            }
        }
    }

    /// Move past a string without decoding it, including any `${ ... }`
    /// interpolations of a template.
    fn skip_string(&mut self) -> ParseResult<()> {
        let start = self.pos;
        let unterminated = || LiteralError {
            offset: start,
            message: "unterminated string".to_string(),
        };
        let quote = self.bump().ok_or_else(unterminated)?;
        loop {
            match self.bump().ok_or_else(unterminated)? {
                '\\' => {
                    self.bump();
                }
                c if c == quote => return Ok(()),
                '$' if quote == '`' && self.eat('{') => self.skip_interpolation()?,
                '\n' | '\r' if quote != '`' => return Err(unterminated()),
                _ => {}
            }
        }
    }

    fn skip_interpolation(&mut self) -> ParseResult<()> {
        let mut depth = 1usize;
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated template interpolation")),
                Some(c) if is_quote(c) => self.skip_string()?,
                Some(c) => {
                    self.bump();
                    match c {
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                return Ok(());
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> ParseResult<()> {
        let Some(ch) = self.bump() else {
            return Err(self.error("unterminated escape sequence"));
        };
        match ch {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !self.peek().is_some_and(|c| c.is_ascii_digit()) => out.push('\0'),
            'x' => {
                let code = self.hex_digits(2)?;
                out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
            }
            'u' => {
                let code = self.unicode_escape()?;
                out.push(code);
            }
            '\r' => {
                self.eat('\n');
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            c if c.is_ascii_digit() => return Err(self.error("octal escapes are not supported")),
            c => out.push(c),
        }
        Ok(())
    }

    fn hex_digits(&mut self, count: usize) -> ParseResult<u32> {
        let rest = self.rest();
        let digits = rest.get(..count).filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()));
        let Some(digits) = digits else {
            return Err(self.error("invalid hexadecimal escape"));
        };
        self.pos += count;
        u32::from_str_radix(digits, 16).map_err(|_| self.error("invalid hexadecimal escape"))
    }

    fn unicode_escape(&mut self) -> ParseResult<char> {
        if self.eat('{') {
            let end = self
                .rest()
                .find('}')
                .ok_or_else(|| self.error("unterminated unicode escape"))?;
            let digits = &self.rest()[..end];
            let code = u32::from_str_radix(digits, 16)
                .map_err(|_| self.error("invalid unicode escape"))?;
            self.pos += end + 1;
            return char::from_u32(code).ok_or_else(|| self.error("invalid unicode code point"));
        }

        let high = self.hex_digits(4)?;
        if !(0xD800..0xDC00).contains(&high) {
            return Ok(char::from_u32(high).unwrap_or('\u{fffd}'));
        }
        if self.rest().starts_with("\\u") {
            let checkpoint = self.pos;
            self.pos += 2;
            let low = self.hex_digits(4)?;
            if (0xDC00..0xE000).contains(&low) {
                let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                return Ok(char::from_u32(code).unwrap_or('\u{fffd}'));
            }
            self.pos = checkpoint;
        }
        Ok('\u{fffd}')
    }

    fn number(&mut self) -> ParseResult<f64> {
        let start = self.pos;
        let negative = if self.eat('-') {
            true
        } else {
            self.eat('+');
            false
        };
        self.trivia()?;

        let rest = self.rest();
        let radix = match rest.get(..2).map(str::to_ascii_lowercase).as_deref() {
            Some("0x") => Some(16),
            Some("0o") => Some(8),
            Some("0b") => Some(2),
            _ => None,
        };

        let magnitude = if let Some(radix) = radix {
            self.pos += 2;
            let digits = self.digits(|c| c.is_digit(radix));
            if digits.is_empty() {
                return Err(self.error("missing digits in number literal"));
            }
            u64::from_str_radix(&digits, radix)
                .map(|v| v as f64)
                .map_err(|_| self.error("integer literal out of range"))?
        } else {
            let mut text = self.digits(|c| c.is_ascii_digit());
            if self.peek() == Some('.') {
                self.bump();
                text.push('.');
                text.push_str(&self.digits(|c| c.is_ascii_digit()));
            }
            if !text.bytes().any(|b| b.is_ascii_digit()) {
                return Err(LiteralError {
                    offset: start,
                    message: "expected a number".to_string(),
                });
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                self.bump();
                text.push('e');
                if let Some(sign) = self.peek().filter(|c| matches!(c, '+' | '-')) {
                    self.bump();
                    text.push(sign);
                }
                let exponent = self.digits(|c| c.is_ascii_digit());
                if exponent.is_empty() {
                    return Err(self.error("missing exponent digits"));
                }
                text.push_str(&exponent);
            }
            text.parse::<f64>()
                .map_err(|_| self.error(format!("invalid number `{text}`")))?
        };

        if self.peek().is_some_and(is_ident_continue) {
            return Err(self.error("identifier directly after number literal"));
        }
        Ok(if negative { -magnitude } else { magnitude })
    }

    /// Digits matching `accept`, with `_` separators removed.
    fn digits(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            if accept(ch) {
                out.push(ch);
            } else if ch != '_' {
                break;
            }
            self.bump();
        }
        out
    }
}

/// Render a number the way JavaScript stringifies it for integral values.
pub fn number_to_string(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(members: &[(&str, Literal)]) -> Literal {
        Literal::Object(
            members
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn parses_scalars() {
        assert_eq!(parse_literal("true").unwrap(), Literal::Bool(true));
        assert_eq!(parse_literal("null").unwrap(), Literal::Null);
        assert_eq!(parse_literal("undefined").unwrap(), Literal::Undefined);
        assert_eq!(parse_literal("-0.25").unwrap(), Literal::Number(-0.25));
        assert_eq!(parse_literal(".5").unwrap(), Literal::Number(0.5));
        assert_eq!(parse_literal("1e3").unwrap(), Literal::Number(1000.0));
        assert_eq!(parse_literal("1_000").unwrap(), Literal::Number(1000.0));
        assert_eq!(parse_literal("0x1F").unwrap(), Literal::Number(31.0));
        assert_eq!(parse_literal("0b101").unwrap(), Literal::Number(5.0));
    }

    #[test]
    fn parses_strings_with_escapes() {
        assert_eq!(
            parse_literal(r#""a\"b\né\x41""#).unwrap(),
            Literal::String("a\"b\néA".into())
        );
        assert_eq!(
            parse_literal(r"'it\'s'").unwrap(),
            Literal::String("it's".into())
        );
        assert_eq!(
            parse_literal("`multi\nline`").unwrap(),
            Literal::String("multi\nline".into())
        );
        assert_eq!(
            parse_literal(r#""😀 \u{1F600}""#).unwrap(),
            Literal::String("\u{1F600} \u{1F600}".into())
        );
    }

    #[test]
    fn parses_nested_structures_with_comments_and_trailing_commas() {
        let src = r#"
            {
                // leading comment
                politics: [
                    { date: '3/7', left: 0.42, "right": 0.58, }, /* trailing */
                ],
                'ask-politics': [],
            }
        "#;
        let parsed = parse_literal(src).unwrap();
        assert_eq!(
            parsed,
            obj(&[
                (
                    "politics",
                    Literal::Array(vec![obj(&[
                        ("date", Literal::String("3/7".into())),
                        ("left", Literal::Number(0.42)),
                        ("right", Literal::Number(0.58)),
                    ])])
                ),
                ("ask-politics", Literal::Array(vec![])),
            ])
        );
    }

    #[test]
    fn duplicate_keys_keep_first_position_and_last_value() {
        let parsed = parse_literal("{ a: 1, b: 2, a: 3 }").unwrap();
        assert_eq!(
            parsed,
            obj(&[("a", Literal::Number(3.0)), ("b", Literal::Number(2.0))])
        );
    }

    #[test]
    fn numeric_keys_are_normalized() {
        let parsed = parse_literal("{ 1: 'x', 2.5: 'y' }").unwrap();
        assert_eq!(parsed.get("1"), Some(&Literal::String("x".into())));
        assert_eq!(parsed.get("2.5"), Some(&Literal::String("y".into())));
    }

    #[test]
    fn rejects_executable_syntax() {
        for src in [
            "buildData()",
            "{ a: process.env.HOME }",
            "{ ...other }",
            "[...items]",
            "{ [key]: 1 }",
            "`${secret}`",
            "{ a: 1 + 2 }",
            "{ shorthand }",
            "[1,,2]",
            "12px",
            "NaN",
        ] {
            assert!(parse_literal(src).is_err(), "{src:?} should be rejected");
        }
    }

    #[test]
    fn reports_error_location() {
        let src = "{\n  a: 1,\n  b: oops\n}";
        let err = parse_literal(src).unwrap_err();
        assert_eq!(line_column(src, err.offset), (3, 6));
        assert!(err.message.contains("oops"));
    }

    #[test]
    fn finds_exported_const_binding() {
        let src = r#"
            import type { Entry } from './types';
            // const politicalDataMap = "decoy in comment";
            const note = "const politicalDataMap = 'decoy in string'";
            export const politicalDataMap: Record<string, Entry[]> = {
                politics: [{ date: '1/2', left: 0.5, right: 0.5 }],
            } as const;
            export default politicalDataMap;
        "#;
        let value = find_binding(src, "politicalDataMap").unwrap().unwrap();
        assert!(value.get("politics").is_some());
    }

    #[test]
    fn declarations_inside_templates_are_not_bindings() {
        let src = "const note = `${x} const politicalDataMap = { decoy: [] }`;\n\
                   export const politicalDataMap = { real: [] };";
        let value = find_binding(src, "politicalDataMap").unwrap().unwrap();
        assert!(value.get("real").is_some());
        assert!(value.get("decoy").is_none());

        let nested = "const t = `${ fmt({ a: `inner ${y}` }) } const politicalDataMap = { decoy: [] }`;\n\
                      const politicalDataMap = { real: [] };";
        let value = find_binding(nested, "politicalDataMap").unwrap().unwrap();
        assert!(value.get("real").is_some());
    }

    #[test]
    fn unterminated_template_in_surrounding_code_is_an_error() {
        let src = "const note = `open ${x}\nexport const politicalDataMap = {};";
        assert!(find_binding(src, "politicalDataMap").is_err());
    }

    #[test]
    fn regex_literals_in_surrounding_code_are_stepped_over() {
        let src = "const re = /a\\/*b/;\nconst quote = /\"/;\nexport const politicalDataMap = { real: [] };";
        let value = find_binding(src, "politicalDataMap").unwrap().unwrap();
        assert!(value.get("real").is_some());
    }

    #[test]
    fn large_integral_numbers_render_in_full() {
        assert_eq!(number_to_string(1e20), "100000000000000000000");
        assert_eq!(number_to_string(-12.0), "-12");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(2.5), "2.5");
    }

    #[test]
    fn finds_commonjs_export() {
        let src = "module.exports.politicalDataMap = { a: [] };";
        let value = find_binding(src, "politicalDataMap").unwrap().unwrap();
        assert_eq!(value, obj(&[("a", Literal::Array(vec![]))]));

        let src = "exports.politicalDataMap = { b: [] }";
        assert!(find_binding(src, "politicalDataMap").unwrap().is_some());
    }

    #[test]
    fn skips_other_declarations() {
        let src = "const other = { x: 1 };\nlet politicalDataMap = { y: [] };";
        let value = find_binding(src, "politicalDataMap").unwrap().unwrap();
        assert!(value.get("y").is_some());
        assert!(value.get("x").is_none());
    }

    #[test]
    fn missing_binding_is_none() {
        assert_eq!(find_binding("const other = {};", "politicalDataMap").unwrap(), None);
        assert_eq!(find_binding("", "politicalDataMap").unwrap(), None);
    }

    #[test]
    fn binding_with_executable_initializer_is_rejected() {
        let src = "export const politicalDataMap = loadFromNetwork();";
        assert!(find_binding(src, "politicalDataMap").is_err());
    }
}
