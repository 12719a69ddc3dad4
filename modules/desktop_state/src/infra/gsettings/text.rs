//! GVariant text format codec
//!
//! `gsettings` prints and accepts values in GVariant text format. Parsing is
//! guided by the known signature, so untyped literals such as `[]` or `5`
//! are unambiguous; type annotations (`@as []`, `int32 5`) are accepted and
//! skipped.

use crate::contract::Value;
use crate::domain::{ScalarKind, Signature, TypedVariant};
use anyhow::{anyhow, bail, Result};

const TYPE_KEYWORDS: &[&str] = &[
    "boolean",
    "byte",
    "int16",
    "uint16",
    "int32",
    "uint32",
    "int64",
    "uint64",
    "handle",
    "double",
    "string",
    "objectpath",
    "signature",
];

/// Render a variant in GVariant text format
pub fn format(variant: &TypedVariant) -> String {
    let mut out = String::new();
    write_value(&mut out, variant.value(), variant.signature());
    out
}

fn write_value(out: &mut String, value: &Value, signature: &Signature) {
    match value {
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::Double(d) => out.push_str(&format_double(*d)),
        Value::Str(s) => write_quoted(out, s),
        Value::Array(items) => {
            let child = match signature {
                Signature::Array(child) => Some(child.as_ref()),
                _ => None,
            };
            if items.is_empty() {
                // Empty arrays carry no element type of their own
                out.push('@');
                out.push_str(&signature.to_string());
                out.push_str(" []");
                return;
            }
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item, child.unwrap_or(signature));
            }
            out.push(']');
        }
        Value::Tuple(items) => {
            let children: &[Signature] = match signature {
                Signature::Tuple(children) => children,
                _ => &[],
            };
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item, children.get(i).unwrap_or(signature));
            }
            if items.len() == 1 {
                out.push(',');
            }
            out.push(')');
        }
    }
}

fn format_double(d: f64) -> String {
    if d.is_nan() {
        "nan".to_string()
    } else if d.is_infinite() {
        let sign = if d > 0.0 { "" } else { "-" };
        format!("{}inf", sign)
    } else {
        // Debug keeps the decimal point on integral values ("5.0")
        format!("{:?}", d)
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
}

/// Parse GVariant text into a value of the given signature
pub fn parse(text: &str, signature: &Signature) -> Result<Value> {
    let mut parser = Parser::new(text);
    let value = parser.value(signature)?;
    parser.skip_ws();
    if !parser.at_end() {
        bail!(
            "unexpected trailing input at offset {} in {:?}",
            parser.pos,
            text
        );
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        self.skip_ws();
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => bail!("expected '{}' but found '{}' at offset {}", expected, c, self.pos),
            None => bail!("expected '{}' but input ended", expected),
        }
    }

    /// Consume a run of characters that may form a word or number literal
    fn token(&mut self) -> &'a str {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn skip_annotations(&mut self) {
        loop {
            self.skip_ws();
            let rest = self.rest();
            if rest.starts_with('@') {
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                self.pos += end;
                continue;
            }
            let keyword = TYPE_KEYWORDS.iter().find(|kw| {
                rest.strip_prefix(**kw)
                    .is_some_and(|after| after.starts_with(char::is_whitespace))
            });
            match keyword {
                Some(kw) => self.pos += kw.len(),
                None => return,
            }
        }
    }

    fn value(&mut self, signature: &Signature) -> Result<Value> {
        self.skip_annotations();
        match signature {
            Signature::Scalar(kind) => self.scalar(*kind),
            Signature::Array(child) => {
                self.expect('[')?;
                let mut items = Vec::new();
                self.skip_ws();
                if self.peek() == Some(']') {
                    self.bump();
                    return Ok(Value::Array(items));
                }
                loop {
                    items.push(self.value(child)?);
                    self.skip_ws();
                    match self.bump() {
                        Some(',') => continue,
                        Some(']') => return Ok(Value::Array(items)),
                        other => bail!("expected ',' or ']' in array, found {:?}", other),
                    }
                }
            }
            Signature::Tuple(children) => {
                self.expect('(')?;
                let mut items = Vec::with_capacity(children.len());
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        self.expect(',')?;
                    }
                    items.push(self.value(child)?);
                }
                self.skip_ws();
                if self.peek() == Some(',') {
                    self.bump();
                }
                self.expect(')')?;
                Ok(Value::Tuple(items))
            }
        }
    }

    fn scalar(&mut self, kind: ScalarKind) -> Result<Value> {
        match kind {
            ScalarKind::String => self.string().map(Value::Str),
            ScalarKind::Boolean => match self.token() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                other => bail!("invalid boolean literal {:?}", other),
            },
            ScalarKind::Int32 => {
                let token = self.token();
                token
                    .parse::<i32>()
                    .map(Value::Int)
                    .map_err(|e| anyhow!("invalid int32 literal {:?}: {}", token, e))
            }
            ScalarKind::Double => {
                let token = self.token();
                let parsed = match token {
                    "inf" | "+inf" => Ok(f64::INFINITY),
                    "-inf" => Ok(f64::NEG_INFINITY),
                    "nan" => Ok(f64::NAN),
                    _ => token.parse::<f64>(),
                };
                parsed
                    .map(Value::Double)
                    .map_err(|e| anyhow!("invalid double literal {:?}: {}", token, e))
            }
        }
    }

    fn string(&mut self) -> Result<String> {
        self.skip_ws();
        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            other => bail!("expected quoted string, found {:?}", other),
        };

        let mut out = String::new();
        loop {
            match self.bump() {
                None => bail!("unterminated string literal"),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => {
                    let escaped = self
                        .bump()
                        .ok_or_else(|| anyhow!("unterminated escape sequence"))?;
                    match escaped {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        'b' => out.push('\u{8}'),
                        'f' => out.push('\u{c}'),
                        'v' => out.push('\u{b}'),
                        'a' => out.push('\u{7}'),
                        'u' => out.push(self.unicode_escape(4)?),
                        'U' => out.push(self.unicode_escape(8)?),
                        other => out.push(other),
                    }
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn unicode_escape(&mut self, digits: usize) -> Result<char> {
        let rest = self.rest();
        let hex = rest
            .get(..digits)
            .ok_or_else(|| anyhow!("truncated unicode escape"))?;
        let code = u32::from_str_radix(hex, 16)
            .map_err(|e| anyhow!("invalid unicode escape {:?}: {}", hex, e))?;
        self.pos += digits;
        char::from_u32(code).ok_or_else(|| anyhow!("invalid unicode scalar {:#x}", code))
    }
}
