//! Purpose: Parse dot-path `key=value` text into a nested mapping.
//! Exports: `parse_assignments`.
//! Role: Source normalization for structured records given as shell-style text.
//! Invariants: Tokens split on whitespace or `;` outside quotes and outside `{}`/`[]` nesting.
//! Invariants: Dotted keys build nested maps; later assignments overwrite earlier ones.
//! Notes: Values that look like JSON objects/arrays are parsed eagerly, falling back to the
//!        raw string when the JSON is invalid.
use crate::core::error::{Error, ErrorKind};
use crate::core::value::{Map, Value};
use crate::json::parse;

#[derive(Default)]
struct Tokenizer {
    tokens: Vec<String>,
    current: String,
    started: bool,
}

impl Tokenizer {
    fn push(&mut self, ch: char) {
        self.current.push(ch);
        self.started = true;
    }

    fn flush(&mut self) {
        if self.started {
            self.tokens.push(std::mem::take(&mut self.current));
            self.started = false;
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<String>, Error> {
    let mut out = Tokenizer::default();
    let mut chars = text.chars();
    let mut shell_quote: Option<char> = None;
    let mut depth = 0usize;
    let mut in_json_string = false;

    while let Some(ch) = chars.next() {
        if let Some(quote) = shell_quote {
            match ch {
                c if c == quote => shell_quote = None,
                '\\' if quote == '"' => {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                }
                c => out.push(c),
            }
            continue;
        }
        if depth > 0 {
            out.push(ch);
            match ch {
                '\\' if in_json_string => {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                }
                '"' => in_json_string = !in_json_string,
                '{' | '[' if !in_json_string => depth += 1,
                '}' | ']' if !in_json_string => depth -= 1,
                _ => {}
            }
            continue;
        }
        match ch {
            '\'' | '"' => {
                shell_quote = Some(ch);
                out.started = true;
            }
            '\\' => {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '{' | '[' => {
                depth += 1;
                out.push(ch);
            }
            ';' => out.flush(),
            c if c.is_whitespace() => out.flush(),
            c => out.push(c),
        }
    }

    if shell_quote.is_some() {
        return Err(Error::new(ErrorKind::Value)
            .with_message("unterminated quote in key=value text"));
    }
    if depth > 0 {
        return Err(Error::new(ErrorKind::Value)
            .with_message("unbalanced brackets in key=value text"));
    }
    out.flush();
    Ok(out.tokens)
}

fn parse_scalar(raw: &str) -> Value {
    if parse::looks_like_object(raw) || parse::looks_like_array(raw) {
        if let Ok(value) = parse::parse_value(raw) {
            return value;
        }
    }
    Value::str(raw)
}

fn assign(root: &mut Map, path: &[&str], value: Value) -> Result<(), Error> {
    let Some((last, parents)) = path.split_last() else {
        return Ok(());
    };
    let mut node = root;
    for (depth, segment) in parents.iter().enumerate() {
        let key = Value::str(*segment);
        if node.get(&key).is_none() {
            node.insert(key.clone(), Value::Map(Map::new()));
        }
        node = match node.get_mut(&key) {
            Some(Value::Map(child)) => child,
            _ => {
                return Err(Error::new(ErrorKind::Value).with_message(format!(
                    "conflicting assignment: `{}` is not a nested mapping",
                    path[..=depth].join(".")
                )));
            }
        };
    }
    node.insert(Value::str(*last), value);
    Ok(())
}

/// Parse `a=1 b.c=x; d='two words'` into `{a: "1", b: {c: "x"}, d: "two words"}`.
pub fn parse_assignments(text: &str) -> Result<Map, Error> {
    let mut root = Map::new();
    for token in tokenize(text)? {
        let Some((key, raw)) = token.split_once('=') else {
            return Err(Error::new(ErrorKind::Value)
                .with_value(format!("{token:?}"))
                .with_message("expected key=value")
                .with_hint("separate assignments with spaces or `;`"));
        };
        let path: Vec<&str> = key.trim().split('.').collect();
        if path.iter().any(|segment| segment.is_empty()) {
            return Err(Error::new(ErrorKind::Value)
                .with_value(format!("{token:?}"))
                .with_message("empty key segment"));
        }
        assign(&mut root, &path, parse_scalar(raw))?;
    }
    Ok(root)
}
