//! Purpose: Boolean leaf decoder with a fixed synonym table.
//! Exports: `BoolDecoder`, `TRUE_WORDS`, `FALSE_WORDS`.
//! Role: Default catalog entry for `bool`.
//! Invariants: Matching is case-insensitive unless configured otherwise; surrounding
//!             whitespace is ignored.
use crate::core::error::{Error, ErrorKind};
use crate::core::registry::LeafDecoder;
use crate::core::value::Value;

pub const TRUE_WORDS: [&str; 5] = ["1", "true", "yes", "y", "on"];
pub const FALSE_WORDS: [&str; 5] = ["0", "false", "no", "n", "off"];

#[derive(Clone, Copy, Debug, Default)]
pub struct BoolDecoder {
    pub case_sensitive: bool,
}

impl BoolDecoder {
    fn matches(&self, text: &str, word: &str) -> bool {
        if self.case_sensitive {
            text == word
        } else {
            text.eq_ignore_ascii_case(word)
        }
    }

    fn parse(&self, raw: &str) -> Result<bool, Error> {
        let text = raw.trim();
        if TRUE_WORDS.iter().any(|word| self.matches(text, word)) {
            return Ok(true);
        }
        if FALSE_WORDS.iter().any(|word| self.matches(text, word)) {
            return Ok(false);
        }
        Err(Error::new(ErrorKind::Value).with_message(format!(
            "valid choices: {}, {}",
            TRUE_WORDS.join(", "),
            FALSE_WORDS.join(", ")
        )))
    }
}

impl LeafDecoder for BoolDecoder {
    fn decode(&self, value: &Value) -> Result<Value, Error> {
        match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::Int(n) => Ok(Value::Bool(*n != 0)),
            Value::Str(raw) => self.parse(raw).map(Value::Bool),
            other => Err(Error::new(ErrorKind::Type).with_message(format!(
                "expected bool, int, or str, got {}",
                other.type_name()
            ))),
        }
    }
}
