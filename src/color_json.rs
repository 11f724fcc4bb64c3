//! Purpose: Render decoded values as JSON text with optional ANSI colorization.
//! Exports: `render_value`, `Layout`.
//! Role: Small, pure formatter used by CLI emission paths.
//! Invariants: Without color, output equals `serde_json` compact/pretty rendering of `Value::to_json`.
//! Invariants: ANSI escapes appear only when explicitly enabled.
use serde_json::Value as Json;
use strto::api::Value;

const INDENT: &str = "  ";

// Conservative 8/16-color palette for broad terminal compatibility.
const COLOR_KEY: &str = "36";
const COLOR_STRING: &str = "32";
const COLOR_NUMBER: &str = "33";
const COLOR_BOOL: &str = "35";
const COLOR_TEMPORAL: &str = "34";
const COLOR_NULL: &str = "39";
const COLOR_PUNCT: &str = "39";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Layout {
    Compact,
    Pretty,
}

pub fn render_value(value: &Value, layout: Layout, use_color: bool) -> String {
    let mut out = String::new();
    Writer {
        layout,
        use_color,
        out: &mut out,
    }
    .value(value, 0);
    out
}

struct Writer<'a> {
    layout: Layout,
    use_color: bool,
    out: &'a mut String,
}

impl Writer<'_> {
    fn value(&mut self, value: &Value, indent: usize) {
        match value {
            Value::List(items) | Value::Tuple(items) => self.seq(items.iter(), indent),
            Value::Set(items) => self.seq(items.iter(), indent),
            Value::Map(map) => {
                let entries = map.iter().map(|(k, v)| {
                    let key = match k {
                        Value::Str(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (key, v)
                });
                self.object(entries, indent);
            }
            Value::Record(record) => {
                let entries = record.fields.iter().map(|(name, v)| (name.clone(), v));
                self.object(entries, indent);
            }
            Value::Date(_) | Value::DateTime(_) | Value::Time(_) | Value::Duration(_) => {
                self.scalar(&value.to_json(), COLOR_TEMPORAL);
            }
            other => {
                let json = other.to_json();
                let color = match &json {
                    Json::Null => COLOR_NULL,
                    Json::Bool(_) => COLOR_BOOL,
                    Json::Number(_) => COLOR_NUMBER,
                    _ => COLOR_STRING,
                };
                match json {
                    Json::Object(_) => self.json_object(&json, indent),
                    scalar => self.scalar(&scalar, color),
                }
            }
        }
    }

    /// Ranges and slices render as small objects.
    fn json_object(&mut self, json: &Json, indent: usize) {
        let Json::Object(obj) = json else {
            return;
        };
        let entries: Vec<(String, Value)> = obj
            .iter()
            .map(|(k, v)| (k.clone(), Value::from_json(v.clone())))
            .collect();
        self.object(entries.iter().map(|(k, v)| (k.clone(), v)), indent);
    }

    fn scalar(&mut self, json: &Json, color: &str) {
        let text = serde_json::to_string(json).unwrap_or_else(|_| "null".to_string());
        self.colored(&text, color);
    }

    fn seq<'v>(&mut self, items: impl ExactSizeIterator<Item = &'v Value>, indent: usize) {
        let len = items.len();
        if len == 0 {
            self.colored("[]", COLOR_PUNCT);
            return;
        }
        self.colored("[", COLOR_PUNCT);
        for (idx, item) in items.enumerate() {
            self.break_line(indent + 1);
            self.value(item, indent + 1);
            if idx + 1 < len {
                self.colored(",", COLOR_PUNCT);
            }
        }
        self.break_line(indent);
        self.colored("]", COLOR_PUNCT);
    }

    fn object<'v>(&mut self, entries: impl Iterator<Item = (String, &'v Value)>, indent: usize) {
        let entries: Vec<_> = entries.collect();
        if entries.is_empty() {
            self.colored("{}", COLOR_PUNCT);
            return;
        }
        self.colored("{", COLOR_PUNCT);
        let len = entries.len();
        for (idx, (key, value)) in entries.into_iter().enumerate() {
            self.break_line(indent + 1);
            let encoded = serde_json::to_string(&key).unwrap_or_else(|_| "\"\"".to_string());
            self.colored(&encoded, COLOR_KEY);
            self.colored(":", COLOR_PUNCT);
            if self.layout == Layout::Pretty {
                self.out.push(' ');
            }
            self.value(value, indent + 1);
            if idx + 1 < len {
                self.colored(",", COLOR_PUNCT);
            }
        }
        self.break_line(indent);
        self.colored("}", COLOR_PUNCT);
    }

    fn break_line(&mut self, level: usize) {
        if self.layout == Layout::Compact {
            return;
        }
        self.out.push('\n');
        for _ in 0..level {
            self.out.push_str(INDENT);
        }
    }

    fn colored(&mut self, text: &str, color: &str) {
        if !self.use_color {
            self.out.push_str(text);
            return;
        }
        self.out.push_str("\u{1b}[");
        self.out.push_str(color);
        self.out.push('m');
        self.out.push_str(text);
        self.out.push_str("\u{1b}[0m");
    }
}
