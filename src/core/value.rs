//! Purpose: Define the dynamic value produced (and accepted) by the decode engine.
//! Exports: `Value`, `Map`, `Record`, `Fraction`, `RangeValue`, `SliceValue`.
//! Role: Common currency between leaf decoders, resolvers, typed extraction and CLI output.
//! Invariants: `Value` is totally ordered and hashable; floats compare by `total_cmp`.
//! Invariants: `Map` keeps insertion order but compares order-insensitively.
//! Invariants: `Fraction` is always reduced with a positive denominator.
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Fraction(Fraction),
    Path(PathBuf),
    Date(time::Date),
    DateTime(time::PrimitiveDateTime),
    Time(time::Time),
    Duration(time::Duration),
    Range(RangeValue),
    Slice(SliceValue),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Set(BTreeSet<Value>),
    Map(Map),
    Record(Record),
    Enum { name: String, member: String },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Fraction {
    numer: i64,
    denom: i64,
}

impl Fraction {
    /// Returns `None` when `denom` is zero or the reduction overflows.
    pub fn new(numer: i64, denom: i64) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        let divisor = gcd(numer.unsigned_abs(), denom.unsigned_abs()).max(1);
        let divisor = i64::try_from(divisor).ok()?;
        let (mut numer, mut denom) = (numer / divisor, denom / divisor);
        if denom < 0 {
            numer = numer.checked_neg()?;
            denom = denom.checked_neg()?;
        }
        Some(Self { numer, denom })
    }

    pub fn numer(&self) -> i64 {
        self.numer
    }

    pub fn denom(&self) -> i64 {
        self.denom
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct RangeValue {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl RangeValue {
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        let mut next = self.start;
        std::iter::from_fn(move || {
            let live = if self.step > 0 {
                next < self.stop
            } else {
                self.step < 0 && next > self.stop
            };
            if !live {
                return None;
            }
            let current = next;
            next = next.checked_add(self.step)?;
            Some(current)
        })
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SliceValue {
    pub start: Option<f64>,
    pub stop: Option<f64>,
    pub step: Option<f64>,
}

impl SliceValue {
    fn parts(&self) -> [Option<f64>; 3] {
        [self.start, self.stop, self.step]
    }
}

impl PartialEq for SliceValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SliceValue {}

impl PartialOrd for SliceValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SliceValue {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.parts().iter().zip(other.parts().iter()) {
            let ord = match (a, b) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => a.total_cmp(b),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl Hash for SliceValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for part in self.parts() {
            part.map(f64::to_bits).hash(state);
        }
    }
}

/// Insertion-ordered mapping; inserting an existing key replaces its value in place.
#[derive(Clone, Debug, Default)]
pub struct Map {
    entries: IndexMap<Value, Value>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        self.entries.insert(key, value)
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &Value) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.entries.get(&Value::str(key))
    }

    /// Removes `key` and keeps the remaining entries in insertion order.
    pub fn remove_str(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(&Value::str(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter()
    }

    fn sorted(&self) -> Vec<(&Value, &Value)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl IntoIterator for Map {
    type Item = (Value, Value);
    type IntoIter = indexmap::map::IntoIter<Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(Value, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for Map {}

impl PartialOrd for Map {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Map {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sorted().cmp(&other.sorted())
    }
}

impl Hash for Map {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for (key, value) in self.sorted() {
            key.hash(state);
            value.hash(state);
        }
    }
}

/// A constructed structured record; fields keep declaration order.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Record {
    pub name: String,
    pub fields: Vec<(String, Value)>,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, v)| v)
    }
}

impl Value {
    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::Float(_) => 3,
            Value::Fraction(_) => 4,
            Value::Str(_) => 5,
            Value::Bytes(_) => 6,
            Value::Path(_) => 7,
            Value::Date(_) => 8,
            Value::DateTime(_) => 9,
            Value::Time(_) => 10,
            Value::Duration(_) => 11,
            Value::Range(_) => 12,
            Value::Slice(_) => 13,
            Value::List(_) => 14,
            Value::Tuple(_) => 15,
            Value::Set(_) => 16,
            Value::Map(_) => 17,
            Value::Record(_) => 18,
            Value::Enum { .. } => 19,
        }
    }

    /// Short name of the value's shape, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Fraction(_) => "fraction",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::Path(_) => "path",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Time(_) => "time",
            Value::Duration(_) => "duration",
            Value::Range(_) => "range",
            Value::Slice(_) => "slice",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Set(_) => "set",
            Value::Map(_) => "dict",
            Value::Record(_) => "record",
            Value::Enum { .. } => "enum",
        }
    }

    pub fn str(value: impl Into<String>) -> Self {
        Value::Str(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Items of list-like values (list, tuple, set).
    pub fn as_items(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items.clone()),
            Value::Set(items) => Some(items.iter().cloned().collect()),
            _ => None,
        }
    }

    pub fn from_json(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Value::Str(s),
            JsonValue::Array(items) => Value::List(items.into_iter().map(Value::from_json).collect()),
            JsonValue::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| (Value::Str(k), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(n) => JsonValue::from(*n),
            Value::Float(n) => Number::from_f64(*n)
                .map(JsonValue::Number)
                .unwrap_or_else(|| JsonValue::String(n.to_string())),
            Value::Str(s) => JsonValue::String(s.clone()),
            Value::Bytes(bytes) => JsonValue::String(String::from_utf8_lossy(bytes).into_owned()),
            Value::Fraction(frac) => JsonValue::String(frac.to_string()),
            Value::Path(path) => JsonValue::String(path.display().to_string()),
            Value::Date(_) | Value::DateTime(_) | Value::Time(_) => {
                JsonValue::String(self.to_string())
            }
            Value::Duration(d) => Number::from_f64(d.as_seconds_f64())
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Range(r) => serde_json::json!({"start": r.start, "stop": r.stop, "step": r.step}),
            Value::Slice(s) => serde_json::json!({"start": s.start, "stop": s.stop, "step": s.step}),
            Value::List(items) | Value::Tuple(items) => {
                JsonValue::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Set(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => {
                let mut obj = JsonMap::new();
                for (k, v) in map.iter() {
                    let key = match k {
                        Value::Str(s) => s.clone(),
                        other => other.to_string(),
                    };
                    obj.insert(key, v.to_json());
                }
                JsonValue::Object(obj)
            }
            Value::Record(record) => {
                let mut obj = JsonMap::new();
                for (name, v) in &record.fields {
                    obj.insert(name.clone(), v.to_json());
                }
                JsonValue::Object(obj)
            }
            Value::Enum { member, .. } => JsonValue::String(member.clone()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Fraction(a), Value::Fraction(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
            (Value::Path(a), Value::Path(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (Value::Time(a), Value::Time(b)) => a.cmp(b),
            (Value::Duration(a), Value::Duration(b)) => a.cmp(b),
            (Value::Range(a), Value::Range(b)) => a.cmp(b),
            (Value::Slice(a), Value::Slice(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => a.cmp(b),
            (Value::Set(a), Value::Set(b)) => a.cmp(b),
            (Value::Map(a), Value::Map(b)) => a.cmp(b),
            (Value::Record(a), Value::Record(b)) => a.cmp(b),
            (
                Value::Enum { name: an, member: am },
                Value::Enum { name: bn, member: bm },
            ) => (an, am).cmp(&(bn, bm)),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind_rank().hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(n) => n.hash(state),
            Value::Float(n) => n.to_bits().hash(state),
            Value::Fraction(f) => f.hash(state),
            Value::Str(s) => s.hash(state),
            Value::Bytes(b) => b.hash(state),
            Value::Path(p) => p.hash(state),
            Value::Date(d) => d.hash(state),
            Value::DateTime(d) => d.hash(state),
            Value::Time(t) => t.hash(state),
            Value::Duration(d) => d.hash(state),
            Value::Range(r) => r.hash(state),
            Value::Slice(s) => s.hash(state),
            Value::List(items) | Value::Tuple(items) => items.hash(state),
            Value::Set(items) => items.hash(state),
            Value::Map(map) => map.hash(state),
            Value::Record(record) => record.hash(state),
            Value::Enum { name, member } => {
                name.hash(state);
                member.hash(state);
            }
        }
    }
}

fn write_seq<'a>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    close: &str,
    items: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    f.write_str(open)?;
    for (idx, item) in items.enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

/// Repr-style rendering: strings are quoted so diagnostics show exact input.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("none"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n:?}"),
            Value::Fraction(frac) => write!(f, "{frac}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Bytes(b) => write!(f, "b{:?}", String::from_utf8_lossy(b)),
            Value::Path(p) => write!(f, "{}", p.display()),
            Value::Date(d) => write!(f, "{:04}-{:02}-{:02}", d.year(), u8::from(d.month()), d.day()),
            Value::DateTime(dt) => write!(
                f,
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
                dt.year(),
                u8::from(dt.month()),
                dt.day(),
                dt.hour(),
                dt.minute(),
                dt.second()
            ),
            Value::Time(t) => write!(f, "{:02}:{:02}:{:02}", t.hour(), t.minute(), t.second()),
            Value::Duration(d) => write!(f, "{}s", d.as_seconds_f64()),
            Value::Range(r) => write!(f, "range({}, {}, {})", r.start, r.stop, r.step),
            Value::Slice(s) => {
                let part = |p: Option<f64>| p.map(|v| format!("{v:?}")).unwrap_or_default();
                write!(f, "{}:{}:{}", part(s.start), part(s.stop), part(s.step))
            }
            Value::List(items) => write_seq(f, "[", "]", items.iter()),
            Value::Tuple(items) => write_seq(f, "(", ")", items.iter()),
            Value::Set(items) => write_seq(f, "{", "}", items.iter()),
            Value::Map(map) => {
                f.write_str("{")?;
                for (idx, (k, v)) in map.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Record(record) => {
                write!(f, "{}(", record.name)?;
                for (idx, (name, v)) in record.fields.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}={v}")?;
                }
                f.write_str(")")
            }
            Value::Enum { name, member } => write!(f, "{name}.{member}"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}
