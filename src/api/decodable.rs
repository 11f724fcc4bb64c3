//! Purpose: Typed extraction from decoded `Value`s into plain Rust types.
//! Exports: `Decodable`, `RecordFields`, plus `Decoder::decode_as`.
//! Role: Compile-time mapping from Rust types to `TypeDesc`, replacing runtime introspection.
//! Invariants: `T::from_value` accepts whatever the engine yields for `T::type_desc()`.
//! Invariants: Numeric narrowing is checked; out-of-range values are `Value` errors.
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;
use std::path::PathBuf;

use crate::core::engine::Decoder;
use crate::core::error::{Error, ErrorKind};
use crate::core::types::{LeafType, TypeDesc};
use crate::core::value::{Record, Value};

/// A Rust type with a known decode target.
///
/// Record types implement this by returning `TypeDesc::Record(..)` and pulling
/// fields out of the decoded record with [`RecordFields`].
pub trait Decodable: Sized {
    fn type_desc() -> TypeDesc;
    fn from_value(value: Value) -> Result<Self, Error>;
}

fn mismatch<T: Decodable>(value: &Value) -> Error {
    Error::new(ErrorKind::Type)
        .with_target(T::type_desc().to_string())
        .with_message(format!("decoded value is {}", value.type_name()))
}

impl Decoder {
    /// Decode `input` against `T::type_desc()` and extract a `T`.
    pub fn decode_as<T: Decodable>(&self, input: &str) -> Result<T, Error> {
        let value = self.decode_str(input, &T::type_desc())?;
        T::from_value(value)
    }

    pub fn decode_value_as<T: Decodable>(&self, value: &Value) -> Result<T, Error> {
        T::from_value(self.decode(value, &T::type_desc())?)
    }
}

impl Decodable for String {
    fn type_desc() -> TypeDesc {
        TypeDesc::str()
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Decodable for i64 {
    fn type_desc() -> TypeDesc {
        TypeDesc::int()
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Int(n) => Ok(n),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

macro_rules! narrow_int {
    ($($ty:ty),*) => {$(
        impl Decodable for $ty {
            fn type_desc() -> TypeDesc {
                TypeDesc::int()
            }

            fn from_value(value: Value) -> Result<Self, Error> {
                let wide = i64::from_value(value)?;
                <$ty>::try_from(wide).map_err(|err| {
                    Error::new(ErrorKind::Value)
                        .with_value(wide.to_string())
                        .with_message(concat!("out of range for ", stringify!($ty)))
                        .with_source(err)
                })
            }
        }
    )*};
}

narrow_int!(i32, u16, u32, u64, usize);

impl Decodable for f64 {
    fn type_desc() -> TypeDesc {
        TypeDesc::float()
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Float(n) => Ok(n),
            Value::Int(n) => Ok(n as f64),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Decodable for bool {
    fn type_desc() -> TypeDesc {
        TypeDesc::bool()
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Decodable for PathBuf {
    fn type_desc() -> TypeDesc {
        TypeDesc::Leaf(LeafType::Path)
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Path(path) => Ok(path),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Decodable for time::Date {
    fn type_desc() -> TypeDesc {
        TypeDesc::Leaf(LeafType::Date)
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Date(date) => Ok(date),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<T: Decodable> Decodable for Option<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::optional(T::type_desc())
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

fn items_of<T: Decodable>(value: Value) -> Result<Vec<Value>, Error> {
    match value {
        Value::List(items) | Value::Tuple(items) => Ok(items),
        Value::Set(items) => Ok(items.into_iter().collect()),
        other => Err(mismatch::<T>(&other)),
    }
}

impl<T: Decodable> Decodable for Vec<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::list(T::type_desc())
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        items_of::<Self>(value)?
            .into_iter()
            .map(T::from_value)
            .collect()
    }
}

impl<T: Decodable + Ord> Decodable for BTreeSet<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::set(T::type_desc())
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        items_of::<Self>(value)?
            .into_iter()
            .map(T::from_value)
            .collect()
    }
}

fn entries_of<M, K, V>(value: Value) -> Result<M, Error>
where
    M: Decodable + FromIterator<(K, V)>,
    K: Decodable,
    V: Decodable,
{
    match value {
        Value::Map(map) => map
            .into_iter()
            .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
            .collect(),
        other => Err(mismatch::<M>(&other)),
    }
}

impl<K: Decodable + Eq + Hash, V: Decodable> Decodable for HashMap<K, V> {
    fn type_desc() -> TypeDesc {
        TypeDesc::dict(K::type_desc(), V::type_desc())
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        entries_of::<Self, K, V>(value)
    }
}

impl<K: Decodable + Ord, V: Decodable> Decodable for BTreeMap<K, V> {
    fn type_desc() -> TypeDesc {
        TypeDesc::dict(K::type_desc(), V::type_desc())
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        entries_of::<Self, K, V>(value)
    }
}

impl<A: Decodable, B: Decodable> Decodable for (A, B) {
    fn type_desc() -> TypeDesc {
        TypeDesc::tuple(vec![A::type_desc(), B::type_desc()])
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        let items = items_of::<Self>(value)?;
        match <[Value; 2]>::try_from(items) {
            Ok([a, b]) => Ok((A::from_value(a)?, B::from_value(b)?)),
            Err(items) => Err(Error::new(ErrorKind::Value)
                .with_message(format!("expected 2 items, got {}", items.len()))),
        }
    }
}

impl<A: Decodable, B: Decodable, C: Decodable> Decodable for (A, B, C) {
    fn type_desc() -> TypeDesc {
        TypeDesc::tuple(vec![A::type_desc(), B::type_desc(), C::type_desc()])
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        let items = items_of::<Self>(value)?;
        match <[Value; 3]>::try_from(items) {
            Ok([a, b, c]) => Ok((A::from_value(a)?, B::from_value(b)?, C::from_value(c)?)),
            Err(items) => Err(Error::new(ErrorKind::Value)
                .with_message(format!("expected 3 items, got {}", items.len()))),
        }
    }
}

/// Field-by-field access to a decoded record for `Decodable` record impls.
#[derive(Debug)]
pub struct RecordFields {
    record: Record,
}

impl RecordFields {
    /// Accepts `Value::Record` named `name`.
    pub fn new(value: Value, name: &str) -> Result<Self, Error> {
        match value {
            Value::Record(record) if record.name == name => Ok(Self { record }),
            other => Err(Error::new(ErrorKind::Type)
                .with_target(name)
                .with_message(format!("decoded value is {}", other.type_name()))),
        }
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Remove `field` and extract it as `T`; absent fields extract from null.
    pub fn take<T: Decodable>(&mut self, field: &str) -> Result<T, Error> {
        let value = match self.record.fields.iter().position(|(name, _)| name == field) {
            Some(idx) => self.record.fields.remove(idx).1,
            None => Value::Null,
        };
        T::from_value(value).map_err(|err| {
            if err.hint().is_some() {
                err
            } else {
                err.with_hint(format!("in field `{field}` of {}", self.record.name))
            }
        })
    }
}
