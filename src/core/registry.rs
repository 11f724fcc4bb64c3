//! Purpose: Map exact type identities to leaf decoders.
//! Exports: `LeafDecoder`, `DecoderRegistry`, `from_text`.
//! Role: Lookup table consulted first by the classifier; callers override any type here.
//! Invariants: Exact-match only; no fallback through related types.
//! Invariants: `add` overwrites; there is no removal.
//! Notes: Not internally synchronized; clone a registry per thread when mutating concurrently.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::core::error::{Error, ErrorKind};
use crate::core::types::TypeDesc;
use crate::core::value::Value;

/// Decodes a raw string (or already-typed value) into one concrete leaf type.
pub trait LeafDecoder: Send + Sync {
    fn decode(&self, value: &Value) -> Result<Value, Error>;
}

impl<F> LeafDecoder for F
where
    F: Fn(&Value) -> Result<Value, Error> + Send + Sync,
{
    fn decode(&self, value: &Value) -> Result<Value, Error> {
        self(value)
    }
}

struct TextDecoder<F> {
    parse: F,
}

impl<F, T, E> LeafDecoder for TextDecoder<F>
where
    F: Fn(&str) -> Result<T, E> + Send + Sync,
    T: Into<Value>,
    E: fmt::Display,
{
    fn decode(&self, value: &Value) -> Result<Value, Error> {
        let Value::Str(text) = value else {
            return Err(Error::new(ErrorKind::Type)
                .with_message(format!("expected str input, got {}", value.type_name())));
        };
        (self.parse)(text)
            .map(Into::into)
            .map_err(|err| Error::new(ErrorKind::Value).with_message(err.to_string()))
    }
}

/// Adapt a plain `&str` parsing function into a leaf decoder.
pub fn from_text<F, T, E>(parse: F) -> Arc<dyn LeafDecoder>
where
    F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    T: Into<Value> + 'static,
    E: fmt::Display + 'static,
{
    Arc::new(TextDecoder { parse })
}

#[derive(Clone, Default)]
pub struct DecoderRegistry {
    decoders: HashMap<TypeDesc, Arc<dyn LeafDecoder>>,
}

impl DecoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, ty: impl Into<TypeDesc>, decoder: Arc<dyn LeafDecoder>) {
        self.decoders.insert(ty.into(), decoder);
    }

    pub fn add_fn<F>(&mut self, ty: impl Into<TypeDesc>, decode: F)
    where
        F: Fn(&Value) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.add(ty, Arc::new(decode));
    }

    pub fn extend<I>(&mut self, decoders: I)
    where
        I: IntoIterator<Item = (TypeDesc, Arc<dyn LeafDecoder>)>,
    {
        for (ty, decoder) in decoders {
            self.add(ty, decoder);
        }
    }

    pub fn get(&self, ty: &TypeDesc) -> Result<Arc<dyn LeafDecoder>, Error> {
        self.decoders.get(ty).cloned().ok_or_else(|| {
            Error::new(ErrorKind::NotFound)
                .with_target(ty.to_string())
                .with_message("no decoder registered for type")
        })
    }

    pub(crate) fn lookup(&self, ty: &TypeDesc) -> Option<&Arc<dyn LeafDecoder>> {
        self.decoders.get(ty)
    }

    pub fn contains(&self, ty: &TypeDesc) -> bool {
        self.decoders.contains_key(ty)
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Registered types, sorted by their rendered name.
    pub fn types(&self) -> Vec<&TypeDesc> {
        let mut types: Vec<_> = self.decoders.keys().collect();
        types.sort_by_key(|ty| ty.to_string());
        types
    }
}

impl fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderRegistry")
            .field("types", &self.types())
            .finish()
    }
}
