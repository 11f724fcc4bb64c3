//! Purpose: Run the recursive, type-directed decode of raw input into typed values.
//! Exports: `Decoder`, `BoundDecoder`.
//! Role: Orchestrates classifier, registry and the container/union/record/choice resolvers.
//! Invariants: Same `(value, type)` with an unchanged registry yields the same result or error kind.
//! Invariants: Only union resolution and `is_supported` absorb errors; all others propagate.
//! Invariants: Recursion depth equals descriptor nesting depth; descriptors are finite trees.
use std::fmt;

use crate::core::choice;
use crate::core::classify::{Kind, classify, resolve_alias};
use crate::core::config::DecoderConfig;
use crate::core::containers;
use crate::core::error::{Error, ErrorKind};
use crate::core::record;
use crate::core::registry::{DecoderRegistry, LeafDecoder};
use crate::core::types::{LeafType, TypeDesc};
use crate::core::union;
use crate::core::value::Value;

use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct Decoder {
    registry: DecoderRegistry,
    config: DecoderConfig,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::from_config(DecoderConfig::default())
    }
}

impl Decoder {
    pub fn new(registry: DecoderRegistry, config: DecoderConfig) -> Self {
        Self { registry, config }
    }

    /// Engine over a fresh default catalog built for `config`.
    pub fn from_config(config: DecoderConfig) -> Self {
        let registry = crate::catalog::default_catalog(&config);
        Self { registry, config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn registry(&self) -> &DecoderRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DecoderRegistry {
        &mut self.registry
    }

    pub fn add(&mut self, ty: impl Into<TypeDesc>, decoder: Arc<dyn LeafDecoder>) {
        self.registry.add(ty, decoder);
    }

    pub fn extend<I>(&mut self, decoders: I)
    where
        I: IntoIterator<Item = (TypeDesc, Arc<dyn LeafDecoder>)>,
    {
        self.registry.extend(decoders);
    }

    pub fn get(&self, ty: &TypeDesc) -> Result<Arc<dyn LeafDecoder>, Error> {
        self.registry.get(ty)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn decode_str(&self, input: &str, ty: &TypeDesc) -> Result<Value, Error> {
        self.decode(&Value::Str(input.to_string()), ty)
    }

    pub fn decode(&self, value: &Value, ty: &TypeDesc) -> Result<Value, Error> {
        let ty = resolve_alias(&self.registry, ty);
        let leaf = self.registry.lookup(ty);
        if value.is_null() && leaf.is_none() {
            return Ok(Value::Null);
        }
        if is_bare_passthrough(value, ty) {
            return Ok(value.clone());
        }

        let kind = classify(&self.registry, &self.config, ty);
        tracing::trace!(target_type = %ty, ?kind, "decode dispatch");
        match (kind, ty) {
            (Kind::Leaf, _) => match leaf {
                Some(decoder) => decoder
                    .decode(value)
                    .map_err(|err| err.or_context(|| value.to_string(), &ty.to_string())),
                None => Err(Error::new(ErrorKind::Internal)
                    .with_target(ty.to_string())
                    .with_message("leaf classification without registry entry")),
            },
            (Kind::StructuredRecord, TypeDesc::Record(desc)) => {
                record::decode_record(self, value, desc)
            }
            (Kind::ParametrizedContainer, TypeDesc::Container { kind, item }) => {
                containers::decode_container(self, value, *kind, item, ty)
            }
            (Kind::ParametrizedMapping, TypeDesc::Mapping { key, value: val, .. }) => {
                containers::decode_mapping(self, value, key, val, ty)
            }
            (Kind::FixedTuple, TypeDesc::Tuple(items)) => {
                containers::decode_fixed_tuple(self, value, items, ty)
            }
            (Kind::VariadicTuple, TypeDesc::VariadicTuple(item)) => {
                containers::decode_variadic_tuple(self, value, item, ty)
            }
            (Kind::VariadicTuple, TypeDesc::Tuple(items)) if items.len() == 1 => {
                containers::decode_variadic_tuple(self, value, &items[0], ty)
            }
            (Kind::Union, TypeDesc::Union(members)) => {
                union::decode_union(self, value, members, ty)
            }
            (Kind::TaggedEnum, TypeDesc::Enum(desc)) => choice::decode_enum(value, desc),
            (Kind::RestrictedChoice, TypeDesc::Literal(choices)) => {
                choice::decode_literal(value, choices, ty)
            }
            _ => Err(unsupported(value, ty)),
        }
    }

    /// Dry-run classification; never reads a value and never fails.
    pub fn is_supported(&self, ty: &TypeDesc) -> bool {
        let ty = resolve_alias(&self.registry, ty);
        match (classify(&self.registry, &self.config, ty), ty) {
            (Kind::Leaf, _) | (Kind::StructuredRecord, _) | (Kind::TaggedEnum, _) => true,
            (Kind::RestrictedChoice, TypeDesc::Literal(choices)) => !choices.is_empty(),
            (Kind::ParametrizedContainer, TypeDesc::Container { item, .. }) => {
                self.is_supported(item)
            }
            (Kind::VariadicTuple, TypeDesc::VariadicTuple(item)) => self.is_supported(item),
            (Kind::VariadicTuple, TypeDesc::Tuple(items)) => {
                items.iter().all(|item| self.is_supported(item))
            }
            (Kind::ParametrizedMapping, TypeDesc::Mapping { key, value, .. }) => {
                self.is_supported(key) && self.is_supported(value)
            }
            (Kind::FixedTuple, TypeDesc::Tuple(items)) => {
                items.iter().all(|item| self.is_supported(item))
            }
            (Kind::Union, TypeDesc::Union(members)) => {
                members.iter().any(|member| self.is_supported(member))
            }
            _ => false,
        }
    }

    /// A decode closure fixed to one target type, e.g. per CLI flag.
    pub fn bind(&self, ty: TypeDesc) -> BoundDecoder<'_> {
        BoundDecoder { decoder: self, ty }
    }
}

fn is_bare_passthrough(value: &Value, ty: &TypeDesc) -> bool {
    let TypeDesc::Leaf(leaf) = ty else {
        return false;
    };
    matches!(
        (value, leaf),
        (Value::List(_), LeafType::List | LeafType::Deque)
            | (Value::Tuple(_), LeafType::Tuple)
            | (Value::Set(_), LeafType::Set | LeafType::FrozenSet)
            | (Value::Map(_), LeafType::Dict | LeafType::OrderedDict)
    )
}

fn unsupported(value: &Value, ty: &TypeDesc) -> Error {
    Error::new(ErrorKind::UnsupportedType)
        .with_value(value.to_string())
        .with_target(ty.to_string())
        .with_message("unsupported type")
        .with_hint("register a leaf decoder for it via Decoder::add")
}

pub struct BoundDecoder<'a> {
    decoder: &'a Decoder,
    ty: TypeDesc,
}

impl BoundDecoder<'_> {
    pub fn ty(&self) -> &TypeDesc {
        &self.ty
    }

    pub fn decode(&self, input: &str) -> Result<Value, Error> {
        self.decoder.decode_str(input, &self.ty)
    }

    pub fn decode_value(&self, value: &Value) -> Result<Value, Error> {
        self.decoder.decode(value, &self.ty)
    }
}

impl fmt::Debug for BoundDecoder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decoder[{}]", self.ty)
    }
}

impl fmt::Display for BoundDecoder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decoder[{}]", self.ty)
    }
}
