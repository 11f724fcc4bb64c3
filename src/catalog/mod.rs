//! Purpose: Build the default leaf-decoder catalog.
//! Exports: `default_catalog`, plus the per-family decoder modules.
//! Role: Fresh registry per call; callers clone or extend it instead of sharing globals.
//! Invariants: Every builtin `LeafType` has exactly one entry; no custom types are added.
//! Invariants: Config-dependent decoders capture the config they were built with.
use std::sync::Arc;

use crate::core::config::DecoderConfig;
use crate::core::registry::{DecoderRegistry, LeafDecoder};
use crate::core::types::{LeafType, TypeDesc};

pub mod boolean;
pub mod collections;
pub mod datetime;
pub mod numbers;
pub mod numexpr;
pub mod text;

fn leaf_decoder(leaf: &LeafType, config: &DecoderConfig) -> Option<Arc<dyn LeafDecoder>> {
    let decoder: Arc<dyn LeafDecoder> = match leaf {
        LeafType::Str => Arc::new(text::decode_str),
        LeafType::Int => Arc::new(numbers::IntDecoder {
            allow_expressions: config.allow_expressions,
        }),
        LeafType::Float => Arc::new(numbers::FloatDecoder {
            allow_expressions: config.allow_expressions,
        }),
        LeafType::Bool => Arc::new(boolean::BoolDecoder {
            case_sensitive: config.bool_case_sensitive,
        }),
        LeafType::Bytes => Arc::new(text::decode_bytes),
        LeafType::Fraction => Arc::new(text::decode_fraction),
        LeafType::Path => Arc::new(text::decode_path),
        LeafType::Date => Arc::new(datetime::decode_date),
        LeafType::DateTime => Arc::new(datetime::decode_datetime),
        LeafType::Time => Arc::new(datetime::decode_time),
        LeafType::Duration => Arc::new(datetime::decode_duration),
        LeafType::Range => Arc::new(collections::decode_range),
        LeafType::Slice => Arc::new(collections::decode_slice),
        LeafType::None => Arc::new(text::decode_none),
        LeafType::Any => Arc::new(text::decode_any),
        LeafType::List
        | LeafType::Tuple
        | LeafType::Set
        | LeafType::FrozenSet
        | LeafType::Deque => Arc::new(collections::BareContainer {
            leaf: leaf.clone(),
            config: config.clone(),
        }),
        LeafType::Dict | LeafType::OrderedDict => Arc::new(collections::BareMapping {
            config: config.clone(),
        }),
        LeafType::Custom(_) => return None,
    };
    Some(decoder)
}

/// A fresh registry holding a decoder for every builtin leaf type.
pub fn default_catalog(config: &DecoderConfig) -> DecoderRegistry {
    let mut registry = DecoderRegistry::new();
    for leaf in LeafType::BUILTIN {
        if let Some(decoder) = leaf_decoder(&leaf, config) {
            registry.add(TypeDesc::Leaf(leaf), decoder);
        }
    }
    tracing::debug!(decoders = registry.len(), "built default catalog");
    registry
}

#[cfg(test)]
mod tests {
    use super::default_catalog;
    use crate::core::config::DecoderConfig;
    use crate::core::types::{LeafType, TypeDesc};
    use crate::core::value::Value;

    #[test]
    fn catalog_covers_every_builtin_leaf() {
        let registry = default_catalog(&DecoderConfig::default());
        assert_eq!(registry.len(), LeafType::BUILTIN.len());
        for leaf in LeafType::BUILTIN {
            assert!(registry.contains(&TypeDesc::Leaf(leaf.clone())), "{}", leaf.name());
        }
    }

    #[test]
    fn catalogs_are_independent() {
        let mut first = default_catalog(&DecoderConfig::default());
        let second = default_catalog(&DecoderConfig::default());
        first.add_fn(TypeDesc::custom("extra"), |v| Ok(v.clone()));
        assert_eq!(first.len(), second.len() + 1);
    }

    #[test]
    fn config_reaches_config_dependent_decoders() {
        let config = DecoderConfig::default()
            .with_expressions(false)
            .with_bool_case_sensitive(true);
        let registry = default_catalog(&config);
        let int = registry.get(&TypeDesc::int()).expect("int");
        assert!(int.decode(&Value::from("1+1")).is_err());
        let boolean = registry.get(&TypeDesc::bool()).expect("bool");
        assert!(boolean.decode(&Value::from("TRUE")).is_err());
    }
}
