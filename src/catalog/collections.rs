//! Purpose: Leaf decoders for ranges, slices, and unparametrized containers/mappings.
//! Exports: `decode_range`, `decode_slice`, `BareContainer`, `BareMapping`.
//! Role: Default catalog entries for `range`, `slice`, `list`, `tuple`, `set`, `frozenset`,
//!       `deque`, `dict`, `ordereddict`.
//! Invariants: Range and slice text accepts 1-3 `:` separated parts; a single part is the stop.
//! Invariants: Bare containers yield raw items; no element decoding happens here.
use crate::core::config::DecoderConfig;
use crate::core::containers::{normalize_items, normalize_mapping};
use crate::core::error::{Error, ErrorKind};
use crate::core::registry::LeafDecoder;
use crate::core::types::LeafType;
use crate::core::value::{RangeValue, SliceValue, Value};

const PART_SEP: char = ':';

fn parts_error() -> Error {
    Error::new(ErrorKind::Value)
        .with_message(format!("use 'start{PART_SEP}stop[{PART_SEP}step]' with 1-3 parts"))
}

fn wrong_input(expected: &str, value: &Value) -> Error {
    Error::new(ErrorKind::Type).with_message(format!(
        "expected {expected}, got {}",
        value.type_name()
    ))
}

pub fn parse_range(raw: &str) -> Result<RangeValue, Error> {
    let nums = raw
        .trim()
        .split(PART_SEP)
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            part.trim().parse::<i64>().map_err(|err| {
                Error::new(ErrorKind::Value)
                    .with_message(format!("invalid range bound `{}`", part.trim()))
                    .with_source(err)
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let (start, stop, step) = match nums.as_slice() {
        [stop] => (0, *stop, 1),
        [start, stop] => (*start, *stop, 1),
        [start, stop, step] => (*start, *stop, *step),
        _ => return Err(parts_error()),
    };
    if step == 0 {
        return Err(Error::new(ErrorKind::Value).with_message("range step must not be zero"));
    }
    Ok(RangeValue { start, stop, step })
}

pub fn parse_slice(raw: &str) -> Result<SliceValue, Error> {
    let nums = raw
        .trim()
        .split(PART_SEP)
        .map(|part| {
            let part = part.trim();
            if part.is_empty() {
                return Ok(None);
            }
            part.parse::<f64>().map(Some).map_err(|err| {
                Error::new(ErrorKind::Value)
                    .with_message(format!("invalid slice bound `{part}`"))
                    .with_source(err)
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    match nums.as_slice() {
        [stop] => Ok(SliceValue {
            start: None,
            stop: *stop,
            step: None,
        }),
        [start, stop] => Ok(SliceValue {
            start: *start,
            stop: *stop,
            step: None,
        }),
        [start, stop, step] => Ok(SliceValue {
            start: *start,
            stop: *stop,
            step: *step,
        }),
        _ => Err(parts_error()),
    }
}

pub fn decode_range(value: &Value) -> Result<Value, Error> {
    match value {
        Value::Range(_) => Ok(value.clone()),
        Value::Int(stop) => Ok(Value::Range(RangeValue {
            start: 0,
            stop: *stop,
            step: 1,
        })),
        Value::Str(raw) => parse_range(raw).map(Value::Range),
        other => Err(wrong_input("range, int or str", other)),
    }
}

pub fn decode_slice(value: &Value) -> Result<Value, Error> {
    match value {
        Value::Slice(_) => Ok(value.clone()),
        Value::Str(raw) => parse_slice(raw).map(Value::Slice),
        other => Err(wrong_input("slice or str", other)),
    }
}

/// `list`, `tuple`, `set`, `frozenset` or `deque` without an element type.
#[derive(Clone, Debug)]
pub struct BareContainer {
    pub leaf: LeafType,
    pub config: DecoderConfig,
}

impl LeafDecoder for BareContainer {
    fn decode(&self, value: &Value) -> Result<Value, Error> {
        let items = normalize_items(&self.config, value)?;
        Ok(match self.leaf {
            LeafType::Tuple => Value::Tuple(items),
            LeafType::Set | LeafType::FrozenSet => Value::Set(items.into_iter().collect()),
            _ => Value::List(items),
        })
    }
}

/// `dict` or `ordereddict` without key/value types.
#[derive(Clone, Debug)]
pub struct BareMapping {
    pub config: DecoderConfig,
}

impl LeafDecoder for BareMapping {
    fn decode(&self, value: &Value) -> Result<Value, Error> {
        normalize_mapping(&self.config, value).map(Value::Map)
    }
}

#[cfg(test)]
mod tests {
    use super::{BareContainer, BareMapping, parse_range, parse_slice};
    use crate::core::config::DecoderConfig;
    use crate::core::error::ErrorKind;
    use crate::core::registry::LeafDecoder;
    use crate::core::types::LeafType;
    use crate::core::value::{RangeValue, SliceValue, Value};

    #[test]
    fn range_forms() {
        assert_eq!(
            parse_range("5").expect("stop"),
            RangeValue { start: 0, stop: 5, step: 1 }
        );
        assert_eq!(
            parse_range("1:10:2").expect("full"),
            RangeValue { start: 1, stop: 10, step: 2 }
        );
        let err = parse_range("1:2:3:4").err().expect("too many");
        assert_eq!(err.kind(), ErrorKind::Value);
        assert!(parse_range("1:2:0").is_err());
        assert!(parse_range("a").is_err());
    }

    #[test]
    fn slice_forms_keep_empty_parts() {
        assert_eq!(
            parse_slice("::2").expect("step"),
            SliceValue { start: None, stop: None, step: Some(2.0) }
        );
        assert_eq!(
            parse_slice("3").expect("stop"),
            SliceValue { start: None, stop: Some(3.0), step: None }
        );
        assert!(parse_slice("1:2:3:4").is_err());
    }

    #[test]
    fn bare_containers_keep_string_items() {
        let tuple = BareContainer {
            leaf: LeafType::Tuple,
            config: DecoderConfig::default(),
        };
        assert_eq!(
            tuple.decode(&Value::from("a, b")).expect("tuple"),
            Value::Tuple(vec![Value::from("a"), Value::from("b")])
        );
        let set = BareContainer {
            leaf: LeafType::Set,
            config: DecoderConfig::default(),
        };
        assert_eq!(
            set.decode(&Value::from("a,a")).expect("set"),
            Value::Set([Value::from("a")].into_iter().collect())
        );
    }

    #[test]
    fn bare_mapping_parses_json_objects() {
        let dict = BareMapping {
            config: DecoderConfig::default(),
        };
        let out = dict.decode(&Value::from(r#"{"a": [1]}"#)).expect("dict");
        let Value::Map(map) = out else {
            panic!("expected map");
        };
        assert_eq!(map.get_str("a"), Some(&Value::List(vec![Value::Int(1)])));
        assert!(dict.decode(&Value::Int(1)).is_err());
    }
}
