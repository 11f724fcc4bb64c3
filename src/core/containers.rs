//! Purpose: Decode homogeneous collections, fixed and variadic tuples, and typed mappings.
//! Exports: `normalize_items`, `decode_container`, `decode_mapping`,
//!          `decode_fixed_tuple`, `decode_variadic_tuple`.
//! Role: Turns one raw input into raw items (or raw pairs), then recurses per element.
//! Invariants: Every element is decoded or the whole container fails; nothing is skipped.
//! Invariants: File references are honoured only when the config enables from-file mode.
use crate::core::config::DecoderConfig;
use crate::core::engine::Decoder;
use crate::core::error::{Error, ErrorKind};
use crate::core::types::{ContainerKind, TypeDesc};
use crate::core::value::{Map, Value};
use crate::json::parse;
use crate::source;

/// Raw items of a container input, before element decoding.
///
/// Strings are, in order: a file reference, a JSON array, empty (no items),
/// or separator-delimited text. Sequences are taken element-wise.
pub fn normalize_items(config: &DecoderConfig, value: &Value) -> Result<Vec<Value>, Error> {
    match value {
        Value::Str(raw) => {
            let text = raw.trim();
            if let Some(path) = config.file_reference(text) {
                let items = source::read_items(path, &config.item_sep)?;
                return Ok(items.into_iter().map(Value::Str).collect());
            }
            if parse::looks_like_array(text) {
                return match parse::parse_value(text)? {
                    Value::List(items) => Ok(items),
                    other => Err(Error::new(ErrorKind::Type)
                        .with_message(format!("expected JSON array, got {}", other.type_name()))),
                };
            }
            if text.is_empty() {
                return Ok(Vec::new());
            }
            if config.item_sep.is_empty() {
                return Err(empty_separator());
            }
            Ok(text
                .split(config.item_sep.as_str())
                .map(|item| Value::str(item.trim()))
                .collect())
        }
        other => other.as_items().ok_or_else(|| {
            Error::new(ErrorKind::Type).with_message(format!(
                "expected string or sequence, got {}",
                other.type_name()
            ))
        }),
    }
}

fn empty_separator() -> Error {
    Error::new(ErrorKind::Value)
        .with_message("empty separator")
        .with_hint("configure a non-empty item separator")
}

fn decode_items<'a>(
    decoder: &Decoder,
    items: Vec<Value>,
    types: impl Iterator<Item = &'a TypeDesc>,
) -> Result<Vec<Value>, Error> {
    items
        .iter()
        .zip(types)
        .map(|(item, item_ty)| decoder.decode(item, item_ty))
        .collect()
}

fn with_container_context(err: Error, value: &Value, ty: &TypeDesc) -> Error {
    err.or_context(|| value.to_string(), &ty.to_string())
}

pub(crate) fn decode_container(
    decoder: &Decoder,
    value: &Value,
    kind: ContainerKind,
    item: &TypeDesc,
    ty: &TypeDesc,
) -> Result<Value, Error> {
    let items = normalize_items(decoder.config(), value)
        .map_err(|err| with_container_context(err, value, ty))?;
    let decoded = decode_items(decoder, items, std::iter::repeat(item))?;
    if kind.is_unordered() {
        Ok(Value::Set(decoded.into_iter().collect()))
    } else {
        Ok(Value::List(decoded))
    }
}

pub(crate) fn decode_fixed_tuple(
    decoder: &Decoder,
    value: &Value,
    items: &[TypeDesc],
    ty: &TypeDesc,
) -> Result<Value, Error> {
    let raw = normalize_items(decoder.config(), value)
        .map_err(|err| with_container_context(err, value, ty))?;
    if raw.len() != items.len() {
        return Err(Error::new(ErrorKind::Value)
            .with_value(value.to_string())
            .with_target(ty.to_string())
            .with_message(format!("expected {} items", items.len()))
            .with_hint(format!("got {} items", raw.len())));
    }
    Ok(Value::Tuple(decode_items(decoder, raw, items.iter())?))
}

pub(crate) fn decode_variadic_tuple(
    decoder: &Decoder,
    value: &Value,
    item: &TypeDesc,
    ty: &TypeDesc,
) -> Result<Value, Error> {
    let raw = normalize_items(decoder.config(), value)
        .map_err(|err| with_container_context(err, value, ty))?;
    Ok(Value::Tuple(decode_items(decoder, raw, std::iter::repeat(item))?))
}

/// Raw key/value pairs of a mapping input: a mapping, a JSON object string or a file reference.
pub fn normalize_mapping(config: &DecoderConfig, value: &Value) -> Result<Map, Error> {
    let loaded = match value {
        Value::Map(map) => return Ok(map.clone()),
        Value::Str(raw) => {
            let text = raw.trim();
            match config.file_reference(text) {
                Some(path) => source::load_mapping(path)?,
                None => parse::parse_value(text).map_err(|err| {
                    err.with_message("expected JSON string for mapping")
                        .with_hint("pass a JSON object such as '{\"key\": 1}'")
                })?,
            }
        }
        other => {
            return Err(Error::new(ErrorKind::Type).with_message(format!(
                "expected JSON string or mapping, got {}",
                other.type_name()
            )));
        }
    };
    match loaded {
        Value::Map(map) => Ok(map),
        other => Err(Error::new(ErrorKind::Type)
            .with_message(format!("expected JSON object, got {}", other.type_name()))),
    }
}

pub(crate) fn decode_mapping(
    decoder: &Decoder,
    value: &Value,
    key: &TypeDesc,
    val: &TypeDesc,
    ty: &TypeDesc,
) -> Result<Value, Error> {
    let raw = normalize_mapping(decoder.config(), value)
        .map_err(|err| with_container_context(err, value, ty))?;
    let mut out = Map::new();
    for (raw_key, raw_value) in raw {
        let decoded_key = decoder.decode(&raw_key, key)?;
        let decoded_value = decoder.decode(&raw_value, val)?;
        out.insert(decoded_key, decoded_value);
    }
    Ok(Value::Map(out))
}

#[cfg(test)]
mod tests {
    use super::normalize_items;
    use crate::core::config::DecoderConfig;
    use crate::core::engine::Decoder;
    use crate::core::error::ErrorKind;
    use crate::core::types::{ContainerKind, TypeDesc};
    use crate::core::value::{Map, Value};

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().copied().map(Value::Int).collect()
    }

    #[test]
    fn separator_split_trims_items() {
        let config = DecoderConfig::default();
        let items = normalize_items(&config, &Value::from(" a , b,c ")).expect("items");
        assert_eq!(items, vec![Value::from("a"), Value::from("b"), Value::from("c")]);
        assert!(normalize_items(&config, &Value::from("")).expect("empty").is_empty());
        let semi = config.with_item_sep(";");
        assert_eq!(normalize_items(&semi, &Value::from("1;2")).expect("items").len(), 2);
    }

    #[test]
    fn json_array_strings_keep_item_types() {
        let decoder = Decoder::default();
        let ty = TypeDesc::list(TypeDesc::int());
        assert_eq!(
            decoder.decode_str("[1, 2, 3]", &ty).expect("json"),
            Value::List(ints(&[1, 2, 3]))
        );
        let err = decoder.decode_str("[1, 2", &ty).err().expect("bad json");
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn sets_deduplicate_and_lists_keep_order() {
        let decoder = Decoder::default();
        let set = TypeDesc::container(ContainerKind::FrozenSet, TypeDesc::int());
        assert_eq!(
            decoder.decode_str("3,1,3", &set).expect("set"),
            Value::Set(ints(&[1, 3]).into_iter().collect())
        );
        let deque = TypeDesc::container(ContainerKind::Deque, TypeDesc::int());
        assert_eq!(
            decoder.decode_str("3,1,3", &deque).expect("deque"),
            Value::List(ints(&[3, 1, 3]))
        );
    }

    #[test]
    fn element_failure_fails_container() {
        let decoder = Decoder::default();
        let err = decoder
            .decode_str("1,x,3", &TypeDesc::list(TypeDesc::int()))
            .err()
            .expect("err");
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(err.value(), Some("\"x\""));
    }

    #[test]
    fn structured_input_decodes_element_wise() {
        let decoder = Decoder::default();
        let raw = Value::List(vec![Value::from("1"), Value::Int(2)]);
        assert_eq!(
            decoder.decode(&raw, &TypeDesc::list(TypeDesc::int())).expect("list"),
            Value::List(ints(&[1, 2]))
        );
        let err = decoder
            .decode(&Value::Int(1), &TypeDesc::list(TypeDesc::int()))
            .err()
            .expect("err");
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn fixed_tuple_requires_exact_arity() {
        let decoder = Decoder::default();
        let three = TypeDesc::tuple(vec![TypeDesc::int(), TypeDesc::str(), TypeDesc::float()]);
        assert_eq!(
            decoder.decode_str("1,a,2.5", &three).expect("tuple"),
            Value::Tuple(vec![Value::Int(1), Value::from("a"), Value::Float(2.5)])
        );
        let err = decoder.decode_str("1,a", &three).err().expect("arity");
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(err.message(), Some("expected 3 items"));
    }

    #[test]
    fn variadic_tuple_takes_any_length() {
        let decoder = Decoder::default();
        let ty = TypeDesc::variadic_tuple(TypeDesc::int());
        assert_eq!(
            decoder.decode_str("1,2,3,4", &ty).expect("tuple"),
            Value::Tuple(ints(&[1, 2, 3, 4]))
        );
        assert_eq!(decoder.decode_str("", &ty).expect("empty"), Value::Tuple(Vec::new()));
    }

    #[test]
    fn empty_separator_is_rejected() {
        let config = DecoderConfig::default().with_item_sep("");
        let err = normalize_items(&config, &Value::from("a,b")).err().expect("empty sep");
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(err.message(), Some("empty separator"));
        assert_eq!(
            normalize_items(&config, &Value::from("[1, 2]")).expect("json array"),
            vec![Value::Int(1), Value::Int(2)]
        );
        let decoder = Decoder::from_config(config);
        let err = decoder
            .decode_str("1,2", &TypeDesc::list(TypeDesc::int()))
            .err()
            .expect("decode");
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn single_item_tuples_repeat_their_type() {
        let decoder = Decoder::default();
        let built = TypeDesc::tuple(vec![TypeDesc::int()]);
        assert_eq!(built, TypeDesc::variadic_tuple(TypeDesc::int()));
        assert_eq!(
            decoder.decode_str("1,2,3", &built).expect("builder"),
            Value::Tuple(ints(&[1, 2, 3]))
        );
        let literal = TypeDesc::Tuple(vec![TypeDesc::int()]);
        assert!(decoder.is_supported(&literal));
        assert_eq!(
            decoder.decode_str("1,2,3", &literal).expect("raw variant"),
            Value::Tuple(ints(&[1, 2, 3]))
        );
        assert_eq!(literal.to_string().parse::<TypeDesc>().expect("parse"), built);
    }

    #[test]
    fn mapping_decodes_keys_and_values() {
        let decoder = Decoder::default();
        let ty = TypeDesc::dict(TypeDesc::int(), TypeDesc::float());
        let out = decoder.decode_str(r#"{"1": 2, "3": "4.5"}"#, &ty).expect("map");
        let expected: Map = [
            (Value::Int(1), Value::Float(2.0)),
            (Value::Int(3), Value::Float(4.5)),
        ]
        .into_iter()
        .collect();
        assert_eq!(out, Value::Map(expected));
    }

    #[test]
    fn mapping_rejects_non_objects() {
        let decoder = Decoder::default();
        let ty = TypeDesc::dict(TypeDesc::str(), TypeDesc::int());
        let err = decoder.decode_str("a=1", &ty).err().expect("not json");
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(err.message(), Some("expected JSON string for mapping"));
        let err = decoder.decode_str("[1]", &ty).err().expect("array");
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn file_reference_feeds_container() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nums.txt");
        std::fs::write(&path, "4\n5\n6\n").expect("write");
        let decoder = Decoder::default();
        let input = format!("@{}", path.display());
        assert_eq!(
            decoder
                .decode_str(&input, &TypeDesc::list(TypeDesc::int()))
                .expect("file"),
            Value::List(ints(&[4, 5, 6]))
        );
    }
}
