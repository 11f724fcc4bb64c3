//! Purpose: Decode structured records from mappings, JSON objects, files or key=value text.
//! Exports: `decode_record`, `normalize_record_source`.
//! Role: Record resolver; recurses into the engine once per declared field.
//! Invariants: All missing required fields are reported together in one Value error.
//! Invariants: Fields whose type is unsupported receive the raw value unchanged.
//! Invariants: Output fields follow declaration order regardless of source key order.
use crate::core::config::DecoderConfig;
use crate::core::engine::Decoder;
use crate::core::error::{Error, ErrorKind};
use crate::core::kv;
use crate::core::types::{ExtraFields, RecordDesc, RecordFlavor};
use crate::core::value::{Map, Record, Value};
use crate::json::parse;
use crate::source;

/// Flatten any accepted record source into one raw key/value mapping.
pub fn normalize_record_source(config: &DecoderConfig, value: &Value) -> Result<Map, Error> {
    let loaded = match value {
        Value::Map(map) => return Ok(map.clone()),
        Value::Str(raw) => {
            let text = raw.trim();
            if let Some(path) = config.file_reference(text) {
                source::load_mapping(path)?
            } else if parse::looks_like_object(text) {
                parse::parse_value(text)?
            } else {
                return kv::parse_assignments(text);
            }
        }
        other => {
            return Err(Error::new(ErrorKind::Type).with_message(format!(
                "expected mapping, JSON object or key=value text, got {}",
                other.type_name()
            )));
        }
    };
    match loaded {
        Value::Map(map) => Ok(map),
        other => Err(Error::new(ErrorKind::Type)
            .with_message(format!("expected an object, got {}", other.type_name()))),
    }
}

fn key_name(key: &Value) -> String {
    match key {
        Value::Str(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn decode_record(
    decoder: &Decoder,
    value: &Value,
    desc: &RecordDesc,
) -> Result<Value, Error> {
    if let Value::Record(existing) = value {
        if existing.name == desc.name {
            return Ok(value.clone());
        }
    }
    let context = |err: Error| err.or_context(|| value.to_string(), &desc.name);
    let mut raw = normalize_record_source(decoder.config(), value).map_err(context)?;

    let tail = match &desc.extra {
        ExtraFields::Collect(name) => Some(name.as_str()),
        _ => None,
    };

    let mut fields = Vec::with_capacity(desc.fields.len());
    let mut missing = Vec::new();
    for field in &desc.fields {
        if Some(field.name.as_str()) == tail {
            continue;
        }
        match raw.remove_str(&field.name) {
            Some(raw_value) => {
                let decoded = if decoder.is_supported(&field.ty) {
                    decoder.decode(&raw_value, &field.ty).map_err(|err| {
                        if err.hint().is_some() {
                            err
                        } else {
                            err.with_hint(format!("in field `{}` of {}", field.name, desc.name))
                        }
                    })?
                } else {
                    raw_value
                };
                fields.push((field.name.clone(), decoded));
            }
            None => match &field.default {
                Some(default) => fields.push((field.name.clone(), default.clone())),
                None => missing.push(field.name.as_str()),
            },
        }
    }

    if !missing.is_empty() {
        tracing::debug!(record = %desc.name, ?missing, "record missing required fields");
        return Err(Error::new(ErrorKind::Value)
            .with_value(value.to_string())
            .with_target(desc.name.clone())
            .with_message(format!("missing required fields: {}", missing.join(", "))));
    }

    match (&desc.extra, tail) {
        (ExtraFields::Reject, _) if !raw.is_empty() => {
            let unexpected: Vec<String> = raw.iter().map(|(k, _)| key_name(k)).collect();
            return Err(Error::new(ErrorKind::Type)
                .with_value(value.to_string())
                .with_target(desc.name.clone())
                .with_message(format!("unexpected fields: {}", unexpected.join(", ")))
                .with_hint(format!(
                    "declared fields are: {}",
                    desc.fields
                        .iter()
                        .map(|f| f.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )));
        }
        (_, Some(name)) => {
            let collected = Value::Map(raw);
            match desc.fields.iter().position(|f| f.name == name) {
                Some(idx) => fields.insert(idx.min(fields.len()), (name.to_string(), collected)),
                None => fields.push((name.to_string(), collected)),
            }
        }
        _ => {}
    }

    let record = Record {
        name: desc.name.clone(),
        fields,
    };
    match (&desc.finish, desc.flavor) {
        (Some(finish), RecordFlavor::Model | RecordFlavor::Constructed) => {
            finish(record).map_err(|message| {
                Error::new(ErrorKind::Value)
                    .with_value(value.to_string())
                    .with_target(desc.name.clone())
                    .with_message(message)
            })
        }
        _ => Ok(Value::Record(record)),
    }
}

#[cfg(test)]
mod tests {
    use crate::core::config::DecoderConfig;
    use crate::core::engine::Decoder;
    use crate::core::error::ErrorKind;
    use crate::core::types::{ExtraFields, RecordDesc, TypeDesc};
    use crate::core::value::{Map, Value};

    fn server() -> RecordDesc {
        RecordDesc::plain("Server")
            .field("host", TypeDesc::str())
            .field("port", TypeDesc::int())
            .field_with_default("debug", TypeDesc::bool(), Value::Bool(false))
    }

    #[test]
    fn key_value_text_decodes_fields_in_order() {
        let decoder = Decoder::default();
        let ty = TypeDesc::Record(server());
        let out = decoder.decode_str("port=80 host=example", &ty).expect("record");
        let Value::Record(record) = out else {
            panic!("expected record");
        };
        let names: Vec<_> = record.fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["host", "port", "debug"]);
        assert_eq!(record.get("port"), Some(&Value::Int(80)));
        assert_eq!(record.get("debug"), Some(&Value::Bool(false)));
    }

    #[test]
    fn missing_fields_are_reported_together() {
        let decoder = Decoder::default();
        let ty = TypeDesc::Record(server());
        let err = decoder.decode_str("debug=1", &ty).err().expect("err");
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(err.message(), Some("missing required fields: host, port"));
    }

    #[test]
    fn plain_records_reject_unknown_keys() {
        let decoder = Decoder::default();
        let ty = TypeDesc::Record(server());
        let err = decoder
            .decode_str("host=a port=1 color=red", &ty)
            .err()
            .expect("err");
        assert_eq!(err.kind(), ErrorKind::Type);
        assert_eq!(err.message(), Some("unexpected fields: color"));
    }

    #[test]
    fn collect_gathers_unmatched_keys() {
        let decoder = Decoder::default();
        let desc = server()
            .field("rest", TypeDesc::dict(TypeDesc::str(), TypeDesc::str()))
            .extra(ExtraFields::Collect("rest".into()));
        let out = decoder
            .decode_str("host=a port=1 color=red", &TypeDesc::Record(desc))
            .expect("record");
        let Value::Record(record) = out else {
            panic!("expected record");
        };
        let rest: Map = [(Value::from("color"), Value::from("red"))].into_iter().collect();
        assert_eq!(record.get("rest"), Some(&Value::Map(rest)));
    }

    #[test]
    fn nested_records_come_from_dotted_keys() {
        let decoder = Decoder::default();
        let desc = RecordDesc::plain("App")
            .field("name", TypeDesc::str())
            .field("server", TypeDesc::Record(server()));
        let out = decoder
            .decode_str("name=demo server.host=h server.port=9", &TypeDesc::Record(desc))
            .expect("record");
        let Value::Record(app) = out else {
            panic!("expected record");
        };
        let Some(Value::Record(inner)) = app.get("server") else {
            panic!("expected nested record");
        };
        assert_eq!(inner.get("port"), Some(&Value::Int(9)));
    }

    #[test]
    fn json_objects_and_field_errors_carry_context() {
        let decoder = Decoder::default();
        let ty = TypeDesc::Record(server());
        let out = decoder
            .decode_str(r#"{"host": "h", "port": 7}"#, &ty)
            .expect("json");
        assert!(matches!(out, Value::Record(_)));
        let err = decoder
            .decode_str(r#"{"host": "h", "port": "x"}"#, &ty)
            .err()
            .expect("err");
        assert_eq!(err.target(), Some("int"));
        assert_eq!(err.hint(), Some("in field `port` of Server"));
    }

    #[test]
    fn unsupported_field_types_pass_raw_values() {
        let decoder = Decoder::default();
        let desc = RecordDesc::plain("Holder").field("thing", TypeDesc::Opaque("object".into()));
        let out = decoder.decode_str("thing=raw", &TypeDesc::Record(desc)).expect("record");
        let Value::Record(record) = out else {
            panic!("expected record");
        };
        assert_eq!(record.get("thing"), Some(&Value::from("raw")));
    }

    #[test]
    fn model_validator_runs_and_reports_value_errors() {
        let decoder = Decoder::default();
        let desc = RecordDesc::model("Port")
            .field("port", TypeDesc::int())
            .validator(|record| match record.get("port") {
                Some(Value::Int(port)) if *port > 0 => Ok(Value::Int(*port)),
                _ => Err("port must be positive".to_string()),
            });
        let ty = TypeDesc::Record(desc);
        assert_eq!(decoder.decode_str("port=8 extra=1", &ty).expect("ok"), Value::Int(8));
        let err = decoder.decode_str("port=-1", &ty).err().expect("err");
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(err.message(), Some("port must be positive"));
    }

    #[test]
    fn constructed_records_are_gated_by_config() {
        let desc = RecordDesc::constructed("Point")
            .field("x", TypeDesc::int())
            .constructor(|record| Ok(Value::Tuple(record.fields.into_iter().map(|(_, v)| v).collect())));
        let ty = TypeDesc::Record(desc);
        let err = Decoder::default().decode_str("x=1", &ty).err().expect("gated");
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
        let enabled = Decoder::from_config(DecoderConfig::default().with_constructed(true));
        assert_eq!(
            enabled.decode_str("x=1", &ty).expect("constructed"),
            Value::Tuple(vec![Value::Int(1)])
        );
    }
}
