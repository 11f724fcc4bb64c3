//! Purpose: Lock the observable decode contract of the public API.
//! Exports: Integration tests only (no runtime exports).
//! Role: End-to-end checks through `strto::api` for containers, unions, choices and files.
//! Invariants: Tests only use the public API surface.
//! Invariants: File fixtures live in per-test temp directories.

use std::fs;
use std::path::PathBuf;

use strto::api::{
    ContainerKind, Decoder, DecoderConfig, DecoderRegistry, EnumDesc, ErrorKind, Fraction,
    LeafType, LiteralValue, Map, RangeValue, TypeDesc, Value, default_catalog, from_text,
};

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::Int).collect()
}

fn choice_123() -> TypeDesc {
    TypeDesc::literal(vec![
        LiteralValue::Int(1),
        LiteralValue::Int(2),
        LiteralValue::Int(3),
    ])
}

#[test]
fn already_typed_values_are_returned_unchanged() {
    let decoder = Decoder::default();
    let date = time::Date::from_calendar_date(2022, time::Month::July, 19).expect("date");
    let cases = [
        (Value::from("text"), TypeDesc::str()),
        (Value::Int(7), TypeDesc::int()),
        (Value::Float(2.5), TypeDesc::float()),
        (Value::Bool(false), TypeDesc::bool()),
        (Value::Bytes(b"raw".to_vec()), TypeDesc::Leaf(LeafType::Bytes)),
        (
            Value::Fraction(Fraction::new(1, 3).expect("fraction")),
            TypeDesc::Leaf(LeafType::Fraction),
        ),
        (Value::Path(PathBuf::from("/etc")), TypeDesc::Leaf(LeafType::Path)),
        (Value::Date(date), TypeDesc::Leaf(LeafType::Date)),
        (
            Value::Duration(time::Duration::seconds(90)),
            TypeDesc::Leaf(LeafType::Duration),
        ),
        (
            Value::Range(RangeValue { start: 0, stop: 3, step: 1 }),
            TypeDesc::Leaf(LeafType::Range),
        ),
        (Value::List(ints(&[1, 2])), TypeDesc::Leaf(LeafType::List)),
        (Value::Tuple(ints(&[1, 2])), TypeDesc::Leaf(LeafType::Tuple)),
        (Value::Map(Map::new()), TypeDesc::Leaf(LeafType::Dict)),
        (Value::Null, TypeDesc::none()),
    ];
    for (value, ty) in cases {
        assert_eq!(decoder.decode(&value, &ty).expect("decode"), value, "{ty}");
    }
}

#[test]
fn comma_text_fills_lists_and_fixed_tuples() {
    let decoder = Decoder::default();
    assert_eq!(
        decoder
            .decode_str("1,2,3", &TypeDesc::list(TypeDesc::int()))
            .expect("list"),
        Value::List(ints(&[1, 2, 3]))
    );
    let triple = TypeDesc::tuple(vec![TypeDesc::int(), TypeDesc::int(), TypeDesc::int()]);
    assert_eq!(
        decoder.decode_str("1,2,3", &triple).expect("triple"),
        Value::Tuple(ints(&[1, 2, 3]))
    );
    let pair = TypeDesc::tuple(vec![TypeDesc::int(), TypeDesc::int()]);
    let err = decoder.decode_str("1,2,3", &pair).err().expect("arity");
    assert_eq!(err.kind(), ErrorKind::Value);
    assert_eq!(err.message(), Some("expected 2 items"));
    assert_eq!(err.hint(), Some("got 3 items"));
}

#[test]
fn variadic_and_single_tuples_decode_every_item() {
    let decoder = Decoder::default();
    let ty: TypeDesc = "tuple[int]".parse().expect("type");
    assert_eq!(
        decoder.decode_str("4, 5, 6, 7", &ty).expect("variadic"),
        Value::Tuple(ints(&[4, 5, 6, 7]))
    );
}

#[test]
fn json_objects_fill_typed_mappings() {
    let decoder = Decoder::default();
    let ty = TypeDesc::dict(TypeDesc::str(), TypeDesc::int());
    let out = decoder.decode_str(r#"{"a":1,"b":2}"#, &ty).expect("mapping");
    let expected: Map = [
        (Value::from("a"), Value::Int(1)),
        (Value::from("b"), Value::Int(2)),
    ]
    .into_iter()
    .collect();
    assert_eq!(out, Value::Map(expected));

    let err = decoder.decode_str("a=1", &ty).err().expect("not json");
    assert_eq!(err.kind(), ErrorKind::Value);
    assert_eq!(err.message(), Some("expected JSON string for mapping"));
    let err = decoder.decode_str("[1]", &ty).err().expect("not an object");
    assert_eq!(err.kind(), ErrorKind::Type);
}

#[test]
fn mapping_keys_are_decoded_too() {
    let decoder = Decoder::default();
    let ty = TypeDesc::dict(TypeDesc::int(), TypeDesc::list(TypeDesc::str()));
    let out = decoder.decode_str(r#"{"1": "a,b"}"#, &ty).expect("mapping");
    let Value::Map(map) = out else {
        panic!("expected map");
    };
    assert_eq!(
        map.get(&Value::Int(1)),
        Some(&Value::List(vec![Value::from("a"), Value::from("b")]))
    );
}

#[test]
fn union_members_are_tried_in_declaration_order() {
    let decoder = Decoder::default();
    let int_float = TypeDesc::union(vec![TypeDesc::int(), TypeDesc::float()]);
    assert_eq!(decoder.decode_str("5", &int_float).expect("int"), Value::Int(5));
    let float_int = TypeDesc::union(vec![TypeDesc::float(), TypeDesc::int()]);
    assert_eq!(decoder.decode_str("5", &float_int).expect("float"), Value::Float(5.0));

    let err = decoder
        .decode_str("word", &TypeDesc::union(vec![TypeDesc::int(), TypeDesc::float()]))
        .err()
        .expect("exhausted");
    assert_eq!(err.kind(), ErrorKind::Value);
    assert_eq!(err.message(), Some("tried types: int, float"));
}

#[test]
fn optional_accepts_null_spellings() {
    let decoder = Decoder::default();
    let ty = TypeDesc::optional(TypeDesc::int());
    assert_eq!(decoder.decode_str("none", &ty).expect("none"), Value::Null);
    assert_eq!(decoder.decode(&Value::Null, &ty).expect("null"), Value::Null);
    assert_eq!(decoder.decode_str("12", &ty).expect("int"), Value::Int(12));
}

#[test]
fn restricted_choices_match_or_fail() {
    let decoder = Decoder::default();
    assert_eq!(decoder.decode_str("1", &choice_123()).expect("hit"), Value::Int(1));
    let err = decoder.decode_str("4", &choice_123()).err().expect("miss");
    assert_eq!(err.kind(), ErrorKind::Value);

    let mixed = TypeDesc::literal(vec![LiteralValue::Str("auto".into()), LiteralValue::Bool(true)]);
    assert_eq!(decoder.decode_str("TRUE", &mixed).expect("bool"), Value::Bool(true));
    assert_eq!(decoder.decode_str("auto", &mixed).expect("str"), Value::from("auto"));
}

#[test]
fn tagged_enums_match_names_then_payloads() {
    let decoder = Decoder::default();
    let color = TypeDesc::Enum(
        EnumDesc::new("Color")
            .member_with_value("RED", LiteralValue::Int(1))
            .member_with_value("GREEN", LiteralValue::Int(2)),
    );
    let green = Value::Enum {
        name: "Color".into(),
        member: "GREEN".into(),
    };
    assert_eq!(decoder.decode_str("GREEN", &color).expect("name"), green);
    assert_eq!(decoder.decode_str("2", &color).expect("payload"), green);
    let err = decoder.decode_str("BLUE", &color).err().expect("miss");
    assert_eq!(err.kind(), ErrorKind::Key);
    assert_eq!(err.message(), Some("valid choices: [RED, GREEN]"));
}

#[test]
fn is_supported_is_a_total_dry_run() {
    let decoder = Decoder::default();
    let supported = [
        "int",
        "list[dict[str, tuple[int, ...]]]",
        "optional[date]",
        "Widget | int",
        "literal[1]",
    ];
    for text in supported {
        let ty: TypeDesc = text.parse().expect(text);
        assert!(decoder.is_supported(&ty), "{text}");
    }
    let unsupported = [
        TypeDesc::Opaque("Widget".into()),
        TypeDesc::list(TypeDesc::Opaque("Widget".into())),
        TypeDesc::tuple(Vec::new()),
        TypeDesc::union(Vec::new()),
        TypeDesc::literal(Vec::new()),
        TypeDesc::dict(TypeDesc::str(), TypeDesc::custom("missing")),
    ];
    for ty in unsupported {
        assert!(!decoder.is_supported(&ty), "{ty}");
    }
}

#[test]
fn unknown_types_fail_with_unsupported_type() {
    let err = Decoder::default()
        .decode_str("x", &TypeDesc::Opaque("Widget".into()))
        .err()
        .expect("unsupported");
    assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    assert_eq!(err.target(), Some("Widget"));
}

#[test]
fn file_indirection_depends_on_config() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("nums.txt");
    fs::write(&path, "1,2,3").expect("write");
    let input = format!("@{}", path.display());
    let ty = TypeDesc::list(TypeDesc::int());

    let enabled = Decoder::default();
    assert_eq!(
        enabled.decode_str(&input, &ty).expect("from file"),
        Value::List(ints(&[1, 2, 3]))
    );

    let literal = TypeDesc::list(TypeDesc::str());
    let disabled = Decoder::from_config(DecoderConfig::default().with_from_file(false));
    assert_eq!(
        disabled.decode_str(&input, &literal).expect("literal"),
        Value::List(vec![Value::Str(input.clone())])
    );
    assert!(disabled.decode_str(&input, &ty).is_err());
}

#[test]
fn multi_line_files_yield_one_item_per_line() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("words.txt");
    fs::write(&path, "alpha\nbeta\n").expect("write");
    let decoder = Decoder::default();
    let ty = TypeDesc::container(ContainerKind::Deque, TypeDesc::str());
    assert_eq!(
        decoder
            .decode_str(&format!("@{}", path.display()), &ty)
            .expect("lines"),
        Value::List(vec![Value::from("alpha"), Value::from("beta")])
    );
}

#[test]
fn missing_files_are_file_not_found() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = format!("@{}", temp.path().join("absent.txt").display());
    let err = Decoder::default()
        .decode_str(&input, &TypeDesc::list(TypeDesc::int()))
        .err()
        .expect("missing");
    assert_eq!(err.kind(), ErrorKind::FileNotFound);
}

#[test]
fn yaml_files_feed_mappings() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("limits.yaml");
    fs::write(&path, "cpu: 2\nmemory: 512\n").expect("write");
    let ty = TypeDesc::dict(TypeDesc::str(), TypeDesc::int());
    let out = Decoder::default()
        .decode_str(&format!("@{}", path.display()), &ty)
        .expect("yaml");
    let Value::Map(map) = out else {
        panic!("expected map");
    };
    assert_eq!(map.get_str("memory"), Some(&Value::Int(512)));
}

#[test]
fn registry_overrides_win_over_structure() {
    let mut decoder = Decoder::default();
    let ty = TypeDesc::list(TypeDesc::int());
    decoder.add(
        ty.clone(),
        from_text(|text: &str| text.parse::<i64>().map(|n| Value::List(vec![Value::Int(n); 2]))),
    );
    assert_eq!(decoder.decode_str("3", &ty).expect("override"), Value::List(ints(&[3, 3])));
}

#[test]
fn aliases_resolve_unless_registered() {
    let mut decoder = Decoder::default();
    let port = TypeDesc::alias("Port", TypeDesc::int());
    assert_eq!(decoder.decode_str("80", &port).expect("alias"), Value::Int(80));
    decoder.registry_mut().add_fn(port.clone(), |_| Ok(Value::Int(0)));
    assert_eq!(decoder.decode_str("80", &port).expect("registered"), Value::Int(0));
}

#[test]
fn registries_are_independent_instances() {
    let config = DecoderConfig::default();
    let mut custom = DecoderRegistry::new();
    custom.add_fn(TypeDesc::custom("upper"), |value| match value {
        Value::Str(s) => Ok(Value::Str(s.to_uppercase())),
        other => Ok(other.clone()),
    });
    let mut registry = default_catalog(&config);
    let before = registry.len();
    registry.extend([(
        TypeDesc::custom("upper"),
        custom.get(&TypeDesc::custom("upper")).expect("entry"),
    )]);
    assert_eq!(registry.len(), before + 1);
    assert_eq!(default_catalog(&config).len(), before);

    let decoder = Decoder::new(registry, config);
    assert_eq!(
        decoder
            .decode_str("a,b", &TypeDesc::list(TypeDesc::custom("upper")))
            .expect("custom"),
        Value::List(vec![Value::from("A"), Value::from("B")])
    );
    let err = decoder.get(&TypeDesc::custom("absent")).err().expect("miss");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn leaf_failures_carry_value_and_type() {
    let decoder = Decoder::default();
    let err = decoder
        .decode_str("1,x", &TypeDesc::list(TypeDesc::int()))
        .err()
        .expect("bad item");
    assert_eq!(err.kind(), ErrorKind::Value);
    assert_eq!(err.value(), Some("\"x\""));
    assert_eq!(err.target(), Some("int"));

    let err = decoder.decode_str("1/0", &TypeDesc::int()).err().expect("zero");
    assert_eq!(err.kind(), ErrorKind::ZeroDivision);
}

#[test]
fn bound_decoders_repeat_one_target() {
    let decoder = Decoder::default();
    let bound = decoder.bind("set[int]".parse().expect("type"));
    assert_eq!(bound.to_string(), "decoder[set[int]]");
    assert_eq!(
        bound.decode("2,1,2").expect("set"),
        Value::Set(ints(&[1, 2]).into_iter().collect())
    );
    assert_eq!(bound.decode("").expect("empty"), Value::Set(Default::default()));
}
