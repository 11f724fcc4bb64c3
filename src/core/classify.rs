//! Purpose: Decide which resolution strategy applies to a type descriptor.
//! Exports: `Kind`, `classify`, `resolve_alias`.
//! Role: Pure decision step the engine consults before dispatching.
//! Invariants: Registry hits win over every structural check.
//! Invariants: Record detection precedes parametrized-container detection.
//! Invariants: No value is inspected; classification depends on type + registry + config only.
use crate::core::config::DecoderConfig;
use crate::core::registry::DecoderRegistry;
use crate::core::types::{RecordFlavor, TypeDesc};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    Leaf,
    StructuredRecord,
    ParametrizedContainer,
    ParametrizedMapping,
    FixedTuple,
    VariadicTuple,
    Union,
    TaggedEnum,
    RestrictedChoice,
    Unknown,
}

/// Follow aliases until a registered alias or a non-alias type is reached.
pub fn resolve_alias<'a>(registry: &DecoderRegistry, mut ty: &'a TypeDesc) -> &'a TypeDesc {
    while let TypeDesc::Alias { target, .. } = ty {
        if registry.contains(ty) {
            break;
        }
        ty = target.as_ref();
    }
    ty
}

pub fn classify(registry: &DecoderRegistry, config: &DecoderConfig, ty: &TypeDesc) -> Kind {
    let ty = resolve_alias(registry, ty);
    if registry.contains(ty) {
        return Kind::Leaf;
    }
    match ty {
        TypeDesc::Record(desc) => {
            if desc.flavor == RecordFlavor::Constructed && !config.allow_constructed {
                Kind::Unknown
            } else {
                Kind::StructuredRecord
            }
        }
        TypeDesc::Mapping { .. } => Kind::ParametrizedMapping,
        TypeDesc::Container { .. } => Kind::ParametrizedContainer,
        TypeDesc::Tuple(items) if items.len() == 1 => Kind::VariadicTuple,
        TypeDesc::Tuple(items) if !items.is_empty() => Kind::FixedTuple,
        TypeDesc::VariadicTuple(_) => Kind::VariadicTuple,
        TypeDesc::Union(members) if !members.is_empty() => Kind::Union,
        TypeDesc::Enum(_) => Kind::TaggedEnum,
        TypeDesc::Literal(_) => Kind::RestrictedChoice,
        TypeDesc::Tuple(_)
        | TypeDesc::Union(_)
        | TypeDesc::Leaf(_)
        | TypeDesc::Alias { .. }
        | TypeDesc::Opaque(_) => Kind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::{Kind, classify, resolve_alias};
    use crate::core::config::DecoderConfig;
    use crate::core::registry::DecoderRegistry;
    use crate::core::types::{EnumDesc, LiteralValue, RecordDesc, TypeDesc};
    use crate::core::value::Value;

    fn registry() -> DecoderRegistry {
        let mut registry = DecoderRegistry::new();
        registry.add_fn(TypeDesc::int(), |v| Ok(v.clone()));
        registry
    }

    #[test]
    fn registry_hit_overrides_composite_shape() {
        let mut registry = registry();
        let list_int = TypeDesc::list(TypeDesc::int());
        let config = DecoderConfig::default();
        assert_eq!(classify(&registry, &config, &list_int), Kind::ParametrizedContainer);
        registry.add_fn(list_int.clone(), |_| Ok(Value::Null));
        assert_eq!(classify(&registry, &config, &list_int), Kind::Leaf);
    }

    #[test]
    fn structural_kinds_classify() {
        let registry = registry();
        let config = DecoderConfig::default();
        let cases = [
            (TypeDesc::dict(TypeDesc::str(), TypeDesc::int()), Kind::ParametrizedMapping),
            (TypeDesc::tuple(vec![TypeDesc::int(), TypeDesc::str()]), Kind::FixedTuple),
            (TypeDesc::Tuple(vec![TypeDesc::int()]), Kind::VariadicTuple),
            (TypeDesc::variadic_tuple(TypeDesc::int()), Kind::VariadicTuple),
            (TypeDesc::union(vec![TypeDesc::int()]), Kind::Union),
            (TypeDesc::Enum(EnumDesc::new("Color").member("RED")), Kind::TaggedEnum),
            (TypeDesc::literal(vec![LiteralValue::Int(1)]), Kind::RestrictedChoice),
            (TypeDesc::Record(RecordDesc::plain("Db")), Kind::StructuredRecord),
            (TypeDesc::Opaque("object".into()), Kind::Unknown),
            (TypeDesc::tuple(Vec::new()), Kind::Unknown),
            (TypeDesc::union(Vec::new()), Kind::Unknown),
            (TypeDesc::str(), Kind::Unknown),
        ];
        for (ty, kind) in cases {
            assert_eq!(classify(&registry, &config, &ty), kind, "{ty}");
        }
    }

    #[test]
    fn constructed_records_need_opt_in() {
        let registry = registry();
        let ty = TypeDesc::Record(RecordDesc::constructed("Plain"));
        assert_eq!(classify(&registry, &DecoderConfig::default(), &ty), Kind::Unknown);
        let config = DecoderConfig::default().with_constructed(true);
        assert_eq!(classify(&registry, &config, &ty), Kind::StructuredRecord);
    }

    #[test]
    fn aliases_resolve_unless_registered() {
        let mut registry = registry();
        let chained = TypeDesc::alias("C", TypeDesc::alias("B", TypeDesc::int()));
        assert_eq!(resolve_alias(&registry, &chained), &TypeDesc::int());
        let config = DecoderConfig::default();
        assert_eq!(classify(&registry, &config, &chained), Kind::Leaf);
        let inner = TypeDesc::alias("B", TypeDesc::int());
        registry.add_fn(inner.clone(), |_| Ok(Value::Null));
        assert_eq!(resolve_alias(&registry, &chained), &inner);
    }
}
