//! Purpose: Resolve restricted-choice (literal) and tagged-enumeration targets.
//! Exports: `decode_literal`, `decode_enum`.
//! Role: Single-type resolution used by the engine for `Literal` and `Enum` descriptors.
//! Invariants: Exact value match wins; string coercion then tries int, str, bytes, bool in order.
//! Invariants: Only coercions for kinds present among the choices are attempted.
use crate::core::error::{Error, ErrorKind};
use crate::core::types::{EnumDesc, LiteralValue, TypeDesc};
use crate::core::value::Value;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Coercion {
    Int,
    Str,
    Bytes,
    Bool,
}

const COERCION_ORDER: [Coercion; 4] = [Coercion::Int, Coercion::Str, Coercion::Bytes, Coercion::Bool];

impl Coercion {
    fn applies_to(self, choice: &LiteralValue) -> bool {
        matches!(
            (self, choice),
            (Coercion::Int, LiteralValue::Int(_))
                | (Coercion::Str, LiteralValue::Str(_))
                | (Coercion::Bytes, LiteralValue::Bytes(_))
                | (Coercion::Bool, LiteralValue::Bool(_))
        )
    }

    fn coerce(self, text: &str) -> Option<LiteralValue> {
        match self {
            Coercion::Int => text.parse().ok().map(LiteralValue::Int),
            Coercion::Str => Some(LiteralValue::Str(text.to_string())),
            Coercion::Bytes => Some(LiteralValue::Bytes(text.as_bytes().to_vec())),
            Coercion::Bool => {
                if text.eq_ignore_ascii_case("true") {
                    Some(LiteralValue::Bool(true))
                } else if text.eq_ignore_ascii_case("false") {
                    Some(LiteralValue::Bool(false))
                } else {
                    None
                }
            }
        }
    }
}

/// Index of the choice matched by `value`, if any.
fn match_choice<'a, I>(value: &Value, choices: I) -> Option<usize>
where
    I: Iterator<Item = &'a LiteralValue> + Clone,
{
    if let Some(idx) = choices.clone().position(|choice| choice.to_value() == *value) {
        return Some(idx);
    }
    let Value::Str(raw) = value else {
        return None;
    };
    let text = raw.trim();
    for coercion in COERCION_ORDER {
        if !choices.clone().any(|choice| coercion.applies_to(choice)) {
            continue;
        }
        let Some(candidate) = coercion.coerce(text) else {
            continue;
        };
        if let Some(idx) = choices.clone().position(|choice| *choice == candidate) {
            return Some(idx);
        }
    }
    None
}

fn render_choices<'a>(choices: impl Iterator<Item = &'a LiteralValue>) -> String {
    choices.map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

pub(crate) fn decode_literal(
    value: &Value,
    choices: &[LiteralValue],
    ty: &TypeDesc,
) -> Result<Value, Error> {
    if choices.is_empty() {
        return Err(Error::new(ErrorKind::Value)
            .with_value(value.to_string())
            .with_target(ty.to_string())
            .with_message("empty literal has no valid choices"));
    }
    match match_choice(value, choices.iter()) {
        Some(idx) => Ok(choices[idx].to_value()),
        None => Err(Error::new(ErrorKind::Value)
            .with_value(value.to_string())
            .with_target(ty.to_string())
            .with_message(format!(
                "not a valid choice; valid choices are: [{}]",
                render_choices(choices.iter())
            ))),
    }
}

pub(crate) fn decode_enum(value: &Value, desc: &EnumDesc) -> Result<Value, Error> {
    let member_value = |member: &str| Value::Enum {
        name: desc.name.clone(),
        member: member.to_string(),
    };
    match value {
        Value::Enum { name, member }
            if *name == desc.name && desc.members.iter().any(|(m, _)| m == member) =>
        {
            return Ok(value.clone());
        }
        Value::Str(raw) => {
            if let Some((member, _)) = desc.members.iter().find(|(m, _)| m == raw.trim()) {
                return Ok(member_value(member));
            }
        }
        _ => {}
    }

    let payloads: Vec<(usize, &LiteralValue)> = desc
        .members
        .iter()
        .enumerate()
        .filter_map(|(idx, (_, payload))| payload.as_ref().map(|p| (idx, p)))
        .collect();
    if let Some(hit) = match_choice(value, payloads.iter().map(|(_, p)| *p)) {
        let (member_idx, _) = payloads[hit];
        return Ok(member_value(&desc.members[member_idx].0));
    }

    Err(Error::new(ErrorKind::Key)
        .with_value(value.to_string())
        .with_target(desc.name.clone())
        .with_message(format!("valid choices: [{}]", desc.member_names().join(", "))))
}
