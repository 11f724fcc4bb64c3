//! Purpose: Decode against a sum type by trying members left to right.
//! Exports: `decode_union`.
//! Role: The only resolver that absorbs errors; branch failures never reach the caller.
//! Invariants: First successful member wins; declaration order is the only tie-break.
//! Invariants: Non-mismatch failures (missing files, division by zero, I/O) stop the trial.
use crate::core::engine::Decoder;
use crate::core::error::{Error, ErrorKind};
use crate::core::types::TypeDesc;
use crate::core::value::Value;

pub(crate) fn decode_union(
    decoder: &Decoder,
    value: &Value,
    members: &[TypeDesc],
    ty: &TypeDesc,
) -> Result<Value, Error> {
    for member in members {
        match decoder.decode(value, member) {
            Ok(decoded) => return Ok(decoded),
            Err(err) if err.kind().is_recoverable_mismatch() => {
                tracing::trace!(member = %member, error = %err, "union branch rejected");
            }
            Err(err) => return Err(err),
        }
    }
    let tried = members
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Err(Error::new(ErrorKind::Value)
        .with_value(value.to_string())
        .with_target(ty.to_string())
        .with_message(format!("tried types: {tried}")))
}

#[cfg(test)]
mod tests {
    use crate::core::engine::Decoder;
    use crate::core::error::ErrorKind;
    use crate::core::types::TypeDesc;
    use crate::core::value::Value;

    #[test]
    fn declaration_order_decides_ambiguous_input() {
        let decoder = Decoder::default();
        let int_first = TypeDesc::union(vec![TypeDesc::int(), TypeDesc::float()]);
        let float_first = TypeDesc::union(vec![TypeDesc::float(), TypeDesc::int()]);
        assert_eq!(decoder.decode_str("5", &int_first).expect("int"), Value::Int(5));
        assert_eq!(
            decoder.decode_str("5", &float_first).expect("float"),
            Value::Float(5.0)
        );
        assert_eq!(
            decoder.decode_str("5.5", &int_first).expect("float"),
            Value::Float(5.5)
        );
    }

    #[test]
    fn exhaustion_lists_every_member() {
        let decoder = Decoder::default();
        let ty = TypeDesc::union(vec![TypeDesc::int(), TypeDesc::bool()]);
        let err = decoder.decode_str("nope", &ty).err().expect("err");
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(err.message(), Some("tried types: int, bool"));
        assert_eq!(err.target(), Some("int | bool"));
    }

    #[test]
    fn unsupported_members_are_skipped() {
        let decoder = Decoder::default();
        let ty = TypeDesc::union(vec![TypeDesc::Opaque("object".into()), TypeDesc::int()]);
        assert_eq!(decoder.decode_str("3", &ty).expect("int"), Value::Int(3));
    }

    #[test]
    fn hard_failures_are_not_absorbed() {
        let decoder = Decoder::default();
        let ty = TypeDesc::union(vec![TypeDesc::int(), TypeDesc::str()]);
        let err = decoder.decode_str("1/0", &ty).err().expect("err");
        assert_eq!(err.kind(), ErrorKind::ZeroDivision);
    }
}
