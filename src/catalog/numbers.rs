//! Purpose: Integer and float leaf decoders.
//! Exports: `IntDecoder`, `FloatDecoder`, `FLOAT_CONSTANTS`.
//! Role: Default catalog entries for `int` and `float`.
//! Invariants: `int` rejects float-looking text so `int | float` unions pick `float` for `"1.5"`.
//! Invariants: Expression evaluation runs only when enabled in the config.
use crate::catalog::numexpr::{self, EvalError};
use crate::core::error::{Error, ErrorKind};
use crate::core::registry::LeafDecoder;
use crate::core::value::Value;

pub const FLOAT_CONSTANTS: [(&str, f64); 6] = [
    ("pi", std::f64::consts::PI),
    ("e", std::f64::consts::E),
    ("tau", std::f64::consts::TAU),
    ("phi", 1.618_033_988_749_895),
    ("sqrt2", std::f64::consts::SQRT_2),
    ("sqrt3", 1.732_050_807_568_877_2),
];

fn eval_error(err: EvalError) -> Error {
    match err {
        EvalError::ZeroDivision => {
            Error::new(ErrorKind::ZeroDivision).with_message("division by zero")
        }
        EvalError::Overflow => Error::new(ErrorKind::Value).with_message("integer overflow"),
        EvalError::Syntax(detail) => Error::new(ErrorKind::Value)
            .with_message(format!("invalid expression or name: {detail}")),
    }
}

fn wrong_input(expected: &str, value: &Value) -> Error {
    Error::new(ErrorKind::Type).with_message(format!(
        "expected {expected}, got {}",
        value.type_name()
    ))
}

#[derive(Clone, Copy, Debug)]
pub struct IntDecoder {
    pub allow_expressions: bool,
}

impl IntDecoder {
    fn parse(&self, raw: &str) -> Result<i64, Error> {
        let text = raw.trim();
        if text.contains('.') {
            return Err(Error::new(ErrorKind::Value).with_message("looks like a float"));
        }
        if let Ok(value) = text.parse::<i64>() {
            return Ok(value);
        }
        if !self.allow_expressions {
            return Err(Error::new(ErrorKind::Value).with_message("invalid integer value"));
        }
        numexpr::eval_int(text).map_err(eval_error)
    }
}

impl LeafDecoder for IntDecoder {
    fn decode(&self, value: &Value) -> Result<Value, Error> {
        match value {
            Value::Int(_) => Ok(value.clone()),
            Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
            Value::Str(raw) => self.parse(raw).map(Value::Int),
            other => Err(wrong_input("int or str", other)),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FloatDecoder {
    pub allow_expressions: bool,
}

impl FloatDecoder {
    fn parse(&self, raw: &str) -> Result<f64, Error> {
        let text = raw.trim();
        if let Some((_, value)) = FLOAT_CONSTANTS.iter().find(|(name, _)| *name == text) {
            return Ok(*value);
        }
        if let Ok(value) = text.parse::<f64>() {
            return Ok(value);
        }
        if !self.allow_expressions {
            return Err(Error::new(ErrorKind::Value).with_message("invalid float value"));
        }
        numexpr::eval_float(text, &FLOAT_CONSTANTS).map_err(eval_error)
    }
}

impl LeafDecoder for FloatDecoder {
    fn decode(&self, value: &Value) -> Result<Value, Error> {
        match value {
            Value::Float(_) => Ok(value.clone()),
            Value::Int(n) => Ok(Value::Float(*n as f64)),
            Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
            Value::Str(raw) => self.parse(raw).map(Value::Float),
            other => Err(wrong_input("float or str", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FloatDecoder, IntDecoder};
    use crate::core::error::ErrorKind;
    use crate::core::registry::LeafDecoder;
    use crate::core::value::Value;

    const INT: IntDecoder = IntDecoder {
        allow_expressions: true,
    };
    const FLOAT: FloatDecoder = FloatDecoder {
        allow_expressions: true,
    };

    #[test]
    fn int_accepts_literals_expressions_and_bools() {
        assert_eq!(INT.decode(&Value::from(" 42 ")).expect("int"), Value::Int(42));
        assert_eq!(INT.decode(&Value::from("10/3")).expect("expr"), Value::Int(3));
        assert_eq!(INT.decode(&Value::from("2e4")).expect("sci"), Value::Int(20000));
        assert_eq!(INT.decode(&Value::Bool(true)).expect("bool"), Value::Int(1));
    }

    #[test]
    fn int_rejects_floats() {
        let err = INT.decode(&Value::from("1.5")).err().expect("err");
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(err.message(), Some("looks like a float"));
        let err = INT.decode(&Value::Float(1.5)).err().expect("err");
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn expressions_can_be_disabled() {
        let strict = IntDecoder {
            allow_expressions: false,
        };
        let err = strict.decode(&Value::from("1+1")).err().expect("err");
        assert_eq!(err.message(), Some("invalid integer value"));
        let err = INT.decode(&Value::from("1/0")).err().expect("err");
        assert_eq!(err.kind(), ErrorKind::ZeroDivision);
    }

    #[test]
    fn float_handles_constants_and_widening() {
        assert_eq!(
            FLOAT.decode(&Value::from("pi")).expect("pi"),
            Value::Float(std::f64::consts::PI)
        );
        assert_eq!(FLOAT.decode(&Value::from("1/4")).expect("expr"), Value::Float(0.25));
        assert_eq!(FLOAT.decode(&Value::Int(3)).expect("int"), Value::Float(3.0));
        assert_eq!(FLOAT.decode(&Value::from("-2.5")).expect("lit"), Value::Float(-2.5));
        let err = FLOAT.decode(&Value::from("pie")).err().expect("err");
        assert_eq!(err.kind(), ErrorKind::Value);
    }
}
