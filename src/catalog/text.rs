//! Purpose: Scalar leaf decoders for text-like and trivial types.
//! Exports: `decode_str`, `decode_bytes`, `decode_fraction`, `decode_path`, `decode_none`,
//!          `decode_any`, `parse_fraction`.
//! Role: Default catalog entries for `str`, `bytes`, `fraction`, `path`, `none`, `any`.
use std::path::PathBuf;

use crate::core::error::{Error, ErrorKind};
use crate::core::value::{Fraction, Value};

fn wrong_input(expected: &str, value: &Value) -> Error {
    Error::new(ErrorKind::Type).with_message(format!(
        "expected {expected}, got {}",
        value.type_name()
    ))
}

/// Strings are returned untouched; other scalars are rendered.
pub fn decode_str(value: &Value) -> Result<Value, Error> {
    match value {
        Value::Str(_) => Ok(value.clone()),
        Value::Int(_) | Value::Float(_) | Value::Bool(_) | Value::Fraction(_) => {
            Ok(Value::Str(value.to_string()))
        }
        Value::Path(path) => Ok(Value::Str(path.display().to_string())),
        other => Err(wrong_input("str", other)),
    }
}

pub fn decode_bytes(value: &Value) -> Result<Value, Error> {
    match value {
        Value::Bytes(_) => Ok(value.clone()),
        Value::Str(text) => Ok(Value::Bytes(text.as_bytes().to_vec())),
        other => Err(wrong_input("bytes or str", other)),
    }
}

fn parse_i64(text: &str) -> Result<i64, Error> {
    text.trim().parse::<i64>().map_err(|err| {
        Error::new(ErrorKind::Value)
            .with_message(format!("invalid fraction component `{}`", text.trim()))
            .with_source(err)
    })
}

fn parse_decimal(text: &str) -> Result<Fraction, Error> {
    let invalid = || Error::new(ErrorKind::Value).with_message("invalid fraction literal");
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let (whole, frac) = digits.split_once('.').ok_or_else(invalid)?;
    if (whole.is_empty() && frac.is_empty())
        || !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }
    let scale = u32::try_from(frac.len())
        .ok()
        .and_then(|len| 10i64.checked_pow(len))
        .ok_or_else(invalid)?;
    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
    let frac: i64 = if frac.is_empty() { 0 } else { frac.parse().map_err(|_| invalid())? };
    let numer = whole
        .checked_mul(scale)
        .and_then(|n| n.checked_add(frac))
        .and_then(|n| n.checked_mul(sign))
        .ok_or_else(invalid)?;
    Fraction::new(numer, scale).ok_or_else(invalid)
}

/// `a/b`, an integer, or a plain decimal such as `1.25`.
pub fn parse_fraction(raw: &str) -> Result<Fraction, Error> {
    let text = raw.trim();
    if let Some((numer, denom)) = text.split_once('/') {
        let (numer, denom) = (parse_i64(numer)?, parse_i64(denom)?);
        if denom == 0 {
            return Err(Error::new(ErrorKind::ZeroDivision)
                .with_message("fraction has a zero denominator"));
        }
        return Fraction::new(numer, denom)
            .ok_or_else(|| Error::new(ErrorKind::Value).with_message("fraction overflows"));
    }
    if text.contains('.') {
        return parse_decimal(text);
    }
    let numer = parse_i64(text)?;
    Fraction::new(numer, 1)
        .ok_or_else(|| Error::new(ErrorKind::Value).with_message("fraction overflows"))
}

pub fn decode_fraction(value: &Value) -> Result<Value, Error> {
    match value {
        Value::Fraction(_) => Ok(value.clone()),
        Value::Int(n) => Fraction::new(*n, 1)
            .map(Value::Fraction)
            .ok_or_else(|| Error::new(ErrorKind::Value).with_message("fraction overflows")),
        Value::Str(raw) => parse_fraction(raw).map(Value::Fraction),
        other => Err(wrong_input("fraction, int or str", other)),
    }
}

pub fn decode_path(value: &Value) -> Result<Value, Error> {
    match value {
        Value::Path(_) => Ok(value.clone()),
        Value::Str(raw) => Ok(Value::Path(PathBuf::from(raw.trim()))),
        other => Err(wrong_input("path or str", other)),
    }
}

pub fn decode_none(value: &Value) -> Result<Value, Error> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Str(raw)
            if raw.trim().eq_ignore_ascii_case("none") || raw.trim().eq_ignore_ascii_case("null") =>
        {
            Ok(Value::Null)
        }
        Value::Str(_) => {
            Err(Error::new(ErrorKind::Value).with_message("expected `none` or `null`"))
        }
        other => Err(wrong_input("none", other)),
    }
}

pub fn decode_any(value: &Value) -> Result<Value, Error> {
    Ok(value.clone())
}
