//! Purpose: Calendar leaf decoders backed by the `time` crate.
//! Exports: `parse_date`, `parse_time`, `parse_datetime`, `parse_duration`, and the
//!          matching `decode_*` leaf functions.
//! Role: Default catalog entries for `date`, `datetime`, `time`, `duration`.
//! Invariants: Numeric dates are year-first when the first part has four digits,
//!             otherwise day-first (`D-M-YYYY`); `-`, `.` and `/` separate parts.
//! Invariants: Offset datetimes are normalized to UTC before the offset is dropped.
use time::format_description::well_known::Rfc3339;
use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::core::error::{Error, ErrorKind};
use crate::core::value::Value;

const DATE_HINT: &str = "use common date formats like YYYY-MM-DD";

const MONTHS: [(&str, Month); 12] = [
    ("january", Month::January),
    ("february", Month::February),
    ("march", Month::March),
    ("april", Month::April),
    ("may", Month::May),
    ("june", Month::June),
    ("july", Month::July),
    ("august", Month::August),
    ("september", Month::September),
    ("october", Month::October),
    ("november", Month::November),
    ("december", Month::December),
];

fn invalid(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::Value).with_message(message).with_hint(DATE_HINT)
}

fn wrong_input(expected: &str, value: &Value) -> Error {
    Error::new(ErrorKind::Type).with_message(format!(
        "expected {expected}, got {}",
        value.type_name()
    ))
}

fn number<T: std::str::FromStr>(part: &str) -> Result<T, Error> {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(format!("`{part}` is not a number")));
    }
    part.parse::<T>()
        .map_err(|_| invalid(format!("`{part}` is out of range")))
}

fn calendar_date(year: i32, month: u8, day: u8) -> Result<Date, Error> {
    let month = Month::try_from(month).map_err(|err| invalid(err.to_string()))?;
    Date::from_calendar_date(year, month, day).map_err(|err| invalid(err.to_string()))
}

fn month_named(word: &str) -> Option<Month> {
    let word = word.trim_end_matches('.').to_ascii_lowercase();
    if word.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .find(|(name, _)| name.starts_with(word.as_str()))
        .map(|(_, month)| *month)
}

fn day_ordinal(word: &str) -> Option<u8> {
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| word.to_ascii_lowercase().strip_suffix(suffix).map(str::to_string))
        .unwrap_or_else(|| word.to_string());
    if digits.is_empty() || digits.len() > 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn ymd(year: &str, month: &str, day: &str) -> Result<Date, Error> {
    calendar_date(number(year)?, number(month)?, number(day)?)
}

fn parse_numeric_date(text: &str) -> Option<Result<Date, Error>> {
    if text.len() == 8 && text.chars().all(|c| c.is_ascii_digit()) {
        return Some(ymd(&text[..4], &text[4..6], &text[6..]));
    }
    let sep = text.chars().find(|c| matches!(c, '-' | '.' | '/'))?;
    let parts: Vec<&str> = text.split(sep).collect();
    if parts.len() != 3 || !parts.iter().all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit())) {
        return None;
    }
    let result = if parts[0].len() == 4 {
        ymd(parts[0], parts[1], parts[2])
    } else if parts[2].len() == 4 {
        ymd(parts[2], parts[1], parts[0])
    } else {
        Err(invalid("ambiguous date; use a four digit year"))
    };
    Some(result)
}

/// `July 19th 2022`, `19 July 2022`, `Jul 19, 2022`.
fn parse_word_date(text: &str) -> Option<Result<Date, Error>> {
    let words: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|w| !w.is_empty())
        .collect();
    if words.len() != 3 {
        return None;
    }
    let month = words.iter().find_map(|w| month_named(w))?;
    let year = words
        .iter()
        .find(|w| w.len() == 4 && w.chars().all(|c| c.is_ascii_digit()))?;
    let day = words
        .iter()
        .filter(|w| month_named(w).is_none() && *w != year)
        .find_map(|w| day_ordinal(w))?;
    let year: i32 = match number(year) {
        Ok(year) => year,
        Err(err) => return Some(Err(err)),
    };
    Some(Date::from_calendar_date(year, month, day).map_err(|err| invalid(err.to_string())))
}

pub fn parse_date(raw: &str) -> Result<Date, Error> {
    let text = raw.trim();
    if let Some(result) = parse_numeric_date(text) {
        return result;
    }
    if let Some(result) = parse_word_date(text) {
        return result;
    }
    match parse_datetime(text) {
        Ok(datetime) => Ok(datetime.date()),
        Err(_) => Err(invalid("unrecognized date")),
    }
}

/// `HH:MM` or `HH:MM:SS[.fraction]`.
pub fn parse_time(raw: &str) -> Result<Time, Error> {
    let text = raw.trim();
    let parts: Vec<&str> = text.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(invalid("expected HH:MM or HH:MM:SS"));
    }
    let hour: u8 = number(parts[0])?;
    let minute: u8 = number(parts[1])?;
    let (second, nano) = match parts.get(2) {
        None => (0, 0),
        Some(sec) => match sec.split_once('.') {
            None => (number(sec)?, 0),
            Some((whole, frac)) => {
                let digits: String = frac.chars().take(9).collect();
                let padded = format!("{digits:0<9}");
                (number(whole)?, number::<u32>(&padded)?)
            }
        },
    };
    Time::from_hms_nano(hour, minute, second, nano).map_err(|err| invalid(err.to_string()))
}

pub fn parse_datetime(raw: &str) -> Result<PrimitiveDateTime, Error> {
    let text = raw.trim();
    if let Ok(with_offset) = OffsetDateTime::parse(text, &Rfc3339) {
        let utc = with_offset.to_offset(UtcOffset::UTC);
        return Ok(PrimitiveDateTime::new(utc.date(), utc.time()));
    }
    let split = if text.contains('T') {
        text.split_once('T')
    } else {
        text.rsplit_once(' ')
    };
    if let Some((date, time)) = split {
        if time.contains(':') {
            return Ok(PrimitiveDateTime::new(parse_date(date)?, parse_time(time)?));
        }
    }
    let date = parse_numeric_date(text)
        .or_else(|| parse_word_date(text))
        .unwrap_or_else(|| Err(invalid("unrecognized datetime")))?;
    Ok(PrimitiveDateTime::new(date, Time::MIDNIGHT))
}

fn seconds(secs: f64) -> Result<Duration, Error> {
    if !secs.is_finite() || secs.abs() >= 1e15 {
        return Err(Error::new(ErrorKind::Value).with_message("duration out of range"));
    }
    Ok(Duration::seconds_f64(secs))
}

/// Seconds (`90`, `1.5`) or clock form (`MM:SS`, `HH:MM:SS`).
pub fn parse_duration(raw: &str) -> Result<Duration, Error> {
    let text = raw.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let total = if body.contains(':') {
        let parts: Vec<&str> = body.split(':').collect();
        if parts.len() > 3 {
            return Err(Error::new(ErrorKind::Value).with_message("expected HH:MM:SS"));
        }
        let mut total = 0.0;
        for (idx, part) in parts.iter().enumerate() {
            let value: f64 = if idx + 1 == parts.len() {
                part.parse().map_err(|_| {
                    Error::new(ErrorKind::Value).with_message(format!("invalid seconds `{part}`"))
                })?
            } else {
                f64::from(number::<u32>(part).map_err(|err| err.with_hint("expected HH:MM:SS"))?)
            };
            total = total * 60.0 + value;
        }
        total
    } else {
        body.parse::<f64>().map_err(|_| {
            Error::new(ErrorKind::Value)
                .with_message("invalid duration")
                .with_hint("use seconds or HH:MM:SS")
        })?
    };
    seconds(if negative { -total } else { total })
}

pub fn decode_date(value: &Value) -> Result<Value, Error> {
    match value {
        Value::Date(_) => Ok(value.clone()),
        Value::DateTime(dt) => Ok(Value::Date(dt.date())),
        Value::Str(raw) => parse_date(raw).map(Value::Date),
        other => Err(wrong_input("date or str", other)),
    }
}

pub fn decode_datetime(value: &Value) -> Result<Value, Error> {
    match value {
        Value::DateTime(_) => Ok(value.clone()),
        Value::Date(date) => Ok(Value::DateTime(PrimitiveDateTime::new(*date, Time::MIDNIGHT))),
        Value::Str(raw) => parse_datetime(raw).map(Value::DateTime),
        other => Err(wrong_input("datetime or str", other)),
    }
}

pub fn decode_time(value: &Value) -> Result<Value, Error> {
    match value {
        Value::Time(_) => Ok(value.clone()),
        Value::Str(raw) => parse_time(raw).map(Value::Time),
        other => Err(wrong_input("time or str", other)),
    }
}

pub fn decode_duration(value: &Value) -> Result<Value, Error> {
    match value {
        Value::Duration(_) => Ok(value.clone()),
        Value::Int(n) => Ok(Value::Duration(Duration::seconds(*n))),
        Value::Float(n) => seconds(*n).map(Value::Duration),
        Value::Str(raw) => parse_duration(raw).map(Value::Duration),
        other => Err(wrong_input("duration, number or str", other)),
    }
}
