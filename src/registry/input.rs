//! Request input decoding
//!
//! Turns request bodies into loosely-typed field maps and path segments into
//! requested ids. Field values keep JavaScript truthiness semantics so partial
//! updates can skip falsy values.

use serde_json::{Map, Number, Value};
use std::fmt;
use thiserror::Error;

/// Decoded request body: field name to raw value
pub type FieldMap = Map<String, Value>;

/// Errors raised while reading or decoding a request body
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Request body too large (max: {max} bytes)")]
    TooLarge { max: u64 },

    #[error("Failed to read request body: {0}")]
    Read(String),
}

/// Body encodings understood by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Form,
    /// Anything else; decodes to an empty map
    Other,
}

impl BodyKind {
    /// Classify a `Content-Type` header value by its media type alone
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(value) = content_type else {
            return Self::Other;
        };
        let essence = value
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "application/json" => Self::Json,
            "application/x-www-form-urlencoded" => Self::Form,
            _ => Self::Other,
        }
    }
}

/// Decode a request body according to its content type
///
/// Empty bodies and unknown content types yield an empty map. A JSON array
/// also yields an empty map since it has no named fields; JSON scalars are
/// rejected.
pub fn decode_body(content_type: Option<&str>, body: &[u8]) -> Result<FieldMap, BodyError> {
    match BodyKind::from_content_type(content_type) {
        BodyKind::Json => decode_json(body),
        BodyKind::Form => Ok(decode_form(body)),
        BodyKind::Other => Ok(FieldMap::new()),
    }
}

fn decode_json(body: &[u8]) -> Result<FieldMap, BodyError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(FieldMap::new());
    }

    match serde_json::from_slice::<Value>(body).map(normalize_numbers) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Array(_)) => Ok(FieldMap::new()),
        Ok(other) => Err(BodyError::InvalidJson(format!(
            "expected an object, got {}",
            json_type_name(&other)
        ))),
        Err(e) => Err(BodyError::InvalidJson(e.to_string())),
    }
}

/// Rewrite integral floats (`2.0`, `-0.0`) as integers, the way a JSON
/// number has no separate integer type and re-serializes as `2`
#[allow(clippy::cast_possible_truncation)]
fn normalize_numbers(value: Value) -> Value {
    match value {
        Value::Number(n) if !n.is_i64() && !n.is_u64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 9.007_199_254_740_992e15 => {
                Value::Number(Number::from(f as i64))
            }
            _ => Value::Number(n),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, normalize_numbers(v)))
                .collect(),
        ),
        other => other,
    }
}

/// Parse `application/x-www-form-urlencoded` pairs
///
/// Every value is a string; a key given more than once collects its values
/// into an array in order of appearance.
fn decode_form(body: &[u8]) -> FieldMap {
    let raw = String::from_utf8_lossy(body);
    let mut fields = FieldMap::new();

    for pair in raw.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_form_component(key);
        let value = Value::String(decode_form_component(value));

        match fields.get_mut(&key) {
            None => {
                fields.insert(key, value);
            }
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        }
    }

    fields
}

fn decode_form_component(component: &str) -> String {
    let spaced = component.replace('+', " ");
    urlencoding::decode(&spaced).map_or_else(|_| spaced.clone(), std::borrow::Cow::into_owned)
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// JavaScript truthiness of a JSON value
///
/// `null`, `false`, `0`, `-0`, `NaN` and `""` are falsy; everything else,
/// including empty arrays and objects, is truthy. A missing field is falsy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Text a JavaScript template would print for a value
///
/// Arrays join their elements with commas; objects print as
/// `[object Object]`; `null` prints nothing.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// An id taken from a request path
///
/// Parsed like `parseInt`: leading whitespace, optional sign, then leading
/// digits of the radix. Input without digits is `NaN` and matches no record.
/// Values too large for an integer keep their floating point magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestedId(Option<f64>);

impl RequestedId {
    /// Parse in base 10; a `0x` prefix reads as `0`
    pub fn parse(raw: &str) -> Self {
        let (negative, rest) = split_sign(raw);
        Self::from_digits(negative, rest, 10)
    }

    /// Parse in base 10, or base 16 when the digits start with `0x`/`0X`
    pub fn parse_auto(raw: &str) -> Self {
        let (negative, rest) = split_sign(raw);
        match rest.get(..2) {
            Some(prefix) if prefix.eq_ignore_ascii_case("0x") => {
                Self::from_digits(negative, &rest[2..], 16)
            }
            _ => Self::from_digits(negative, rest, 10),
        }
    }

    fn from_digits(negative: bool, rest: &str, radix: u32) -> Self {
        let digits_len = rest.chars().take_while(|c| c.is_digit(radix)).count();
        if digits_len == 0 {
            return Self(None);
        }

        let digits = &rest[..digits_len];
        let magnitude = if radix == 10 {
            digits.parse::<f64>().ok()
        } else {
            Some(digits.chars().fold(0.0, |acc, c| {
                acc * f64::from(radix) + f64::from(c.to_digit(radix).unwrap_or(0))
            }))
        };
        Self(magnitude.map(|v| if negative { -v } else { v }))
    }

    pub const fn value(self) -> Option<f64> {
        self.0
    }

    /// Whether a record id equals this requested id
    #[allow(clippy::cast_precision_loss)]
    pub fn matches(self, id: i64) -> bool {
        self.value() == Some(id as f64)
    }
}

fn split_sign(raw: &str) -> (bool, &str) {
    let trimmed = raw.trim_start();
    match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    }
}

impl From<i64> for RequestedId {
    #[allow(clippy::cast_precision_loss)]
    fn from(id: i64) -> Self {
        Self(Some(id as f64))
    }
}

impl fmt::Display for RequestedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => write!(f, "NaN"),
            Some(v) if v.is_infinite() => {
                write!(f, "{}Infinity", if v < 0.0 { "-" } else { "" })
            }
            Some(v) if v == 0.0 => write!(f, "0"),
            Some(v) if v.abs() >= 1e21 => {
                let formatted = format!("{v:e}");
                match formatted.split_once('e') {
                    Some((mantissa, exp)) if !exp.starts_with('-') => {
                        write!(f, "{mantissa}e+{exp}")
                    }
                    _ => write!(f, "{formatted}"),
                }
            }
            Some(v) => write!(f, "{v}"),
        }
    }
}
