//! Lenient field readers: providers send numbers either as JSON numbers or strings

use serde_json::Value;

use crate::utils::{AmlError, Result};

pub(crate) fn field_u64(obj: &Value, key: &str) -> Result<Option<u64>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .map(Some)
            .ok_or_else(|| malformed(key, &n.to_string())),
        Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| malformed(key, s)),
        Some(other) => Err(malformed(key, &other.to_string())),
    }
}

pub(crate) fn field_i64(obj: &Value, key: &str) -> Result<Option<i64>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(Some)
            .ok_or_else(|| malformed(key, &n.to_string())),
        Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| malformed(key, s)),
        Some(other) => Err(malformed(key, &other.to_string())),
    }
}

pub(crate) fn field_f64(obj: &Value, key: &str) -> Result<Option<f64>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| malformed(key, &n.to_string())),
        Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| malformed(key, s)),
        Some(other) => Err(malformed(key, &other.to_string())),
    }
}

pub(crate) fn field_u128(obj: &Value, key: &str) -> Result<Option<u128>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|v| Some(v as u128))
            .ok_or_else(|| malformed(key, &n.to_string())),
        Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| malformed(key, s)),
        Some(other) => Err(malformed(key, &other.to_string())),
    }
}

pub(crate) fn field_str<'a>(obj: &'a Value, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn malformed(key: &str, raw: &str) -> AmlError {
    AmlError::MalformedResponse(format!("field '{}' has unexpected value {}", key, raw))
}
