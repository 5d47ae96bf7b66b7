//! JSON path lookup and request path templating
//!
//! Response bodies are kept as generic [`serde_json::Value`] trees. Fields are
//! pulled out by dotted path (`a.b.0.c`), falling back to a caller-supplied
//! default when any segment is missing or the value is `null`.

use crate::error::{Error, Result};
use serde_json::Value;

/// Look up a value by dotted path
/// Numeric segments index into arrays. Returns `None` for missing paths and `null`.
pub fn path_search<'a>(path: &str, value: &'a Value) -> Option<&'a Value> {
    let mut current = value;

    if !path.is_empty() {
        for part in path.split('.') {
            // Handle array index
            current = match (current, part.parse::<usize>()) {
                (Value::Array(arr), Ok(idx)) => arr.get(idx)?,
                _ => current.get(part)?,
            };
        }
    }

    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Read a numeric field as an integer, defaulting when absent
/// JSON numbers arrive as floats (`42.0`); fractions are truncated toward zero.
pub fn path_search_int(path: &str, value: &Value, default: i64) -> Result<i64> {
    let Some(found) = path_search(path, value) else {
        return Ok(default);
    };

    if let Some(n) = found.as_i64() {
        return Ok(n);
    }
    match found.as_f64() {
        // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
        Some(f) if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(f.trunc() as i64)
        }
        Some(f) => Err(Error::Decode(format!(
            "unexpected value at {:?}: {} is out of range for an integer",
            path, f
        ))),
        None => Err(Error::Decode(format!(
            "unexpected value at {:?}: expected a number, got {}",
            path, found
        ))),
    }
}

/// Serialize the sub-document at `path` back to a JSON string
/// An absent value yields an empty string.
pub fn path_search_json_string(path: &str, value: &Value) -> Result<String> {
    match path_search(path, value) {
        None => Ok(String::new()),
        Some(found) => serde_json::to_string(found)
            .map_err(|e| Error::Decode(format!("failed to serialize {:?}: {}", path, e))),
    }
}

/// Substitute `{name}` tokens in a request path template
/// Parameter values are percent-encoded as single path segments. Empty, `.`
/// and `..` values are rejected since URL resolution would drop or climb out
/// of their segment. Tokens left without a value are an error so that no
/// template ever reaches the wire.
pub fn substitute_path(template: &str, params: &[(&str, &str)]) -> Result<String> {
    let mut path = template.to_string();
    for (name, value) in params {
        let token = format!("{{{}}}", name);
        if !path.contains(&token) {
            continue;
        }
        if matches!(*value, "" | "." | "..") {
            return Err(Error::Input(format!(
                "invalid value {:?} for path parameter {}",
                value, token
            )));
        }
        path = path.replace(&token, &urlencoding::encode(value));
    }

    if let Some(start) = path.find('{') {
        let rest = &path[start..];
        let end = rest.find('}').map(|i| i + 1).unwrap_or(rest.len());
        return Err(Error::request(format!(
            "unresolved path parameter {} in {}",
            &rest[..end],
            template
        )));
    }

    Ok(path)
}
