use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Number, Value};
use std::borrow::Cow;
use std::cmp::Ordering;

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Returns `true` for an undefined, null, empty-string or empty-array value.
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Bool(_) | Value::Number(_) | Value::Object(_)) => false,
    }
}

/// Coerces a value to a number.
///
/// Numbers pass through, strings are trimmed and parsed, booleans become 1/0.
/// Everything else (including blank strings) is `NaN`.
pub fn to_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => parse_number(s),
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        None | Some(Value::Null | Value::Array(_) | Value::Object(_)) => f64::NAN,
    }
}

fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }
    // `f64::from_str` also accepts "inf" and "NaN", which are not numeric input here.
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => f64::NAN,
    }
}

/// Coerces a value to its string form.
pub fn to_text(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(Value::Bool(b)) => Cow::Owned(b.to_string()),
        Some(Value::Number(n)) => Cow::Owned(format_json_number(n)),
        Some(Value::Array(items)) => Cow::Owned(
            items
                .iter()
                .map(|item| to_text(Some(item)))
                .collect::<Vec<_>>()
                .join(","),
        ),
        Some(object @ Value::Object(_)) => Cow::Owned(object.to_string()),
    }
}

fn format_json_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    n.as_f64().map_or_else(|| n.to_string(), format_number)
}

/// Formats a number the way a user would type it (`42`, `4.5`).
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Converts an arithmetic result back into a JSON value.
///
/// Integral results are stored as JSON integers. Non-finite results have no JSON
/// representation and become `null`.
pub fn from_number(n: f64) -> Value {
    if !n.is_finite() {
        return Value::Null;
    }
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Value::from(n as i64);
    }
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}

/// Parses an ISO-8601 date or date-time into a comparable instant.
pub fn parse_instant(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Orders two date values chronologically.
///
/// Unparseable dates fall back to plain string order. An empty side has no order.
pub fn compare_dates(left: Option<&Value>, right: Option<&Value>) -> Option<Ordering> {
    let (left, right) = (to_text(left), to_text(right));
    if left.is_empty() || right.is_empty() {
        return None;
    }
    match (parse_instant(&left), parse_instant(&right)) {
        (Some(l), Some(r)) => Some(l.cmp(&r)),
        _ => Some(left.as_ref().cmp(right.as_ref())),
    }
}
