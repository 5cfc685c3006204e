//! Lenient coercion of form values
//!
//! Form fields arrive as strings, numbers, or not at all. Every coercion here
//! is total: anything that cannot be read yields the field default (0 or "").
//!
//! Numeric strings are read the way form inputs are conventionally parsed:
//! leading whitespace is skipped, an optional sign is accepted, and the
//! longest numeric prefix wins (`"1500.75"` is 1500 as an integer, `"12abc"`
//! is 12, `"$12"` is unreadable).

use serde_json::{Map, Value};

/// Read an integer field, defaulting to 0
pub fn coerce_int(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n.as_i64().unwrap_or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
                .unwrap_or(0)
        }),
        Some(Value::String(s)) => parse_int_prefix(s).unwrap_or(0),
        _ => 0,
    }
}

/// Read a rate-like field, defaulting to 0.0
pub fn coerce_float(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_float_prefix(s),
        _ => None,
    };
    parsed.filter(|f| f.is_finite()).unwrap_or(0.0)
}

/// Read a string/enum field, defaulting to ""
pub fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Parse a list of ages, dropping entries that are not integers
///
/// Accepts a comma-separated string (`"34, 7, abc, 10"` gives `[34, 7, 10]`)
/// or a JSON array. Anything else yields an empty list.
pub fn parse_age_list(value: Option<&Value>) -> Vec<i64> {
    match value {
        Some(Value::String(s)) => s.split(',').filter_map(parse_int_prefix).collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => parse_int_prefix(s),
                Value::Number(_) => Some(coerce_int(Some(item))),
                _ => None,
            })
            .collect(),
        Some(Value::Number(_)) => vec![coerce_int(value)],
        _ => Vec::new(),
    }
}

/// Longest leading integer of a string
pub fn parse_int_prefix(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, rest) = split_sign(s);
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let digits = &rest[..digits_len];
    match digits.parse::<i64>() {
        Ok(n) if negative => Some(-n),
        Ok(n) => Some(n),
        // Overflow: the prefix is all digits, so only magnitude can fail
        Err(_) if negative => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}

/// Longest leading decimal number of a string (with optional exponent)
pub fn parse_float_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let (negative, rest) = split_sign(s);
    let bytes = rest.as_bytes();

    let int_len = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    let mut end = int_len;
    let mut frac_len = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_len = bytes[end + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
        end += 1 + frac_len;
    }
    if int_len == 0 && frac_len == 0 {
        return None;
    }

    // Exponent only counts when digits follow it
    let mut exponent = "";
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = bytes[exp_end.min(bytes.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if exp_digits > 0 {
            exponent = &rest[end..exp_end + exp_digits];
        }
    }

    let int_part = if int_len == 0 { "0" } else { &rest[..int_len] };
    let frac_part = if frac_len == 0 { "0" } else { &rest[int_len + 1..int_len + 1 + frac_len] };
    let literal = format!("{}.{}{}", int_part, frac_part, exponent);

    literal
        .parse::<f64>()
        .ok()
        .map(|f| if negative { -f } else { f })
}

fn split_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    }
}

/// Borrowed view over one object of raw form fields
///
/// A missing or non-object section behaves like an empty one, so every read
/// falls through to its default.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a>(Option<&'a Map<String, Value>>);

impl<'a> Fields<'a> {
    pub fn new(fields: Option<&'a Map<String, Value>>) -> Self {
        Self(fields)
    }

    pub fn of_value(value: &'a Value) -> Self {
        Self(value.as_object())
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.and_then(|fields| fields.get(key))
    }

    pub fn int(&self, key: &str) -> i64 {
        coerce_int(self.get(key))
    }

    pub fn float(&self, key: &str) -> f64 {
        coerce_float(self.get(key))
    }

    pub fn string(&self, key: &str) -> String {
        coerce_string(self.get(key))
    }

    pub fn ages(&self, key: &str) -> Vec<i64> {
        parse_age_list(self.get(key))
    }

    /// Elements of a list field; a non-list value reads as empty
    pub fn list(&self, key: &str) -> &'a [Value] {
        match self.get(key) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        }
    }
}
