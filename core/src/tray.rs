use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use tracing::warn;

/// Textual prefix used by tray codes like `TRAY001`
pub const TRAY_PREFIX: &str = "TRAY";

/// Tray identifier as it arrives on the wire
#[derive(Debug, Clone, PartialEq)]
pub enum RawTrayId {
    Number(Number),
    Text(String),
}

impl RawTrayId {
    /// Only numbers and strings are identifiers, everything else yields `None`
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(RawTrayId::Number(n.clone())),
            Value::String(s) => Some(RawTrayId::Text(s.clone())),
            _ => None,
        }
    }
}

impl From<i64> for RawTrayId {
    fn from(id: i64) -> Self {
        RawTrayId::Number(Number::from(id))
    }
}

impl From<&str> for RawTrayId {
    fn from(id: &str) -> Self {
        RawTrayId::Text(id.to_owned())
    }
}

/// Canonical tray key, the join key between both feeds
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrayId(String);

impl TrayId {
    /// Key for identifiers without any recoverable digits
    pub const UNPARSEABLE: &'static str = "0";

    pub fn unparseable() -> Self {
        TrayId(Self::UNPARSEABLE.to_owned())
    }

    /// Wraps an already canonical key, e.g. a stored one
    pub fn from_canonical(key: impl Into<String>) -> Self {
        TrayId(key.into())
    }

    /// Canonicalizes a free text identifier, as sent by a client
    pub fn parse(raw: &str) -> Self {
        normalize(&RawTrayId::Text(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TrayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&RawTrayId> for TrayId {
    fn from(raw: &RawTrayId) -> Self {
        normalize(raw)
    }
}

/// Resolves a raw identifier into its canonical key.
///
/// Resolution order:
/// 1. numbers use their decimal form
/// 2. strings that are an integer use that integer
/// 3. strings starting with [`TRAY_PREFIX`] use the integer after the prefix,
///    so `TRAY-5` is `-5`
/// 4. otherwise all digits of the string, in order, form the integer, so a
///    prefixed code with a non-integer remainder like `TRAY1x2` becomes `12`
///
/// Identifiers without any digit collapse to [`TrayId::UNPARSEABLE`].
pub fn normalize(raw: &RawTrayId) -> TrayId {
    match raw {
        RawTrayId::Number(n) => TrayId(number_key(n)),
        RawTrayId::Text(text) => text_key(text).map(TrayId).unwrap_or_else(|| {
            warn!(raw = text.as_str(), "Unparseable tray id, using sentinel key");
            TrayId::unparseable()
        }),
    }
}

fn number_key(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => format!("{:.0}", f),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

fn text_key(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if let Some(key) = integer_key(trimmed) {
        return Some(key);
    }

    if let Some(key) = strip_prefix_ignore_case(trimmed, TRAY_PREFIX).and_then(integer_key) {
        return Some(key);
    }

    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits_key(&digits))
    }
}

// an optionally signed digit run, of any length
fn integer_key(text: &str) -> Option<String> {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let key = digits_key(digits);
    if negative && key != "0" {
        Some(format!("-{}", key))
    } else {
        Some(key)
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

// decimal form of a digit run, without going through a bounded integer type
fn digits_key(digits: &str) -> String {
    let stripped = digits.trim_start_matches('0');
    if stripped.is_empty() {
        "0".to_owned()
    } else {
        stripped.to_owned()
    }
}
