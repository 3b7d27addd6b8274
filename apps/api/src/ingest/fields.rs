//! Loose field access and type coercion over a single model-produced JSON object.
//!
//! Models routinely emit numbers as strings ("4.5", "$80,000"), booleans as words,
//! and omit optional fields. Every accessor here maps such values to a canonical
//! type or a documented default instead of failing the record.

use serde_json::{Map, Value};
use thiserror::Error;

/// Reason a single record was dropped during validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' has an unusable value")]
    Invalid { field: &'static str },
}

/// A fixed vocabulary that loose model strings are normalized against.
pub trait Vocabulary: Sized + Default + Copy + 'static {
    const VARIANTS: &'static [Self];

    /// Canonical spelling; also accepted as input.
    fn label(self) -> &'static str;

    /// Extra spellings accepted for this variant, already in normalized form.
    fn aliases(self) -> &'static [&'static str] {
        &[]
    }

    /// Case, spacing and punctuation-insensitive lookup.
    fn parse_loose(raw: &str) -> Option<Self> {
        let wanted = normalize_token(raw);
        if wanted.is_empty() {
            return None;
        }
        Self::VARIANTS.iter().copied().find(|variant| {
            normalize_token(variant.label()) == wanted || variant.aliases().contains(&wanted.as_str())
        })
    }
}

fn normalize_token(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Read-only view over one JSON object with coercing accessors.
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(value: &'a Value) -> Result<Self, Rejection> {
        value
            .as_object()
            .map(|map| Self { map })
            .ok_or(Rejection::NotAnObject)
    }

    /// Looks a key up as given, then in its snake_case spelling.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        match self.map.get(key) {
            Some(Value::Null) | None => {
                let snake = to_snake_case(key);
                if snake != key {
                    self.map.get(&snake).filter(|v| !v.is_null())
                } else {
                    None
                }
            }
            Some(v) => Some(v),
        }
    }

    /// True when the field exists and carries something: a non-blank string,
    /// a number, a boolean, or a non-empty array/object.
    pub fn is_present(&self, key: &str) -> bool {
        match self.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
            Some(_) => true,
        }
    }

    pub fn require_str(&self, key: &'static str) -> Result<String, Rejection> {
        self.text(key).ok_or(Rejection::MissingField(key))
    }

    pub fn require_f64(&self, key: &'static str) -> Result<f64, Rejection> {
        match self.get(key) {
            None => Err(Rejection::MissingField(key)),
            Some(v) => coerce_f64(v).ok_or(Rejection::Invalid { field: key }),
        }
    }

    /// Non-blank string value, trimmed. Numbers and booleans are rendered as text.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn text_or(&self, key: &str, default: &str) -> String {
        self.text(key).unwrap_or_else(|| default.to_string())
    }

    pub fn opt_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(coerce_f64)
    }

    pub fn f64_or(&self, key: &str, default: f64) -> f64 {
        self.opt_f64(key).unwrap_or(default)
    }

    pub fn i64_or(&self, key: &str, default: i64) -> i64 {
        self.opt_f64(key)
            .filter(|n| n.is_finite())
            .map(|n| n.round() as i64)
            .unwrap_or(default)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(coerce_bool).unwrap_or(default)
    }

    /// Ordered list of non-blank strings. A bare string becomes a one-item list;
    /// anything else that is not an array yields an empty list.
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect(),
            Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
            _ => Vec::new(),
        }
    }

    pub fn list_or(&self, key: &str, default: &[&str]) -> Vec<String> {
        let items = self.list(key);
        if items.is_empty() {
            default.iter().map(|s| s.to_string()).collect()
        } else {
            items
        }
    }

    /// Raw array of objects, for nested records.
    pub fn objects(&self, key: &str) -> Vec<&'a Value> {
        match self.get(key) {
            Some(Value::Array(items)) => items.iter().filter(|v| v.is_object()).collect(),
            _ => Vec::new(),
        }
    }

    /// Enumerated field; absent or unrecognized values fall back to `V::default()`.
    pub fn choice<V: Vocabulary>(&self, key: &str) -> V {
        self.text(key)
            .and_then(|raw| V::parse_loose(&raw))
            .unwrap_or_default()
    }
}

/// Accepts JSON numbers and numeric-looking strings such as "4.5", "$1,200", "85%" or "15k".
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric(s),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn parse_numeric(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ',' | '%' | '+' | ' '))
        .collect();
    let lower = cleaned.to_lowercase();
    let (digits, multiplier) = match lower.strip_suffix('k') {
        Some(rest) => (rest, 1_000.0),
        None => match lower.strip_suffix('m') {
            Some(rest) => (rest, 1_000_000.0),
            None => (lower.as_str(), 1.0),
        },
    };
    digits.parse::<f64>().ok().map(|n| n * multiplier)
}

pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" | "remote" => Some(true),
            "false" | "no" | "n" | "0" | "onsite" | "on-site" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
