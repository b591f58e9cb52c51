// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Resource attributes of a telemetry item.
//!
//! Attributes are read-only inputs: actions use them as a value source but
//! never modify them.

use base64::Engine as _;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyValue {
    /// UTF-8 string.
    String(String),
    /// Boolean.
    Bool(bool),
    /// Signed 64-bit integer.
    Int(i64),
    /// 64-bit float.
    Double(f64),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Ordered list of values.
    Array(Vec<AnyValue>),
    /// Nested key/value list.
    KvList(Vec<KeyValue>),
    /// No value.
    Empty,
}

impl AnyValue {
    /// Creates a string value.
    pub fn new_string(value: impl Into<String>) -> Self {
        AnyValue::String(value.into())
    }

    /// Renders the value as a string.
    ///
    /// Strings are returned verbatim. Other values use a generic rendering:
    /// decimal numbers, `true`/`false`, base64 for bytes and compact JSON for
    /// arrays and key/value lists.
    #[must_use]
    pub fn as_string(&self) -> String {
        match self {
            AnyValue::String(s) => s.clone(),
            AnyValue::Bool(b) => b.to_string(),
            AnyValue::Int(i) => i.to_string(),
            AnyValue::Double(d) => format_double(*d),
            AnyValue::Bytes(b) => base64::engine::general_purpose::STANDARD.encode(b),
            AnyValue::Array(_) | AnyValue::KvList(_) => {
                let mut out = String::new();
                self.write_json(&mut out);
                out
            }
            AnyValue::Empty => String::new(),
        }
    }

    fn write_json(&self, out: &mut String) {
        match self {
            AnyValue::String(s) => write_json_string(s, out),
            AnyValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            AnyValue::Int(i) => out.push_str(&i.to_string()),
            // JSON has no representation for NaN or infinities.
            AnyValue::Double(d) if !d.is_finite() => {
                write_json_string(&format_double(*d), out);
            }
            AnyValue::Double(d) => out.push_str(&format_double(*d)),
            AnyValue::Bytes(b) => {
                write_json_string(&base64::engine::general_purpose::STANDARD.encode(b), out);
            }
            AnyValue::Array(values) => {
                out.push('[');
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    value.write_json(out);
                }
                out.push(']');
            }
            AnyValue::KvList(kvs) => {
                // Keys are sorted; a repeated key keeps its last value.
                let entries: BTreeMap<&str, &AnyValue> =
                    kvs.iter().map(|kv| (kv.key.as_str(), &kv.value)).collect();
                out.push('{');
                for (i, (key, value)) in entries.into_iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_json_string(key, out);
                    out.push(':');
                    value.write_json(out);
                }
                out.push('}');
            }
            AnyValue::Empty => out.push_str("null"),
        }
    }
}

fn write_json_string(s: &str, out: &mut String) {
    out.push_str(&JsonValue::from(s).to_string());
}

/// Formats a double the way JSON encoders commonly do: plain decimal, except
/// for magnitudes below 1e-6 or from 1e21 on, which use an exponent
/// (`1e+21`, `1.5e-7`).
fn format_double(d: f64) -> String {
    if d.is_nan() {
        return "NaN".to_string();
    }
    if d == f64::INFINITY {
        return "+Inf".to_string();
    }
    if d == f64::NEG_INFINITY {
        return "-Inf".to_string();
    }
    let abs = d.abs();
    if abs != 0.0 && !(1e-6..1e21).contains(&abs) {
        let sci = format!("{d:e}");
        return match sci.split_once('e') {
            Some((mantissa, exp)) => match exp.strip_prefix('-') {
                Some(neg) => format!("{mantissa}e-{neg}"),
                None => format!("{mantissa}e+{exp:0>2}"),
            },
            None => sci,
        };
    }
    d.to_string()
}

impl From<&str> for AnyValue {
    fn from(value: &str) -> Self {
        AnyValue::String(value.to_string())
    }
}

impl From<String> for AnyValue {
    fn from(value: String) -> Self {
        AnyValue::String(value)
    }
}

impl From<bool> for AnyValue {
    fn from(value: bool) -> Self {
        AnyValue::Bool(value)
    }
}

impl From<i64> for AnyValue {
    fn from(value: i64) -> Self {
        AnyValue::Int(value)
    }
}

impl From<f64> for AnyValue {
    fn from(value: f64) -> Self {
        AnyValue::Double(value)
    }
}

/// A single attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue {
    /// Attribute name.
    pub key: String,
    /// Attribute value.
    pub value: AnyValue,
}

impl KeyValue {
    /// Creates an attribute.
    pub fn new(key: impl Into<String>, value: impl Into<AnyValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Resource attributes describing the current telemetry item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<KeyValue>,
}

impl Attributes {
    /// Creates an attribute set.
    #[must_use]
    pub fn new(entries: Vec<KeyValue>) -> Self {
        Self { entries }
    }

    /// Returns the value of the first attribute named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AnyValue> {
        self.entries
            .iter()
            .find(|kv| kv.key == key)
            .map(|kv| &kv.value)
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &KeyValue> {
        self.entries.iter()
    }
}

impl From<Vec<KeyValue>> for Attributes {
    fn from(entries: Vec<KeyValue>) -> Self {
        Self { entries }
    }
}

impl FromIterator<KeyValue> for Attributes {
    fn from_iter<T: IntoIterator<Item = KeyValue>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_rendering() {
        assert_eq!(AnyValue::new_string("us-east").as_string(), "us-east");
        assert_eq!(AnyValue::Bool(true).as_string(), "true");
        assert_eq!(AnyValue::Int(-42).as_string(), "-42");
        assert_eq!(AnyValue::Double(1.5).as_string(), "1.5");
        assert_eq!(AnyValue::Double(3.0).as_string(), "3");
        assert_eq!(AnyValue::Double(f64::NAN).as_string(), "NaN");
        assert_eq!(AnyValue::Double(f64::INFINITY).as_string(), "+Inf");
        assert_eq!(AnyValue::Double(f64::NEG_INFINITY).as_string(), "-Inf");
        assert_eq!(AnyValue::Empty.as_string(), "");
    }

    #[test]
    fn large_and_small_doubles_use_exponent_form() {
        assert_eq!(AnyValue::Double(1e21).as_string(), "1e+21");
        assert_eq!(AnyValue::Double(-2.5e22).as_string(), "-2.5e+22");
        assert_eq!(AnyValue::Double(1.5e-7).as_string(), "1.5e-7");
        assert_eq!(AnyValue::Double(1e-10).as_string(), "1e-10");
        assert_eq!(AnyValue::Double(1e20).as_string(), "100000000000000000000");
        assert_eq!(AnyValue::Double(0.000001).as_string(), "0.000001");
        assert_eq!(AnyValue::Double(0.0).as_string(), "0");
    }

    #[test]
    fn doubles_inside_composites_match_scalar_rendering() {
        let array = AnyValue::Array(vec![
            AnyValue::Double(1e21),
            AnyValue::Double(2.0),
            AnyValue::Double(0.5),
            AnyValue::Double(1.5e-7),
            AnyValue::Double(f64::NAN),
        ]);
        assert_eq!(array.as_string(), r#"[1e+21,2,0.5,1.5e-7,"NaN"]"#);

        let map = AnyValue::KvList(vec![
            KeyValue::new("ratio", AnyValue::Double(3.0)),
            KeyValue::new("big", AnyValue::Double(1e21)),
        ]);
        assert_eq!(map.as_string(), r#"{"big":1e+21,"ratio":3}"#);
    }

    #[test]
    fn composite_rendering_escapes_strings_and_nests() {
        let map = AnyValue::KvList(vec![
            KeyValue::new("name", "a\"b"),
            KeyValue::new("raw", AnyValue::Bytes(b"hi".to_vec())),
            KeyValue::new("list", AnyValue::Array(vec![AnyValue::Empty, AnyValue::Int(-1)])),
            KeyValue::new("name", "last"),
        ]);
        assert_eq!(
            map.as_string(),
            r#"{"list":[null,-1],"name":"last","raw":"aGk="}"#
        );
        assert_eq!(
            AnyValue::Array(vec![AnyValue::new_string("q\"")]).as_string(),
            r#"["q\""]"#
        );
    }

    #[test]
    fn bytes_render_as_base64() {
        assert_eq!(AnyValue::Bytes(b"hello".to_vec()).as_string(), "aGVsbG8=");
    }

    #[test]
    fn composite_values_render_as_json() {
        let array = AnyValue::Array(vec![AnyValue::Int(1), AnyValue::new_string("a")]);
        assert_eq!(array.as_string(), r#"[1,"a"]"#);

        let map = AnyValue::KvList(vec![
            KeyValue::new("b", true),
            KeyValue::new("a", AnyValue::Empty),
        ]);
        let rendered: JsonValue = serde_json::from_str(&map.as_string()).expect("json");
        assert_eq!(rendered, serde_json::json!({"a": null, "b": true}));
    }

    #[test]
    fn get_returns_first_match() {
        let attrs = Attributes::new(vec![
            KeyValue::new("host", "first"),
            KeyValue::new("host", "second"),
        ]);
        assert_eq!(attrs.get("host"), Some(&AnyValue::new_string("first")));
        assert!(attrs.get("missing").is_none());
        assert_eq!(attrs.len(), 2);
    }
}
