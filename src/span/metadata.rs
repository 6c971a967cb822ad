use std::slice::Iter;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;


/// Ordered key/value tags rendered as Zipkin v1 `binaryAnnotations`.
///
/// Each key is stored once: setting an existing key replaces its value and
/// moves the key to the end of the insertion order.
///
/// # Examples
///
/// ```
/// extern crate zipkin_b3;
///
/// use zipkin_b3::Metadata;
///
///
/// fn main() {
///     let mut metadata = Metadata::new();
///     metadata.set("http.method", "GET");
///     metadata.set("http.status_code", 200);
///     assert_eq!(metadata.len(), 2);
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata(Vec<(String, MetadataValue)>);

impl Metadata {
    /// Returns a new empty metadata map.
    pub fn new() -> Metadata {
        Metadata(Vec::new())
    }
}

impl Metadata {
    /// Attempt to extract a value by key.
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.0.iter()
            .find(|&&(ref k, _)| k == key)
            .map(|&(_, ref value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over all entries in insertion order.
    pub fn iter(&self) -> Iter<(String, MetadataValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Set a key to the given value.
    pub fn set<V: Into<MetadataValue>>(&mut self, key: &str, value: V) {
        self.0.retain(|&(ref k, _)| k != key);
        self.0.push((String::from(key), value.into()));
    }

    /// Renders the Zipkin v1 `binaryAnnotations` array.
    pub fn to_records(&self) -> Vec<BinaryAnnotationRecord> {
        self.0.iter()
            .map(|&(ref key, ref value)| value.to_record(key))
            .collect()
    }
}

impl AsMut<Metadata> for Metadata {
    fn as_mut(&mut self) -> &mut Metadata {
        self
    }
}


/// Enumeration of valid types for metadata values.
#[derive(Clone, Debug, PartialEq)]
pub enum MetadataValue {
    Boolean(bool),
    Bytes(Vec<u8>),
    Float(f64),
    Integer(i64),
    String(String),
}

impl MetadataValue {
    fn to_record(&self, key: &str) -> BinaryAnnotationRecord {
        let (value, kind) = match *self {
            MetadataValue::Boolean(value) => (RecordValue::Boolean(value), Some("BOOL")),
            MetadataValue::Bytes(ref value) => (
                RecordValue::String(STANDARD.encode(value)), Some("BYTES")
            ),
            MetadataValue::Float(value) => (RecordValue::Float(value), Some("DOUBLE")),
            MetadataValue::Integer(value) => (RecordValue::Integer(value), Some("I64")),
            MetadataValue::String(ref value) => (RecordValue::String(value.clone()), None),
        };
        BinaryAnnotationRecord {
            key: String::from(key),
            value,
            kind,
        }
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> MetadataValue {
        MetadataValue::Boolean(value)
    }
}

impl From<Vec<u8>> for MetadataValue {
    fn from(value: Vec<u8>) -> MetadataValue {
        MetadataValue::Bytes(value)
    }
}

impl<'a> From<&'a [u8]> for MetadataValue {
    fn from(value: &'a [u8]) -> MetadataValue {
        MetadataValue::Bytes(value.to_vec())
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> MetadataValue {
        MetadataValue::Float(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> MetadataValue {
        MetadataValue::Integer(value)
    }
}

impl From<i32> for MetadataValue {
    fn from(value: i32) -> MetadataValue {
        MetadataValue::Integer(i64::from(value))
    }
}

impl<'a> From<&'a str> for MetadataValue {
    fn from(value: &'a str) -> MetadataValue {
        MetadataValue::String(String::from(value))
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> MetadataValue {
        MetadataValue::String(value)
    }
}


/// A single entry of a span's `binaryAnnotations` array.
///
/// String values omit `type`, the Zipkin v1 default.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BinaryAnnotationRecord {
    pub key: String,
    pub value: RecordValue,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

/// JSON value of a binary annotation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordValue {
    Boolean(bool),
    Float(f64),
    Integer(i64),
    String(String),
}
