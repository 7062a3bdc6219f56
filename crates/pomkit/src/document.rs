//! Strict JSON/YAML document parsing
//!
//! `serde_json::Value` keeps the last value of a repeated mapping key. The
//! registries reject repeated keys when built from pairs, so documents are
//! read through `Document`, which remembers the first repeat and lets the
//! caller fail with `InvalidArgument` instead.

use crate::result::{PomError, PomResult};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Value};
use std::fmt;

/// Parsed value plus the dotted path of the first repeated key, if any.
struct Document {
    value: Value,
    duplicate: Option<String>,
}

impl Document {
    const fn plain(value: Value) -> Self {
        Self {
            value,
            duplicate: None,
        }
    }

    fn into_value(self) -> PomResult<Value> {
        match self.duplicate {
            Some(path) => Err(PomError::invalid_argument(format!("duplicate key {path}"))),
            None => Ok(self.value),
        }
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = Document;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a JSON-compatible value")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(Document::plain(Value::Bool(v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Document::plain(Value::from(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Document::plain(Value::from(v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(Document::plain(Value::from(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(Document::plain(Value::String(v.to_string())))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(Document::plain(Value::String(v)))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(Document::plain(Value::Null))
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(Document::plain(Value::Null))
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Document::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::new();
                let mut duplicate = None;
                while let Some(item) = seq.next_element::<Document>()? {
                    if duplicate.is_none() {
                        duplicate = item
                            .duplicate
                            .map(|inner| format!("{}.{inner}", items.len()));
                    }
                    items.push(item.value);
                }
                Ok(Document {
                    value: Value::Array(items),
                    duplicate,
                })
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = Map::new();
                let mut duplicate = None;
                while let Some(key) = access.next_key::<String>()? {
                    let child = access.next_value::<Document>()?;
                    if duplicate.is_none() {
                        duplicate = if map.contains_key(&key) {
                            Some(key.clone())
                        } else {
                            child.duplicate.map(|inner| format!("{key}.{inner}"))
                        };
                    }
                    let _ = map.insert(key, child.value);
                }
                Ok(Document {
                    value: Value::Object(map),
                    duplicate,
                })
            }
        }

        deserializer.deserialize_any(DocumentVisitor)
    }
}

/// Parse JSON text, rejecting repeated mapping keys at any depth.
pub(crate) fn parse_json(json: &str) -> PomResult<Value> {
    serde_json::from_str::<Document>(json)?.into_value()
}

/// Parse YAML text, rejecting repeated mapping keys at any depth.
pub(crate) fn parse_yaml(yaml: &str) -> PomResult<Value> {
    serde_yaml_ng::from_str::<Document>(yaml)?.into_value()
}
