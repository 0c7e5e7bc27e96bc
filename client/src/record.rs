//! Untyped backend records with a normalized identifier.
//!
//! Resources arrive with either `id` or Mongo-style `_id`. Deserializing into a
//! `Record` moves `_id` to `id`, so nothing past this module ever has to check
//! both.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(mut map: Map<String, Value>) -> Self {
        if let Some(raw) = map.remove("_id") {
            let missing = map.get("id").is_none_or(Value::is_null);
            if missing {
                map.insert("id".to_string(), raw);
            }
        }
        Self(map)
    }

    /// Non-object values yield `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::from_map(map)),
            _ => None,
        }
    }

    /// The identifier rendered as a path key.
    pub fn id(&self) -> Option<String> {
        self.0.get("id").and_then(id_string)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// A copy without the given keys.
    pub fn without(&self, keys: &[&str]) -> Record {
        let mut map = self.0.clone();
        for key in keys {
            map.remove(*key);
        }
        Record(map)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Record::from_map(map)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Map::<String, Value>::deserialize(deserializer).map(Record::from_map)
    }
}

/// Stringifies a scalar JSON value the way it appears in a form input.
///
/// `null` becomes empty; arrays and objects keep their JSON text.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Deserializes an identifier that may be a string or a number, under `id` or `_id`.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_string(&value).ok_or_else(|| serde::de::Error::custom("identifier must be a string or number"))
}
