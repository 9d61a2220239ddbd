// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

use std::collections::BTreeMap;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;

use serde_json::{self, Value};

use url::form_urlencoded;

/// The flat key/value pairs of one tracker protocol event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Payload {
    pairs: BTreeMap<String, String>,
}

impl Payload {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a pair. Empty keys and values are dropped.
    pub fn add<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let (key, value) = (key.into(), value.into());
        if !key.is_empty() && !value.is_empty() {
            self.pairs.insert(key, value);
        }
    }

    /// Adds a JSON value, either URL-safe base64 encoded under `key_encoded`
    /// or verbatim under `key_unencoded`.
    pub fn add_json(&mut self, json: &Value, base64: bool, key_encoded: &str, key_unencoded: &str) {
        let serialized = json.to_string();
        if base64 {
            self.add(key_encoded, URL_SAFE.encode(serialized.as_bytes()));
        } else {
            self.add(key_unencoded, serialized);
        }
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.pairs.get(key)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The pairs as an `application/x-www-form-urlencoded` query string.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
