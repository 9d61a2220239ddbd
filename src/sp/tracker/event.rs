// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

use serde_json::Value;

pub const UNSTRUCT_EVENT_SCHEMA: &str =
    "iglu:com.snowplowanalytics.snowplow/unstruct_event/jsonschema/1-0-0";
pub const CONTEXTS_SCHEMA: &str = "iglu:com.snowplowanalytics.snowplow/contexts/jsonschema/1-0-1";
pub const PAYLOAD_DATA_SCHEMA: &str =
    "iglu:com.snowplowanalytics.snowplow/payload_data/jsonschema/1-0-4";

/// A JSON document paired with the Iglu schema it validates against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfDescribingJson {
    schema: String,
    data: Value,
}

impl SelfDescribingJson {
    pub fn new<S: Into<String>>(schema: S, data: Value) -> Self {
        Self {
            schema: schema.into(),
            data,
        }
    }

    pub fn schema(&self) -> &String {
        &self.schema
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn to_json(&self) -> Value {
        json!({ "schema": self.schema, "data": self.data })
    }
}
