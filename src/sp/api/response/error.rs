// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

/// The body the console returns alongside a non-200 status.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    #[serde(default)]
    message: String,
    trace_id: Option<String>,
}

impl ErrorEnvelope {
    pub fn message(&self) -> &String {
        &self.message
    }

    pub fn trace_id(&self) -> Option<&String> {
        self.trace_id.as_ref()
    }

    pub fn take(self) -> (String, Option<String>) {
        (self.message, self.trace_id)
    }
}
