// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

use sp::model::null_as_default;

/// An identifier for a pipeline in the Snowplow console.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PipelineId(String);

impl PipelineId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        PipelineId(id.into())
    }

    /// Unwraps the value.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for PipelineId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PipelineId> for String {
    fn from(id: PipelineId) -> Self {
        id.0
    }
}

impl From<String> for PipelineId {
    fn from(id: String) -> Self {
        PipelineId::new(id)
    }
}

impl<'a> From<&'a str> for PipelineId {
    fn from(id: &'a str) -> Self {
        PipelineId::new(id)
    }
}

/// A data pipeline.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct Pipeline {
    id: PipelineId,
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    cloud_provider: String,
    collector_endpoints: Option<Vec<String>>,
}

impl Pipeline {
    pub fn id(&self) -> &PipelineId {
        &self.id
    }

    pub fn name(&self) -> &String {
        &self.name
    }

    pub fn cloud_provider(&self) -> &String {
        &self.cloud_provider
    }

    pub fn collector_endpoints(&self) -> Option<&Vec<String>> {
        self.collector_endpoints.as_ref()
    }
}
