// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

use serde_json::Value;

use sp::api::Console;
use sp::model::PipelineId;
use sp::provider::diagnostics::Diagnostics;
use sp::provider::schema::{Attribute, AttributeType, Schema};

use super::{fetch, required_string, to_state, ConsoleDataSource};

lazy_static! {
    static ref PIPELINE_SCHEMA: Schema = Schema::new()
        .with_description("A pipeline of the console organization, looked up by id")
        .with_attribute("id", Attribute::required_string())
        .with_attribute("name", Attribute::computed_string())
        .with_attribute("cloud_provider", Attribute::computed_string())
        .with_attribute(
            "collector_endpoints",
            Attribute::computed_list(AttributeType::String)
        );
}

fn populate(console: &Console, config: &Value) -> Result<Value, Diagnostics> {
    let id = required_string(config, "id")?;
    let pipeline = fetch("error fetching pipeline", console.get_pipeline(PipelineId::new(id)))?;
    to_state(&pipeline)
}

/// `snowplow_pipeline`
pub fn pipeline_data_source() -> ConsoleDataSource {
    ConsoleDataSource::new("snowplow_pipeline", &PIPELINE_SCHEMA, populate)
}
