// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

use serde_json::Value;

use sp::api::Console;
use sp::provider::diagnostics::Diagnostics;
use sp::provider::schema::{list, object, Attribute, AttributeType, Schema};

use super::{fetch, to_state, ConsoleDataSource};

lazy_static! {
    static ref PIPELINES_SCHEMA: Schema = Schema::new()
        .with_description("All pipelines of the console organization")
        .with_attribute(
            "pipelines",
            Attribute::computed(list(object(vec![
                ("id", AttributeType::String),
                ("name", AttributeType::String),
                ("cloud_provider", AttributeType::String),
                ("collector_endpoints", list(AttributeType::String)),
            ])))
        );
}

fn populate(console: &Console, _config: &Value) -> Result<Value, Diagnostics> {
    let pipelines = fetch("error fetching pipelines", console.get_pipelines())?;
    Ok(json!({ "pipelines": to_state(&pipelines)? }))
}

/// `snowplow_pipelines`
pub fn pipelines_data_source() -> ConsoleDataSource {
    ConsoleDataSource::new("snowplow_pipelines", &PIPELINES_SCHEMA, populate)
}
