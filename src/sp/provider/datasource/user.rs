// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

use serde_json::Value;

use sp::api::Console;
use sp::model::UserId;
use sp::provider::diagnostics::Diagnostics;
use sp::provider::schema::{list, object, Attribute, AttributeType, Schema};

use super::{fetch, required_string, to_state, ConsoleDataSource};

/// Attributes of a console user, shared with `snowplow_users`.
pub(super) fn user_attributes() -> Vec<(&'static str, AttributeType)> {
    let filter = object(vec![
        ("attribute", AttributeType::String),
        ("value", AttributeType::String),
    ]);
    let capability = object(vec![
        ("resource_type", AttributeType::String),
        ("action", AttributeType::String),
        ("filters", list(filter)),
    ]);
    let permission = object(vec![
        ("organization_id", AttributeType::String),
        ("capabilities", list(capability)),
    ]);

    vec![
        ("id", AttributeType::String),
        ("email", AttributeType::String),
        ("organization_id", AttributeType::String),
        ("first_name", AttributeType::String),
        ("last_name", AttributeType::String),
        ("job_title", AttributeType::String),
        ("last_login", AttributeType::String),
        ("permissions", list(permission)),
    ]
}

lazy_static! {
    static ref USER_SCHEMA: Schema = user_attributes()
        .into_iter()
        .fold(Schema::new(), |schema, (name, t)| {
            let attribute = if name == "id" {
                Attribute::required(t)
            } else {
                Attribute::computed(t)
            };
            schema.with_attribute(name, attribute)
        })
        .with_description("A user of the console organization, looked up by id");
}

fn populate(console: &Console, config: &Value) -> Result<Value, Diagnostics> {
    let id = required_string(config, "id")?;
    let user = fetch("error fetching user", console.get_user(UserId::new(id)))?;
    to_state(&user)
}

/// `snowplow_user`
pub fn user_data_source() -> ConsoleDataSource {
    ConsoleDataSource::new("snowplow_user", &USER_SCHEMA, populate)
}
