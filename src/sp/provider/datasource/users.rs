// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

use serde_json::Value;

use sp::api::Console;
use sp::provider::diagnostics::Diagnostics;
use sp::provider::schema::{list, object, Attribute, Schema};

use super::user::user_attributes;
use super::{fetch, to_state, ConsoleDataSource};

lazy_static! {
    static ref USERS_SCHEMA: Schema = Schema::new()
        .with_description("All users of the console organization")
        .with_attribute("users", Attribute::computed(list(object(user_attributes()))));
}

fn populate(console: &Console, _config: &Value) -> Result<Value, Diagnostics> {
    let users = fetch("error fetching users", console.get_users())?;
    Ok(json!({ "users": to_state(&users)? }))
}

/// `snowplow_users`
pub fn users_data_source() -> ConsoleDataSource {
    ConsoleDataSource::new("snowplow_users", &USERS_SCHEMA, populate)
}
