// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

//! Read-only data sources backed by the console API.

mod organization;
mod pipeline;
mod pipelines;
mod user;
mod users;

pub use self::organization::{organization_data_source, single_organization};
pub use self::pipeline::pipeline_data_source;
pub use self::pipelines::pipelines_data_source;
pub use self::user::user_data_source;
pub use self::users::users_data_source;

use serde::Serialize;
use serde_json::{self, Value};

use sp;
use sp::api::Console;
use sp::provider::diagnostics::Diagnostics;
use sp::provider::schema::Schema;
use sp::provider::ProviderData;

pub trait DataSource {
    /// The full type name, e.g. `snowplow_pipelines`.
    fn type_name(&self) -> &str;

    fn schema(&self) -> &Schema;

    /// Receives the configured provider. Called before any `read`.
    fn configure(&mut self, data: &ProviderData);

    /// Produces the data source state from its configuration.
    fn read(&self, config: &Value) -> Result<Value, Diagnostics>;
}

type Populator = fn(&Console, &Value) -> Result<Value, Diagnostics>;

/// A data source that reads from the console through a populator function.
pub struct ConsoleDataSource {
    name: String,
    schema: &'static Schema,
    console: Option<Console>,
    populator: Populator,
}

impl ConsoleDataSource {
    pub fn new<S: Into<String>>(name: S, schema: &'static Schema, populator: Populator) -> Self {
        Self {
            name: name.into(),
            schema,
            console: None,
            populator,
        }
    }
}

impl DataSource for ConsoleDataSource {
    fn type_name(&self) -> &str {
        self.name.as_str()
    }

    fn schema(&self) -> &Schema {
        self.schema
    }

    fn configure(&mut self, data: &ProviderData) {
        self.console = data.console().cloned();
    }

    fn read(&self, config: &Value) -> Result<Value, Diagnostics> {
        let console = match self.console {
            Some(ref console) => console,
            None => {
                return Err(Diagnostics::error(
                    "console api client not configured",
                    "set provider console_api_key or use SNOWPLOW_CONSOLE_API_KEY",
                ))
            }
        };

        debug!(data_source = self.name.as_str(), "reading data source");
        let state = (self.populator)(console, config)?;
        Ok(self.schema.project(state))
    }
}

/// Reads a required, non-empty string attribute from a data source config.
fn required_string(config: &Value, name: &str) -> Result<String, Diagnostics> {
    match config.get(name).and_then(Value::as_str) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(Diagnostics::error(
            "missing required attribute",
            format!("the {:?} attribute must be set", name),
        )),
    }
}

/// Blocks on a console call, reporting failures under `summary`.
fn fetch<T: 'static + Send>(summary: &str, f: sp::Future<T>) -> Result<T, Diagnostics> {
    sp::util::futures::block_on(f).map_err(|err| {
        warn!(error = %err, "{}", summary);
        Diagnostics::from_error(summary, &err)
    })
}

fn to_state<T: Serialize>(record: &T) -> Result<Value, Diagnostics> {
    serde_json::to_value(record)
        .map_err(|e| Diagnostics::error("error converting console response", e.to_string()))
}
