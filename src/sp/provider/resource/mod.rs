// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

//! Managed resources.

mod track_event;

pub use self::track_event::{EventSpec, TrackSelfDescribingEventResource};

use serde_json::Value;

use sp::provider::diagnostics::Diagnostics;
use sp::provider::schema::Schema;
use sp::provider::ProviderData;

/// The lifecycle of a managed resource. States and configurations are
/// JSON objects keyed by attribute name.
pub trait Resource {
    fn type_name(&self) -> &str;

    fn schema(&self) -> &Schema;

    fn configure(&mut self, data: &ProviderData);

    fn create(&self, planned: &Value) -> Result<Value, Diagnostics>;

    fn read(&self, prior: &Value) -> Result<Value, Diagnostics>;

    fn update(&self, prior: &Value, planned: &Value) -> Result<Value, Diagnostics>;

    fn delete(&self, prior: &Value) -> Result<(), Diagnostics>;
}
