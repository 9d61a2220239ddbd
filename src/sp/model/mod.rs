// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

/// Top-level model definitions and re-exports go here.

pub mod account;
pub mod organization;
pub mod pipeline;
pub mod user;

use serde::{Deserialize, Deserializer};

// Re-export
pub use self::account::{AccessToken, ApiKey, ApiKeyId, Credentials};
pub use self::organization::{
    CloudAccount, CloudSettings, Organization, OrganizationId, Package, Source, SourceMetadata,
};
pub use self::pipeline::{Pipeline, PipelineId};
pub use self::user::{Capability, Filter, Permission, User, UserId};

/// Decodes an explicit `null` as the field's zero value. Paired with
/// `#[serde(default)]` so that absent and `null` fields decode the same way.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
