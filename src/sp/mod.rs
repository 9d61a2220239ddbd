// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

//! Snowplow provider top-level definitions go in this module.

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod tracker;
pub mod types;
pub mod util;

// Re-export
pub use sp::api::Console;
pub use sp::config::{Config, Environment};
pub use sp::error::Error;
pub use sp::types::{Future, Result};
