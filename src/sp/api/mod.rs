// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

//! The Snowplow console API.

mod client;
pub mod response;

// Re-export:
pub use self::client::Console;
