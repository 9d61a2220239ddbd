// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

extern crate base64;
extern crate chrono;
#[macro_use]
extern crate error_chain;
extern crate futures;
extern crate hyper;
extern crate hyper_tls;
#[macro_use]
extern crate lazy_static;
extern crate serde;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate serde_json;
extern crate tokio;
#[macro_use]
extern crate tracing;
extern crate url;
extern crate uuid;

mod sp;

// Publicly re-export:
pub use sp::{api, error, model, provider, tracker};
pub use sp::api::Console;
pub use sp::config::{Config, Environment};
pub use sp::types::{Future, Result};
pub use sp::util::futures::block_on;
