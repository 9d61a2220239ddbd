// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

//! Library configuration options and environment definitions.

use url::Url;

use sp;
use sp::error::ErrorKind;

/// Console API host used when none is configured.
pub const DEFAULT_CONSOLE_HOST: &str = "console.snowplowanalytics.com";

/// Console API host of the staging console.
pub const NEXT_CONSOLE_HOST: &str = "next.console.snowplowanalytics.com";

/// Path prefix of every console API route.
pub const API_PREFIX: &str = "/api/msc/v1";

/// Defines the console environment the library is interacting with.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Environment {
    Production,
    Next,
    /// Any other console host, reached over https.
    Custom(String),
    /// A local console double reached over plain http, e.g. `127.0.0.1:8080`.
    Local(String),
}

impl Environment {
    /// Picks the environment matching a configured `console_api_endpoint`.
    ///
    /// Endpoints are bare hosts; an explicit `http://` prefix selects a local
    /// plain-http console and an `https://` prefix is ignored.
    pub fn from_host<S: Into<String>>(host: S) -> Self {
        let host = host.into();
        if let Some(local) = host.strip_prefix("http://") {
            return Environment::Local(local.trim_end_matches('/').to_string());
        }
        let host = host
            .trim_start_matches("https://")
            .trim_end_matches('/')
            .to_string();
        match host.as_str() {
            DEFAULT_CONSOLE_HOST => Environment::Production,
            NEXT_CONSOLE_HOST => Environment::Next,
            _ => Environment::Custom(host),
        }
    }

    pub fn host(&self) -> &str {
        use self::Environment::*;
        match *self {
            Production => DEFAULT_CONSOLE_HOST,
            Next => NEXT_CONSOLE_HOST,
            Custom(ref host) | Local(ref host) => host.as_str(),
        }
    }

    pub fn scheme(&self) -> &'static str {
        match *self {
            Environment::Local(_) => "http",
            _ => "https",
        }
    }

    /// The console API base url, `<scheme>://<host>/api/msc/v1`.
    pub fn url(&self) -> sp::Result<Url> {
        let raw = format!("{}://{}{}", self.scheme(), self.host(), API_PREFIX);
        Url::parse(&raw).map_err(|e| {
            ErrorKind::ConfigurationError(format!("invalid console endpoint {:?}: {}", raw, e)).into()
        })
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Production
    }
}

/// Configuration options for the console client.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Config {
    env: Environment,
    version: String,
}

impl Config {
    pub fn new<S: Into<String>>(env: Environment, version: S) -> Self {
        Self {
            env,
            version: version.into(),
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// The provider version tag sent with every console request.
    pub fn version(&self) -> &str {
        self.version.as_str()
    }

    pub fn api_url(&self) -> sp::Result<Url> {
        self.env.url()
    }
}
