// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

//! Provider configuration: raw inputs, the fallback chain that resolves them
//! and the tracker settings merged from provider and resource inputs.

use std::env;
use std::fmt;

use sp;
use sp::config::{Config, Environment, DEFAULT_CONSOLE_HOST};
use sp::error::ErrorKind;
use sp::model::Credentials;
use sp::tracker::{Emitter, Protocol, RequestType, Tracker};

pub const SNOWPLOW_CONSOLE_API_KEY: &str = "SNOWPLOW_CONSOLE_API_KEY";
pub const SNOWPLOW_CONSOLE_API_KEY_ID: &str = "SNOWPLOW_CONSOLE_API_KEY_ID";
pub const SNOWPLOW_CONSOLE_ORGANIZATION_ID: &str = "SNOWPLOW_CONSOLE_ORGANIZATION_ID";

pub const DEFAULT_REQUEST_TYPE: &str = "POST";
pub const DEFAULT_PROTOCOL: &str = "HTTPS";
pub const DEFAULT_PLATFORM: &str = "srv";

/// Reads a variable from the process environment.
pub fn process_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// The first candidate that is present and non-empty.
pub fn first_non_empty<I, S>(chain: I) -> Option<String>
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    chain
        .into_iter()
        .flatten()
        .find(|v| !v.as_ref().is_empty())
        .map(|v| v.as_ref().to_string())
}

/// The first candidate that is present, even when empty.
pub fn first_set<I, S>(chain: I) -> Option<String>
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    chain
        .into_iter()
        .flatten()
        .next()
        .map(|v| v.as_ref().to_string())
}

/// Provider inputs as configured; `None` when an attribute is unset.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    pub collector_uri: Option<String>,
    pub tracker_app_id: Option<String>,
    pub tracker_namespace: Option<String>,
    pub tracker_platform: Option<String>,
    pub emitter_request_type: Option<String>,
    pub emitter_protocol: Option<String>,
    pub console_api_endpoint: Option<String>,
    pub console_api_key_id: Option<String>,
    pub console_api_key: Option<String>,
    pub console_organization_id: Option<String>,
}

/// Provider inputs after defaults and environment fallbacks are applied.
#[derive(Clone, PartialEq)]
pub struct ProviderSettings {
    collector_uri: String,
    tracker_app_id: String,
    tracker_namespace: String,
    tracker_platform: String,
    emitter_request_type: String,
    emitter_protocol: String,
    console_api_endpoint: String,
    console_api_key_id: String,
    console_api_key: String,
    console_organization_id: String,
}

impl ProviderSettings {
    pub fn resolve<F>(config: &ProviderConfig, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_empty = |v: Option<&String>| v.cloned().unwrap_or_default();
        let with_default = |v: Option<&String>, default: &str| {
            first_non_empty(vec![v.map(String::as_str), Some(default)]).unwrap_or_default()
        };
        let with_env = |v: Option<&String>, name: &str| {
            first_non_empty(vec![v.cloned(), env(name)]).unwrap_or_default()
        };

        Self {
            collector_uri: or_empty(config.collector_uri.as_ref()),
            tracker_app_id: or_empty(config.tracker_app_id.as_ref()),
            tracker_namespace: or_empty(config.tracker_namespace.as_ref()),
            tracker_platform: with_default(config.tracker_platform.as_ref(), DEFAULT_PLATFORM),
            emitter_request_type: with_default(
                config.emitter_request_type.as_ref(),
                DEFAULT_REQUEST_TYPE,
            ),
            emitter_protocol: with_default(config.emitter_protocol.as_ref(), DEFAULT_PROTOCOL),
            console_api_endpoint: with_default(
                config.console_api_endpoint.as_ref(),
                DEFAULT_CONSOLE_HOST,
            ),
            console_api_key_id: with_env(
                config.console_api_key_id.as_ref(),
                SNOWPLOW_CONSOLE_API_KEY_ID,
            ),
            console_api_key: with_env(config.console_api_key.as_ref(), SNOWPLOW_CONSOLE_API_KEY),
            console_organization_id: with_env(
                config.console_organization_id.as_ref(),
                SNOWPLOW_CONSOLE_ORGANIZATION_ID,
            ),
        }
    }

    pub fn collector_uri(&self) -> &str {
        self.collector_uri.as_str()
    }

    pub fn tracker_app_id(&self) -> &str {
        self.tracker_app_id.as_str()
    }

    pub fn tracker_namespace(&self) -> &str {
        self.tracker_namespace.as_str()
    }

    pub fn tracker_platform(&self) -> &str {
        self.tracker_platform.as_str()
    }

    pub fn emitter_request_type(&self) -> &str {
        self.emitter_request_type.as_str()
    }

    pub fn emitter_protocol(&self) -> &str {
        self.emitter_protocol.as_str()
    }

    pub fn console_api_endpoint(&self) -> &str {
        self.console_api_endpoint.as_str()
    }

    /// Whether console credentials were supplied at all.
    pub fn has_console_api_key(&self) -> bool {
        !self.console_api_key.is_empty()
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            Some(self.console_api_key_id.clone()),
            self.console_api_key.clone(),
            Some(self.console_organization_id.clone()),
        )
    }

    pub fn console_config<S: Into<String>>(&self, version: S) -> Config {
        Config::new(Environment::from_host(self.console_api_endpoint.clone()), version)
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("collector_uri", &self.collector_uri)
            .field("tracker_app_id", &self.tracker_app_id)
            .field("tracker_namespace", &self.tracker_namespace)
            .field("tracker_platform", &self.tracker_platform)
            .field("emitter_request_type", &self.emitter_request_type)
            .field("emitter_protocol", &self.emitter_protocol)
            .field("console_api_endpoint", &self.console_api_endpoint)
            .field("console_api_key_id", &self.console_api_key_id)
            .field("console_api_key", &"..")
            .field("console_organization_id", &self.console_organization_id)
            .finish()
    }
}

/// Tracker inputs a resource may set to override the provider's.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerOverrides {
    pub collector_uri: Option<String>,
    pub tracker_app_id: Option<String>,
    pub tracker_namespace: Option<String>,
    pub tracker_platform: Option<String>,
    pub emitter_request_type: Option<String>,
    pub emitter_protocol: Option<String>,
}

/// Everything needed to build a `Tracker`.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackerSettings {
    collector_uri: String,
    request_type: RequestType,
    protocol: Protocol,
    namespace: String,
    app_id: String,
    platform: String,
}

impl TrackerSettings {
    /// Merges resource overrides over provider settings.
    ///
    /// The collector, request type and protocol fall back to the provider
    /// whenever the resource value is empty. Namespace, app id and platform
    /// take the resource value whenever it is set, even to an empty string.
    pub fn merge(provider: &ProviderSettings, resource: &TrackerOverrides) -> sp::Result<Self> {
        let collector_uri = first_non_empty(vec![
            resource.collector_uri.as_ref().map(String::as_str),
            Some(provider.collector_uri()),
        ])
        .unwrap_or_default();

        if collector_uri.is_empty() {
            bail!(ErrorKind::ConfigurationError(
                "URI of the Snowplow Collector is empty - this can be set either at the provider or resource level with the 'collector_uri' input".to_string()
            ));
        }

        let request_type = first_non_empty(vec![
            resource.emitter_request_type.as_ref().map(String::as_str),
            Some(provider.emitter_request_type()),
            Some(DEFAULT_REQUEST_TYPE),
        ])
        .unwrap_or_default();
        let protocol = first_non_empty(vec![
            resource.emitter_protocol.as_ref().map(String::as_str),
            Some(provider.emitter_protocol()),
            Some(DEFAULT_PROTOCOL),
        ])
        .unwrap_or_default();

        let set_or = |v: &Option<String>, fallback: &str| {
            first_set(vec![v.as_ref().map(String::as_str), Some(fallback)]).unwrap_or_default()
        };

        Ok(Self {
            collector_uri,
            request_type: request_type.parse()?,
            protocol: protocol.parse()?,
            namespace: set_or(&resource.tracker_namespace, provider.tracker_namespace()),
            app_id: set_or(&resource.tracker_app_id, provider.tracker_app_id()),
            platform: set_or(&resource.tracker_platform, provider.tracker_platform()),
        })
    }

    pub fn collector_uri(&self) -> &str {
        self.collector_uri.as_str()
    }

    pub fn request_type(&self) -> RequestType {
        self.request_type
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn namespace(&self) -> &str {
        self.namespace.as_str()
    }

    pub fn app_id(&self) -> &str {
        self.app_id.as_str()
    }

    pub fn platform(&self) -> &str {
        self.platform.as_str()
    }

    pub fn tracker(&self) -> sp::Result<Tracker> {
        let emitter = Emitter::new(self.collector_uri.as_str(), self.request_type, self.protocol)?;
        Ok(Tracker::new(
            emitter,
            self.namespace.as_str(),
            self.app_id.as_str(),
            self.platform.as_str(),
        ))
    }
}
