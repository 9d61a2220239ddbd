// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

//! The `snowplow` provider: configuration, data sources and resources.

pub mod config;
pub mod datasource;
pub mod diagnostics;
pub mod resource;
pub mod schema;

use serde_json::{self, Value};

use sp::api::Console;
use sp::util::futures::block_on;

use self::config::{process_env, ProviderConfig, ProviderSettings};
use self::datasource::DataSource;
use self::diagnostics::Diagnostics;
use self::resource::{Resource, TrackSelfDescribingEventResource};
use self::schema::{Attribute, Schema};

pub const PROVIDER_TYPE_NAME: &str = "snowplow";

lazy_static! {
    static ref PROVIDER_SCHEMA: Schema = Schema::new()
        .with_description("Terraform provider for emitting Snowplow events")
        .with_attribute(
            "collector_uri",
            Attribute::optional_string().with_description("URI of your Snowplow Collector")
        )
        .with_attribute(
            "tracker_app_id",
            Attribute::optional_string().with_description("Optional application ID")
        )
        .with_attribute(
            "tracker_namespace",
            Attribute::optional_string().with_description("Optional namespace")
        )
        .with_attribute(
            "tracker_platform",
            Attribute::optional_string().with_description("Optional platform")
        )
        .with_attribute(
            "emitter_request_type",
            Attribute::optional_string()
                .with_description("Whether to use GET or POST requests to emit events")
        )
        .with_attribute(
            "emitter_protocol",
            Attribute::optional_string()
                .with_description("Whether to use HTTP or HTTPS to send events")
        )
        .with_attribute(
            "console_api_endpoint",
            Attribute::optional_string().with_description(
                "API endpoint hostname to use when interacting with the Console API"
            )
        )
        .with_attribute(
            "console_api_key_id",
            Attribute::optional_string()
                .with_description("Auth API v3 API Key ID to access the Console API with")
        )
        .with_attribute(
            "console_api_key",
            Attribute::optional_string()
                .sensitive()
                .with_description("Auth API v2/v3 API Key to access the Console API with")
        )
        .with_attribute(
            "console_organization_id",
            Attribute::optional_string()
                .with_description("Organization ID associated with the console_api_key credentials")
        );
}

/// Provider name and version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub type_name: String,
    pub version: String,
}

/// What a configured provider hands to its data sources and resources.
#[derive(Clone, Debug)]
pub struct ProviderData {
    settings: ProviderSettings,
    console: Option<Console>,
}

impl ProviderData {
    pub fn new(settings: ProviderSettings, console: Option<Console>) -> Self {
        Self { settings, console }
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// The authenticated console client, when console credentials were given.
    pub fn console(&self) -> Option<&Console> {
        self.console.as_ref()
    }
}

pub struct SnowplowProvider {
    version: String,
}

impl SnowplowProvider {
    /// `version` is the release version, `dev` for local builds or `test`.
    pub fn new<S: Into<String>>(version: S) -> Self {
        Self {
            version: version.into(),
        }
    }

    pub fn metadata(&self) -> Metadata {
        Metadata {
            type_name: PROVIDER_TYPE_NAME.to_string(),
            version: self.version.clone(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &PROVIDER_SCHEMA
    }

    /// Configures the provider, falling back to the process environment for
    /// console credentials.
    pub fn configure(&self, config: &Value) -> Result<ProviderData, Diagnostics> {
        self.configure_with_env(config, process_env)
    }

    /// Configures the provider with an explicit environment lookup.
    ///
    /// A console client is connected only when an api key is available; a
    /// failed authentication fails configuration.
    pub fn configure_with_env<F>(&self, config: &Value, env: F) -> Result<ProviderData, Diagnostics>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = if config.is_null() {
            ProviderConfig::default()
        } else {
            serde_json::from_value::<ProviderConfig>(config.clone()).map_err(|e| {
                Diagnostics::error("invalid snowplow provider configuration", e.to_string())
            })?
        };
        let settings = ProviderSettings::resolve(&config, env);

        let console = if settings.has_console_api_key() {
            let console = block_on(Console::connect(
                settings.console_config(self.version.as_str()),
                settings.credentials(),
            ))
            .map_err(|err| {
                error!(error = %err, "console authentication failed");
                Diagnostics::from_error("error authenticating with snowplow console api", &err)
            })?;
            Some(console)
        } else {
            debug!("no console api key configured, console data sources are unavailable");
            None
        };

        info!(
            version = self.version.as_str(),
            console = console.is_some(),
            "configured snowplow provider"
        );
        Ok(ProviderData::new(settings, console))
    }

    pub fn data_sources(&self) -> Vec<Box<dyn DataSource>> {
        vec![
            Box::new(datasource::organization_data_source()),
            Box::new(datasource::user_data_source()),
            Box::new(datasource::users_data_source()),
            Box::new(datasource::pipeline_data_source()),
            Box::new(datasource::pipelines_data_source()),
        ]
    }

    pub fn resources(&self) -> Vec<Box<dyn Resource>> {
        vec![Box::new(TrackSelfDescribingEventResource::new())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use sp::util::mock::MockServer;

    const TOKEN_V3: &str = "/api/msc/v1/organizations/o1/credentials/v3/token";

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn metadata_and_registrations() {
        let provider = SnowplowProvider::new("1.2.0");
        assert_eq!(provider.metadata().type_name, "snowplow");
        assert_eq!(provider.metadata().version, "1.2.0");
        assert!(provider
            .schema()
            .attribute("console_api_key")
            .unwrap()
            .is_sensitive());

        let names = provider
            .data_sources()
            .iter()
            .map(|d| d.type_name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "snowplow_organization",
                "snowplow_user",
                "snowplow_users",
                "snowplow_pipeline",
                "snowplow_pipelines",
            ]
        );
        assert_eq!(
            provider.resources()[0].type_name(),
            "snowplow_track_self_describing_event"
        );
    }

    #[test]
    fn configuration_without_key_skips_the_console() {
        let provider = SnowplowProvider::new("test");
        let data = provider
            .configure_with_env(&json!({"collector_uri": "c.acme.com"}), no_env)
            .unwrap();

        assert!(data.console().is_none());
        assert_eq!(data.settings().collector_uri(), "c.acme.com");
        assert_eq!(data.settings().emitter_request_type(), "POST");
    }

    #[test]
    fn configuration_connects_the_console() {
        let server = MockServer::start();
        server.respond(TOKEN_V3, 200, r#"{"accessToken": "tok"}"#);

        let provider = SnowplowProvider::new("1.2.0");
        let endpoint = format!("http://{}", server.host());
        let env = |name: &str| match name {
            "SNOWPLOW_CONSOLE_API_KEY" => Some("secret".to_string()),
            "SNOWPLOW_CONSOLE_API_KEY_ID" => Some("key-id".to_string()),
            _ => None,
        };
        let data = provider
            .configure_with_env(
                &json!({"console_api_endpoint": endpoint, "console_organization_id": "o1"}),
                env,
            )
            .unwrap();

        assert!(data.console().is_some());
        let debug = format!("{:?}", data);
        assert!(debug.contains("organization_id: Some(OrganizationId(\"o1\"))"));
        assert!(!debug.contains("secret"));
        assert!(!debug.contains("tok\""));
        let token_call = &server.requests_to(TOKEN_V3)[0];
        assert_eq!(token_call.header("X-API-KEY"), Some("secret"));
        assert_eq!(token_call.header("X-SNOWPLOW-TERRAFORM"), Some("1.2.0"));
    }

    #[test]
    fn failed_authentication_fails_configuration() {
        let server = MockServer::start();
        server.respond(TOKEN_V3, 401, r#"{"message": "invalid key"}"#);

        let provider = SnowplowProvider::new("test");
        let config = json!({
            "console_api_endpoint": format!("http://{}", server.host()),
            "console_api_key_id": "key-id",
            "console_api_key": "wrong",
            "console_organization_id": "o1",
        });
        let diags = provider.configure_with_env(&config, no_env).unwrap_err();
        let diag = diags.iter().next().unwrap();

        assert_eq!(diag.summary(), "error authenticating with snowplow console api");
        assert!(diag.detail().contains("invalid key"));
    }

    #[test]
    fn unknown_attributes_are_rejected() {
        let provider = SnowplowProvider::new("test");
        let diags = provider
            .configure_with_env(&json!({"api_key": "x"}), no_env)
            .unwrap_err();
        assert!(diags.has_error());
    }
}
