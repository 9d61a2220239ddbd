// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

//! `snowplow_track_self_describing_event`: emits a self-describing event to a
//! collector whenever the resource is created, updated or deleted.

use hyper::StatusCode;

use serde_json::{self, Value};

use sp::provider::config::{ProviderSettings, TrackerOverrides, TrackerSettings};
use sp::provider::diagnostics::Diagnostics;
use sp::provider::schema::{list, object, Attribute, AttributeType, Schema};
use sp::provider::ProviderData;
use sp::tracker::SelfDescribingJson;
use sp::util::futures::block_on;

use super::Resource;

const EVENT_FAILED: &str = "Event failed to send, check your collector endpoint and try again";

lazy_static! {
    static ref TRACK_EVENT_SCHEMA: Schema = {
        let event = || {
            object(vec![
                ("schema", AttributeType::String),
                ("payload", AttributeType::String),
            ])
        };
        Schema::new()
            .with_description("Emits a self-describing event on create, update and delete")
            .with_attribute(
                "create_event",
                Attribute::optional(event()).with_description("Event to track on create"),
            )
            .with_attribute(
                "update_event",
                Attribute::optional(event()).with_description("Event to track on update"),
            )
            .with_attribute(
                "delete_event",
                Attribute::optional(event()).with_description("Event to track on delete"),
            )
            .with_attribute(
                "contexts",
                Attribute::optional(list(event()))
                    .with_description("Contexts attached to every tracked event"),
            )
            .with_attribute(
                "collector_uri",
                Attribute::optional_string().with_description("URI of your Snowplow Collector"),
            )
            .with_attribute(
                "tracker_app_id",
                Attribute::optional_string().with_description("Optional application ID"),
            )
            .with_attribute(
                "tracker_namespace",
                Attribute::optional_string().with_description("Optional namespace"),
            )
            .with_attribute(
                "tracker_platform",
                Attribute::optional_string().with_description("Optional platform"),
            )
            .with_attribute(
                "emitter_request_type",
                Attribute::optional_string()
                    .with_description("Whether to use GET or POST requests to emit events"),
            )
            .with_attribute(
                "emitter_protocol",
                Attribute::optional_string()
                    .with_description("Whether to use HTTP or HTTPS to send events"),
            )
    };
}

/// A `{schema, payload}` pair; `payload` holds the event data as a JSON string.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct EventSpec {
    pub schema: String,
    pub payload: String,
}

impl EventSpec {
    fn to_self_describing(&self) -> Result<SelfDescribingJson, Diagnostics> {
        let data = serde_json::from_str::<Value>(&self.payload).map_err(|e| {
            Diagnostics::error(
                "invalid event payload",
                format!("payload of {} is not valid json: {}", self.schema, e),
            )
        })?;
        Ok(SelfDescribingJson::new(self.schema.as_str(), data))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TrackEventConfig {
    create_event: Option<EventSpec>,
    update_event: Option<EventSpec>,
    delete_event: Option<EventSpec>,
    contexts: Option<Vec<EventSpec>>,
    #[serde(flatten)]
    tracker: TrackerOverrides,
}

impl TrackEventConfig {
    fn parse(state: &Value) -> Result<Self, Diagnostics> {
        if state.is_null() {
            return Ok(Default::default());
        }
        serde_json::from_value(state.clone()).map_err(|e| {
            Diagnostics::error("invalid snowplow_track_self_describing_event", e.to_string())
        })
    }
}

pub struct TrackSelfDescribingEventResource {
    settings: Option<ProviderSettings>,
}

impl TrackSelfDescribingEventResource {
    pub fn new() -> Self {
        Self { settings: None }
    }

    fn track(&self, event: Option<&EventSpec>, config: &TrackEventConfig) -> Result<(), Diagnostics> {
        let event = match event {
            Some(event) => event.to_self_describing()?,
            None => return Ok(()),
        };
        let contexts = config
            .contexts
            .iter()
            .flatten()
            .map(EventSpec::to_self_describing)
            .collect::<Result<Vec<_>, _>>()?;

        let settings = self.settings.as_ref().ok_or_else(|| {
            Diagnostics::error(
                "provider not configured",
                "configure the snowplow provider before managing resources",
            )
        })?;
        let tracker = TrackerSettings::merge(settings, &config.tracker)
            .and_then(|merged| merged.tracker())
            .map_err(|err| Diagnostics::from_error("error initializing tracker", &err))?;

        let status = block_on(tracker.track_self_describing_event(&event, &contexts))
            .map_err(|err| Diagnostics::from_error(EVENT_FAILED, &err))?;

        if status != StatusCode::OK {
            return Err(Diagnostics::error(
                EVENT_FAILED,
                format!("collector responded with {}", status),
            ));
        }
        info!(schema = event.schema().as_str(), "tracked self-describing event");
        Ok(())
    }
}

impl Default for TrackSelfDescribingEventResource {
    fn default() -> Self {
        Self::new()
    }
}

impl Resource for TrackSelfDescribingEventResource {
    fn type_name(&self) -> &str {
        "snowplow_track_self_describing_event"
    }

    fn schema(&self) -> &Schema {
        &TRACK_EVENT_SCHEMA
    }

    fn configure(&mut self, data: &ProviderData) {
        self.settings = Some(data.settings().clone());
    }

    fn create(&self, planned: &Value) -> Result<Value, Diagnostics> {
        let config = TrackEventConfig::parse(planned)?;
        self.track(config.create_event.as_ref(), &config)?;
        Ok(self.schema().project(planned.clone()))
    }

    fn read(&self, prior: &Value) -> Result<Value, Diagnostics> {
        Ok(prior.clone())
    }

    fn update(&self, _prior: &Value, planned: &Value) -> Result<Value, Diagnostics> {
        let config = TrackEventConfig::parse(planned)?;
        self.track(config.update_event.as_ref(), &config)?;
        Ok(self.schema().project(planned.clone()))
    }

    fn delete(&self, prior: &Value) -> Result<(), Diagnostics> {
        let config = TrackEventConfig::parse(prior)?;
        self.track(config.delete_event.as_ref(), &config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use base64::engine::general_purpose::URL_SAFE;
    use base64::Engine;

    use sp::provider::config::ProviderConfig;
    use sp::util::mock::MockServer;

    const TP2: &str = "/com.snowplowanalytics.snowplow/tp2";

    fn resource(collector_uri: &str) -> TrackSelfDescribingEventResource {
        let config = ProviderConfig {
            collector_uri: Some(collector_uri.to_string()),
            emitter_protocol: Some("HTTP".to_string()),
            tracker_app_id: Some("terraform".to_string()),
            ..Default::default()
        };
        let settings = ProviderSettings::resolve(&config, |_| None);
        let mut resource = TrackSelfDescribingEventResource::new();
        resource.configure(&ProviderData::new(settings, None));
        resource
    }

    fn event(action: &str) -> Value {
        json!({
            "schema": "iglu:com.acme/module_action/jsonschema/1-0-0",
            "payload": format!(r#"{{"action": "{}"}}"#, action),
        })
    }

    fn sent_events(server: &MockServer) -> Vec<Value> {
        server
            .requests_to(TP2)
            .iter()
            .map(|r| {
                let body: Value = serde_json::from_str(&r.body).unwrap();
                let encoded = body["data"][0]["ue_px"].as_str().unwrap().to_string();
                let unstruct: Value =
                    serde_json::from_slice(&URL_SAFE.decode(encoded).unwrap()).unwrap();
                unstruct["data"].clone()
            })
            .collect()
    }

    #[test]
    fn lifecycle_tracks_matching_events() {
        let server = MockServer::start();
        server.respond(TP2, 200, "");
        let resource = resource(&server.host());

        let planned = json!({
            "create_event": event("create"),
            "update_event": event("update"),
            "delete_event": event("delete"),
        });

        let state = resource.create(&planned).unwrap();
        assert_eq!(state["create_event"], event("create"));
        assert_eq!(state["collector_uri"], json!(null));
        assert_eq!(resource.read(&state).unwrap(), state);

        resource.update(&state, &state).unwrap();
        resource.delete(&state).unwrap();

        let actions = sent_events(&server)
            .iter()
            .map(|e| e["data"]["action"].as_str().unwrap().to_string())
            .collect::<Vec<_>>();
        assert_eq!(actions, vec!["create", "update", "delete"]);
    }

    #[test]
    fn unset_event_sends_nothing() {
        let server = MockServer::start();
        let resource = resource(&server.host());

        resource.create(&json!({"update_event": event("update")})).unwrap();
        assert!(server.requests().is_empty());
    }

    #[test]
    fn contexts_and_resource_overrides_are_applied() {
        let server = MockServer::start();
        server.respond("/i", 200, "");
        let resource = resource("unused.acme.com");

        let planned = json!({
            "create_event": event("create"),
            "contexts": [{"schema": "iglu:com.acme/env/jsonschema/1-0-0", "payload": "{\"stage\": \"prod\"}"}],
            "collector_uri": server.host(),
            "emitter_request_type": "get",
            "tracker_app_id": "",
        });
        resource.create(&planned).unwrap();

        let request = &server.requests_to("/i")[0];
        let query = request.query.clone().unwrap();
        let keys = query
            .split('&')
            .filter_map(|pair| pair.split('=').next())
            .collect::<Vec<_>>();
        assert!(keys.contains(&"cx"));
        assert!(!keys.contains(&"tna"));
        assert!(!keys.contains(&"aid"));
    }

    #[test]
    fn collector_errors_fail_the_operation() {
        let server = MockServer::start();
        server.respond(TP2, 500, "");
        let resource = resource(&server.host());

        let diags = resource
            .create(&json!({"create_event": event("create")}))
            .unwrap_err();
        assert_eq!(diags.iter().next().unwrap().summary(), EVENT_FAILED);
    }

    #[test]
    fn invalid_payload_sends_nothing() {
        let server = MockServer::start();
        let resource = resource(&server.host());

        let planned = json!({
            "create_event": {"schema": "iglu:com.acme/x/jsonschema/1-0-0", "payload": "{not json"},
        });
        let diags = resource.create(&planned).unwrap_err();
        assert_eq!(diags.iter().next().unwrap().summary(), "invalid event payload");
        assert!(server.requests().is_empty());
    }

    #[test]
    fn missing_collector_is_reported() {
        let resource = resource("");
        let diags = resource
            .create(&json!({"create_event": event("create")}))
            .unwrap_err();
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.summary(), "error initializing tracker");
        assert!(diag.detail().contains("'collector_uri'"));
    }
}
