// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

//! A Snowplow tracker for self-describing events.

pub mod emitter;
pub mod event;
pub mod payload;

pub use self::emitter::{Emitter, Protocol, RequestType};
pub use self::event::SelfDescribingJson;
pub use self::payload::Payload;

use chrono::Utc;

use hyper;

use serde_json::Value;

use uuid::Uuid;

use sp;

use self::event::{CONTEXTS_SCHEMA, UNSTRUCT_EVENT_SCHEMA};

/// Reported in the `tv` field of every event.
pub const TRACKER_VERSION: &str = concat!("rust-", env!("CARGO_PKG_VERSION"));

/// Builds tracker protocol payloads and hands them to an `Emitter`.
#[derive(Clone)]
pub struct Tracker {
    emitter: Emitter,
    namespace: String,
    app_id: String,
    platform: String,
    base64: bool,
}

impl Tracker {
    pub fn new<S: Into<String>>(emitter: Emitter, namespace: S, app_id: S, platform: S) -> Self {
        Self {
            emitter,
            namespace: namespace.into(),
            app_id: app_id.into(),
            platform: platform.into(),
            base64: true,
        }
    }

    /// Whether self-describing JSON is base64 encoded (the default).
    pub fn with_base64(mut self, base64: bool) -> Self {
        self.base64 = base64;
        self
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    /// The payload of a self-describing (`ue`) event, without the sent
    /// timestamp the emitter adds.
    pub fn self_describing_payload(
        &self,
        event: &SelfDescribingJson,
        contexts: &[SelfDescribingJson],
    ) -> Payload {
        let mut payload = Payload::new();
        payload.add("e", "ue");
        payload.add("eid", Uuid::new_v4().to_string());
        payload.add("dtm", Utc::now().timestamp_millis().to_string());
        payload.add("tv", TRACKER_VERSION);
        payload.add("p", self.platform.as_str());
        payload.add("aid", self.app_id.as_str());
        payload.add("tna", self.namespace.as_str());

        let unstruct = SelfDescribingJson::new(UNSTRUCT_EVENT_SCHEMA, event.to_json());
        payload.add_json(&unstruct.to_json(), self.base64, "ue_px", "ue_pr");

        if !contexts.is_empty() {
            let data = contexts.iter().map(SelfDescribingJson::to_json).collect();
            let wrapped = SelfDescribingJson::new(CONTEXTS_SCHEMA, Value::Array(data));
            payload.add_json(&wrapped.to_json(), self.base64, "cx", "co");
        }

        payload
    }

    /// Tracks one self-describing event; resolves to the collector's status.
    pub fn track_self_describing_event(
        &self,
        event: &SelfDescribingJson,
        contexts: &[SelfDescribingJson],
    ) -> sp::Future<hyper::StatusCode> {
        let payload = self.self_describing_payload(event, contexts);
        debug!(
            schema = event.schema().as_str(),
            contexts = contexts.len(),
            "tracking self-describing event"
        );
        self.emitter.send(payload)
    }
}
