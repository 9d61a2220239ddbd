// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

//! Sends tracker payloads to a Snowplow collector.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;

use futures::*;

use hyper;
use hyper::client::{Client, HttpConnector};
use hyper::header::HeaderValue;
use hyper_tls::HttpsConnector;

use url::Url;

use sp;
use sp::error::ErrorKind;
use sp::tracker::event::PAYLOAD_DATA_SCHEMA;
use sp::tracker::payload::Payload;
use sp::util::futures::into_future_trait;

const GET_PATH: &str = "/i";
const POST_PATH: &str = "/com.snowplowanalytics.snowplow/tp2";
const POST_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// How events reach the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    Get,
    Post,
}

impl FromStr for RequestType {
    type Err = sp::Error;

    fn from_str(s: &str) -> sp::Result<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(RequestType::Get),
            "POST" => Ok(RequestType::Post),
            _ => Err(ErrorKind::ConfigurationError(format!(
                "emitter_request_type must be GET or POST, got {:?}",
                s
            ))
            .into()),
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RequestType::Get => write!(f, "GET"),
            RequestType::Post => write!(f, "POST"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn scheme(&self) -> &'static str {
        match *self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl FromStr for Protocol {
    type Err = sp::Error;

    fn from_str(s: &str) -> sp::Result<Self> {
        match s.to_uppercase().as_str() {
            "HTTP" => Ok(Protocol::Http),
            "HTTPS" => Ok(Protocol::Https),
            _ => Err(ErrorKind::ConfigurationError(format!(
                "emitter_protocol must be HTTP or HTTPS, got {:?}",
                s
            ))
            .into()),
        }
    }
}

/// A collector endpoint plus the transport used to reach it.
#[derive(Clone)]
pub struct Emitter {
    collector_uri: String,
    request_type: RequestType,
    protocol: Protocol,
    http_client: Client<HttpsConnector<HttpConnector>>,
}

impl Emitter {
    pub fn new<S: Into<String>>(
        collector_uri: S,
        request_type: RequestType,
        protocol: Protocol,
    ) -> sp::Result<Self> {
        let collector_uri = collector_uri.into();
        if collector_uri.is_empty() {
            bail!(ErrorKind::ConfigurationError(
                "collector uri required to emit events".to_string()
            ));
        }
        let connector = HttpsConnector::new(4).map_err(|e| {
            ErrorKind::TransportError(format!("couldn't create https connector: {}", e))
        })?;
        Ok(Self {
            collector_uri,
            request_type,
            protocol,
            http_client: Client::builder().keep_alive(false).build(connector),
        })
    }

    pub fn request_type(&self) -> RequestType {
        self.request_type
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// The collector url events are sent to.
    pub fn endpoint(&self) -> sp::Result<Url> {
        let host = self
            .collector_uri
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        let mut url = Url::parse(&format!("{}://{}", self.protocol.scheme(), host)).map_err(|e| {
            ErrorKind::ConfigurationError(format!(
                "invalid collector uri {:?}: {}",
                self.collector_uri, e
            ))
        })?;
        let path = match self.request_type {
            RequestType::Get => GET_PATH,
            RequestType::Post => POST_PATH,
        };
        // Any path on the collector uri prefixes the protocol path.
        let path = format!("{}{}", url.path().trim_end_matches('/'), path);
        url.set_path(&path);
        Ok(url)
    }

    fn build_request(&self, mut payload: Payload) -> sp::Result<hyper::Request<hyper::Body>> {
        payload.add("stm", Utc::now().timestamp_millis().to_string());

        let mut url = self.endpoint()?;
        let mut req = match self.request_type {
            RequestType::Get => {
                url.set_query(Some(payload.to_query_string().as_str()));
                hyper::Request::new(hyper::Body::empty())
            }
            RequestType::Post => {
                let body = json!({
                    "schema": PAYLOAD_DATA_SCHEMA,
                    "data": [payload.to_json()],
                });
                let mut req = hyper::Request::new(hyper::Body::from(body.to_string()));
                *req.method_mut() = hyper::Method::POST;
                req.headers_mut().insert(
                    hyper::header::CONTENT_TYPE,
                    HeaderValue::from_static(POST_CONTENT_TYPE),
                );
                req
            }
        };

        *req.uri_mut() = url.as_str().parse::<hyper::Uri>().map_err(|e| {
            ErrorKind::ConfigurationError(format!("invalid collector url {}: {}", url, e))
        })?;

        Ok(req)
    }

    /// Sends one event and resolves to the collector's response status.
    pub fn send(&self, payload: Payload) -> sp::Future<hyper::StatusCode> {
        let req = match self.build_request(payload) {
            Ok(req) => req,
            Err(err) => return into_future_trait(future::err(err)),
        };

        let target = format!("{} {}", req.method(), req.uri());
        let target_clone = target.clone();
        debug!(request = target.as_str(), "emitting event");

        let f = self
            .http_client
            .request(req)
            .and_then(|resp| {
                let status = resp.status();
                // Drain the body so the connection completes cleanly:
                resp.into_body().concat2().map(move |_| status)
            })
            .map_err(move |e| {
                sp::Error::with_chain(
                    e,
                    ErrorKind::TransportError(format!("{}: emit", target)),
                )
            })
            .map(move |status| {
                if status != hyper::StatusCode::OK {
                    warn!(
                        request = target_clone.as_str(),
                        status = status.as_u16(),
                        "collector rejected event"
                    );
                }
                status
            });

        into_future_trait(f)
    }
}
