// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

//! Functions to interact with the Snowplow console.

use std::fmt;
use std::sync::Arc;

use futures::*;

use hyper;
use hyper::client::{Client, HttpConnector};
use hyper::header::{HeaderName, HeaderValue};
use hyper_tls::HttpsConnector;

use serde;
use serde_json;

use url::Url;

use super::response;
use sp;
use sp::config::Config;
use sp::error::{ErrorKind, ResultExt};
use sp::model::{self, AccessToken, Credentials, OrganizationId, PipelineId, UserId};
use sp::util::futures::into_future_trait;

// Console request headers:
const X_SNOWPLOW_TERRAFORM: &str = "x-snowplow-terraform";
const X_API_KEY: &str = "x-api-key";
const X_API_KEY_ID: &str = "x-api-key-id";

type Header = (HeaderName, HeaderValue);

// =============================================================================

macro_rules! route {
    ($uri:expr, $($var:ident),*) => (
        format!($uri, $($var = AsRef::<str>::as_ref(&$var)),*)
    )
}

macro_rules! failed {
    ($err:expr) => {
        into_future_trait(future::err($err.into()))
    };
}

fn organization_route(id: &OrganizationId, relative: &str) -> String {
    format!("/organizations/{}{}", id.as_ref(), relative)
}

// =============================================================================

/// The unauthenticated half of the client: base url, version tag and the
/// HTTP connection. It can only issue the token request until a `Console`
/// wraps it together with a token.
#[derive(Clone)]
struct Transport {
    config: Config,
    base_url: Url,
    http_client: Client<HttpsConnector<HttpConnector>>,
}

impl Transport {
    fn new(config: Config) -> sp::Result<Self> {
        let connector = HttpsConnector::new(4).map_err(|e| {
            ErrorKind::TransportError(format!("couldn't create https connector: {}", e))
        })?;
        // Every request gets its own connection; pooled connections would be
        // tied to the runtime that opened them.
        let http_client = Client::builder().keep_alive(false).build(connector);
        Ok(Self {
            base_url: config.api_url()?,
            config,
            http_client,
        })
    }

    fn url(&self, route: &str) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}{}", self.base_url.path(), route);
        url.set_path(&path);
        url
    }

    fn build_request(
        &self,
        url: &Url,
        token: Option<&AccessToken>,
        additional_headers: Vec<Header>,
    ) -> sp::Result<hyper::Request<hyper::Body>> {
        let uri = url.as_str().parse::<hyper::Uri>().map_err(|e| {
            ErrorKind::ConfigurationError(format!("invalid console url {}: {}", url, e))
        })?;

        let mut req = hyper::Request::new(hyper::Body::empty());
        *req.method_mut() = hyper::Method::GET;
        *req.uri_mut() = uri;

        req.headers_mut().insert(
            HeaderName::from_static(X_SNOWPLOW_TERRAFORM),
            HeaderValue::from_str(self.config.version())?,
        );

        if let Some(token) = token {
            let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token.as_ref()))?;
            bearer.set_sensitive(true);
            req.headers_mut().insert(hyper::header::AUTHORIZATION, bearer);
        }

        for (header_name, header_value) in additional_headers {
            req.headers_mut().insert(header_name, header_value);
        }

        Ok(req)
    }

    /// Issues a `GET` for `route` and resolves to the raw body once it is
    /// known to be a 200 carrying valid JSON.
    fn request<S: Into<String>>(
        &self,
        route: S,
        token: Option<&AccessToken>,
        additional_headers: Vec<Header>,
    ) -> sp::Future<hyper::Chunk> {
        let url = self.url(&route.into());

        let req = match self.build_request(&url, token, additional_headers) {
            Ok(req) => req,
            Err(err) => return failed!(err),
        };

        debug!(method = "GET", url = url.as_str(), "console request");

        let url_string = url.to_string();
        let url_string_clone = url_string.clone();

        let f = self
            .http_client
            .request(req)
            .map_err(move |e| {
                sp::Error::with_chain(
                    e,
                    ErrorKind::TransportError(format!("GET {}: execute", url_string)),
                )
            })
            .and_then(move |resp| {
                let status = resp.status();
                resp.into_body()
                    .concat2()
                    .map_err({
                        let url_string = url_string_clone.clone();
                        move |e| {
                            sp::Error::with_chain(
                                e,
                                ErrorKind::TransportError(format!("GET {}: response", url_string)),
                            )
                        }
                    })
                    .and_then(move |body| check_response(status, body, &url_string_clone))
            });

        into_future_trait(f)
    }
}

/// Maps a console response onto the error taxonomy; the body of a successful
/// response is passed through untouched.
fn check_response(
    status: hyper::StatusCode,
    body: hyper::Chunk,
    url: &str,
) -> sp::Result<hyper::Chunk> {
    debug!(url, status = status.as_u16(), bytes = body.len(), "console response");

    if status != hyper::StatusCode::OK {
        warn!(url, status = status.as_u16(), "console api request failed");

        if body.is_empty() {
            bail!(ErrorKind::ApiError(status, "unknown error".to_string(), None));
        }

        return match serde_json::from_slice::<response::ErrorEnvelope>(&body) {
            Ok(envelope) => {
                let (message, trace_id) = envelope.take();
                Err(ErrorKind::ApiError(status, message, trace_id).into())
            }
            Err(_) => Err(ErrorKind::ApiError(
                status,
                String::from_utf8_lossy(&body).to_string(),
                None,
            )
            .into()),
        };
    }

    if serde_json::from_slice::<serde::de::IgnoredAny>(&body).is_err() {
        bail!(ErrorKind::MalformedResponseError(
            String::from_utf8_lossy(&body).to_string()
        ));
    }

    Ok(body)
}

// =============================================================================

struct ConsoleImpl {
    transport: Transport,
    organization_id: Option<OrganizationId>,
    access_token: AccessToken,
}

/// An authenticated Snowplow console client.
///
/// A `Console` only exists once a token has been obtained; the token is
/// attached to every request and never refreshed.
pub struct Console {
    inner: Arc<ConsoleImpl>,
}

impl Clone for Console {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Console")
            .field("config", self.config())
            .field("organization_id", &self.inner.organization_id)
            .field("access_token", &self.inner.access_token)
            .finish()
    }
}

impl Console {
    /// Authenticate against the console and return a client holding the
    /// resulting token.
    ///
    /// A key id selects the v3 token endpoint (`X-API-KEY-ID` + `X-API-KEY`),
    /// its absence the legacy v2 endpoint (`X-API-KEY` only). An empty secret
    /// or a missing organization id fails before any request is made.
    pub fn connect(config: Config, credentials: Credentials) -> sp::Future<Self> {
        if credentials.key().is_empty() {
            return failed!(ErrorKind::ConfigurationError(
                "console api key required to authenticate".to_string()
            ));
        }

        let (route, headers, variant) = match Self::token_request(&credentials) {
            Ok(request) => request,
            Err(err) => return failed!(err),
        };

        let transport = match Transport::new(config) {
            Ok(transport) => transport,
            Err(err) => return failed!(err),
        };

        let organization_id = credentials.organization_id().cloned();

        let f = transport
            .request(route, None, headers)
            .and_then(move |body| -> sp::Result<Console> {
                let access_token = serde_json::from_slice::<response::Token>(&body)
                    .ok()
                    .and_then(response::Token::take)
                    .ok_or_else(|| {
                        ErrorKind::AuthenticationError(format!(
                            "{} token response carried no access token",
                            variant
                        ))
                    })?;

                info!(
                    organization = organization_id
                        .as_ref()
                        .map(|id| AsRef::<str>::as_ref(id))
                        .unwrap_or(""),
                    credentials = variant,
                    "authenticated with the console api"
                );

                Ok(Console {
                    inner: Arc::new(ConsoleImpl {
                        transport,
                        organization_id,
                        access_token,
                    }),
                })
            });

        into_future_trait(f)
    }

    fn token_request(credentials: &Credentials) -> sp::Result<(String, Vec<Header>, &'static str)> {
        let mut secret = HeaderValue::from_str(credentials.key().as_ref())?;
        secret.set_sensitive(true);

        match credentials.key_id() {
            None => {
                let org = credentials.organization_id().ok_or_else(|| {
                    ErrorKind::ConfigurationError(
                        "organization id required to request a v2 token; do you need a key id to use v3?"
                            .to_string(),
                    )
                })?;
                Ok((
                    organization_route(org, "/credentials/v2/token"),
                    vec![(HeaderName::from_static(X_API_KEY), secret)],
                    "v2",
                ))
            }
            Some(key_id) => {
                let org = credentials.organization_id().ok_or_else(|| {
                    ErrorKind::ConfigurationError(
                        "organization id required to request a v3 token".to_string(),
                    )
                })?;
                Ok((
                    organization_route(org, "/credentials/v3/token"),
                    vec![
                        (
                            HeaderName::from_static(X_API_KEY_ID),
                            HeaderValue::from_str(key_id.as_ref())?,
                        ),
                        (HeaderName::from_static(X_API_KEY), secret),
                    ],
                    "v3",
                ))
            }
        }
    }

    /// The organization every organization-scoped request is made for.
    pub fn organization_id(&self) -> Option<&OrganizationId> {
        self.inner.organization_id.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.inner.transport.config
    }

    fn organization_route(&self, relative: &str) -> sp::Result<String> {
        match self.inner.organization_id {
            Some(ref id) => Ok(organization_route(id, relative)),
            None => Err(ErrorKind::ConfigurationError(
                "can not make organization specific api request without organization id"
                    .to_string(),
            )
            .into()),
        }
    }

    fn get<Q>(&self, route: sp::Result<String>) -> sp::Future<Q>
    where
        Q: 'static + Send + serde::de::DeserializeOwned,
    {
        let route = match route {
            Ok(route) => route,
            Err(err) => return failed!(err),
        };
        let context = format!("GET {}", route);

        let f = self
            .inner
            .transport
            .request(route, Some(&self.inner.access_token), vec![])
            .and_then(move |body| {
                serde_json::from_slice::<Q>(&body)
                    .chain_err(|| format!("couldn't decode the response of {}", context))
            });

        into_future_trait(f)
    }

    // A `null` list decodes the same as an empty one:
    fn get_list<Q>(&self, route: sp::Result<String>) -> sp::Future<Vec<Q>>
    where
        Q: 'static + Send + serde::de::DeserializeOwned,
    {
        into_future_trait(
            self.get::<Option<Vec<Q>>>(route)
                .map(Option::unwrap_or_default),
        )
    }

    /// List the organizations the credentials give access to.
    pub fn get_organizations(&self) -> sp::Future<Vec<model::Organization>> {
        self.get_list(Ok("/organizations".to_string()))
    }

    /// Get a specific user of the current organization.
    pub fn get_user(&self, id: UserId) -> sp::Future<model::User> {
        self.get(self.organization_route(&route!("/users/{id}", id)))
    }

    /// List the users of the current organization.
    pub fn get_users(&self) -> sp::Future<Vec<model::User>> {
        self.get_list(self.organization_route("/users"))
    }

    /// Get a specific pipeline of the current organization.
    pub fn get_pipeline(&self, id: PipelineId) -> sp::Future<model::Pipeline> {
        self.get(self.organization_route(&route!("/resources/v1/pipelines/{id}", id)))
    }

    /// List the pipelines of the current organization.
    pub fn get_pipelines(&self) -> sp::Future<Vec<model::Pipeline>> {
        self.get_list(self.organization_route("/resources/v1/pipelines"))
    }
}
