// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

//! An in-process HTTP server standing in for the console and the collector.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{mpsc, Arc, Mutex};

use futures::{future, Future, Stream};

use hyper::service::service_fn;
use hyper::{Body, Request, Response, Server, StatusCode};

use tokio;

use sp::config::{Config, Environment};

/// A request as seen by the mock server.
#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }
}

type Routes = Arc<Mutex<HashMap<String, (u16, String)>>>;
type Requests = Arc<Mutex<Vec<Recorded>>>;

/// Serves canned `(status, body)` responses by request path and records every
/// request it receives. Unknown paths answer `404` with an empty body.
pub struct MockServer {
    addr: SocketAddr,
    routes: Routes,
    requests: Requests,
    _runtime: tokio::runtime::Runtime,
}

impl MockServer {
    pub fn start() -> Self {
        let routes: Routes = Arc::new(Mutex::new(HashMap::new()));
        let requests: Requests = Arc::new(Mutex::new(vec![]));

        let mut runtime = tokio::runtime::Runtime::new().expect("mock: runtime");
        let (tx, rx) = mpsc::channel();

        let (server_routes, server_requests) = (Arc::clone(&routes), Arc::clone(&requests));
        runtime.spawn(future::lazy(move || {
            let new_service = move || {
                let routes = Arc::clone(&server_routes);
                let requests = Arc::clone(&server_requests);
                service_fn(move |req: Request<Body>| {
                    let routes = Arc::clone(&routes);
                    let requests = Arc::clone(&requests);
                    let method = req.method().to_string();
                    let path = req.uri().path().to_string();
                    let query = req.uri().query().map(str::to_string);
                    let headers = req
                        .headers()
                        .iter()
                        .map(|(k, v)| {
                            (
                                k.as_str().to_lowercase(),
                                v.to_str().unwrap_or_default().to_string(),
                            )
                        })
                        .collect::<HashMap<_, _>>();

                    req.into_body().concat2().map(move |body| {
                        let (status, payload) = routes
                            .lock()
                            .unwrap()
                            .get(&path)
                            .cloned()
                            .unwrap_or((404, String::new()));
                        requests.lock().unwrap().push(Recorded {
                            method,
                            path,
                            query,
                            headers,
                            body: String::from_utf8_lossy(&body).to_string(),
                        });
                        Response::builder()
                            .status(StatusCode::from_u16(status).unwrap())
                            .body(Body::from(payload))
                            .unwrap()
                    })
                })
            };

            let server = Server::bind(&([127, 0, 0, 1], 0).into()).serve(new_service);
            tx.send(server.local_addr()).unwrap();
            server.map_err(|e| eprintln!("mock server error: {}", e))
        }));

        let addr = rx.recv().expect("mock: bind address");

        Self {
            addr,
            routes,
            requests,
            _runtime: runtime,
        }
    }

    /// Answers requests to `path` with `status` and `body`.
    pub fn respond<S: Into<String>>(&self, path: &str, status: u16, body: S) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body.into()));
        self
    }

    pub fn host(&self) -> String {
        self.addr.to_string()
    }

    /// A client configuration pointing at this server.
    pub fn config(&self) -> Config {
        Config::new(Environment::Local(self.host()), "test")
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}
