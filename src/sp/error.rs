// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

//! Console, tracker and provider errors.

use std::io;

use hyper;
use serde_json;
use url;

error_chain! {
    foreign_links {
        HttpError(hyper::Error);
        InvalidHeaderError(hyper::header::InvalidHeaderValue);
        IoError(io::Error);
        JsonError(serde_json::Error);
        UrlParseError(url::ParseError);
    }

    errors {
        ConfigurationError(message: String) {
            description("configuration error")
            display("configuration error :: {}", message)
        }

        AuthenticationError(message: String) {
            description("authentication error")
            display("unable to obtain console api token :: {}", message)
        }

        ApiError(status: hyper::StatusCode, message: String, trace_id: Option<String>) {
            description("console api error")
            display("console api failure :: {} {}{}", status, message,
                trace_id.as_ref().map(|id| format!(" (trace id {})", id)).unwrap_or_default())
        }

        MalformedResponseError(body: String) {
            description("malformed response")
            display("console returned invalid json content :: {}", body)
        }

        TransportError(context: String) {
            description("transport error")
            display("transport error :: {}", context)
        }
    }
}
