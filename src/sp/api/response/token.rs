// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

use sp::model::AccessToken;

/// The body of a successful `credentials/v2/token` or `credentials/v3/token`
/// call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    access_token: Option<AccessToken>,
}

impl Token {
    /// The access token, if the console returned a non-empty one.
    pub fn take(self) -> Option<AccessToken> {
        self.access_token.filter(|token| !token.is_empty())
    }
}
