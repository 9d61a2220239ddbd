// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

use std::fmt;

use sp::model::OrganizationId;

/// A console bearer token, obtained once per client.
#[derive(Clone, Hash, PartialEq, Eq, Deserialize)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new<S: Into<String>>(token: S) -> Self {
        AccessToken(token.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

// Tokens never show up in logs or error messages:
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AccessToken(..)")
    }
}

/// The identifier half of a v3 console API key.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct ApiKeyId(String);

impl ApiKeyId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        ApiKeyId(id.into())
    }
}

impl AsRef<str> for ApiKeyId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A console API key secret.
#[derive(Clone, Hash, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new<S: Into<String>>(secret: S) -> Self {
        ApiKey(secret.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ApiKey(..)")
    }
}

/// Console API credentials.
///
/// A present key id selects the v3 token endpoint, an absent one the legacy
/// v2 endpoint.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Credentials {
    key_id: Option<ApiKeyId>,
    key: ApiKey,
    organization_id: Option<OrganizationId>,
}

impl Credentials {
    /// Builds credentials, treating empty key ids and organization ids as
    /// absent.
    pub fn new<S: Into<String>>(key_id: Option<S>, key: S, organization_id: Option<S>) -> Self {
        Self {
            key_id: key_id
                .map(Into::into)
                .filter(|id: &String| !id.is_empty())
                .map(ApiKeyId::new),
            key: ApiKey::new(key),
            organization_id: organization_id
                .map(Into::into)
                .filter(|id: &String| !id.is_empty())
                .map(OrganizationId::new),
        }
    }

    pub fn key_id(&self) -> Option<&ApiKeyId> {
        self.key_id.as_ref()
    }

    pub fn key(&self) -> &ApiKey {
        &self.key
    }

    pub fn organization_id(&self) -> Option<&OrganizationId> {
        self.organization_id.as_ref()
    }
}
