// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

use sp::model;
use sp::model::null_as_default;

/// An identifier for a user in the Snowplow console.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        UserId(id.into())
    }

    /// Unwraps the value.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        UserId::new(id)
    }
}

impl<'a> From<&'a str> for UserId {
    fn from(id: &'a str) -> Self {
        UserId::new(id)
    }
}

/// A console user.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct User {
    id: UserId,
    #[serde(default, deserialize_with = "null_as_default")]
    email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    organization_id: model::OrganizationId,
    first_name: Option<String>,
    last_name: Option<String>,
    job_title: Option<String>,
    last_login: Option<String>,
    permissions: Option<Vec<Permission>>,
}

impl User {
    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &String {
        &self.email
    }

    pub fn organization_id(&self) -> &model::OrganizationId {
        &self.organization_id
    }

    pub fn first_name(&self) -> Option<&String> {
        self.first_name.as_ref()
    }

    pub fn last_name(&self) -> Option<&String> {
        self.last_name.as_ref()
    }

    pub fn job_title(&self) -> Option<&String> {
        self.job_title.as_ref()
    }

    pub fn last_login(&self) -> Option<&String> {
        self.last_login.as_ref()
    }

    pub fn permissions(&self) -> Option<&Vec<Permission>> {
        self.permissions.as_ref()
    }
}

/// The capabilities a user holds within one organization.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct Permission {
    #[serde(default, deserialize_with = "null_as_default")]
    organization_id: String,
    capabilities: Option<Vec<Capability>>,
}

impl Permission {
    pub fn organization_id(&self) -> &String {
        &self.organization_id
    }

    pub fn capabilities(&self) -> Option<&Vec<Capability>> {
        self.capabilities.as_ref()
    }
}

#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct Capability {
    #[serde(default, deserialize_with = "null_as_default")]
    resource_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    action: String,
    filters: Option<Vec<Filter>>,
}

impl Capability {
    pub fn resource_type(&self) -> &String {
        &self.resource_type
    }

    pub fn action(&self) -> &String {
        &self.action
    }

    pub fn filters(&self) -> Option<&Vec<Filter>> {
        self.filters.as_ref()
    }
}

#[derive(Debug, Clone, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filter {
    #[serde(default, deserialize_with = "null_as_default")]
    attribute: String,
    #[serde(default, deserialize_with = "null_as_default")]
    value: String,
}

impl Filter {
    pub fn attribute(&self) -> &String {
        &self.attribute
    }

    pub fn value(&self) -> &String {
        &self.value
    }
}
