// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

use sp::model::null_as_default;

/// An identifier for an organization in the Snowplow console.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganizationId(String);

impl OrganizationId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        OrganizationId(id.into())
    }

    /// Unwraps the value.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for OrganizationId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<OrganizationId> for String {
    fn from(id: OrganizationId) -> Self {
        id.0
    }
}

impl<'a> From<&'a OrganizationId> for String {
    fn from(id: &'a OrganizationId) -> Self {
        id.0.to_string()
    }
}

impl From<String> for OrganizationId {
    fn from(id: String) -> Self {
        OrganizationId::new(id)
    }
}

/// An organization, as defined by the console API.
///
/// Decoded from camelCase API JSON; serialized with the snake_case attribute
/// names of the `snowplow_organization` data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct Organization {
    id: OrganizationId,
    name: Option<String>,
    domain: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    tier: String,
    tags: Option<Vec<String>>,
    esso_domain: Option<String>,
    features: Option<Vec<String>>,
    source: Option<Source>,
    packages: Option<Vec<Package>>,
    cloud: Option<CloudSettings>,
}

impl Organization {
    pub fn id(&self) -> &OrganizationId {
        &self.id
    }

    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    pub fn domain(&self) -> Option<&String> {
        self.domain.as_ref()
    }

    pub fn tier(&self) -> &String {
        &self.tier
    }

    pub fn tags(&self) -> Option<&Vec<String>> {
        self.tags.as_ref()
    }

    pub fn esso_domain(&self) -> Option<&String> {
        self.esso_domain.as_ref()
    }

    pub fn features(&self) -> Option<&Vec<String>> {
        self.features.as_ref()
    }

    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    pub fn packages(&self) -> Option<&Vec<Package>> {
        self.packages.as_ref()
    }

    pub fn cloud(&self) -> Option<&CloudSettings> {
        self.cloud.as_ref()
    }
}

/// Where an organization was provisioned from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct Source {
    name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    metadata: SourceMetadata,
}

impl Source {
    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    pub fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct SourceMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    databricks_organization_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    account_locator: String,
    #[serde(default, deserialize_with = "null_as_default")]
    account_locator_with_region: String,
}

impl SourceMetadata {
    pub fn databricks_organization_id(&self) -> i64 {
        self.databricks_organization_id
    }

    pub fn account_locator(&self) -> &String {
        &self.account_locator
    }

    pub fn account_locator_with_region(&self) -> &String {
        &self.account_locator_with_region
    }
}

/// A package entitlement. The console exposes no attributes for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct CloudSettings {
    #[serde(default, deserialize_with = "null_as_default")]
    provider: String,
    accounts: Option<Vec<CloudAccount>>,
}

impl CloudSettings {
    pub fn provider(&self) -> &String {
        &self.provider
    }

    pub fn accounts(&self) -> Option<&Vec<CloudAccount>> {
        self.accounts.as_ref()
    }
}

/// A cloud account the organization's infrastructure runs in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct CloudAccount {
    #[serde(default, deserialize_with = "null_as_default")]
    provider: String,
    account_id: Option<String>,
    iam_permissions_boundary: Option<String>,
    subscription_id: Option<String>,
    subscription_name: Option<String>,
    tenant_id: Option<String>,
    project: Option<String>,
}

impl CloudAccount {
    pub fn provider(&self) -> &String {
        &self.provider
    }

    pub fn account_id(&self) -> Option<&String> {
        self.account_id.as_ref()
    }

    pub fn iam_permissions_boundary(&self) -> Option<&String> {
        self.iam_permissions_boundary.as_ref()
    }

    pub fn subscription_id(&self) -> Option<&String> {
        self.subscription_id.as_ref()
    }

    pub fn subscription_name(&self) -> Option<&String> {
        self.subscription_name.as_ref()
    }

    pub fn tenant_id(&self) -> Option<&String> {
        self.tenant_id.as_ref()
    }

    pub fn project(&self) -> Option<&String> {
        self.project.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json;

    const AWS_ORGANIZATION: &str = r#"{
        "id": "0b4a4c8b-c1a4-4c3f-9b3d-2f5b1c1e7a10",
        "name": "Acme",
        "domain": "acme.com",
        "tier": "enterprise",
        "tags": ["internal"],
        "essoDomain": null,
        "features": ["data-products"],
        "source": {
            "name": "snowflake",
            "metadata": {"accountLocator": "xy12345", "accountLocatorWithRegion": "xy12345.eu-west-1"}
        },
        "packages": [{"kind": "bdp"}],
        "cloud": {
            "provider": "aws",
            "accounts": [{"provider": "aws", "accountId": "123456789012", "iamPermissionsBoundary": null}]
        },
        "somethingNew": true
    }"#;

    #[test]
    fn decodes_console_organization() {
        let org: Organization = serde_json::from_str(AWS_ORGANIZATION).unwrap();
        assert_eq!(org.id().as_ref(), "0b4a4c8b-c1a4-4c3f-9b3d-2f5b1c1e7a10");
        assert_eq!(org.name().map(String::as_str), Some("Acme"));
        assert_eq!(org.tier(), "enterprise");
        assert!(org.esso_domain().is_none());
        assert_eq!(org.packages().map(Vec::len), Some(1));

        let source = org.source().unwrap();
        assert_eq!(source.metadata().databricks_organization_id(), 0);
        assert_eq!(source.metadata().account_locator(), "xy12345");

        let account = &org.cloud().unwrap().accounts().unwrap()[0];
        assert_eq!(account.account_id().map(String::as_str), Some("123456789012"));
        assert!(account.tenant_id().is_none());
    }

    #[test]
    fn minimal_organization_uses_zero_values() {
        let org: Organization = serde_json::from_str(r#"{"id": "o1"}"#).unwrap();
        assert_eq!(org.tier(), "");
        assert!(org.tags().is_none());
        assert!(org.cloud().is_none());
    }

    #[test]
    fn organization_without_id_is_rejected() {
        assert!(serde_json::from_str::<Organization>(r#"{"name": "Acme"}"#).is_err());
    }

    #[test]
    fn serializes_with_attribute_names() {
        let org: Organization = serde_json::from_str(AWS_ORGANIZATION).unwrap();
        let state = serde_json::to_value(&org).unwrap();
        assert_eq!(state["esso_domain"], json!(null));
        assert_eq!(
            state["source"]["metadata"]["account_locator_with_region"],
            json!("xy12345.eu-west-1")
        );
        assert_eq!(
            state["cloud"]["accounts"][0]["iam_permissions_boundary"],
            json!(null)
        );
        assert_eq!(state["packages"], json!([{}]));
        assert!(state.get("somethingNew").is_none());
    }

    #[test]
    fn null_fields_decode_as_zero_values() {
        let org: Organization = serde_json::from_str(
            r#"{
                "id": "o1",
                "tier": null,
                "source": {
                    "name": null,
                    "metadata": {
                        "databricksOrganizationId": null,
                        "accountLocator": null,
                        "accountLocatorWithRegion": null
                    }
                },
                "cloud": {"provider": null, "accounts": [{"provider": null}]}
            }"#,
        )
        .unwrap();

        assert_eq!(org.tier(), "");
        let source = org.source().unwrap();
        assert!(source.name().is_none());
        assert_eq!(source.metadata(), &SourceMetadata::default());
        let cloud = org.cloud().unwrap();
        assert_eq!(cloud.provider(), "");
        assert_eq!(cloud.accounts().unwrap()[0].provider(), "");

        let org: Organization =
            serde_json::from_str(r#"{"id": "o1", "source": {"metadata": null}}"#).unwrap();
        assert_eq!(org.source().unwrap().metadata().databricks_organization_id(), 0);
    }
}
