// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

use serde_json::Value;

use sp;
use sp::api::Console;
use sp::error::ErrorKind;
use sp::model::Organization;
use sp::provider::diagnostics::Diagnostics;
use sp::provider::schema::{list, object, Attribute, AttributeType, Schema};

use super::{fetch, to_state, ConsoleDataSource};

lazy_static! {
    static ref ORGANIZATION_SCHEMA: Schema = Schema::new()
        .with_description("The console organization the provider credentials belong to")
        .with_attribute("id", Attribute::computed_string())
        .with_attribute("name", Attribute::computed_string())
        .with_attribute("domain", Attribute::computed_string())
        .with_attribute("tier", Attribute::computed_string())
        .with_attribute("tags", Attribute::computed_list(AttributeType::String))
        .with_attribute("esso_domain", Attribute::computed_string())
        .with_attribute("features", Attribute::computed_list(AttributeType::String))
        .with_attribute(
            "source",
            Attribute::computed(object(vec![
                ("name", AttributeType::String),
                (
                    "metadata",
                    object(vec![
                        ("databricks_organization_id", AttributeType::Int64),
                        ("account_locator", AttributeType::String),
                        ("account_locator_with_region", AttributeType::String),
                    ]),
                ),
            ])),
        )
        .with_attribute("packages", Attribute::computed_list(object(vec![])))
        .with_attribute(
            "cloud",
            Attribute::computed(object(vec![
                ("provider", AttributeType::String),
                (
                    "accounts",
                    list(object(vec![
                        ("provider", AttributeType::String),
                        ("account_id", AttributeType::String),
                        ("iam_permissions_boundary", AttributeType::String),
                        ("subscription_id", AttributeType::String),
                        ("subscription_name", AttributeType::String),
                        ("tenant_id", AttributeType::String),
                        ("project", AttributeType::String),
                    ])),
                ),
            ])),
        );
}

/// Exactly one organization is expected for a set of credentials.
pub fn single_organization(mut organizations: Vec<Organization>) -> sp::Result<Organization> {
    if organizations.len() != 1 {
        bail!(ErrorKind::ConfigurationError(format!(
            "expected single console organization, received {}",
            organizations.len()
        )));
    }
    Ok(organizations.remove(0))
}

fn populate(console: &Console, _config: &Value) -> Result<Value, Diagnostics> {
    let organizations = fetch("error fetching organizations", console.get_organizations())?;
    let organization = single_organization(organizations)
        .map_err(|err| Diagnostics::from_error("expected single console organization", &err))?;
    to_state(&organization)
}

/// `snowplow_organization`
pub fn organization_data_source() -> ConsoleDataSource {
    ConsoleDataSource::new("snowplow_organization", &ORGANIZATION_SCHEMA, populate)
}

#[cfg(test)]
mod tests {
    use super::super::tests::provider_data;
    use super::super::DataSource;
    use super::*;

    use sp::util::mock::MockServer;

    const ORGANIZATIONS: &str = "/api/msc/v1/organizations";

    const ACME: &str = r#"{
        "id": "c12d1b26-b18c-4b2d-9b63-5d6c2b3a1a10",
        "name": "Acme",
        "tier": "enterprise",
        "essoDomain": "acme.com",
        "cloud": {"provider": "gcp", "accounts": [{"provider": "gcp", "project": "acme-data"}]},
        "createdAt": "2023-01-01T00:00:00Z"
    }"#;

    fn read(server: &MockServer) -> Result<Value, Diagnostics> {
        let mut data_source = organization_data_source();
        data_source.configure(&provider_data(server));
        data_source.read(&json!({}))
    }

    #[test]
    fn single_organization_becomes_state() {
        let server = MockServer::start();
        server.respond(ORGANIZATIONS, 200, format!("[{}]", ACME));

        let state = read(&server).unwrap();
        assert_eq!(state["id"], json!("c12d1b26-b18c-4b2d-9b63-5d6c2b3a1a10"));
        assert_eq!(state["esso_domain"], json!("acme.com"));
        assert_eq!(state["domain"], json!(null));
        assert_eq!(state["cloud"]["accounts"][0]["project"], json!("acme-data"));
        assert!(state.get("created_at").is_none());
        assert!(state.get("createdAt").is_none());
    }

    #[test]
    fn every_attribute_is_projected() {
        let server = MockServer::start();
        server.respond(
            ORGANIZATIONS,
            200,
            r#"[{
                "id": "c12d1b26-b18c-4b2d-9b63-5d6c2b3a1a10",
                "name": "Acme",
                "domain": null,
                "tier": "enterprise",
                "tags": ["internal", "eu"],
                "essoDomain": "acme.com",
                "features": ["data-products", "bdp"],
                "source": {
                    "name": "databricks",
                    "metadata": {"databricksOrganizationId": 4421}
                },
                "packages": [{"name": "bdp-cloud"}],
                "cloud": {
                    "provider": "aws",
                    "accounts": [{
                        "provider": "aws",
                        "accountId": "123456789012",
                        "iamPermissionsBoundary": "arn:aws:iam::123456789012:policy/boundary"
                    }]
                }
            }]"#,
        );

        let state = read(&server).unwrap();
        assert_eq!(
            state,
            json!({
                "id": "c12d1b26-b18c-4b2d-9b63-5d6c2b3a1a10",
                "name": "Acme",
                "domain": null,
                "tier": "enterprise",
                "tags": ["internal", "eu"],
                "esso_domain": "acme.com",
                "features": ["data-products", "bdp"],
                "source": {
                    "name": "databricks",
                    "metadata": {
                        "databricks_organization_id": 4421,
                        "account_locator": "",
                        "account_locator_with_region": ""
                    }
                },
                "packages": [{}],
                "cloud": {
                    "provider": "aws",
                    "accounts": [{
                        "provider": "aws",
                        "account_id": "123456789012",
                        "iam_permissions_boundary": "arn:aws:iam::123456789012:policy/boundary",
                        "subscription_id": null,
                        "subscription_name": null,
                        "tenant_id": null,
                        "project": null
                    }]
                }
            })
        );
    }

    #[test]
    fn zero_or_many_organizations_are_rejected() {
        let server = MockServer::start();
        server.respond(ORGANIZATIONS, 200, "[]");
        let diags = read(&server).unwrap_err();
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.summary(), "expected single console organization");
        assert!(diag.detail().contains("received 0"));

        server.respond(ORGANIZATIONS, 200, format!("[{}, {}]", ACME, ACME));
        let diags = read(&server).unwrap_err();
        assert!(diags.iter().next().unwrap().detail().contains("received 2"));
    }

    #[test]
    fn console_failures_are_reported() {
        let server = MockServer::start();
        server.respond(ORGANIZATIONS, 403, r#"{"message": "forbidden"}"#);

        let diags = read(&server).unwrap_err();
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.summary(), "error fetching organizations");
        assert!(diag.detail().contains("forbidden"));
    }
}
