//! Field configurations, schemes and scheme mappings

use crate::common::{apply, destroy, host, import, object, read, string};
use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::types::{Dynamic, DynamicValue};

const MAPPING: &str = "atlassian_jira_issue_field_configuration_scheme_mapping";

#[tokio::test]
async fn scheme_mapping_is_linked_read_and_unlinked() {
    let mut server = Server::new_async().await;
    let _configuration = server
        .mock("POST", "/rest/api/3/fieldconfiguration")
        .match_body(Matcher::PartialJson(json!({"name": "A"})))
        .with_body(r#"{"id":10001,"name":"A","description":""}"#)
        .create_async()
        .await;
    let _scheme = server
        .mock("POST", "/rest/api/3/fieldconfigurationscheme")
        .match_body(Matcher::PartialJson(json!({"name": "S"})))
        .with_body(r#"{"id":"10002","name":"S","description":""}"#)
        .create_async()
        .await;
    let link = server
        .mock("PUT", "/rest/api/3/fieldconfigurationscheme/10002/mapping")
        .match_body(Matcher::Json(json!({
            "mappings": [{"issueTypeId": "10000", "fieldConfigurationId": "10001"}]
        })))
        .with_status(204)
        .create_async()
        .await;
    let linked = server
        .mock("GET", "/rest/api/3/fieldconfigurationscheme/mapping")
        .match_query(Matcher::UrlEncoded(
            "fieldConfigurationSchemeId".into(),
            "10002".into(),
        ))
        .with_body(
            r#"{"isLast":true,"values":[
                {"fieldConfigurationSchemeId":"10002","fieldConfigurationId":"10001","issueTypeId":"10000"}
            ]}"#,
        )
        .create_async()
        .await;
    let unlink = server
        .mock("POST", "/rest/api/3/fieldconfigurationscheme/10002/mapping/delete")
        .match_body(Matcher::Json(json!({"issueTypeIds": ["10000"]})))
        .with_status(204)
        .create_async()
        .await;

    let host = host(&server.url()).await;
    let configuration = apply(
        &host,
        "atlassian_jira_issue_field_configuration",
        &DynamicValue::null(),
        &object([("name", Dynamic::from("A"))]),
    )
    .await;
    let scheme = apply(
        &host,
        "atlassian_jira_issue_field_configuration_scheme",
        &DynamicValue::null(),
        &object([("name", Dynamic::from("S"))]),
    )
    .await;
    assert_eq!(string(&configuration, "id"), "10001");
    assert_eq!(string(&scheme, "id"), "10002");

    let config = object([
        ("issue_field_configuration_scheme", Dynamic::from(string(&scheme, "id"))),
        ("issue_field_configuration", Dynamic::from(string(&configuration, "id"))),
        ("issue_type_id", Dynamic::from("10000")),
    ]);
    let mapping = apply(&host, MAPPING, &DynamicValue::null(), &config).await;
    link.assert_async().await;
    assert_eq!(string(&mapping, "id"), "10002-10001-10000");

    let refreshed = read(&host, MAPPING, &mapping).await;
    assert_eq!(refreshed.as_ref(), Some(&mapping));

    let imported = import(&host, MAPPING, "10002,10001,10000").await;
    assert_eq!(read(&host, MAPPING, &imported).await, Some(mapping.clone()));

    let diagnostics = destroy(&host, MAPPING, &mapping).await;
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    unlink.assert_async().await;

    linked.remove_async().await;
    let _unlinked = server
        .mock("GET", "/rest/api/3/fieldconfigurationscheme/mapping")
        .match_query(Matcher::Any)
        .with_body(r#"{"isLast":true,"values":[]}"#)
        .create_async()
        .await;
    assert_eq!(read(&host, MAPPING, &mapping).await, None);
}

#[tokio::test]
async fn default_mapping_survives_destroy_with_warning() {
    let mut server = Server::new_async().await;
    let unlink = server
        .mock("POST", "/rest/api/3/fieldconfigurationscheme/10002/mapping/delete")
        .expect(0)
        .create_async()
        .await;

    let host = host(&server.url()).await;
    let state = object([
        ("id", Dynamic::from("10002-10001-default")),
        ("issue_field_configuration_scheme", Dynamic::from("10002")),
        ("issue_field_configuration", Dynamic::from("10001")),
        ("issue_type_id", Dynamic::from("default")),
    ]);
    let diagnostics = destroy(&host, MAPPING, &state).await;

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].summary, "Default Mapping Not Deleted");
    unlink.assert_async().await;
}

#[tokio::test]
async fn changing_mapped_configuration_requires_replace() {
    let server = Server::new_async().await;
    let host = host(&server.url()).await;

    let prior = object([
        ("id", Dynamic::from("10002-10001-10000")),
        ("issue_field_configuration_scheme", Dynamic::from("10002")),
        ("issue_field_configuration", Dynamic::from("10001")),
        ("issue_type_id", Dynamic::from("10000")),
    ]);
    let config = object([
        ("issue_field_configuration_scheme", Dynamic::from("10002")),
        ("issue_field_configuration", Dynamic::from("10003")),
        ("issue_type_id", Dynamic::from("10000")),
    ]);
    let planned = crate::common::plan(&host, MAPPING, &prior, &config).await;

    assert_eq!(
        planned.requires_replace,
        vec![tfplug::types::AttributePath::new("issue_field_configuration")]
    );
}
