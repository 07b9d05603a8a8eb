//! Permission schemes and grants

use crate::common::{apply, destroy, host, import, object, read, string};
use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::types::{AttributePath, Dynamic, DynamicValue};

const GRANT: &str = "atlassian_jira_permission_grant";
const GRANT_BODY: &str = r#"{
    "id": 10200,
    "self": "https://example.atlassian.net/rest/api/3/permissionscheme/10000/permission/10200",
    "holder": {"type": "group", "parameter": "administrators", "expand": "group"},
    "permission": "CLOSE_ISSUES"
}"#;

#[tokio::test]
async fn grant_round_trips_holder_and_permission() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/rest/api/3/permissionscheme/10000/permission")
        .match_body(Matcher::Json(json!({
            "holder": {"type": "group", "parameter": "administrators"},
            "permission": "CLOSE_ISSUES"
        })))
        .with_status(201)
        .with_body(GRANT_BODY)
        .create_async()
        .await;
    let _get = server
        .mock("GET", "/rest/api/3/permissionscheme/10000/permission/10200")
        .match_query(Matcher::Any)
        .with_body(GRANT_BODY)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/rest/api/3/permissionscheme/10000/permission/10200")
        .with_status(204)
        .create_async()
        .await;

    let host = host(&server.url()).await;
    let config = object([
        ("permission_scheme_id", Dynamic::from("10000")),
        (
            "holder",
            Dynamic::object([
                ("type", Dynamic::from("group")),
                ("parameter", Dynamic::from("administrators")),
            ]),
        ),
        ("permission", Dynamic::from("CLOSE_ISSUES")),
    ]);
    let created = apply(&host, GRANT, &DynamicValue::null(), &config).await;
    create.assert_async().await;
    assert_eq!(string(&created, "id"), "10200");

    let refreshed = read(&host, GRANT, &created).await.unwrap();
    let holder = AttributePath::new("holder");
    assert_eq!(
        refreshed.get_string(&holder.clone().attribute("type")).unwrap(),
        "group"
    );
    assert_eq!(
        refreshed.get_string(&holder.attribute("parameter")).unwrap(),
        "administrators"
    );
    assert_eq!(string(&refreshed, "permission"), "CLOSE_ISSUES");
    assert_eq!(refreshed, created);

    let imported = import(&host, GRANT, "10200,10000").await;
    assert_eq!(read(&host, GRANT, &imported).await, Some(created.clone()));

    assert!(destroy(&host, GRANT, &created).await.is_empty());
    delete.assert_async().await;
}

#[tokio::test]
async fn group_holder_without_parameter_is_rejected() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/rest/api/3/permissionscheme/10000/permission")
        .expect(0)
        .create_async()
        .await;

    let host = host(&server.url()).await;
    let diagnostics = host
        .validate_resource_config(
            tfplug::context::Context::new(),
            GRANT,
            object([
                ("permission_scheme_id", Dynamic::from("10000")),
                ("holder", Dynamic::object([("type", Dynamic::from("group"))])),
                ("permission", Dynamic::from("CLOSE_ISSUES")),
            ]),
        )
        .await;

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].summary, "Missing Holder Parameter");
    assert_eq!(
        diagnostics[0].attribute,
        Some(AttributePath::new("holder").attribute("parameter"))
    );
    create.assert_async().await;
}
