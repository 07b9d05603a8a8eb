//! Workflow statuses

use crate::common::{apply, host, import, object, read, string};
use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::types::{AttributePath, Dynamic, DynamicValue};

const STATUS: &str = "atlassian_jira_status";
const STATUS_BODY: &str =
    r#"[{"id":"10005","name":"S","statusCategory":"TODO","scope":{"type":"GLOBAL"}}]"#;

#[tokio::test]
async fn global_status_has_empty_scope_id() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/rest/api/3/statuses")
        .match_body(Matcher::PartialJson(json!({"scope": {"type": "GLOBAL"}})))
        .with_body(STATUS_BODY)
        .create_async()
        .await;
    let _get = server
        .mock("GET", "/rest/api/3/statuses")
        .match_query(Matcher::UrlEncoded("id".into(), "10005".into()))
        .with_body(STATUS_BODY)
        .create_async()
        .await;

    let host = host(&server.url()).await;
    let config = object([
        ("name", Dynamic::from("S")),
        ("status_category", Dynamic::from("TODO")),
        (
            "status_scope",
            Dynamic::object([("type", Dynamic::from("GLOBAL"))]),
        ),
    ]);
    let created = apply(&host, STATUS, &DynamicValue::null(), &config).await;
    create.assert_async().await;

    let scope_id = AttributePath::new("status_scope").attribute("id");
    assert_eq!(created.get_string(&scope_id).unwrap(), "");
    assert_eq!(string(&created, "description"), " ");

    let refreshed = read(&host, STATUS, &created).await.unwrap();
    assert_eq!(refreshed.get_string(&scope_id).unwrap(), "");
    assert_eq!(refreshed, created);

    let imported = import(&host, STATUS, "10005").await;
    assert_eq!(read(&host, STATUS, &imported).await, Some(created));
}

#[tokio::test]
async fn moving_status_scope_requires_replace() {
    let server = Server::new_async().await;
    let host = host(&server.url()).await;

    let prior = object([
        ("id", Dynamic::from("10005")),
        ("name", Dynamic::from("S")),
        ("description", Dynamic::from(" ")),
        ("status_category", Dynamic::from("TODO")),
        (
            "status_scope",
            Dynamic::object([("type", Dynamic::from("GLOBAL")), ("id", Dynamic::from(""))]),
        ),
    ]);
    let config = object([
        ("name", Dynamic::from("S")),
        ("status_category", Dynamic::from("TODO")),
        (
            "status_scope",
            Dynamic::object([
                ("type", Dynamic::from("PROJECT")),
                ("id", Dynamic::from("10100")),
            ]),
        ),
    ]);
    let planned = crate::common::plan(&host, STATUS, &prior, &config).await;

    assert!(planned
        .requires_replace
        .contains(&AttributePath::new("status_scope").attribute("type")));
}
