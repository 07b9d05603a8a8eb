//! Issue types and issue type screen schemes

use crate::common::{apply, host, object, read, string};
use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::types::{AttributePath, Dynamic, DynamicValue};

const SCREEN_SCHEME: &str = "atlassian_jira_issue_type_screen_scheme";

fn mappings(entries: &[(&str, &str)]) -> Dynamic {
    Dynamic::List(
        entries
            .iter()
            .map(|(issue_type, screen_scheme)| {
                Dynamic::object([
                    ("issue_type_id", Dynamic::from(*issue_type)),
                    ("screen_scheme_id", Dynamic::from(*screen_scheme)),
                ])
            })
            .collect(),
    )
}

#[tokio::test]
async fn screen_scheme_update_only_appends_new_mappings() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/rest/api/3/issuetypescreenscheme")
        .match_body(Matcher::PartialJson(json!({
            "name": "Scrum",
            "issueTypeMappings": [{"issueTypeId": "default", "screenSchemeId": "1"}]
        })))
        .with_status(201)
        .with_body(r#"{"id":"10020"}"#)
        .create_async()
        .await;
    let rename = server
        .mock("PUT", "/rest/api/3/issuetypescreenscheme/10020")
        .expect(0)
        .create_async()
        .await;
    let set_default = server
        .mock("PUT", "/rest/api/3/issuetypescreenscheme/10020/mapping/default")
        .expect(0)
        .create_async()
        .await;
    let remove = server
        .mock("POST", "/rest/api/3/issuetypescreenscheme/10020/mapping/remove")
        .expect(0)
        .create_async()
        .await;
    let append = server
        .mock("PUT", "/rest/api/3/issuetypescreenscheme/10020/mapping")
        .match_body(Matcher::Json(json!({
            "issueTypeMappings": [{"issueTypeId": "10000", "screenSchemeId": "1"}]
        })))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let host = host(&server.url()).await;
    let created = apply(
        &host,
        SCREEN_SCHEME,
        &DynamicValue::null(),
        &object([
            ("name", Dynamic::from("Scrum")),
            ("issue_type_mappings", mappings(&[("default", "1")])),
        ]),
    )
    .await;
    create.assert_async().await;
    assert_eq!(string(&created, "id"), "10020");

    let updated = apply(
        &host,
        SCREEN_SCHEME,
        &created,
        &object([
            ("name", Dynamic::from("Scrum")),
            (
                "issue_type_mappings",
                mappings(&[("default", "1"), ("10000", "1")]),
            ),
        ]),
    )
    .await;

    append.assert_async().await;
    rename.assert_async().await;
    set_default.assert_async().await;
    remove.assert_async().await;
    assert_eq!(string(&updated, "id"), "10020");
    assert_eq!(
        updated
            .get_list(&AttributePath::new("issue_type_mappings"))
            .unwrap()
            .len(),
        2
    );
}

#[tokio::test]
async fn issue_type_defaults_to_standard() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/rest/api/3/issuetype")
        .match_body(Matcher::PartialJson(json!({"name": "X", "hierarchyLevel": 0})))
        .with_status(201)
        .with_body(
            r#"{"id":"10010","name":"X","description":"","hierarchyLevel":0,"subtask":false,"avatarId":10318}"#,
        )
        .create_async()
        .await;
    let avatar = server
        .mock("PUT", "/rest/api/3/issuetype/10010")
        .expect(0)
        .create_async()
        .await;
    let _get = server
        .mock("GET", "/rest/api/3/issuetype/10010")
        .with_body(
            r#"{"id":"10010","name":"X","description":"","hierarchyLevel":0,"subtask":false,"avatarId":10318}"#,
        )
        .create_async()
        .await;

    let host = host(&server.url()).await;
    let created = apply(
        &host,
        "atlassian_jira_issue_type",
        &DynamicValue::null(),
        &object([("name", Dynamic::from("X"))]),
    )
    .await;
    create.assert_async().await;
    avatar.assert_async().await;

    assert_eq!(string(&created, "type"), "standard");
    assert_eq!(
        created.get_number(&AttributePath::new("hierarchy_level")).unwrap(),
        0.0
    );
    assert_eq!(
        created.get_number(&AttributePath::new("avatar_id")).unwrap(),
        10318.0
    );

    let refreshed = read(&host, "atlassian_jira_issue_type", &created).await;
    assert_eq!(refreshed, Some(created));
}
