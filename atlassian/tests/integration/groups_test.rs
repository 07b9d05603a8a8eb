//! Groups and group membership

use crate::common::{apply, destroy, host, import, object, read, string};
use mockito::{Matcher, Server};
use tfplug::types::{AttributePath, Dynamic, DynamicValue};

const GROUP_ID: &str = "276f955c-63d7-42c8-9520-92d01dca0625";

#[tokio::test]
async fn group_lifecycle_reports_self_url_and_members() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/rest/api/3/group")
        .match_body(Matcher::Json(serde_json::json!({"name": "tf-test-g1"})))
        .with_status(201)
        .with_body(format!(r#"{{"name":"tf-test-g1","groupId":"{}"}}"#, GROUP_ID))
        .create_async()
        .await;
    let _members = server
        .mock("GET", "/rest/api/3/group/member")
        .match_query(Matcher::UrlEncoded("groupId".into(), GROUP_ID.into()))
        .with_body(
            r#"{"isLast":true,"values":[
                {"accountId":"5b10ac8d82e05b22cc7d4ef5","accountType":"atlassian","active":true,"displayName":"Mia Krystof"}
            ]}"#,
        )
        .create_async()
        .await;
    let bulk = server
        .mock("GET", "/rest/api/3/group/bulk")
        .match_query(Matcher::UrlEncoded("groupName".into(), "tf-test-g1".into()))
        .expect(2)
        .with_body(format!(
            r#"{{"isLast":true,"values":[{{"name":"tf-test-g1","groupId":"{}"}}]}}"#,
            GROUP_ID
        ))
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/rest/api/3/group")
        .match_query(Matcher::UrlEncoded("groupId".into(), GROUP_ID.into()))
        .with_status(200)
        .create_async()
        .await;

    let host = host(&server.url()).await;
    let config = object([("name", Dynamic::from("tf-test-g1"))]);
    let created = apply(&host, "atlassian_jira_group", &DynamicValue::null(), &config).await;
    create.assert_async().await;

    assert_eq!(string(&created, "id"), GROUP_ID);
    assert_eq!(
        string(&created, "self"),
        format!("{}/rest/api/3/group?groupId={}", server.url(), GROUP_ID)
    );

    let refreshed = read(&host, "atlassian_jira_group", &created).await.unwrap();
    assert_eq!(refreshed, created);
    let users = refreshed.get_list(&AttributePath::new("users")).unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].attr("account_id").as_str(), Some("5b10ac8d82e05b22cc7d4ef5"));

    let imported = import(&host, "atlassian_jira_group", "tf-test-g1").await;
    assert_eq!(string(&imported, "name"), "tf-test-g1");
    let imported = read(&host, "atlassian_jira_group", &imported).await.unwrap();
    assert_eq!(imported, created);
    bulk.assert_async().await;

    let diagnostics = destroy(&host, "atlassian_jira_group", &created).await;
    assert!(diagnostics.is_empty());
    delete.assert_async().await;
}

#[tokio::test]
async fn group_user_import_matches_created_state() {
    let mut server = Server::new_async().await;
    let add = server
        .mock("POST", "/rest/api/3/group/user")
        .match_query(Matcher::UrlEncoded("groupname".into(), "jira-admins".into()))
        .match_body(Matcher::Json(
            serde_json::json!({"accountId": "5b10ac8d82e05b22cc7d4ef5"}),
        ))
        .with_status(201)
        .with_body(r#"{"name":"jira-admins","groupId":"276f955c"}"#)
        .create_async()
        .await;
    let _members = server
        .mock("GET", "/rest/api/3/group/member")
        .match_query(Matcher::UrlEncoded("groupname".into(), "jira-admins".into()))
        .with_body(
            r#"{"isLast":true,"values":[{"accountId":"5b10ac8d82e05b22cc7d4ef5","displayName":"Mia"}]}"#,
        )
        .create_async()
        .await;

    let host = host(&server.url()).await;
    let config = object([
        ("group_name", Dynamic::from("jira-admins")),
        ("account_id", Dynamic::from("5b10ac8d82e05b22cc7d4ef5")),
    ]);
    let created = apply(&host, "atlassian_jira_group_user", &DynamicValue::null(), &config).await;
    add.assert_async().await;
    assert_eq!(string(&created, "id"), "jira-admins-5b10ac8d82e05b22cc7d4ef5");

    let imported = import(
        &host,
        "atlassian_jira_group_user",
        "jira-admins,5b10ac8d82e05b22cc7d4ef5",
    )
    .await;
    let imported = read(&host, "atlassian_jira_group_user", &imported).await.unwrap();
    assert_eq!(imported, created);
}
