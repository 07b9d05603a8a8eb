#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::resources::test_helpers::configured_resource;
    use mockito::{Matcher, Server};

    fn membership(group_name: &str, account_id: &str) -> tfplug::types::DynamicValue {
        state_of([
            ("id", Dynamic::Unknown),
            ("group_name", Dynamic::from(group_name)),
            ("account_id", Dynamic::from(account_id)),
        ])
    }

    fn read_request(group_name: &str, account_id: &str) -> ReadResourceRequest {
        ReadResourceRequest {
            type_name: "atlassian_jira_group_user".to_string(),
            current_state: state_of([
                ("id", Dynamic::String(format!("{}-{}", group_name, account_id))),
                ("group_name", Dynamic::from(group_name)),
                ("account_id", Dynamic::from(account_id)),
            ]),
            private: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_adds_user() {
        let mut server = Server::new_async().await;
        let add = server
            .mock("POST", "/rest/api/3/group/user")
            .match_query(Matcher::UrlEncoded("groupname".into(), "jira-admins".into()))
            .match_body(Matcher::Json(serde_json::json!({"accountId": "5b10ac"})))
            .with_status(201)
            .with_body(r#"{"name":"jira-admins","groupId":"g-1"}"#)
            .create_async()
            .await;

        let resource: GroupUserResource = configured_resource(&server.url()).await;
        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "atlassian_jira_group_user".to_string(),
                    planned_state: membership("jira-admins", "5b10ac"),
                    config: membership("jira-admins", "5b10ac"),
                    planned_private: vec![],
                },
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert_eq!(
            string_attr(&response.new_state, "id").as_deref(),
            Some("jira-admins-5b10ac")
        );
        add.assert_async().await;
    }

    #[tokio::test]
    async fn test_read_finds_member_on_later_page() {
        let mut server = Server::new_async().await;
        let _page1 = server
            .mock("GET", "/rest/api/3/group/member")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("groupname".into(), "jira-admins".into()),
                Matcher::UrlEncoded("startAt".into(), "0".into()),
            ]))
            .with_body(
                r#"{"startAt":0,"isLast":false,"values":[
                    {"accountId":"other","accountType":"atlassian","active":true,"displayName":"Other"}]}"#,
            )
            .create_async()
            .await;
        let _page2 = server
            .mock("GET", "/rest/api/3/group/member")
            .match_query(Matcher::UrlEncoded("startAt".into(), "1".into()))
            .with_body(
                r#"{"startAt":1,"isLast":true,"values":[
                    {"accountId":"5b10ac","accountType":"atlassian","active":true,"displayName":"Mia"}]}"#,
            )
            .create_async()
            .await;

        let resource: GroupUserResource = configured_resource(&server.url()).await;
        let response = resource
            .read(Context::new(), read_request("jira-admins", "5b10ac"))
            .await;

        let state = response.new_state.unwrap();
        assert_eq!(string_attr(&state, "account_id").as_deref(), Some("5b10ac"));
        assert_eq!(string_attr(&state, "id").as_deref(), Some("jira-admins-5b10ac"));
    }

    #[tokio::test]
    async fn test_read_removes_departed_member() {
        let mut server = Server::new_async().await;
        let _members = server
            .mock("GET", "/rest/api/3/group/member")
            .match_query(Matcher::Any)
            .with_body(r#"{"startAt":0,"isLast":true,"values":[]}"#)
            .create_async()
            .await;

        let resource: GroupUserResource = configured_resource(&server.url()).await;
        let response = resource
            .read(Context::new(), read_request("jira-admins", "5b10ac"))
            .await;

        assert!(response.diagnostics.is_empty());
        assert!(response.new_state.is_none());
    }

    #[tokio::test]
    async fn test_read_removes_membership_of_deleted_group() {
        let mut server = Server::new_async().await;
        let _members = server
            .mock("GET", "/rest/api/3/group/member")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"errorMessages":["Group does not exist."]}"#)
            .create_async()
            .await;

        let resource: GroupUserResource = configured_resource(&server.url()).await;
        let response = resource
            .read(Context::new(), read_request("gone", "5b10ac"))
            .await;

        assert!(response.diagnostics.is_empty());
        assert!(response.new_state.is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_user() {
        let mut server = Server::new_async().await;
        let remove = server
            .mock("DELETE", "/rest/api/3/group/user")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("groupname".into(), "jira-admins".into()),
                Matcher::UrlEncoded("accountId".into(), "5b10ac".into()),
            ]))
            .with_status(200)
            .create_async()
            .await;

        let resource: GroupUserResource = configured_resource(&server.url()).await;
        let response = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: "atlassian_jira_group_user".to_string(),
                    prior_state: read_request("jira-admins", "5b10ac").current_state,
                    planned_private: vec![],
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        remove.assert_async().await;
    }

    #[tokio::test]
    async fn test_import_splits_identifier() {
        let resource = GroupUserResource::new();
        let response = resource
            .import_state(
                Context::new(),
                ImportResourceStateRequest {
                    type_name: "atlassian_jira_group_user".to_string(),
                    id: "jira-admins,5b10ac".to_string(),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        let state = &response.imported_resources[0].state;
        assert_eq!(string_attr(state, "id").as_deref(), Some("jira-admins-5b10ac"));
        assert_eq!(string_attr(state, "group_name").as_deref(), Some("jira-admins"));
        assert_eq!(string_attr(state, "account_id").as_deref(), Some("5b10ac"));
    }

    #[tokio::test]
    async fn test_import_rejects_malformed_identifier() {
        let resource = GroupUserResource::new();
        let response = resource
            .import_state(
                Context::new(),
                ImportResourceStateRequest {
                    type_name: "atlassian_jira_group_user".to_string(),
                    id: "jira-admins".to_string(),
                },
            )
            .await;

        assert!(response.imported_resources.is_empty());
        assert_eq!(response.diagnostics[0].summary, "Unexpected Import Identifier");
    }
}
