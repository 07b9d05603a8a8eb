#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::resources::test_helpers::configured_resource;
    use mockito::{Matcher, Server};

    fn planned(item: Dynamic) -> DynamicValue {
        state_of([
            ("id", Dynamic::Unknown),
            ("issue_field_configuration", Dynamic::from("10000")),
            ("item", item),
        ])
    }

    fn create_request(planned_state: DynamicValue) -> CreateResourceRequest {
        CreateResourceRequest {
            type_name: "atlassian_jira_issue_field_configuration_item".to_string(),
            planned_state: planned_state.clone(),
            config: planned_state,
            planned_private: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_checks_renderer_and_reads_back() {
        let mut server = Server::new_async().await;
        let _search = server
            .mock("GET", "/rest/api/3/field/search")
            .match_query(Matcher::UrlEncoded("id".into(), "description".into()))
            .with_body(
                r#"{"isLast":true,"values":[{"id":"description","name":"Description","isLocked":false,"schema":{"type":"string"}}]}"#,
            )
            .create_async()
            .await;
        let update = server
            .mock("PUT", "/rest/api/3/fieldconfiguration/10000/fields")
            .match_body(Matcher::Json(serde_json::json!({
                "fieldConfigurationItems": [{
                    "id": "description",
                    "isHidden": false,
                    "isRequired": true,
                    "renderer": "wiki-renderer"
                }]
            })))
            .with_status(204)
            .create_async()
            .await;
        let _items = server
            .mock("GET", "/rest/api/3/fieldconfiguration/10000/fields")
            .match_query(Matcher::Any)
            .with_body(
                r#"{"isLast":true,"values":[
                    {"id":"summary","isHidden":false,"isRequired":true},
                    {"id":"description","description":"Steps to reproduce","isHidden":false,"isRequired":true,"renderer":"wiki-renderer"}
                ]}"#,
            )
            .create_async()
            .await;

        let resource: FieldConfigurationItemResource = configured_resource(&server.url()).await;
        let response = resource
            .create(
                Context::new(),
                create_request(planned(Dynamic::object([
                    ("id", Dynamic::from("description")),
                    ("description", Dynamic::Unknown),
                    ("is_hidden", Dynamic::Bool(false)),
                    ("is_required", Dynamic::Bool(true)),
                    ("renderer", Dynamic::from("wiki-renderer")),
                ]))),
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        update.assert_async().await;
        assert_eq!(
            string_attr(&response.new_state, "id").as_deref(),
            Some("10000-description")
        );
        assert_eq!(
            response
                .new_state
                .get_string(&AttributePath::new("item").attribute("description"))
                .unwrap(),
            "Steps to reproduce"
        );
    }

    #[tokio::test]
    async fn test_create_rejects_locked_field() {
        let mut server = Server::new_async().await;
        let _search = server
            .mock("GET", "/rest/api/3/field/search")
            .match_query(Matcher::Any)
            .with_body(
                r#"{"isLast":true,"values":[{"id":"summary","name":"Summary","isLocked":true,"schema":{"type":"string"}}]}"#,
            )
            .create_async()
            .await;
        let update = server
            .mock("PUT", "/rest/api/3/fieldconfiguration/10000/fields")
            .expect(0)
            .create_async()
            .await;

        let resource: FieldConfigurationItemResource = configured_resource(&server.url()).await;
        let response = resource
            .create(
                Context::new(),
                create_request(planned(Dynamic::object([
                    ("id", Dynamic::from("summary")),
                    ("renderer", Dynamic::from("text-renderer")),
                ]))),
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].summary, "Field Is Locked");
        update.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_rejects_non_text_field() {
        let mut server = Server::new_async().await;
        let _search = server
            .mock("GET", "/rest/api/3/field/search")
            .match_query(Matcher::UrlEncoded("id".into(), "customfield_10020".into()))
            .with_body(
                r#"{"isLast":true,"values":[{"id":"customfield_10020","name":"Story Points","isLocked":false,"schema":{"type":"number"}}]}"#,
            )
            .create_async()
            .await;
        let update = server
            .mock("PUT", "/rest/api/3/fieldconfiguration/10000/fields")
            .expect(0)
            .create_async()
            .await;

        let resource: FieldConfigurationItemResource = configured_resource(&server.url()).await;
        let response = resource
            .create(
                Context::new(),
                create_request(planned(Dynamic::object([
                    ("id", Dynamic::from("customfield_10020")),
                    ("is_hidden", Dynamic::Bool(false)),
                    ("is_required", Dynamic::Bool(false)),
                    ("renderer", Dynamic::from("wiki-renderer")),
                ]))),
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].summary, "Field Not Renderable");
        assert_eq!(
            response.diagnostics[0].attribute,
            Some(item_path("renderer"))
        );
        update.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_accepts_comments_field_renderer() {
        let mut server = Server::new_async().await;
        let _search = server
            .mock("GET", "/rest/api/3/field/search")
            .match_query(Matcher::UrlEncoded("id".into(), "comment".into()))
            .with_body(
                r#"{"isLast":true,"values":[{"id":"comment","name":"Comment","isLocked":false,"schema":{"type":"comments-page"}}]}"#,
            )
            .create_async()
            .await;
        let update = server
            .mock("PUT", "/rest/api/3/fieldconfiguration/10000/fields")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "fieldConfigurationItems": [{"id": "comment", "renderer": "text-renderer"}]
            })))
            .with_status(204)
            .create_async()
            .await;
        let _items = server
            .mock("GET", "/rest/api/3/fieldconfiguration/10000/fields")
            .match_query(Matcher::Any)
            .with_body(
                r#"{"isLast":true,"values":[{"id":"comment","isHidden":false,"isRequired":false,"renderer":"text-renderer"}]}"#,
            )
            .create_async()
            .await;

        let resource: FieldConfigurationItemResource = configured_resource(&server.url()).await;
        let response = resource
            .create(
                Context::new(),
                create_request(planned(Dynamic::object([
                    ("id", Dynamic::from("comment")),
                    ("description", Dynamic::Unknown),
                    ("is_hidden", Dynamic::Bool(false)),
                    ("is_required", Dynamic::Bool(false)),
                    ("renderer", Dynamic::from("text-renderer")),
                ]))),
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        update.assert_async().await;
        assert_eq!(
            response
                .new_state
                .get_string(&item_path("renderer"))
                .unwrap(),
            "text-renderer"
        );
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_field() {
        let mut server = Server::new_async().await;
        let _search = server
            .mock("GET", "/rest/api/3/field/search")
            .match_query(Matcher::Any)
            .with_body(r#"{"isLast":true,"values":[]}"#)
            .create_async()
            .await;

        let resource: FieldConfigurationItemResource = configured_resource(&server.url()).await;
        let response = resource
            .create(
                Context::new(),
                create_request(planned(Dynamic::object([
                    ("id", Dynamic::from("customfield_10999")),
                    ("renderer", Dynamic::from("text-renderer")),
                ]))),
            )
            .await;

        assert_eq!(response.diagnostics[0].summary, "Field Not Found");
    }

    #[tokio::test]
    async fn test_read_removes_item_missing_from_configuration() {
        let mut server = Server::new_async().await;
        let _items = server
            .mock("GET", "/rest/api/3/fieldconfiguration/10000/fields")
            .match_query(Matcher::Any)
            .with_body(r#"{"isLast":true,"values":[{"id":"summary","isHidden":false,"isRequired":true}]}"#)
            .create_async()
            .await;

        let resource: FieldConfigurationItemResource = configured_resource(&server.url()).await;
        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: "atlassian_jira_issue_field_configuration_item".to_string(),
                    current_state: item_state(
                        "10000",
                        FieldConfigurationItem {
                            id: "environment".to_string(),
                            description: None,
                            is_hidden: false,
                            is_required: false,
                            renderer: None,
                        },
                    ),
                    private: vec![],
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        assert!(response.new_state.is_none());
    }

    #[tokio::test]
    async fn test_delete_only_warns() {
        let resource = FieldConfigurationItemResource::new();
        let response = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: "atlassian_jira_issue_field_configuration_item".to_string(),
                    prior_state: state_of([("id", Dynamic::from("10000-summary"))]),
                    planned_private: vec![],
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert!(!response.diagnostics[0].is_error());
        assert!(response.diagnostics[0].detail.contains("10000-summary"));
    }

    #[tokio::test]
    async fn test_import_sets_nested_item_id() {
        let resource = FieldConfigurationItemResource::new();
        let response = resource
            .import_state(
                Context::new(),
                ImportResourceStateRequest {
                    type_name: "atlassian_jira_issue_field_configuration_item".to_string(),
                    id: "10000,customfield_10010".to_string(),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        let state = &response.imported_resources[0].state;
        assert_eq!(
            string_attr(state, "id").as_deref(),
            Some("10000-customfield_10010")
        );
        assert_eq!(
            string_attr(state, "issue_field_configuration").as_deref(),
            Some("10000")
        );
        assert_eq!(
            state.get_string(&item_path("id")).unwrap(),
            "customfield_10010"
        );
    }
}
