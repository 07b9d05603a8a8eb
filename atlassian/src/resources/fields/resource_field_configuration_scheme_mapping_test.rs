#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::resources::test_helpers::configured_resource;
    use mockito::{Matcher, Server};

    fn key(issue_type: &str) -> [String; 3] {
        [
            "10100".to_string(),
            "10000".to_string(),
            issue_type.to_string(),
        ]
    }

    #[tokio::test]
    async fn test_create_links_issue_type() {
        let mut server = Server::new_async().await;
        let link = server
            .mock("PUT", "/rest/api/3/fieldconfigurationscheme/10100/mapping")
            .match_body(Matcher::Json(serde_json::json!({
                "mappings": [{"issueTypeId": "10001", "fieldConfigurationId": "10000"}]
            })))
            .with_status(204)
            .create_async()
            .await;

        let mut planned = mapping_state(key("10001"));
        planned
            .set(&AttributePath::new("id"), Dynamic::Unknown)
            .unwrap();

        let resource: FieldConfigurationSchemeMappingResource =
            configured_resource(&server.url()).await;
        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "atlassian_jira_issue_field_configuration_scheme_mapping"
                        .to_string(),
                    planned_state: planned.clone(),
                    config: planned,
                    planned_private: vec![],
                },
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert_eq!(
            string_attr(&response.new_state, "id").as_deref(),
            Some("10100-10000-10001")
        );
        link.assert_async().await;
    }

    #[tokio::test]
    async fn test_read_detects_remapped_issue_type() {
        let mut server = Server::new_async().await;
        let _mappings = server
            .mock("GET", "/rest/api/3/fieldconfigurationscheme/mapping")
            .match_query(Matcher::UrlEncoded(
                "fieldConfigurationSchemeId".into(),
                "10100".into(),
            ))
            .with_body(
                r#"{"isLast":true,"values":[
                    {"fieldConfigurationSchemeId":"10100","fieldConfigurationId":"10000","issueTypeId":"default"},
                    {"fieldConfigurationSchemeId":"10100","fieldConfigurationId":"10002","issueTypeId":"10001"}
                ]}"#,
            )
            .create_async()
            .await;

        let resource: FieldConfigurationSchemeMappingResource =
            configured_resource(&server.url()).await;
        let read = |issue_type: &'static str| {
            let resource = &resource;
            async move {
                resource
                    .read(
                        Context::new(),
                        ReadResourceRequest {
                            type_name: "atlassian_jira_issue_field_configuration_scheme_mapping"
                                .to_string(),
                            current_state: mapping_state(key(issue_type)),
                            private: vec![],
                        },
                    )
                    .await
            }
        };

        assert_eq!(
            read("default").await.new_state,
            Some(mapping_state(key("default")))
        );
        assert!(read("10001").await.new_state.is_none());
    }

    #[tokio::test]
    async fn test_delete_default_mapping_is_state_only() {
        let mut server = Server::new_async().await;
        let unlink = server
            .mock(
                "POST",
                "/rest/api/3/fieldconfigurationscheme/10100/mapping/delete",
            )
            .expect(0)
            .create_async()
            .await;

        let resource: FieldConfigurationSchemeMappingResource =
            configured_resource(&server.url()).await;
        let response = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: "atlassian_jira_issue_field_configuration_scheme_mapping"
                        .to_string(),
                    prior_state: mapping_state(key(DEFAULT_ISSUE_TYPE)),
                    planned_private: vec![],
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].summary, "Default Mapping Not Deleted");
        assert!(!response.diagnostics[0].is_error());
        unlink.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_unlinks_issue_type() {
        let mut server = Server::new_async().await;
        let unlink = server
            .mock(
                "POST",
                "/rest/api/3/fieldconfigurationscheme/10100/mapping/delete",
            )
            .match_body(Matcher::Json(serde_json::json!({"issueTypeIds": ["10001"]})))
            .with_status(204)
            .create_async()
            .await;

        let resource: FieldConfigurationSchemeMappingResource =
            configured_resource(&server.url()).await;
        let response = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: "atlassian_jira_issue_field_configuration_scheme_mapping"
                        .to_string(),
                    prior_state: mapping_state(key("10001")),
                    planned_private: vec![],
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        unlink.assert_async().await;
    }

    #[tokio::test]
    async fn test_import_requires_three_parts() {
        let resource = FieldConfigurationSchemeMappingResource::new();
        let import = |id: &str| {
            resource.import_state(
                Context::new(),
                ImportResourceStateRequest {
                    type_name: "atlassian_jira_issue_field_configuration_scheme_mapping"
                        .to_string(),
                    id: id.to_string(),
                },
            )
        };

        let imported = import("10100,10000,default").await;
        assert!(imported.diagnostics.is_empty());
        assert_eq!(
            imported.imported_resources[0].state,
            mapping_state(key("default"))
        );

        let rejected = import("10100,10000").await;
        assert_eq!(rejected.diagnostics[0].summary, "Unexpected Import Identifier");
    }
}
