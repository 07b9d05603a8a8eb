#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::resources::test_helpers::configured_resource;
    use mockito::{Matcher, Server};

    fn scheme(id: Dynamic, description: &str) -> DynamicValue {
        state_of([
            ("id", id),
            ("name", Dynamic::from("Software")),
            ("description", Dynamic::from(description)),
        ])
    }

    #[tokio::test]
    async fn test_create_and_delete() {
        let mut server = Server::new_async().await;
        let _create = server
            .mock("POST", "/rest/api/3/fieldconfigurationscheme")
            .match_body(Matcher::Json(serde_json::json!({
                "name": "Software",
                "description": "For software projects"
            })))
            .with_status(201)
            .with_body(r#"{"id":"10002","name":"Software","description":"For software projects"}"#)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/rest/api/3/fieldconfigurationscheme/10002")
            .with_status(204)
            .create_async()
            .await;

        let planned = scheme(Dynamic::Unknown, "For software projects");
        let resource: FieldConfigurationSchemeResource = configured_resource(&server.url()).await;
        let created = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "atlassian_jira_issue_field_configuration_scheme".to_string(),
                    planned_state: planned.clone(),
                    config: planned,
                    planned_private: vec![],
                },
            )
            .await;
        assert_eq!(
            created.new_state,
            scheme(Dynamic::from("10002"), "For software projects")
        );

        let deleted = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: "atlassian_jira_issue_field_configuration_scheme".to_string(),
                    prior_state: created.new_state,
                    planned_private: vec![],
                },
            )
            .await;
        assert!(deleted.diagnostics.is_empty());
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_read_keeps_state_on_server_error() {
        let mut server = Server::new_async().await;
        let _get = server
            .mock("GET", "/rest/api/3/fieldconfigurationscheme")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let prior = scheme(Dynamic::from("10002"), "");
        let resource: FieldConfigurationSchemeResource = configured_resource(&server.url()).await;
        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: "atlassian_jira_issue_field_configuration_scheme".to_string(),
                    current_state: prior.clone(),
                    private: vec![],
                },
            )
            .await;

        assert_eq!(response.new_state, Some(prior));
        assert!(response.diagnostics[0].detail.contains("Response body: unavailable"));
    }
}
