#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::resources::test_helpers::configured_resource;
    use mockito::{Matcher, Server};

    fn config(entries: &[(&str, Dynamic)]) -> DynamicValue {
        let mut value = state_of([
            ("id", Dynamic::Null),
            ("name", Dynamic::from("Bug")),
            ("description", Dynamic::Null),
            ("hierarchy_level", Dynamic::Null),
            ("type", Dynamic::Null),
            ("avatar_id", Dynamic::Null),
        ]);
        for (name, v) in entries {
            value.set(&AttributePath::new(name), v.clone()).unwrap();
        }
        value
    }

    fn create_request(config: DynamicValue) -> CreateResourceRequest {
        let mut planned = config.clone();
        for name in ["id", "hierarchy_level", "type", "avatar_id"] {
            if !planned.is_known(&AttributePath::new(name)) {
                planned.mark_unknown(&AttributePath::new(name)).unwrap();
            }
        }
        planned
            .set(&AttributePath::new("description"), Dynamic::from(""))
            .unwrap();
        CreateResourceRequest {
            type_name: "atlassian_jira_issue_type".to_string(),
            planned_state: planned,
            config,
            planned_private: vec![],
        }
    }

    #[test]
    fn test_hierarchy_level_reconciliation() {
        assert_eq!(hierarchy_level(&config(&[])).unwrap(), 0);
        assert_eq!(
            hierarchy_level(&config(&[("type", Dynamic::from("sub-task"))])).unwrap(),
            -1
        );
        assert_eq!(
            hierarchy_level(&config(&[("hierarchy_level", Dynamic::from(-1i64))])).unwrap(),
            -1
        );

        let err = hierarchy_level(&config(&[
            ("type", Dynamic::from("standard")),
            ("hierarchy_level", Dynamic::from(0i64)),
        ]))
        .unwrap_err();
        assert_eq!(err.summary, "Invalid Attribute Combination");
        assert_eq!(err.attribute, Some(AttributePath::new("type")));
    }

    #[tokio::test]
    async fn test_validate_rejects_type_with_hierarchy_level() {
        let resource = IssueTypeResource::new();
        let response = resource
            .validate(
                Context::new(),
                ValidateResourceConfigRequest {
                    type_name: "atlassian_jira_issue_type".to_string(),
                    config: config(&[
                        ("type", Dynamic::from("sub-task")),
                        ("hierarchy_level", Dynamic::from(-1i64)),
                    ]),
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
    }

    #[tokio::test]
    async fn test_schema_marks_type_deprecated() {
        let resource = IssueTypeResource::new();
        let schema = resource
            .schema(Context::new(), ResourceSchemaRequest)
            .await
            .schema;

        assert!(schema.attribute("type").unwrap().deprecated);
        let level = schema.attribute("hierarchy_level").unwrap();
        assert!(level.optional && level.computed);
        assert_eq!(level.plan_modifiers.len(), 2);
    }

    #[tokio::test]
    async fn test_create_defaults_to_standard() {
        let mut server = Server::new_async().await;
        let create = server
            .mock("POST", "/rest/api/3/issuetype")
            .match_body(Matcher::Json(serde_json::json!({
                "name": "Bug",
                "hierarchyLevel": 0
            })))
            .with_status(201)
            .with_body(
                r#"{"id":"10010","name":"Bug","description":"","hierarchyLevel":0,"avatarId":10300,"subtask":false}"#,
            )
            .create_async()
            .await;

        let resource: IssueTypeResource = configured_resource(&server.url()).await;
        let response = resource
            .create(Context::new(), create_request(config(&[])))
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        let state = response.new_state;
        assert_eq!(string_attr(&state, "id").as_deref(), Some("10010"));
        assert_eq!(string_attr(&state, "type").as_deref(), Some("standard"));
        assert_eq!(int_attr(&state, "hierarchy_level"), Some(0));
        assert_eq!(int_attr(&state, "avatar_id"), Some(10300));
        assert!(!state.value.contains_unknown());
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_subtask_sets_avatar_afterwards() {
        let mut server = Server::new_async().await;
        let _create = server
            .mock("POST", "/rest/api/3/issuetype")
            .match_body(Matcher::PartialJson(serde_json::json!({"hierarchyLevel": -1})))
            .with_status(201)
            .with_body(
                r#"{"id":"10011","name":"Bug","description":"","hierarchyLevel":-1,"avatarId":10316,"subtask":true}"#,
            )
            .create_async()
            .await;
        let avatar = server
            .mock("PUT", "/rest/api/3/issuetype/10011")
            .match_body(Matcher::Json(serde_json::json!({"avatarId": 10320})))
            .with_body(
                r#"{"id":"10011","name":"Bug","description":"","hierarchyLevel":-1,"avatarId":10320,"subtask":true}"#,
            )
            .create_async()
            .await;

        let resource: IssueTypeResource = configured_resource(&server.url()).await;
        let response = resource
            .create(
                Context::new(),
                create_request(config(&[
                    ("type", Dynamic::from("sub-task")),
                    ("avatar_id", Dynamic::from(10320i64)),
                ])),
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert_eq!(int_attr(&response.new_state, "avatar_id"), Some(10320));
        assert_eq!(int_attr(&response.new_state, "hierarchy_level"), Some(-1));
        avatar.assert_async().await;
    }

    #[tokio::test]
    async fn test_read_removes_deleted_issue_type() {
        let mut server = Server::new_async().await;
        let _get = server
            .mock("GET", "/rest/api/3/issuetype/10010")
            .with_status(404)
            .with_body(r#"{"errorMessages":["The issue type with id '10010' does not exist"]}"#)
            .create_async()
            .await;

        let resource: IssueTypeResource = configured_resource(&server.url()).await;
        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: "atlassian_jira_issue_type".to_string(),
                    current_state: config(&[("id", Dynamic::from("10010"))]),
                    private: vec![],
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        assert!(response.new_state.is_none());
    }

    #[tokio::test]
    async fn test_update_sends_avatar_every_time() {
        let mut server = Server::new_async().await;
        let update = server
            .mock("PUT", "/rest/api/3/issuetype/10010")
            .match_body(Matcher::Json(serde_json::json!({
                "name": "Defect",
                "description": "Something broke",
                "avatarId": 10300
            })))
            .with_body(
                r#"{"id":"10010","name":"Defect","description":"Something broke","hierarchyLevel":0,"avatarId":10300}"#,
            )
            .create_async()
            .await;

        let prior = config(&[
            ("id", Dynamic::from("10010")),
            ("description", Dynamic::from("")),
            ("hierarchy_level", Dynamic::from(0i64)),
            ("type", Dynamic::from("standard")),
            ("avatar_id", Dynamic::from(10300i64)),
        ]);
        let mut planned = prior.clone();
        planned
            .set(&AttributePath::new("name"), Dynamic::from("Defect"))
            .unwrap();
        planned
            .set(&AttributePath::new("description"), Dynamic::from("Something broke"))
            .unwrap();

        let resource: IssueTypeResource = configured_resource(&server.url()).await;
        let response = resource
            .update(
                Context::new(),
                UpdateResourceRequest {
                    type_name: "atlassian_jira_issue_type".to_string(),
                    prior_state: prior,
                    planned_state: planned.clone(),
                    config: planned,
                    planned_private: vec![],
                },
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert_eq!(string_attr(&response.new_state, "name").as_deref(), Some("Defect"));
        update.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_reports_client_error() {
        let mut server = Server::new_async().await;
        let _delete = server
            .mock("DELETE", "/rest/api/3/issuetype/10010")
            .with_status(409)
            .with_body(r#"{"errorMessages":["The issue type is in use."]}"#)
            .create_async()
            .await;

        let resource: IssueTypeResource = configured_resource(&server.url()).await;
        let response = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: "atlassian_jira_issue_type".to_string(),
                    prior_state: config(&[("id", Dynamic::from("10010"))]),
                    planned_private: vec![],
                },
            )
            .await;

        assert_eq!(response.diagnostics[0].summary, "Client Error");
        assert!(response.diagnostics[0]
            .detail
            .starts_with("Unable to delete issue type, got error:"));
    }
}
