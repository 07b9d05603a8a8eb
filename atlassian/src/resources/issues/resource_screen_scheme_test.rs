#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::resources::test_helpers::configured_resource;
    use mockito::{Matcher, Server};

    fn scheme(id: Dynamic, screens: Dynamic) -> DynamicValue {
        state_of([
            ("id", id),
            ("name", Dynamic::from("Bug scheme")),
            ("description", Dynamic::from("")),
            ("screens", screens),
        ])
    }

    fn screens(default: i64, view: Option<i64>) -> Dynamic {
        Dynamic::object([
            ("default", Dynamic::from(default)),
            ("create", Dynamic::Null),
            ("edit", Dynamic::Null),
            ("view", view.map(Dynamic::from).unwrap_or(Dynamic::Null)),
        ])
    }

    #[tokio::test]
    async fn test_schema_requires_default_screen() {
        let resource = ScreenSchemeResource::new();
        let schema = resource
            .schema(Context::new(), ResourceSchemaRequest)
            .await
            .schema;

        let screens = schema.attribute("screens").unwrap();
        let nested = screens.single_nested_attributes().unwrap();
        assert!(nested.iter().any(|a| a.name == "default" && a.required));
        assert!(nested.iter().any(|a| a.name == "view" && a.optional));
    }

    #[tokio::test]
    async fn test_create_sends_configured_screens() {
        let mut server = Server::new_async().await;
        let create = server
            .mock("POST", "/rest/api/3/screenscheme")
            .match_body(Matcher::Json(serde_json::json!({
                "name": "Bug scheme",
                "screens": {"default": 10000, "view": 10001}
            })))
            .with_status(201)
            .with_body(r#"{"id":10010}"#)
            .create_async()
            .await;

        let planned = scheme(Dynamic::Unknown, screens(10000, Some(10001)));
        let resource: ScreenSchemeResource = configured_resource(&server.url()).await;
        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "atlassian_jira_screen_scheme".to_string(),
                    planned_state: planned.clone(),
                    config: planned,
                    planned_private: vec![],
                },
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert_eq!(
            response.new_state,
            scheme(Dynamic::from("10010"), screens(10000, Some(10001)))
        );
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_read_folds_remote_screens() {
        let mut server = Server::new_async().await;
        let _get = server
            .mock("GET", "/rest/api/3/screenscheme")
            .match_query(Matcher::UrlEncoded("id".into(), "10010".into()))
            .with_body(
                r#"{"isLast":true,"values":[{"id":10010,"name":"Bug scheme","screens":{"default":10002}}]}"#,
            )
            .create_async()
            .await;

        let resource: ScreenSchemeResource = configured_resource(&server.url()).await;
        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: "atlassian_jira_screen_scheme".to_string(),
                    current_state: scheme(Dynamic::from("10010"), screens(10000, Some(10001))),
                    private: vec![],
                },
            )
            .await;

        assert_eq!(
            response.new_state,
            Some(scheme(Dynamic::from("10010"), screens(10002, None)))
        );
    }

    #[tokio::test]
    async fn test_update_puts_whole_scheme() {
        let mut server = Server::new_async().await;
        let update = server
            .mock("PUT", "/rest/api/3/screenscheme/10010")
            .match_body(Matcher::Json(serde_json::json!({
                "name": "Bug scheme",
                "description": "",
                "screens": {"default": 10003}
            })))
            .with_status(204)
            .create_async()
            .await;

        let prior = scheme(Dynamic::from("10010"), screens(10000, Some(10001)));
        let planned = scheme(Dynamic::from("10010"), screens(10003, None));
        let resource: ScreenSchemeResource = configured_resource(&server.url()).await;
        let response = resource
            .update(
                Context::new(),
                UpdateResourceRequest {
                    type_name: "atlassian_jira_screen_scheme".to_string(),
                    prior_state: prior,
                    planned_state: planned.clone(),
                    config: planned.clone(),
                    planned_private: vec![],
                },
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert_eq!(response.new_state, planned);
        update.assert_async().await;
    }
}
