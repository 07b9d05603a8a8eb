//! Group and group membership API

use futures::Stream;
use serde::{Deserialize, Serialize};

use super::common::{paginate, ApiQueryParams, PageBean, DEFAULT_PAGE_SIZE, MEMBER_PAGE_SIZE};
use super::{ApiError, Client};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub name: String,
    pub group_id: String,
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub account_id: String,
    #[serde(default)]
    pub account_type: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateGroupRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddUserRequest<'a> {
    account_id: &'a str,
}

pub struct GroupsApi<'a> {
    client: &'a Client,
}

impl<'a> GroupsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /rest/api/3/group
    pub async fn create(&self, name: &str) -> Result<Group, ApiError> {
        let request = CreateGroupRequest {
            name: name.to_string(),
        };
        self.client.post("/group", &request).await
    }

    /// DELETE /rest/api/3/group?groupId={group_id}
    pub async fn delete(&self, group_id: &str) -> Result<(), ApiError> {
        let params = ApiQueryParams::new().add("groupId", group_id);
        self.client.delete_with_params("/group", &params).await
    }

    /// GET /rest/api/3/group/bulk?groupName={name}
    ///
    /// The bulk endpoint matches names exactly, so a hit is the group itself.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Group>, ApiError> {
        let params = ApiQueryParams::new()
            .add("groupName", name)
            .add("maxResults", DEFAULT_PAGE_SIZE);
        let page: PageBean<Group> = self.client.get_with_params("/group/bulk", &params).await?;
        Ok(page.values.into_iter().find(|g| g.name == name))
    }

    /// GET /rest/api/3/group/member?groupId={group_id}&includeInactiveUsers=true
    pub fn members(
        &self,
        group_id: &str,
    ) -> impl Stream<Item = Result<Vec<GroupMember>, ApiError>> + 'a {
        let client = self.client;
        let group_id = group_id.to_string();
        paginate(MEMBER_PAGE_SIZE, move |page| {
            let params = page.apply(
                ApiQueryParams::new()
                    .add("groupId", &group_id)
                    .add("includeInactiveUsers", true),
            );
            async move {
                client
                    .get_with_params::<PageBean<GroupMember>>("/group/member", &params)
                    .await
            }
        })
    }

    /// GET /rest/api/3/group/member?groupname={group_name}&includeInactiveUsers=true
    pub fn members_by_name(
        &self,
        group_name: &str,
    ) -> impl Stream<Item = Result<Vec<GroupMember>, ApiError>> + 'a {
        let client = self.client;
        let group_name = group_name.to_string();
        paginate(MEMBER_PAGE_SIZE, move |page| {
            let params = page.apply(
                ApiQueryParams::new()
                    .add("groupname", &group_name)
                    .add("includeInactiveUsers", true),
            );
            async move {
                client
                    .get_with_params::<PageBean<GroupMember>>("/group/member", &params)
                    .await
            }
        })
    }

    /// POST /rest/api/3/group/user?groupname={group_name}
    pub async fn add_user(&self, group_name: &str, account_id: &str) -> Result<(), ApiError> {
        let params = ApiQueryParams::new().add("groupname", group_name);
        self.client
            .post_with_params::<serde_json::Value, _>(
                "/group/user",
                &params,
                &AddUserRequest { account_id },
            )
            .await
            .map(|_| ())
    }

    /// DELETE /rest/api/3/group/user?groupname={group_name}&accountId={account_id}
    pub async fn remove_user(&self, group_name: &str, account_id: &str) -> Result<(), ApiError> {
        let params = ApiQueryParams::new()
            .add("groupname", group_name)
            .add("accountId", account_id);
        self.client.delete_with_params("/group/user", &params).await
    }
}
