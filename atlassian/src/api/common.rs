//! Common types and utilities for the Jira REST API

use futures::Stream;
use serde::Deserialize;
use std::future::Future;

use super::error::ApiError;

/// Page size for group member listings
pub const MEMBER_PAGE_SIZE: u64 = 100;

/// Page size for every other paginated listing
pub const DEFAULT_PAGE_SIZE: u64 = 50;

#[derive(Debug, Clone, Default)]
pub struct ApiQueryParams {
    params: Vec<(String, String)>,
}

impl ApiQueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn add_optional<K: Into<String>, V: ToString>(mut self, key: K, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.params.push((key.into(), v.to_string()));
        }
        self
    }

    pub fn to_query_string(&self) -> String {
        if self.params.is_empty() {
            String::new()
        } else {
            format!(
                "?{}",
                self.params
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                    .collect::<Vec<_>>()
                    .join("&")
            )
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PaginationParams {
    pub start_at: Option<u64>,
    pub max_results: Option<u64>,
}

impl PaginationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_at(mut self, start_at: u64) -> Self {
        self.start_at = Some(start_at);
        self
    }

    pub fn with_max_results(mut self, max_results: u64) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Appends `startAt` and `maxResults` to existing parameters
    pub fn apply(&self, params: ApiQueryParams) -> ApiQueryParams {
        params
            .add_optional("startAt", self.start_at)
            .add_optional("maxResults", self.max_results)
    }
}

/// One page of a Jira paginated listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct PageBean<T> {
    #[serde(default)]
    pub start_at: u64,
    #[serde(default)]
    pub max_results: u64,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub is_last: Option<bool>,
    #[serde(default)]
    pub values: Vec<T>,
}

impl<T> PageBean<T> {
    /// Whether no further page should be requested
    pub fn is_final(&self) -> bool {
        if let Some(is_last) = self.is_last {
            return is_last || self.values.is_empty();
        }
        if self.values.is_empty() {
            return true;
        }
        self.total
            .is_some_and(|total| self.start_at + self.values.len() as u64 >= total)
    }
}

/// Lazily walks a paginated listing, one request per polled page
///
/// `fetch` receives the pagination parameters for the next page. The stream
/// ends after the page Jira marks as last, or after an empty page.
pub fn paginate<T, F, Fut>(page_size: u64, mut fetch: F) -> impl Stream<Item = Result<Vec<T>, ApiError>>
where
    F: FnMut(PaginationParams) -> Fut,
    Fut: Future<Output = Result<PageBean<T>, ApiError>>,
{
    futures::stream::try_unfold(Some(0u64), move |cursor| {
        let next_page = cursor.map(|start_at| {
            (
                start_at,
                fetch(
                    PaginationParams::new()
                        .with_start_at(start_at)
                        .with_max_results(page_size),
                ),
            )
        });
        async move {
            let Some((start_at, request)) = next_page else {
                return Ok(None);
            };
            let page = request.await?;
            let next = if page.is_final() {
                None
            } else {
                Some(start_at + page.values.len() as u64)
            };
            Ok::<_, ApiError>(Some((page.values, next)))
        }
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JiraErrorBody {
    #[serde(default)]
    pub error_messages: Vec<String>,
    #[serde(default)]
    pub errors: serde_json::Map<String, serde_json::Value>,
}

/// Human readable message from a Jira error body, `{"errorMessages":[..],"errors":{..}}`
pub(crate) fn error_message(status: u16, body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<JiraErrorBody>(body) else {
        return if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            body.to_string()
        };
    };

    let mut messages = parsed.error_messages;
    for (field, message) in parsed.errors {
        match message.as_str() {
            Some(s) => messages.push(format!("{}: {}", field, s)),
            None => messages.push(format!("{}: {}", field, message)),
        }
    }

    if messages.is_empty() {
        if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            body.to_string()
        }
    } else {
        messages.join("; ")
    }
}
