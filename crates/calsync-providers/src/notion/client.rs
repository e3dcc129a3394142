//! Notion REST client for database tasks.
//!
//! Each operation is a single request: query a database, create a page,
//! patch a page's properties, or archive a page. Nothing is retried.

use std::collections::HashSet;

use reqwest::{Method, RequestBuilder};
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::auth::AccessToken;
use crate::error::{ProviderError, ProviderResult};
use crate::http::{ApiBase, send_json};

use super::page::{NotionPage, QueryResponse};

/// Base URL for the Notion API.
pub const NOTION_API_BASE: &str = "https://api.notion.com/v1";

/// Notion API version sent with every request.
pub const NOTION_VERSION: &str = "2022-06-28";

const PROVIDER: &str = "notion";

/// Notion API client bound to one integration token.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http_client: reqwest::Client,
    base: ApiBase,
    token: AccessToken,
    notion_version: String,
}

impl NotionClient {
    /// Creates a client using the default API version.
    pub fn new(http_client: reqwest::Client, base: ApiBase, token: AccessToken) -> Self {
        Self {
            http_client,
            base,
            token,
            notion_version: NOTION_VERSION.to_string(),
        }
    }

    /// Builder method to pin another `Notion-Version`.
    pub fn with_notion_version(mut self, version: impl Into<String>) -> Self {
        self.notion_version = version.into();
        self
    }

    fn request(&self, method: Method, url: Url) -> ProviderResult<RequestBuilder> {
        if self.token.is_blank() {
            return Err(
                ProviderError::authentication("missing integration token").with_provider(PROVIDER)
            );
        }
        Ok(self
            .http_client
            .request(method, url)
            .bearer_auth(self.token.as_str())
            .header("Notion-Version", &self.notion_version)
            .header("Content-Type", "application/json"))
    }

    async fn query_database(
        &self,
        database_id: &str,
        start_cursor: Option<&str>,
    ) -> ProviderResult<QueryResponse> {
        let url = self.base.join(&["databases", database_id, "query"])?;
        let mut request = self.request(Method::POST, url)?;
        if let Some(cursor) = start_cursor {
            request = request.json(&json!({ "start_cursor": cursor }));
        }
        send_json(PROVIDER, request).await
    }

    /// Returns the first page of results from a database query.
    ///
    /// Notion caps a page at 100 results; use [`fetch_all_tasks`] to follow
    /// the cursor. Results that are not page objects are kept with only
    /// `raw` filled in.
    ///
    /// [`fetch_all_tasks`]: Self::fetch_all_tasks
    pub async fn fetch_tasks(&self, database_id: &str) -> ProviderResult<Vec<NotionPage>> {
        let response = self.query_database(database_id, None).await?;
        debug!(
            database_id,
            count = response.results.len(),
            has_more = response.has_more,
            "queried database"
        );
        Ok(response
            .results
            .into_iter()
            .map(NotionPage::from_result)
            .collect())
    }

    /// Returns every page of a database, following `next_cursor`.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidResponse` if a cursor comes back twice.
    pub async fn fetch_all_tasks(&self, database_id: &str) -> ProviderResult<Vec<NotionPage>> {
        let mut pages = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor: Option<String> = None;

        loop {
            let response = self.query_database(database_id, cursor.as_deref()).await?;
            pages.extend(response.results.into_iter().map(NotionPage::from_result));

            match (response.has_more, response.next_cursor) {
                (true, Some(next)) => {
                    if !seen.insert(next.clone()) {
                        return Err(ProviderError::invalid_response(format!(
                            "query cursor did not advance ({})",
                            next
                        ))
                        .with_provider(PROVIDER));
                    }
                    cursor = Some(next);
                }
                _ => break,
            }
        }

        debug!(database_id, count = pages.len(), "fetched all database pages");
        Ok(pages)
    }

    /// Creates a page in a database.
    pub async fn create_task(
        &self,
        database_id: &str,
        properties: &serde_json::Value,
    ) -> ProviderResult<NotionPage> {
        let url = self.base.join(&["pages"])?;
        let body = json!({
            "parent": { "database_id": database_id },
            "properties": properties,
        });
        let request = self.request(Method::POST, url)?.json(&body);
        let raw = send_json(PROVIDER, request).await?;
        let page = NotionPage::from_raw(raw)?;
        debug!(page_id = %page.id, "created Notion page");
        Ok(page)
    }

    /// Replaces the given properties on a page.
    pub async fn update_task(
        &self,
        page_id: &str,
        properties: &serde_json::Value,
    ) -> ProviderResult<NotionPage> {
        let url = self.base.join(&["pages", page_id])?;
        let body = json!({ "properties": properties });
        let request = self.request(Method::PATCH, url)?.json(&body);
        let raw = send_json(PROVIDER, request).await?;
        NotionPage::from_raw(raw)
    }

    /// Archives a page. Notion keeps archived pages in the trash; nothing is
    /// removed.
    pub async fn delete_task(&self, page_id: &str) -> ProviderResult<NotionPage> {
        let url = self.base.join(&["pages", page_id])?;
        let body = json!({ "archived": true });
        let request = self.request(Method::PATCH, url)?.json(&body);
        let raw = send_json(PROVIDER, request).await?;
        let page = NotionPage::from_raw(raw)?;
        debug!(page_id = %page.id, archived = page.archived, "archived Notion page");
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DATABASE_ID: &str = "mock-database-id";
    const PAGE_ID: &str = "mock-page-id";

    fn client_for(server: &MockServer) -> NotionClient {
        NotionClient::new(
            reqwest::Client::new(),
            ApiBase::parse(&server.uri()).unwrap(),
            AccessToken::from("secret_abc"),
        )
    }

    fn task_properties() -> serde_json::Value {
        json!({
            "Name": {"title": [{"text": {"content": "Test Task"}}]},
            "StartDate": {"date": {"start": "2024-01-01"}},
            "EndDate": {"date": {"start": "2024-01-02"}}
        })
    }

    #[tokio::test]
    async fn fetch_tasks_returns_results() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/databases/mock-database-id/query"))
            .and(header("authorization", "Bearer secret_abc"))
            .and(header("notion-version", NOTION_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": "1", "name": "Sample Task"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tasks = client_for(&server)
            .fetch_tasks(DATABASE_ID)
            .await
            .unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "1");
        assert_eq!(tasks[0].raw, json!({"id": "1", "name": "Sample Task"}));

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].body.is_empty());
    }

    #[tokio::test]
    async fn fetch_tasks_stops_at_first_page() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/databases/mock-database-id/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": "1"}],
                "has_more": true,
                "next_cursor": "c2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tasks = client_for(&server)
            .fetch_tasks(DATABASE_ID)
            .await
            .unwrap();
        assert_eq!(tasks.len(), 1);
    }

    #[tokio::test]
    async fn fetch_all_tasks_follows_cursor() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/databases/mock-database-id/query"))
            .and(body_json(json!({"start_cursor": "c2"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": "3"}],
                "has_more": false,
                "next_cursor": null
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/databases/mock-database-id/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": "1"}, {"id": "2"}],
                "has_more": true,
                "next_cursor": "c2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tasks = client_for(&server).fetch_all_tasks(DATABASE_ID).await.unwrap();
        let ids: Vec<_> = tasks.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[tokio::test]
    async fn fetch_all_tasks_stops_on_repeated_cursor() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/databases/mock-database-id/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": "1"}],
                "has_more": true,
                "next_cursor": "same"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_all_tasks(DATABASE_ID)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
        assert!(err.message().contains("cursor did not advance"));
    }

    #[tokio::test]
    async fn fetch_tasks_keeps_results_without_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": "1"}, {"object": "page", "id": 42}]
            })))
            .mount(&server)
            .await;

        let tasks = client_for(&server)
            .fetch_tasks(DATABASE_ID)
            .await
            .unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, "1");
        assert_eq!(tasks[1].id, "");
        assert_eq!(tasks[1].raw, json!({"object": "page", "id": 42}));
    }

    #[tokio::test]
    async fn create_task_posts_parent_and_properties() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pages"))
            .and(body_json(json!({
                "parent": {"database_id": DATABASE_ID},
                "properties": task_properties()
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "new-task-id",
                "properties": task_properties()
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server)
            .create_task(DATABASE_ID, &task_properties())
            .await
            .unwrap();
        assert_eq!(page.id, "new-task-id");
        assert!(page.property("StartDate").is_some());
    }

    #[tokio::test]
    async fn update_task_patches_properties() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/pages/mock-page-id"))
            .and(body_json(json!({"properties": task_properties()})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "updated-task-id",
                "properties": task_properties()
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server)
            .update_task(PAGE_ID, &task_properties())
            .await
            .unwrap();
        assert_eq!(page.id, "updated-task-id");
    }

    #[tokio::test]
    async fn delete_task_archives_page() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/pages/mock-page-id"))
            .and(body_json(json!({"archived": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "archived-task-id",
                "archived": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server).delete_task(PAGE_ID).await.unwrap();
        assert_eq!(page.id, "archived-task-id");
        assert!(page.archived);
    }

    #[tokio::test]
    async fn notion_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "object": "error",
                "status": 404,
                "code": "object_not_found",
                "message": "Could not find page with ID: mock-page-id."
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).delete_task(PAGE_ID).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::NotFound);
        assert_eq!(err.provider(), Some("notion"));
        assert!(err.message().contains("Could not find page"));
    }

    #[tokio::test]
    async fn custom_version_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("notion-version", "2025-09-03"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"results": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let tasks = client_for(&server)
            .with_notion_version("2025-09-03")
            .fetch_tasks(DATABASE_ID)
            .await
            .unwrap();
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn blank_token_is_rejected_locally() {
        let server = MockServer::start().await;
        let client = NotionClient::new(
            reqwest::Client::new(),
            ApiBase::parse(&server.uri()).unwrap(),
            AccessToken::default(),
        );
        let err = client.fetch_tasks(DATABASE_ID).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
    }
}
