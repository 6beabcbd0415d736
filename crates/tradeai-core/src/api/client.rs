//! HTTP client for the TradeAI API.
//!
//! Session identity is a cookie set by the login/register endpoints; the
//! client keeps a cookie store and sends it on every request, so no token
//! plumbing is needed at call sites.

use anyhow::{Context, Result, bail};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::{AuthRequired, ErrorBody};
use super::types::{
    Conversation, ConversationRecord, MessagePage, MessageRecord, MessageStatus, NewsCategory,
    NewsItem, Paged, User, UserEnvelope, normalize_message_page,
};
use crate::chat::message::{Message, MessageAck};
use crate::chat::poller::RecentMessages;
use crate::config::Config;

/// Standard User-Agent header for TradeAI API requests.
pub const USER_AGENT: &str = concat!("tradeai/", env!("CARGO_PKG_VERSION"));

/// An image to attach to an outgoing message.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// TradeAI API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client against the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let trimmed = base_url.trim_end_matches('/').to_string();
        url::Url::parse(&trimmed)
            .with_context(|| format!("Invalid TradeAI API base URL: {trimmed}"))?;
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: trimmed,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.api_base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Auth
    // ========================================================================

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let body = serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        });
        let envelope: UserEnvelope = self.post("/auth/register/", &body).await?;
        Ok(envelope.user)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });
        let envelope: UserEnvelope = self.post("/auth/login/", &body).await?;
        Ok(envelope.user)
    }

    pub async fn logout(&self) -> Result<()> {
        let response = self
            .http
            .post(self.url("/auth/logout/"))
            .send()
            .await
            .context("Logout request failed")?;
        check(response).await?;
        Ok(())
    }

    /// Returns the logged-in user, or `AuthRequired` if the session cookie
    /// is missing or expired.
    pub async fn current_user(&self) -> Result<User> {
        let envelope: UserEnvelope = self.get("/auth/user/", &[]).await?;
        Ok(envelope.user)
    }

    // ========================================================================
    // Conversations
    // ========================================================================

    pub async fn conversations(&self) -> Result<Vec<Conversation>> {
        let paged: Paged<ConversationRecord> = self.get("/conversations/", &[]).await?;
        let (records, _, _) = paged.flatten();
        Ok(records
            .into_iter()
            .map(ConversationRecord::into_conversation)
            .collect())
    }

    pub async fn create_conversation(&self, title: Option<&str>) -> Result<Conversation> {
        let body = serde_json::json!({ "title": title });
        let record: ConversationRecord = self.post("/conversations/", &body).await?;
        Ok(record.into_conversation())
    }

    // ========================================================================
    // Messages
    // ========================================================================

    /// Fetches one history page, newest-first on the wire, normalized to
    /// ascending order.
    pub async fn messages(
        &self,
        conversation_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<MessagePage> {
        let path = format!("/conversations/{conversation_id}/messages/");
        let paged: Paged<MessageRecord> = self
            .get(
                &path,
                &[("limit", limit.to_string()), ("offset", offset.to_string())],
            )
            .await?;
        Ok(normalize_message_page(paged))
    }

    /// Submits a message (multipart: `content` + optional `image_file`).
    pub async fn create_message(
        &self,
        conversation_id: &str,
        content: &str,
        image: Option<ImageAttachment>,
    ) -> Result<MessageAck> {
        let mut form = Form::new();
        if !content.is_empty() {
            form = form.text("content", content.to_string());
        }
        if let Some(image) = image {
            let part = Part::bytes(image.bytes).file_name(image.file_name);
            form = form.part("image_file", part);
        }
        let path = format!("/conversations/{conversation_id}/messages/create/");
        let response = self
            .http
            .post(self.url(&path))
            .multipart(form)
            .send()
            .await
            .context("Message submission failed")?;
        let response = check(response).await?;
        let record: MessageRecord = response
            .json()
            .await
            .context("Malformed message-creation response")?;
        Ok(record.into_ack())
    }

    pub async fn message_status(
        &self,
        conversation_id: &str,
        message_id: &str,
    ) -> Result<MessageStatus> {
        let path = format!("/conversations/{conversation_id}/messages/{message_id}/status/");
        self.get(&path, &[]).await
    }

    // ========================================================================
    // News
    // ========================================================================

    pub async fn news(&self, category: Option<NewsCategory>) -> Result<Vec<NewsItem>> {
        let query: Vec<(&str, String)> = category
            .map(|c| vec![("category", c.as_str().to_string())])
            .unwrap_or_default();
        let paged: Paged<NewsItem> = self.get("/news/", &query).await?;
        let (items, _, _) = paged.flatten();
        Ok(items)
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        debug!(path, "GET");
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .with_context(|| format!("Request to {path} failed"))?;
        let response = check(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Malformed response from {path}"))
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        debug!(path, "POST");
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("Request to {path} failed"))?;
        let response = check(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Malformed response from {path}"))
    }
}

/// Maps non-2xx statuses to errors: 401/403 become [`AuthRequired`], other
/// failures carry the server's `error`/`message` text when present.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(anyhow::Error::new(AuthRequired));
    }
    if !status.is_success() {
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| format!("HTTP {status}"));
        bail!("API request failed: {message}");
    }
    Ok(response)
}

impl RecentMessages for ApiClient {
    async fn recent_messages(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>> {
        let page = self.messages(conversation_id, limit, 0).await?;
        Ok(page.messages)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::chat::message::Role;

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(format!("{}/api", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_login_stores_session_cookie_for_later_requests() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "sessionid=abc123; Path=/; HttpOnly")
                    .set_body_json(serde_json::json!({
                        "user": {"id": 1, "username": "trader", "email": "t@example.com"}
                    })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/auth/user/"))
            .and(wiremock::matchers::header("cookie", "sessionid=abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user": {"id": 1, "username": "trader", "email": "t@example.com"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let user = client.login("trader", "hunter2").await.unwrap();
        assert_eq!(user.username, "trader");
        let user = client.current_user().await.unwrap();
        assert_eq!(user.id, 1);
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_required() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/user/"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client(&server);
        let err = client.current_user().await.unwrap_err();
        assert!(err.downcast_ref::<AuthRequired>().is_some());
    }

    #[tokio::test]
    async fn test_error_body_text_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/conversations/"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({"error": "database unavailable"})),
            )
            .mount(&server)
            .await;

        let client = client(&server);
        let err = client.create_conversation(Some("t")).await.unwrap_err();
        assert!(format!("{err:#}").contains("database unavailable"));
    }

    #[tokio::test]
    async fn test_messages_normalizes_paginated_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/conversations/c1/messages/"))
            .and(query_param("limit", "30"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "count": 2,
                "next": null,
                "results": [
                    {"id": "m2", "sender": "ai", "content": "reply",
                     "timestamp": "2025-01-01T00:00:02Z", "processing_status": "completed"},
                    {"id": "m1", "sender": "user", "content": "question",
                     "timestamp": "2025-01-01T00:00:01Z", "processing_status": "completed"},
                ]
            })))
            .mount(&server)
            .await;

        let client = client(&server);
        let page = client.messages("c1", 30, 0).await.unwrap();
        assert!(!page.has_more);
        assert_eq!(page.messages.len(), 2);
        assert_eq!(page.messages[0].id, "m1");
        assert_eq!(page.messages[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_messages_accepts_legacy_bare_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/conversations/c1/messages/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "m1", "sender": "user", "content": "hi",
                 "timestamp": "2025-01-01T00:00:01Z"}
            ])))
            .mount(&server)
            .await;

        let client = client(&server);
        let page = client.messages("c1", 30, 0).await.unwrap();
        assert_eq!(page.messages.len(), 1);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn test_create_message_sends_multipart_and_tolerates_missing_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/conversations/c1/messages/create/"))
            .and(wiremock::matchers::header_regex(
                "content-type",
                "multipart/form-data.*",
            ))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "sender": "user",
                "content": "look at this chart",
                "processing_status": "pending"
            })))
            .mount(&server)
            .await;

        let client = client(&server);
        let ack = client
            .create_message(
                "c1",
                "look at this chart",
                Some(ImageAttachment {
                    file_name: "chart.png".to_string(),
                    bytes: vec![0x89, 0x50, 0x4e, 0x47],
                }),
            )
            .await
            .unwrap();
        assert!(ack.id.is_none());
        assert_eq!(
            ack.status,
            Some(crate::chat::message::ProcessingStatus::Pending)
        );
    }

    #[tokio::test]
    async fn test_news_passes_category_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/news/"))
            .and(query_param("category", "bearish"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "n1", "title": "Oil slides", "source": "FT",
                 "timestamp": "2025-01-01T08:00:00Z", "category": "bearish",
                 "summary": "s", "ai_analysis": "a", "impact": "medium", "url": "https://x"}
            ])))
            .mount(&server)
            .await;

        let client = client(&server);
        let items = client.news(Some(NewsCategory::Bearish)).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category, Some(NewsCategory::Bearish));
    }

    #[tokio::test]
    async fn test_message_status_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/conversations/c1/messages/m1/status/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message_id": "m1",
                "processing_status": "processing",
                "has_ai_response": false
            })))
            .mount(&server)
            .await;

        let client = client(&server);
        let status = client.message_status("c1", "m1").await.unwrap();
        assert!(!status.has_ai_response);
        assert_eq!(
            status.processing_status,
            crate::chat::message::ProcessingStatus::Processing
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(ApiClient::new("not a url").is_err());
    }
}
