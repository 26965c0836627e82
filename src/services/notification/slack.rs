//! Slack Web API provider.
//!
//! Authenticates with a bot/user token and talks to the `auth`,
//! `conversations`, `users` and `chat` method families. Every call must come
//! back HTTP 2xx with `"ok": true` to count as a success.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use super::{MessagingProvider, ProviderError};
use crate::config::SlackConfig;
use crate::models::{Attachment, ConversationInfo};

/// Page size requested from listing methods
const PAGE_SIZE: u32 = 200;

/// Slack Web API client
#[derive(Clone)]
pub struct SlackClient {
    client: reqwest::Client,
    base_url: Url,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ConversationsPage {
    #[serde(default)]
    channels: Vec<ConversationEntry>,
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct ConversationEntry {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct UsersPage {
    #[serde(default)]
    members: Vec<UserEntry>,
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct UserEntry {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    deleted: bool,
}

#[derive(Debug, Deserialize)]
struct ResponseMetadata {
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenedConversation {
    channel: ConversationEntry,
}

impl ResponseMetadata {
    fn into_cursor(self) -> Option<String> {
        self.next_cursor.filter(|c| !c.is_empty())
    }
}

impl SlackClient {
    /// Creates a client rooted at `base_url` (e.g. `https://slack.com/api/`)
    pub fn new(base_url: Url, token: String, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
            token,
        })
    }

    pub fn from_config(config: &SlackConfig) -> Result<Self, ProviderError> {
        Self::new(config.api_url.clone(), config.token.clone(), config.timeout)
    }

    fn method_url(&self, method: &str) -> Result<Url, ProviderError> {
        self.base_url
            .join(method)
            .map_err(|e| ProviderError::Config(format!("Invalid URL for {}: {}", method, e)))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let mut url = self.method_url(method)?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|source| ProviderError::Http {
                method: method.to_string(),
                source,
            })?;

        Self::decode(method, response).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &Value,
    ) -> Result<T, ProviderError> {
        let url = self.method_url(method)?;

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|source| ProviderError::Http {
                method: method.to_string(),
                source,
            })?;

        Self::decode(method, response).await
    }

    async fn decode<T: DeserializeOwned>(
        method: &str,
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                method: method.to_string(),
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await.map_err(|e| ProviderError::Decode {
            method: method.to_string(),
            message: e.to_string(),
        })?;

        if body.get("ok").and_then(Value::as_bool) != Some(true) {
            let error = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error")
                .to_string();
            return Err(ProviderError::Api {
                method: method.to_string(),
                error,
            });
        }

        serde_json::from_value(body).map_err(|e| ProviderError::Decode {
            method: method.to_string(),
            message: e.to_string(),
        })
    }

    async fn list_conversations(&self, types: &str) -> Result<Vec<ConversationInfo>, ProviderError> {
        let mut conversations = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut params = vec![
                ("types", types.to_string()),
                ("exclude_archived", "true".to_string()),
                ("limit", PAGE_SIZE.to_string()),
            ];
            if let Some(ref c) = cursor {
                params.push(("cursor", c.clone()));
            }

            let page: ConversationsPage = self.get("conversations.list", &params).await?;
            conversations.extend(
                page.channels
                    .into_iter()
                    .map(|c| ConversationInfo::new(c.id, c.name)),
            );

            cursor = page.response_metadata.and_then(ResponseMetadata::into_cursor);
            if cursor.is_none() {
                break;
            }
        }

        Ok(conversations)
    }

    /// Renders attachments in the legacy attachment format
    fn attachments_json(attachments: &[Attachment]) -> Value {
        Value::Array(
            attachments
                .iter()
                .map(|a| {
                    json!({
                        "color": a.color.hex(),
                        "mrkdwn_in": ["text", "pretext", "fields"],
                        "fields": a.fields.iter().map(|f| json!({
                            "title": f.title,
                            "value": f.value,
                            "short": f.short,
                        })).collect::<Vec<_>>(),
                    })
                })
                .collect(),
        )
    }
}

/// `Url::join` drops the last path segment unless the base ends with '/'
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[async_trait]
impl MessagingProvider for SlackClient {
    async fn authenticate(&self) -> Result<(), ProviderError> {
        let _: Value = self.post("auth.test", &json!({})).await?;
        Ok(())
    }

    async fn list_channels(&self) -> Result<Vec<ConversationInfo>, ProviderError> {
        self.list_conversations("public_channel").await
    }

    async fn list_groups(&self) -> Result<Vec<ConversationInfo>, ProviderError> {
        self.list_conversations("private_channel").await
    }

    async fn list_users(&self) -> Result<Vec<ConversationInfo>, ProviderError> {
        let mut users = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut params = vec![("limit", PAGE_SIZE.to_string())];
            if let Some(ref c) = cursor {
                params.push(("cursor", c.clone()));
            }

            let page: UsersPage = self.get("users.list", &params).await?;
            users.extend(
                page.members
                    .into_iter()
                    .filter(|u| !u.deleted)
                    .map(|u| ConversationInfo::new(u.id, u.name)),
            );

            cursor = page.response_metadata.and_then(ResponseMetadata::into_cursor);
            if cursor.is_none() {
                break;
            }
        }

        Ok(users)
    }

    async fn open_direct_channel(&self, user_id: &str) -> Result<String, ProviderError> {
        let opened: OpenedConversation = self
            .post("conversations.open", &json!({ "users": user_id }))
            .await?;
        Ok(opened.channel.id)
    }

    async fn send_message(
        &self,
        conversation_id: &str,
        text: &str,
        attachments: &[Attachment],
    ) -> Result<(), ProviderError> {
        let message = json!({
            "channel": conversation_id,
            "text": text,
            "as_user": true,
            "attachments": Self::attachments_json(attachments),
        });

        let _: Value = self.post("chat.postMessage", &message).await?;
        Ok(())
    }
}
